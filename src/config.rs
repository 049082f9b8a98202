use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 200_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub skills_catalog_path: Option<PathBuf>,
    pub certifications_catalog_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub database_path: String,
    pub max_document_chars: usize,
    pub include_unclassified: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let skills_catalog_path = env::var("SKILLS_CATALOG_PATH").ok().map(PathBuf::from);
        let certifications_catalog_path = env::var("CERTIFICATIONS_CATALOG_PATH")
            .ok()
            .map(PathBuf::from);
        let rules_path = env::var("PROFICIENCY_RULES_PATH").ok().map(PathBuf::from);

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "skillproof.db".to_string());

        let max_document_chars = match env::var("MAX_DOCUMENT_CHARS") {
            Ok(v) => v.parse().map_err(|_| {
                Error::Config(format!("MAX_DOCUMENT_CHARS must be a positive integer, got '{}'", v))
            })?,
            Err(_) => DEFAULT_MAX_DOCUMENT_CHARS,
        };

        if max_document_chars == 0 {
            return Err(Error::Config("MAX_DOCUMENT_CHARS must be greater than zero".to_string()));
        }

        let include_unclassified = match env::var("INCLUDE_UNCLASSIFIED") {
            Ok(v) => parse_bool(&v).ok_or_else(|| {
                Error::Config(format!("INCLUDE_UNCLASSIFIED must be true or false, got '{}'", v))
            })?,
            Err(_) => true,
        };

        Ok(Self {
            skills_catalog_path,
            certifications_catalog_path,
            rules_path,
            database_path,
            max_document_chars,
            include_unclassified,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skills_catalog_path: None,
            certifications_catalog_path: None,
            rules_path: None,
            database_path: "skillproof.db".to_string(),
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            include_unclassified: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub include_unclassified: bool,
    pub use_cached: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            include_unclassified: config.include_unclassified,
            use_cached: false,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" no "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_pipeline_config_from_config() {
        let config = Config {
            include_unclassified: false,
            ..Config::default()
        };
        let pipeline = PipelineConfig::from(&config);
        assert!(!pipeline.include_unclassified);
        assert!(PipelineConfig::default().include_unclassified);
        assert!(!pipeline.use_cached);
    }
}
