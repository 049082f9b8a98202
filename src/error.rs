use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Text extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("No valid input files: {0}")]
    NoInputFiles(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Extraction { .. } | Error::UnsupportedFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        let err = Error::Extraction {
            path: "resume.pdf".to_string(),
            reason: "empty".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(Error::UnsupportedFormat("scan.png".to_string()).is_recoverable());
        assert!(!Error::NoInputFiles("inputs".to_string()).is_recoverable());
        assert!(!Error::Config("bad".to_string()).is_recoverable());
    }
}
