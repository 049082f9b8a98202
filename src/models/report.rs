use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::certification::Certification;
use crate::models::skill::{ProficiencyLevel, SkillCategory};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Certification,
    Unclassified,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Resume => write!(f, "resume"),
            DocumentKind::Certification => write!(f, "certification"),
            DocumentKind::Unclassified => write!(f, "unclassified"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocumentKind::Resume),
            "certification" => Ok(DocumentKind::Certification),
            "unclassified" => Ok(DocumentKind::Unclassified),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillResult {
    pub name: String,
    pub proficiency: ProficiencyLevel,
    pub confidence: f32,
    pub is_technical: bool,
    pub is_backed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_certificate: Option<String>,
    pub category: SkillCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub file: String,
    pub kind: DocumentKind,
    pub skills: Vec<SkillResult>,
    pub certifications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl DocumentReport {
    pub fn empty(file: impl Into<String>, kind: DocumentKind, certifications: Vec<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            skills: Vec::new(),
            certifications,
            industry: None,
            processed_at: Utc::now(),
        }
    }

    pub fn backed_count(&self) -> usize {
        self.skills.iter().filter(|s| s.is_backed).count()
    }

    pub fn skills_at(&self, level: ProficiencyLevel) -> Vec<&SkillResult> {
        self.skills.iter().filter(|s| s.proficiency == level).collect()
    }

    pub fn skill(&self, name: &str) -> Option<&SkillResult> {
        self.skills.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub certifications: Vec<Certification>,
    pub processed_at: DateTime<Utc>,
}
