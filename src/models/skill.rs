use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    /// All levels, most conservative first.
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
        ProficiencyLevel::Expert,
    ];

    pub fn index(self) -> usize {
        match self {
            ProficiencyLevel::Beginner => 0,
            ProficiencyLevel::Intermediate => 1,
            ProficiencyLevel::Advanced => 2,
            ProficiencyLevel::Expert => 3,
        }
    }

    pub fn is_superlative(self) -> bool {
        matches!(self, ProficiencyLevel::Advanced | ProficiencyLevel::Expert)
    }

    pub fn description(self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Basic knowledge and limited practical experience",
            ProficiencyLevel::Intermediate => "Working knowledge with practical application experience",
            ProficiencyLevel::Advanced => "Deep knowledge with significant project experience",
            ProficiencyLevel::Expert => "Comprehensive mastery and leadership in the subject",
        }
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProficiencyLevel::Beginner => write!(f, "Beginner"),
            ProficiencyLevel::Intermediate => write!(f, "Intermediate"),
            ProficiencyLevel::Advanced => write!(f, "Advanced"),
            ProficiencyLevel::Expert => write!(f, "Expert"),
        }
    }
}

impl std::str::FromStr for ProficiencyLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ProficiencyLevel::Beginner),
            "intermediate" => Ok(ProficiencyLevel::Intermediate),
            "advanced" => Ok(ProficiencyLevel::Advanced),
            "expert" => Ok(ProficiencyLevel::Expert),
            other => Err(format!("unknown proficiency level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Industry(String),
    Unknown,
}

impl SkillCategory {
    pub fn is_technical(&self) -> bool {
        matches!(self, SkillCategory::Technical)
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillCategory::Technical => write!(f, "technical"),
            SkillCategory::Soft => write!(f, "soft"),
            SkillCategory::Industry(name) => write!(f, "{}", name),
            SkillCategory::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    pub proficiency: Option<ProficiencyLevel>,
    pub is_backed: bool,
    pub confidence_score: f32,
    pub backing_certificate: Option<String>,
    pub source: Option<String>,
}

pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl Skill {
    pub fn new(name: impl Into<String>, confidence: f32, source: Option<String>) -> Self {
        Self {
            name: name.into(),
            proficiency: None,
            is_backed: false,
            confidence_score: clamp_confidence(confidence),
            backing_certificate: None,
            source,
        }
    }

    pub fn with_backing(mut self, certificate: impl Into<String>, floor: f32) -> Self {
        self.is_backed = true;
        self.backing_certificate = Some(certificate.into());
        self.confidence_score = clamp_confidence(self.confidence_score.max(floor));
        self
    }

    pub fn with_assessment(mut self, level: ProficiencyLevel, confidence: f32) -> Self {
        self.proficiency = Some(level);
        let confidence = clamp_confidence(confidence);
        self.confidence_score = if self.is_backed {
            self.confidence_score.max(confidence)
        } else {
            confidence
        };
        self
    }
}

pub fn merge(existing: &Skill, incoming: &Skill) -> Skill {
    let newly_backed = incoming.is_backed && !existing.is_backed;
    let incoming_wins = newly_backed || incoming.confidence_score > existing.confidence_score;

    let (winner, loser) = if incoming_wins {
        (incoming, existing)
    } else {
        (existing, incoming)
    };

    let mut merged = winner.clone();
    merged.is_backed = existing.is_backed || incoming.is_backed;
    if merged.backing_certificate.is_none() {
        merged.backing_certificate = loser.backing_certificate.clone();
    }
    if merged.proficiency.is_none() {
        merged.proficiency = loser.proficiency;
    }
    if merged.source.is_none() {
        merged.source = loser.source.clone();
    }
    merged.confidence_score = clamp_confidence(
        existing.confidence_score.max(incoming.confidence_score),
    );
    merged
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillRepository {
    skills: BTreeMap<String, Skill>,
}

#[derive(Serialize, Deserialize)]
struct RepositoryFile {
    skills: Vec<Skill>,
}

impl SkillRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skill(&mut self, skill: Skill) -> bool {
        match self.skills.get(&skill.name) {
            Some(existing) => {
                let merged = merge(existing, &skill);
                self.skills.insert(merged.name.clone(), merged);
                false
            }
            None => {
                self.skills.insert(skill.name.clone(), skill);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn all(&self) -> Vec<&Skill> {
        self.skills.values().collect()
    }

    pub fn backed(&self) -> Vec<&Skill> {
        self.skills.values().filter(|s| s.is_backed).collect()
    }

    pub fn unbacked(&self) -> Vec<&Skill> {
        self.skills.values().filter(|s| !s.is_backed).collect()
    }

    pub fn from_section(&self, source: &str) -> Vec<&Skill> {
        self.skills
            .values()
            .filter(|s| s.source.as_deref() == Some(source))
            .collect()
    }

    pub fn by_source(&self) -> BTreeMap<String, Vec<&Skill>> {
        let mut groups: BTreeMap<String, Vec<&Skill>> = BTreeMap::new();
        for skill in self.skills.values() {
            let key = skill.source.clone().unwrap_or_else(|| "unknown".to_string());
            groups.entry(key).or_insert_with(Vec::new).push(skill);
        }

        for group in groups.values_mut() {
            group.sort_by(|a, b| {
                b.confidence_score
                    .partial_cmp(&a.confidence_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        groups
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = RepositoryFile {
            skills: self.skills.values().cloned().collect(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: RepositoryFile = serde_json::from_str(&content)?;
        let mut repository = Self::new();
        for skill in file.skills {
            repository.add_skill(skill);
        }
        Ok(repository)
    }
}
