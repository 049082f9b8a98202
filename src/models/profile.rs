use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::models::report::{BatchReport, DocumentKind};
use crate::models::skill::ProficiencyLevel;
use crate::taxonomy::SkillCatalog;

pub const UNKNOWN_PERSON: &str = "Unknown";

static PERSON_FROM_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)[\s_\-.]+(?:resume|cv|certificate|certification)(?:[\s_\-.]|$)")
        .expect("person name pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSkill {
    pub name: String,
    pub proficiency: ProficiencyLevel,
    pub is_backed: bool,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub from_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedProfile {
    pub name: String,
    pub processed_at: DateTime<Utc>,
    pub skills: Vec<ProfileSkill>,
    pub certifications: Vec<String>,
    pub skill_proficiency: BTreeMap<String, ProficiencyLevel>,
    pub related_skills: Vec<String>,
}

impl ConsolidatedProfile {
    pub fn from_batch(batch: &BatchReport, catalog: &SkillCatalog) -> Self {
        let resumes: Vec<_> = batch
            .documents
            .iter()
            .filter(|d| d.kind == DocumentKind::Resume)
            .collect();

        let name = resumes
            .iter()
            .find_map(|d| person_name(&d.file))
            .unwrap_or_else(|| UNKNOWN_PERSON.to_string());

        let mut skills: Vec<ProfileSkill> = Vec::new();
        let mut skill_proficiency: BTreeMap<String, ProficiencyLevel> = BTreeMap::new();

        for report in &resumes {
            for skill in &report.skills {
                // First occurrence wins
                let name = match skills.iter().find(|s| s.name.eq_ignore_ascii_case(&skill.name)) {
                    Some(existing) => existing.name.clone(),
                    None => {
                        skills.push(ProfileSkill {
                            name: skill.name.clone(),
                            proficiency: skill.proficiency,
                            is_backed: skill.is_backed,
                            confidence: skill.confidence,
                            source: skill.source.clone(),
                            from_file: report.file.clone(),
                        });
                        skill.name.clone()
                    }
                };

                skill_proficiency
                    .entry(name)
                    .and_modify(|level| *level = (*level).max(skill.proficiency))
                    .or_insert(skill.proficiency);
            }
        }

        let mut certifications: Vec<String> = Vec::new();
        let listed = resumes.iter().flat_map(|d| d.certifications.iter());
        for cert in batch.certifications.iter().map(|c| &c.name).chain(listed) {
            if !certifications.iter().any(|c| c.eq_ignore_ascii_case(cert)) {
                certifications.push(cert.clone());
            }
        }

        let mut related_skills: Vec<String> = Vec::new();
        for skill in &skills {
            for related in catalog.related_skills(&skill.name) {
                let claimed = skills.iter().any(|s| s.name.eq_ignore_ascii_case(&related));
                if !claimed && !related_skills.contains(&related) {
                    related_skills.push(related);
                }
            }
        }

        Self {
            name,
            processed_at: batch.processed_at,
            skills,
            certifications,
            skill_proficiency,
            related_skills,
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// "Jane Doe Resume.pdf" -> "Jane Doe", "john_smith_cv.txt" -> "john smith".
pub fn person_name(file: &str) -> Option<String> {
    let stem = Path::new(file).file_stem()?.to_str()?;
    let caps = PERSON_FROM_FILE.captures(stem)?;
    let name = caps[1].replace(['_', '-', '.'], " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certification::Certification;
    use crate::models::report::{DocumentReport, SkillResult};
    use crate::models::skill::SkillCategory;

    fn skill(name: &str, level: ProficiencyLevel, backed: bool) -> SkillResult {
        SkillResult {
            name: name.to_string(),
            proficiency: level,
            confidence: 0.8,
            is_technical: true,
            is_backed: backed,
            backing_certificate: None,
            category: SkillCategory::Technical,
            source: Some("skills_section".to_string()),
            indicators: Vec::new(),
        }
    }

    fn resume(file: &str, skills: Vec<SkillResult>) -> DocumentReport {
        let mut report = DocumentReport::empty(file, DocumentKind::Resume, Vec::new());
        report.skills = skills;
        report
    }

    #[test]
    fn test_person_name_from_file() {
        assert_eq!(person_name("docs/Jane Doe Resume.pdf").as_deref(), Some("Jane Doe"));
        assert_eq!(person_name("john_smith_cv.txt").as_deref(), Some("john smith"));
        assert_eq!(person_name("Ana-Lopez-Resume-2024.md").as_deref(), Some("Ana Lopez"));
        assert_eq!(person_name("resume.txt"), None);
        assert_eq!(person_name("notes.txt"), None);
    }

    #[test]
    fn test_profile_merges_resumes() {
        let batch = BatchReport {
            documents: vec![
                resume(
                    "Jane Doe Resume.txt",
                    vec![skill("React", ProficiencyLevel::Intermediate, false)],
                ),
                resume(
                    "jane_doe_cv.txt",
                    vec![
                        skill("react", ProficiencyLevel::Advanced, true),
                        skill("SQL", ProficiencyLevel::Beginner, false),
                    ],
                ),
                DocumentReport::empty("notes.txt", DocumentKind::Unclassified, Vec::new()),
            ],
            certifications: vec![Certification::new("Oracle Database SQL", 0.9, "certificate_document")],
            processed_at: Utc::now(),
        };

        let profile = ConsolidatedProfile::from_batch(&batch, &SkillCatalog::builtin());

        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.skills[0].name, "React");
        assert_eq!(profile.skills[0].from_file, "Jane Doe Resume.txt");
        assert!(!profile.skills[0].is_backed);
        assert_eq!(profile.skill_proficiency.get("React"), Some(&ProficiencyLevel::Advanced));
        assert_eq!(profile.skill_proficiency.get("SQL"), Some(&ProficiencyLevel::Beginner));
        assert_eq!(profile.skill_proficiency.len(), 2);
        assert_eq!(profile.certifications, vec!["Oracle Database SQL".to_string()]);
        assert!(profile.related_skills.contains(&"JavaScript".to_string()));
        assert!(!profile.related_skills.iter().any(|s| s == "React" || s == "SQL"));
    }

    #[test]
    fn test_profile_without_resumes_is_unknown() {
        let batch = BatchReport {
            documents: Vec::new(),
            certifications: Vec::new(),
            processed_at: Utc::now(),
        };
        let profile = ConsolidatedProfile::from_batch(&batch, &SkillCatalog::builtin());
        assert_eq!(profile.name, UNKNOWN_PERSON);
        assert!(profile.skills.is_empty());
        assert!(profile.related_skills.is_empty());
    }
}
