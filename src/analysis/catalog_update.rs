use serde_json::{Map, Value};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{BatchReport, SkillCategory};

pub const UPDATE_CONFIDENCE: f32 = 0.7;

pub fn update_skills_catalog<P: AsRef<Path>>(path: P, batch: &BatchReport) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut data = read_object(path)?;
    let mut added = Vec::new();

    let skills = batch
        .documents
        .iter()
        .flat_map(|d| d.skills.iter())
        .filter(|s| s.confidence > UPDATE_CONFIDENCE);

    for skill in skills {
        let key = match &skill.category {
            SkillCategory::Soft => "soft_skills".to_string(),
            SkillCategory::Industry(industry) => format!("{}_skills", industry),
            SkillCategory::Technical | SkillCategory::Unknown => "technical_skills".to_string(),
        };
        if push_unique(&mut data, &key, &skill.name)? {
            info!("Adding skill to catalog: {}", skill.name);
            added.push(skill.name.clone());
        }
    }

    write_object(path, data)?;
    info!("Updated skill catalog at {} ({} added)", path.display(), added.len());
    Ok(added)
}

pub fn update_certifications_catalog<P: AsRef<Path>>(path: P, batch: &BatchReport) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut data = read_object(path)?;
    let mut added = Vec::new();

    for cert in batch.certifications.iter().filter(|c| c.confidence > UPDATE_CONFIDENCE) {
        if push_unique(&mut data, "certifications", &cert.name)? {
            info!("Adding certification to catalog: {}", cert.name);
            added.push(cert.name.clone());
        }
    }

    write_object(path, data)?;
    info!("Updated certification catalog at {} ({} added)", path.display(), added.len());
    Ok(added)
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Catalog(format!("{} is not a JSON object", path.display()))),
    }
}

fn write_object(path: &Path, data: Map<String, Value>) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(&Value::Object(data))?)?;
    Ok(())
}

fn push_unique(data: &mut Map<String, Value>, key: &str, name: &str) -> Result<bool> {
    let list = data
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| Error::Catalog(format!("'{}' must be a list", key)))?;

    let present = list
        .iter()
        .filter_map(Value::as_str)
        .any(|existing| existing.eq_ignore_ascii_case(name));
    if present {
        return Ok(false);
    }

    list.push(Value::String(name.to_string()));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, DocumentKind, DocumentReport, ProficiencyLevel, SkillResult};
    use crate::taxonomy::SkillCatalog;
    use chrono::Utc;

    fn skill(name: &str, category: SkillCategory, confidence: f32) -> SkillResult {
        SkillResult {
            name: name.to_string(),
            proficiency: ProficiencyLevel::Intermediate,
            confidence,
            is_technical: category.is_technical(),
            is_backed: false,
            backing_certificate: None,
            category,
            source: None,
            indicators: Vec::new(),
        }
    }

    fn batch() -> BatchReport {
        let mut report = DocumentReport::empty("resume.txt", DocumentKind::Resume, Vec::new());
        report.skills = vec![
            skill("Kafka", SkillCategory::Unknown, 0.85),
            skill("Python", SkillCategory::Technical, 0.9),
            skill("Mentoring", SkillCategory::Soft, 0.75),
            skill("Airflow", SkillCategory::Unknown, 0.5),
        ];
        BatchReport {
            documents: vec![report],
            certifications: vec![
                Certification::new("Databricks Certified Data Engineer", 0.9, "certificate_document"),
                Certification::new("Some Workshop", 0.6, "resume_text"),
            ],
            processed_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_skills_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, r#"{"technical_skills": ["Python", "SQL"], "finance_skills": ["Budgeting"]}"#).unwrap();

        let added = update_skills_catalog(&path, &batch()).unwrap();
        assert_eq!(added, vec!["Kafka".to_string(), "Mentoring".to_string()]);

        let catalog = SkillCatalog::from_json_file(&path).unwrap();
        assert!(catalog.is_known_skill("Kafka"));
        assert!(catalog.is_known_skill("Mentoring"));
        assert!(catalog.is_known_skill("Budgeting"));
        assert!(!catalog.is_known_skill("Airflow"));

        assert!(update_skills_catalog(&path, &batch()).unwrap().is_empty());
    }

    #[test]
    fn test_update_certifications_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certs.json");
        std::fs::write(&path, r#"{"certifications": ["CompTIA Security+"], "providers": ["CompTIA"]}"#).unwrap();

        let added = update_certifications_catalog(&path, &batch()).unwrap();
        assert_eq!(added, vec!["Databricks Certified Data Engineer".to_string()]);

        let data = read_object(&path).unwrap();
        assert_eq!(data["certifications"].as_array().unwrap().len(), 2);
        assert_eq!(data["providers"][0], "CompTIA");
    }

    #[test]
    fn test_non_list_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certs.json");
        std::fs::write(&path, r#"{"certifications": "none"}"#).unwrap();

        let err = update_certifications_catalog(&path, &batch()).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }
}
