use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::skill::clamp_confidence;
use crate::text::contains_word;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub credential_id: Option<String>,
    pub confidence: f32,
    pub source: String,
}

impl Certification {
    pub fn new(name: impl Into<String>, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issuer: None,
            date: None,
            credential_id: None,
            confidence: clamp_confidence(confidence),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateDocument {
    pub file: String,
    pub certification: String,
    pub text: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationSet {
    pub certifications: Vec<Certification>,
    pub documents: Vec<CertificateDocument>,
}

impl CertificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.certifications.is_empty()
    }

    pub fn add_document(&mut self, document: CertificateDocument, certifications: Vec<Certification>) {
        self.documents.push(document);
        self.extend(certifications);
    }

    pub fn extend(&mut self, certifications: Vec<Certification>) {
        let mut combined = std::mem::take(&mut self.certifications);
        combined.extend(certifications);
        self.certifications = dedupe_certifications(combined);
    }

    pub fn names(&self) -> Vec<String> {
        self.certifications.iter().map(|c| c.name.clone()).collect()
    }

    pub fn text_for_skill(&self, skill: &str) -> Option<String> {
        let texts: Vec<&str> = self
            .documents
            .iter()
            .filter(|d| contains_word(&d.text, skill))
            .map(|d| d.text.as_str())
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}

pub fn dedupe_certifications(certifications: Vec<Certification>) -> Vec<Certification> {
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, Certification> = HashMap::new();

    for cert in certifications {
        let key = cert.name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        match best.get(&key) {
            Some(existing) if existing.confidence >= cert.confidence => {}
            Some(_) => {
                best.insert(key, cert);
            }
            None => {
                order.push(key.clone());
                best.insert(key, cert);
            }
        }
    }

    order.into_iter().filter_map(|k| best.remove(&k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_highest_confidence() {
        let certs = vec![
            Certification::new("CompTIA Security+", 0.75, "resume_text"),
            Certification::new("AWS Certified Developer", 0.9, "resume_line"),
            Certification::new("comptia security+", 0.85, "resume_line"),
        ];
        let deduped = dedupe_certifications(certs);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "comptia security+");
        assert_eq!(deduped[0].confidence, 0.85);
    }

    #[test]
    fn test_text_for_skill_joins_matching_documents() {
        let mut set = CertificationSet::new();
        set.add_document(
            CertificateDocument {
                file: "python_certificate.txt".to_string(),
                certification: "Python Certificate".to_string(),
                text: "Advanced Python programming".to_string(),
                skills: vec!["Python".to_string()],
            },
            vec![Certification::new("Python Certificate", 0.9, "certificate_document")],
        );
        set.add_document(
            CertificateDocument {
                file: "scrum_certificate.txt".to_string(),
                certification: "Certified ScrumMaster".to_string(),
                text: "Scrum fundamentals".to_string(),
                skills: vec![],
            },
            vec![Certification::new("Certified ScrumMaster", 0.9, "certificate_document")],
        );

        assert_eq!(set.text_for_skill("python").as_deref(), Some("Advanced Python programming"));
        assert!(set.text_for_skill("Java").is_none());
        assert_eq!(set.names().len(), 2);
    }
}
