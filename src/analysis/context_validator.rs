use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::resolver::{claimed_clauses, clause_end, SkillEvidence};
use crate::taxonomy::SkillCatalog;
use crate::text::{contains_word, floor_boundary, TextAnalyzer};

const NEGATION_REACH: usize = 40;
const EDUCATION_REACH: usize = 40;
const EXPERIENCE_REACH: usize = 60;

static NEGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:not (?:familiar|experienced|proficient) (?:with|in)|no (?:prior |professional |hands-on )?experience (?:with|in)|(?:would like|hope|want|plan) to learn|unfamiliar with|never (?:used|worked with)|limited exposure to|lack(?:ing)? (?:of )?experience (?:with|in)|not yet (?:used|learned))",
    )
    .expect("negation pattern is valid")
});

static EDUCATION_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:coursework (?:in|on|including)|courses? (?:in|on)|introduction to|intro to|class(?:es)? (?:in|on)|studied|studying|currently learning|learning to|tutorials? (?:in|on)|bootcamp (?:in|on))",
    )
    .expect("education frame pattern is valid")
});

static EXPERIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:experience (?:with|in)|experienced (?:with|in)|proficient (?:in|with)|worked with|developed|built|implemented|using|programmed in|wrote)",
    )
    .expect("experience pattern is valid")
});

const COMMON_LANGUAGES: [&str; 18] = [
    "Python", "Java", "JavaScript", "C", "C++", "C#", "R", "Go", "Ruby", "PHP", "TypeScript",
    "Swift", "Kotlin", "Rust", "SQL", "MATLAB", "Scala", "Perl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Negated,
    EducationOnly,
    NotMentioned,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Negated => write!(f, "negated mention"),
            Rejection::EducationOnly => write!(f, "education-only mention"),
            Rejection::NotMentioned => write!(f, "not mentioned in document"),
        }
    }
}

pub struct ContextValidator {
    catalog: Arc<SkillCatalog>,
    analyzer: Arc<TextAnalyzer>,
}

impl ContextValidator {
    pub fn new(catalog: Arc<SkillCatalog>, analyzer: Arc<TextAnalyzer>) -> Self {
        Self { catalog, analyzer }
    }

    pub fn check(&self, evidence: &SkillEvidence, document: &str) -> Option<Rejection> {
        if self.is_negated(evidence) {
            return Some(Rejection::Negated);
        }
        if self.is_education_only(evidence, document) {
            return Some(Rejection::EducationOnly);
        }
        if !is_mentioned(&evidence.canonical, document) {
            return Some(Rejection::NotMentioned);
        }
        None
    }

    pub fn is_negated(&self, evidence: &SkillEvidence) -> bool {
        let skill = evidence.canonical.as_str();
        let mut negated = false;
        let mut claimed = false;

        for context in &evidence.contexts {
            if self.follows(&NEGATION, context, skill, NEGATION_REACH) {
                negated = true;
            } else if claimed_clauses(context)
                .any(|clause| self.catalog.mentions(&self.analyzer, clause, skill))
            {
                claimed = true;
            }
        }

        negated && !claimed
    }

    pub fn is_education_only(&self, evidence: &SkillEvidence, document: &str) -> bool {
        let skill = evidence.canonical.as_str();
        if !COMMON_LANGUAGES.contains(&skill) {
            return false;
        }

        let mentioning: Vec<&String> = evidence
            .contexts
            .iter()
            .filter(|ctx| contains_word(ctx, skill))
            .collect();
        if mentioning.is_empty() {
            return false;
        }

        let all_educational = mentioning.iter().all(|ctx| {
            self.follows(&EDUCATION_FRAME, ctx, skill, EDUCATION_REACH)
                || contains_word(ctx, &format!("{} 101", skill))
        });

        all_educational && !self.follows(&EXPERIENCE, document, skill, EXPERIENCE_REACH)
    }

    fn follows(&self, pattern: &Regex, text: &str, skill: &str, reach: usize) -> bool {
        pattern.find_iter(text).any(|m| {
            let tail = &text[m.end()..];
            let end = floor_boundary(tail, clause_end(tail).min(reach));
            self.catalog.mentions(&self.analyzer, &tail[..end], skill)
        })
    }
}

/// The emitted name must appear as a whole word somewhere in the document.
pub fn is_mentioned(canonical: &str, document: &str) -> bool {
    contains_word(document, canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{Candidate, SourceTag};
    use crate::models::skill::SkillCategory;

    fn validator() -> ContextValidator {
        ContextValidator::new(Arc::new(SkillCatalog::builtin()), Arc::new(TextAnalyzer::new()))
    }

    fn evidence(skill: &str, contexts: &[&str]) -> SkillEvidence {
        let mut evidence = SkillEvidence::new(skill.to_string(), SkillCategory::Technical, 0);
        for (i, ctx) in contexts.iter().enumerate() {
            evidence.record(&Candidate::new(skill, *ctx, SourceTag::NlpToken, 0, i), i);
        }
        evidence
    }

    #[test]
    fn test_negated_mention_is_rejected() {
        let doc = "Not familiar with Java but eager to grow.";
        let ev = evidence("Java", &["Not familiar with Java but eager to grow"]);
        assert_eq!(validator().check(&ev, doc), Some(Rejection::Negated));
    }

    #[test]
    fn test_negation_overridden_by_positive_claim() {
        let doc = "No experience with Java. Skills: Python, Java";
        let ev = evidence("Java", &["No experience with Java", "Skills: Python, Java"]);
        assert_eq!(validator().check(&ev, doc), None);
    }

    #[test]
    fn test_would_like_to_learn() {
        let ev = evidence("Rust", &["would like to learn Rust next year"]);
        assert!(validator().is_negated(&ev));
    }

    #[test]
    fn test_education_only_language_is_rejected() {
        let doc = "Education: basic coursework in Python, introduction to programming";
        let ev = evidence("Python", &["basic coursework in Python, introduction to programming"]);
        assert_eq!(validator().check(&ev, doc), Some(Rejection::EducationOnly));
    }

    #[test]
    fn test_education_mention_with_experience_elsewhere() {
        let doc = "Coursework in Python.\nBuilt data pipelines using Python at Acme.";
        let ev = evidence("Python", &["Coursework in Python"]);
        assert_eq!(validator().check(&ev, doc), None);
    }

    #[test]
    fn test_education_frame_ignores_non_languages() {
        let doc = "Introduction to Tableau workshop";
        let ev = evidence("Tableau", &["Introduction to Tableau workshop"]);
        assert!(!validator().is_education_only(&ev, doc));
    }

    #[test]
    fn test_machine_learning_is_not_an_education_frame() {
        let doc = "Machine learning with Python";
        let ev = evidence("Python", &["Machine learning with Python"]);
        assert!(!validator().is_education_only(&ev, doc));
    }

    #[test]
    fn test_unmentioned_canonical_is_rejected() {
        let doc = "Skills: JS, HTML";
        let ev = evidence("JavaScript", &["Skills: JS, HTML"]);
        assert_eq!(validator().check(&ev, doc), Some(Rejection::NotMentioned));
        assert!(is_mentioned("HTML", doc));
    }
}
