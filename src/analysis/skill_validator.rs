use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::taxonomy::SkillCatalog;
use crate::text::contains_word;

const MAX_WORDS: usize = 4;
const MAX_UNKNOWN_WORDS: usize = 2;

const DENY_LIST: &[&str] = &[
    // Section headers
    "key skills", "core skills", "technical skills", "professional skills", "soft skills",
    "hard skills", "primary skills", "skills include", "skills", "qualifications",
    "competencies", "expertise", "experience", "education", "certification",
    "professional summary", "summary",
    // Action phrases
    "collaborated with", "curriculum enhancements", "technologies into", "integrated",
    "developed", "implemented", "managed", "created", "enhanced", "improved", "directed",
    "supervised", "assisted", "helped", "supported", "delivered", "provided", "utilized",
    "demonstrated",
    // Fragments
    "key", "core", "technical", "professional", "soft", "hard", "primary", "proficient in",
    "experience with", "expertise in", "knowledge of", "familiar with", "worked with", "used",
    "foundation", "foundations",
    // Resume sections
    "work experience", "professional experience", "employment", "job history", "career",
    "achievements", "accomplishments",
];

const TECHNICAL_ALLOW_LIST: &[&str] = &[
    "database management", "database systems", "database management systems",
    "relational databases", "data modeling", "version control", "data analysis", "data mining",
    "machine learning", "artificial intelligence", "natural language processing",
    "computer vision", "cloud computing", "distributed systems", "operating systems",
    "networking", "cyber security", "information security", "web development",
    "mobile development", "software engineering", "devops", "continuous integration",
    "continuous deployment",
];

const SENTENCE_MARKERS: &[&str] = &[
    ". ", "! ", "? ", ": ", "; ", " and ", " or ", " but ", " because ", " when ", " while ",
];

const CLAIM_PREFIXES: &[&str] = &[
    "proficient in ", "experience with ", "expertise in ", "knowledge of ", "skilled in ",
    "familiar with ", "worked with ", "used ", "using ",
];

static EXCLUSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Verb-initial phrases
        r"(?i)^(?:collaborated|developed|implemented|managed|created|enhanced|improved|integrated|directed|supervised|assisted|helped|supported)\b",
        r"(?i)\b(?:using|utilizing|applying|implementing|developing|creating|enhancing|improving)\b",
        // Dangling prepositions
        r"(?i)^(?:into|for|with|to|by|from)\b",
        r"(?i)\b(?:into|for|with|to|by|from)$",
        // Bullet remnants
        r"^[•\-*]\s*",
        // Title-cased headers
        r"^[A-Z][a-z]*(?:[\s-][A-Z][a-z]*)+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("exclusion pattern is valid"))
    .collect()
});

pub struct SkillValidator {
    catalog: Arc<SkillCatalog>,
}

impl SkillValidator {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, name: &str) -> Option<String> {
        let stripped = strip_claim(name);
        if stripped.is_empty() {
            return None;
        }

        if let Some(reason) = self.rejection_reason(stripped) {
            info!("Filtered out invalid skill '{}': {}", name, reason);
            return None;
        }

        let cleaned = capitalize_words(stripped);

        if let Some(canonical) = self.catalog.canonical_name(&cleaned) {
            return Some(canonical.to_string());
        }

        if cleaned.split_whitespace().count() <= MAX_UNKNOWN_WORDS {
            Some(cleaned)
        } else {
            info!("Filtered out unknown multi-word skill '{}'", name);
            None
        }
    }

    fn rejection_reason(&self, name: &str) -> Option<&'static str> {
        let lower = name.to_lowercase();

        if TECHNICAL_ALLOW_LIST.iter().any(|term| contains_word(&lower, term)) {
            return None;
        }

        let denied = DENY_LIST.iter().any(|phrase| {
            if phrase.contains(' ') {
                contains_word(&lower, phrase)
            } else {
                lower == *phrase
            }
        });
        if denied {
            return Some("deny-listed phrase");
        }

        if !self.catalog.is_known_skill(name)
            && EXCLUSION_PATTERNS.iter().any(|p| p.is_match(name))
        {
            return Some("matches exclusion pattern");
        }

        if lower.split_whitespace().count() > MAX_WORDS {
            return Some("too many words");
        }

        if SENTENCE_MARKERS.iter().any(|marker| lower.contains(marker)) {
            return Some("sentence structure");
        }

        None
    }
}

fn strip_claim(name: &str) -> &str {
    let mut stripped = name.trim();
    for prefix in CLAIM_PREFIXES {
        if stripped.len() > prefix.len()
            && stripped.is_char_boundary(prefix.len())
            && stripped[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            stripped = &stripped[prefix.len()..];
        }
    }
    stripped.trim_matches(|c: char| c.is_whitespace() || ".,;:-".contains(c))
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SkillValidator {
        SkillValidator::new(Arc::new(SkillCatalog::builtin()))
    }

    #[test]
    fn test_verb_initial_phrase_is_rejected() {
        let v = validator();
        assert!(v.validate("Collaborated with peers for departmental planning").is_none());
        assert!(v
            .rejection_reason("Collaborated with peers for departmental planning")
            .is_some());
    }

    #[test]
    fn test_section_headers_are_rejected() {
        let v = validator();
        assert!(v.validate("key skills").is_none());
        assert!(v.validate("Skills").is_none());
        assert!(v.validate("Work Experience").is_none());
    }

    #[test]
    fn test_allow_list_overrides_rules() {
        let v = validator();
        assert_eq!(
            v.validate("database management systems").as_deref(),
            Some("Database Management Systems")
        );
        assert_eq!(v.validate("Version Control").as_deref(), Some("Version Control"));
    }

    #[test]
    fn test_known_title_cased_skills_survive() {
        let v = validator();
        assert_eq!(v.validate("Machine Learning").as_deref(), Some("Machine Learning"));
        assert_eq!(v.validate("Interpersonal Skills").as_deref(), Some("Interpersonal Skills"));
        assert_eq!(v.validate("iOS").as_deref(), Some("iOS"));
    }

    #[test]
    fn test_unknown_names() {
        let v = validator();
        assert_eq!(v.validate("kafka").as_deref(), Some("Kafka"));
        assert_eq!(v.validate("kafka streams").as_deref(), Some("Kafka Streams"));
        assert!(v.validate("Kafka Streams").is_none());
        assert!(v.validate("stream processing engines").is_none());
    }

    #[test]
    fn test_shape_rules() {
        let v = validator();
        assert!(v.validate("real time data streaming platform pipelines").is_none());
        assert!(v.validate("Python and Java").is_none());
        assert!(v.validate("data pipelines for").is_none());
    }

    #[test]
    fn test_claim_prefixes_are_stripped() {
        assert_eq!(capitalize_words(strip_claim("proficient in terraform.")), "Terraform");
        assert_eq!(strip_claim("  using Docker; "), "Docker");
        assert_eq!(validator().validate("experience with Kubernetes").as_deref(), Some("Kubernetes"));
    }
}
