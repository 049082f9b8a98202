use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::certification::{dedupe_certifications, Certification, CertificationSet};
use crate::models::skill::Skill;
use crate::taxonomy::catalog_data::{CERTIFICATIONS, PROVIDERS, SKILL_CERTIFICATION_KEYWORDS};
use crate::text::{contains_word, find_words};

pub const NAME_LINK_FLOOR: f32 = 0.8;
pub const KEYWORD_LINK_FLOOR: f32 = 0.75;
pub const DOCUMENT_LINK_FLOOR: f32 = 0.75;

const KNOWN_IN_LINE: f32 = 0.9;
const KNOWN_IN_TEXT: f32 = 0.85;
const STATEMENT_IN_LINE: f32 = 0.8;
const STATEMENT_IN_TEXT: f32 = 0.75;
const SECTION_ENTRY: f32 = 0.8;
const CERTIFICATE_DOCUMENT: f32 = 0.9;

const NAME_TAIL: &str = r"([A-Za-z0-9][A-Za-z0-9+#.&/\- ]{1,80}?)(?:\s+(?:from|by|issued|awarded|with|through|on|at)\b|[,;:()]|\.(?:\s|$)|$)";

static STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(certified (?:in|as an?|as)|certificate (?:in|for)|certification in)\s+{}",
        NAME_TAIL
    ))
    .expect("certification statement pattern is valid")
});

// Checked in order; the first pattern with a usable match names the document.
static DOCUMENT_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bcertificate of (?:completion|achievement) (?:in|for)\s+",
        r"(?i)\bcertificate (?:in|for)\s+",
        r"(?i)\bcertification in\s+",
        r"(?i)\bcertified (?:as an?|as|in)\s+",
        r"(?i)\bsuccessfully completed (?:the\s+)?",
    ]
    .iter()
    .map(|prefix| Regex::new(&format!("{}{}", prefix, NAME_TAIL)).expect("certificate name pattern is valid"))
    .collect()
});

static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:licen[sc]es?\s*(?:and|&)\s*)?certifications?(?:\s*(?:and|&)\s*licen[sc]es?)?\s*:?\s*$")
        .expect("certification heading pattern is valid")
});

static INLINE_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*certifications?\s*:\s*(.+)$").expect("inline certification pattern is valid")
});

static OTHER_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:work |professional )?experience|employment(?: history)?|education|(?:technical )?skills|projects|summary|profile|objective|awards|publications|references|interests|languages|volunteer(?:ing)?)\s*:?\s*$",
    )
    .expect("section heading pattern is valid")
});

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:\d{1,2},?\s+)?\d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})\b",
    )
    .expect("date pattern is valid")
});

static TRAILING_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[,\s]+(?:issued\s+)?(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?\d{4}\s*$",
    )
    .expect("trailing date pattern is valid")
});

static CREDENTIAL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:credential|certificate|certification|license)\s*(?:id|no\.?|number|#)\s*[:#]?\s*([A-Z0-9][A-Z0-9\-]{3,})",
    )
    .expect("credential id pattern is valid")
});

static ISSUER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:issued|awarded|presented|offered) by\s+([A-Za-z0-9(][A-Za-z0-9()&.\- ]{1,60}?)(?:\s+(?:on|in)\b|[,;\n]|\.(?:\s|$)|$)",
    )
    .expect("issuer pattern is valid")
});

const NON_NAMES: [&str; 7] = [
    "completion",
    "achievement",
    "participation",
    "excellence",
    "recognition",
    "merit",
    "progress",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationCatalog {
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub providers: Vec<String>,
}

impl CertificationCatalog {
    pub fn builtin() -> Self {
        Self {
            certifications: CERTIFICATIONS.iter().map(|s| s.to_string()).collect(),
            providers: PROVIDERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&content)?;
        if catalog.certifications.is_empty() {
            return Err(Error::Catalog("certification catalog defines no certifications".to_string()));
        }
        Ok(catalog)
    }

    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::from_json_file(path) {
                Ok(catalog) => {
                    info!(
                        "Loaded custom certification catalog from {} ({} certifications)",
                        path.display(),
                        catalog.certifications.len()
                    );
                    catalog
                }
                Err(e) => {
                    warn!(
                        "Failed to load certification catalog {}: {}; using built-in catalog",
                        path.display(),
                        e
                    );
                    Self::builtin()
                }
            },
            None => Self::builtin(),
        }
    }
}

impl Default for CertificationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub struct CertificationExtractor {
    catalog: CertificationCatalog,
}

impl CertificationExtractor {
    pub fn new(catalog: CertificationCatalog) -> Self {
        Self { catalog }
    }

    pub fn extract_from_resume(&self, text: &str) -> Vec<Certification> {
        let mut found = Vec::new();

        // Step 1: Line-level matches
        for line in text.lines() {
            found.extend(self.known_names(line, KNOWN_IN_LINE, "known_name_line"));
            found.extend(statements(line, STATEMENT_IN_LINE, "statement_line"));
        }

        // Step 2: Names and statements broken across lines
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        found.extend(self.known_names(&flat, KNOWN_IN_TEXT, "known_name_text"));
        found.extend(statements(&flat, STATEMENT_IN_TEXT, "statement_text"));

        // Step 3: Certifications section entries
        found.extend(self.section_entries(text));

        let certifications = dedupe_certifications(found);
        debug!("Found {} certifications in resume text", certifications.len());
        certifications
    }

    pub fn extract_from_certificate_document(&self, text: &str, file_name: &str) -> Vec<Certification> {
        let name = document_name(text).unwrap_or_else(|| fallback_name(file_name));

        let mut primary = Certification::new(name, CERTIFICATE_DOCUMENT, "certificate_document");
        primary.issuer = self.issuer(text);
        primary.date = DATE.captures(text).map(|c| c[1].to_string());
        primary.credential_id = CREDENTIAL_ID.captures(text).map(|c| c[1].to_string());

        let mut found = vec![primary];
        for line in text.lines() {
            found.extend(self.known_names(line, KNOWN_IN_LINE, "certificate_document"));
        }

        dedupe_certifications(found)
    }

    fn known_names(&self, text: &str, confidence: f32, source: &str) -> Vec<Certification> {
        self.catalog
            .certifications
            .iter()
            .filter(|name| !find_words(text, name).is_empty())
            .map(|name| Certification::new(name.as_str(), confidence, source))
            .collect()
    }

    fn section_entries(&self, text: &str) -> Vec<Certification> {
        let mut entries = Vec::new();
        let mut in_section = false;

        for line in text.lines() {
            if SECTION_HEADING.is_match(line) {
                in_section = true;
                continue;
            }
            if let Some(caps) = INLINE_SECTION.captures(line) {
                for item in caps[1].split([',', ';']) {
                    entries.extend(self.section_entry(item));
                }
                continue;
            }
            if OTHER_HEADING.is_match(line) {
                in_section = false;
                continue;
            }
            if in_section {
                entries.extend(self.section_entry(line));
            }
        }

        entries
    }

    fn section_entry(&self, line: &str) -> Option<Certification> {
        let line = line.trim().trim_start_matches(['-', '•', '*', '>', '▪', '◦']).trim();
        if line.len() < 3 {
            return None;
        }
        // Known names are already reported with higher confidence.
        if self.catalog.certifications.iter().any(|n| !find_words(line, n).is_empty()) {
            return None;
        }

        let head = [" - ", " – ", " | ", " (", ", "]
            .iter()
            .filter_map(|sep| line.find(sep))
            .min()
            .map_or(line, |i| &line[..i]);
        let name = TRAILING_DATE.replace(head, "");
        let name = name.trim().trim_end_matches([',', '.', ':']);
        if name.len() < 3 || !name.chars().any(|c| c.is_alphabetic()) {
            return None;
        }

        let mut cert = Certification::new(name, SECTION_ENTRY, "certification_section");
        cert.date = DATE.captures(line).map(|c| c[1].to_string());
        cert.issuer = self.provider_in(line);
        Some(cert)
    }

    fn issuer(&self, text: &str) -> Option<String> {
        ISSUER
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .or_else(|| self.provider_in(text))
    }

    fn provider_in(&self, text: &str) -> Option<String> {
        self.catalog
            .providers
            .iter()
            .find(|p| contains_word(text, p))
            .cloned()
    }
}

impl Default for CertificationExtractor {
    fn default() -> Self {
        Self::new(CertificationCatalog::builtin())
    }
}

fn statements(text: &str, confidence: f32, source: &str) -> Vec<Certification> {
    STATEMENT
        .captures_iter(text)
        .filter_map(|caps| {
            let subject = clean_name(&caps[2])?;
            let name = format!("{} {}", caps[1].trim(), subject);
            Some(Certification::new(name, confidence, source))
        })
        .collect()
}

fn document_name(text: &str) -> Option<String> {
    DOCUMENT_NAME_PATTERNS.iter().find_map(|pattern| {
        text.lines()
            .filter_map(|line| pattern.captures(line))
            .find_map(|caps| clean_name(&caps[1]))
    })
}

fn clean_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_end_matches(['.', ',', '-']).trim();
    let first = name.split_whitespace().next()?.to_lowercase();
    if name.len() < 2 || NON_NAMES.contains(&first.as_str()) {
        return None;
    }
    Some(name.to_string())
}

/// "python_certificate.pdf" becomes "Python Certificate".
pub fn fallback_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let words: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .filter(|w| {
            let lower = w.to_lowercase();
            !matches!(lower.as_str(), "certificate" | "certification" | "cert" | "certified")
        })
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Certificate".to_string()
    } else {
        format!("{} Certificate", words.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backing {
    pub certificate: String,
    pub floor: f32,
}

pub struct CertificationLinker {
    keywords: Vec<(String, Vec<String>)>,
}

impl CertificationLinker {
    pub fn new() -> Self {
        Self {
            keywords: SKILL_CERTIFICATION_KEYWORDS
                .iter()
                .map(|(skill, keywords)| {
                    (
                        skill.to_string(),
                        keywords.iter().map(|k| k.to_lowercase()).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn find_backing(&self, skill: &str, certifications: &CertificationSet) -> Option<Backing> {
        // Route 1: the certification is named after the skill
        if let Some(cert) = certifications
            .certifications
            .iter()
            .find(|c| contains_word(&c.name, skill))
        {
            return Some(Backing {
                certificate: cert.name.clone(),
                floor: NAME_LINK_FLOOR,
            });
        }

        // Route 2: static skill to certification keyword map
        let lower = skill.to_lowercase();
        for (key, keywords) in &self.keywords {
            if *key != lower && !contains_word(skill, key) {
                continue;
            }
            if let Some(cert) = certifications.certifications.iter().find(|c| {
                let name = c.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k.as_str()))
            }) {
                return Some(Backing {
                    certificate: cert.name.clone(),
                    floor: KEYWORD_LINK_FLOOR,
                });
            }
        }

        // Route 3: skills recognised inside a certificate document
        certifications
            .documents
            .iter()
            .find(|d| d.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)))
            .map(|d| Backing {
                certificate: d.certification.clone(),
                floor: DOCUMENT_LINK_FLOOR,
            })
    }

    pub fn link(&self, skill: Skill, certifications: &CertificationSet) -> Skill {
        match self.find_backing(&skill.name, certifications) {
            Some(backing) => {
                debug!("'{}' backed by '{}'", skill.name, backing.certificate);
                skill.with_backing(backing.certificate, backing.floor)
            }
            None => skill,
        }
    }
}

impl Default for CertificationLinker {
    fn default() -> Self {
        Self::new()
    }
}
