pub mod catalog_data;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::models::skill::SkillCategory;
use crate::text::{contains_word, TextAnalyzer, Token};
use catalog_data::{
    ABBREVIATIONS, GENERIC_WORDS, INDUSTRY_SKILLS, SOFT_SKILLS, STOPWORDS, TECHNICAL_SKILLS,
    TECH_STACKS,
};

static GENERIC: Lazy<HashSet<&'static str>> = Lazy::new(|| GENERIC_WORDS.iter().copied().collect());
static STOP: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

const VENDOR_PREFIXES: [&str; 5] = ["adobe", "apache", "microsoft", "google", "amazon"];

pub fn is_stopword(word: &str) -> bool {
    STOP.contains(word.to_lowercase().as_str())
}

#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub industry_skills: BTreeMap<String, Vec<String>>,
}

impl CatalogData {
    pub fn builtin() -> Self {
        Self {
            technical_skills: TECHNICAL_SKILLS.iter().map(|s| s.to_string()).collect(),
            soft_skills: SOFT_SKILLS.iter().map(|s| s.to_string()).collect(),
            industry_skills: INDUSTRY_SKILLS
                .iter()
                .map(|(industry, skills)| {
                    (
                        industry.to_string(),
                        skills.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut data = Self::default();

        for (key, value) in raw {
            let Some(group) = key.strip_suffix("_skills") else {
                continue;
            };
            let names = string_list(&key, &value)?;
            match group {
                "technical" => data.technical_skills = names,
                "soft" => data.soft_skills = names,
                industry => {
                    data.industry_skills.insert(industry.to_string(), names);
                }
            }
        }

        if data.technical_skills.is_empty()
            && data.soft_skills.is_empty()
            && data.industry_skills.values().all(|v| v.is_empty())
        {
            return Err(Error::Catalog("catalog defines no skills".to_string()));
        }

        Ok(data)
    }
}

fn string_list(key: &str, value: &serde_json::Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::Catalog(format!("'{}' must be a list of strings", key)))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| Error::Catalog(format!("'{}' contains a non-string entry", key)))
        })
        .filter(|r| r.as_ref().map_or(true, |s| !s.is_empty()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub canonical: String,
    pub start: usize,
    pub end: usize,
    pub first_token: usize,
    pub last_token: usize,
}

#[derive(Debug)]
pub struct SkillCatalog {
    entries: Vec<(String, SkillCategory)>,
    canonical: HashMap<String, usize>,
    variations: HashMap<String, usize>,
    max_phrase_words: usize,
}

impl SkillCatalog {
    pub fn new(data: CatalogData) -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
            canonical: HashMap::new(),
            variations: HashMap::new(),
            max_phrase_words: 1,
        };

        // Exact names first so derived forms never shadow a real skill.
        for name in &data.technical_skills {
            catalog.add_canonical(name, SkillCategory::Technical);
        }
        for name in &data.soft_skills {
            catalog.add_canonical(name, SkillCategory::Soft);
        }
        for (industry, names) in &data.industry_skills {
            for name in names {
                catalog.add_canonical(name, SkillCategory::Industry(industry.clone()));
            }
        }

        for (short, target) in ABBREVIATIONS {
            if let Some(&idx) = catalog.canonical.get(&normalize_key(target)) {
                catalog.register(short, idx);
            }
        }

        for idx in 0..catalog.entries.len() {
            catalog.add_variations(idx);
        }

        catalog
    }

    pub fn builtin() -> Self {
        Self::new(CatalogData::builtin())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(CatalogData::from_json_str(&content)?))
    }

    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::from_json_file(path) {
                Ok(catalog) => {
                    tracing::info!(
                        "Loaded custom skill catalog from {} ({} skills)",
                        path.display(),
                        catalog.len()
                    );
                    catalog
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load skill catalog {}: {}; using built-in catalog",
                        path.display(),
                        e
                    );
                    Self::builtin()
                }
            },
            None => Self::builtin(),
        }
    }

    fn add_canonical(&mut self, name: &str, category: SkillCategory) {
        let key = normalize_key(name);
        if key.is_empty() || self.canonical.contains_key(&key) {
            return;
        }
        let idx = self.entries.len();
        self.entries.push((name.trim().to_string(), category));
        self.canonical.insert(key.clone(), idx);
        self.register(&key, idx);
    }

    fn add_variations(&mut self, idx: usize) {
        let (name, category) = self.entries[idx].clone();
        let key = normalize_key(&name);

        if let Some((base, inner)) = split_parenthetical(&name) {
            self.register(&base, idx);
            if inner.len() >= 2 {
                self.register(&inner, idx);
            }
        }

        let stripped = strip_punctuation(&key);
        if stripped != key && stripped.len() >= 4 {
            self.register(&stripped, idx);
        }

        // "vue.js" is also written "vue"
        if !key.starts_with('.') {
            if let Some((base, _)) = key.split_once('.') {
                if base.len() >= 3 && !GENERIC.contains(base) {
                    self.register(base, idx);
                }
            }
        }

        let words: Vec<&str> = key.split_whitespace().collect();
        if words.len() >= 2 {
            let first = words[0];
            if category.is_technical()
                && first.len() >= 4
                && !GENERIC.contains(first)
                && !STOP.contains(first)
            {
                self.register(first, idx);
            }

            // "Apache Spark" is usually just "Spark"
            if words.len() == 2
                && VENDOR_PREFIXES.contains(&first)
                && words[1].len() >= 4
                && !GENERIC.contains(words[1])
            {
                self.register(words[1], idx);
            }

            if words.len() >= 3 {
                let head = &words[..2];
                let tail = &words[words.len() - 2..];
                for part in [head, tail] {
                    if !STOP.contains(part[0]) && !STOP.contains(part[1]) {
                        self.register(&part.join(" "), idx);
                    }
                }
            }

            if category == SkillCategory::Soft {
                self.register(&words.join("-"), idx);
                self.register(&words.concat(), idx);
            }
        }
    }

    fn register(&mut self, variation: &str, idx: usize) {
        let key = normalize_key(variation);
        if key.is_empty() {
            return;
        }
        let words = key.split_whitespace().count();
        self.max_phrase_words = self.max_phrase_words.max(words);
        self.variations.entry(key).or_insert(idx);
    }

    fn lookup(&self, text: &str) -> Option<usize> {
        let key = normalize_key(text);
        if key.is_empty() {
            return None;
        }
        self.variations
            .get(&key)
            .or_else(|| self.variations.get(&strip_punctuation(&key)))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn variation_count(&self) -> usize {
        self.variations.len()
    }

    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    pub fn is_known_skill(&self, text: &str) -> bool {
        self.lookup(text).is_some()
    }

    pub fn canonical_name(&self, text: &str) -> Option<&str> {
        self.lookup(text).map(|idx| self.entries[idx].0.as_str())
    }

    pub fn category(&self, name: &str) -> SkillCategory {
        self.lookup(name)
            .map(|idx| self.entries[idx].1.clone())
            .unwrap_or(SkillCategory::Unknown)
    }

    pub fn is_technical(&self, name: &str) -> bool {
        self.category(name).is_technical()
    }

    pub fn skills(&self) -> impl Iterator<Item = (&str, &SkillCategory)> {
        self.entries.iter().map(|(name, category)| (name.as_str(), category))
    }

    pub fn mentions(&self, analyzer: &TextAnalyzer, text: &str, canonical: &str) -> bool {
        contains_word(text, canonical)
            || self
                .scan_phrases(analyzer, text)
                .iter()
                .any(|m| m.canonical == canonical)
    }

    pub fn related_skills(&self, name: &str) -> Vec<String> {
        let canonical = self.canonical_name(name).unwrap_or(name);
        let mut related: Vec<String> = Vec::new();

        for (_, members) in TECH_STACKS {
            if !members.iter().any(|m| m.eq_ignore_ascii_case(canonical)) {
                continue;
            }
            for member in members.iter() {
                if !member.eq_ignore_ascii_case(canonical) && !related.iter().any(|r| r.as_str() == *member) {
                    related.push(member.to_string());
                }
            }
        }

        related
    }

    pub fn scan_phrases(&self, analyzer: &TextAnalyzer, text: &str) -> Vec<PhraseMatch> {
        let tokens = analyzer.tokens(text);
        let mut matches = Vec::new();

        for run in analyzer.phrase_runs(text, &tokens) {
            let mut i = run.start;
            while i < run.end {
                let longest = self.max_phrase_words.min(run.end - i);
                let mut matched = false;

                for n in (1..=longest).rev() {
                    let span = &text[tokens[i].start..tokens[i + n - 1].end];
                    if let Some(idx) = self.accept(span) {
                        matches.push(PhraseMatch {
                            canonical: self.entries[idx].0.clone(),
                            start: tokens[i].start,
                            end: tokens[i + n - 1].end,
                            first_token: i,
                            last_token: i + n - 1,
                        });
                        i += n;
                        matched = true;
                        break;
                    }
                }

                if !matched {
                    self.scan_compound(&tokens[i], i, &mut matches);
                    i += 1;
                }
            }
        }

        matches
    }

    fn accept(&self, span: &str) -> Option<usize> {
        let idx = self.lookup(span)?;
        let canonical = &self.entries[idx].0;
        if canonical.chars().count() <= 2 && span != canonical.as_str() {
            return None;
        }
        Some(idx)
    }

    // "Python/Django" is one token but two skills.
    fn scan_compound(&self, token: &Token<'_>, index: usize, out: &mut Vec<PhraseMatch>) {
        if !token.text.contains('/') {
            return;
        }
        let mut offset = token.start;
        for part in token.text.split('/') {
            if let Some(idx) = self.accept(part) {
                out.push(PhraseMatch {
                    canonical: self.entries[idx].0.clone(),
                    start: offset,
                    end: offset + part.len(),
                    first_token: index,
                    last_token: index,
                });
            }
            offset += part.len() + 1;
        }
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn normalize_key(text: &str) -> String {
    let lower = text.to_lowercase();
    let trimmed = lower
        .trim_start_matches(|c: char| c.is_whitespace() || "\"'`([{:;,!?*•-".contains(c))
        .trim_end_matches(|c: char| c.is_whitespace() || "\"'`)]}:;,.!?*•-".contains(c));
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_punctuation(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '+' || *c == '#')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_parenthetical(name: &str) -> Option<(String, String)> {
    let open = name.find('(')?;
    let close = name[open..].find(')')? + open;
    let base = name[..open].trim().to_string();
    let inner = name[open + 1..close].trim().to_string();
    if base.is_empty() {
        None
    } else {
        Some((base, inner))
    }
}
