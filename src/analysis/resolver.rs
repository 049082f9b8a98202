use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::models::candidate::{Candidate, SourceTag};
use crate::models::skill::SkillCategory;
use crate::taxonomy::SkillCatalog;
use crate::text::{contains_word, floor_boundary, TextAnalyzer};

pub const AMBIGUOUS_SKILLS: [&str; 5] = ["C++", "C#", "R", "Go", "C"];

const STRONG_CONTEXT_REACH: usize = 60;

static STRONG_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:experience (?:with|in)|experienced (?:with|in)|proficient (?:in|with)|proficiency in|expertise (?:in|with)|skilled in|knowledge of|worked with|familiar with|using|utilizing|leveraging|built (?:with|using|in)|developed (?:with|using|in)|programming in|(?:technical )?skills\s*:|technologies\s*:|tools\s*:|tech stack\s*:)",
    )
    .expect("strong context pattern is valid")
});

static PROGRAMMING_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:programming|languages?|technologies|tech stack|skills\s*:|proficient|coding)\b",
    )
    .expect("programming context pattern is valid")
});

#[derive(Debug, Clone)]
pub struct SkillEvidence {
    pub canonical: String,
    pub category: SkillCategory,
    pub mention_count: usize,
    pub sources: BTreeSet<SourceTag>,
    pub max_priority: u8,
    pub contexts: Vec<String>,
    pub first_offset: usize,
    offsets: BTreeSet<usize>,
}

impl SkillEvidence {
    pub(crate) fn new(canonical: String, category: SkillCategory, offset: usize) -> Self {
        Self {
            canonical,
            category,
            mention_count: 0,
            sources: BTreeSet::new(),
            max_priority: 0,
            contexts: Vec::new(),
            first_offset: offset,
            offsets: BTreeSet::new(),
        }
    }

    pub(crate) fn record(&mut self, candidate: &Candidate, offset: usize) {
        if self.offsets.insert(offset) {
            self.mention_count += 1;
        }
        self.sources.insert(candidate.source_tag);
        self.max_priority = self.max_priority.max(candidate.priority);
        self.first_offset = self.first_offset.min(offset);
        if !self.contexts.contains(&candidate.context_window) {
            self.contexts.push(candidate.context_window.clone());
        }
    }

    pub fn confidence_boost(&self) -> f32 {
        self.max_priority as f32 * 0.1
    }

    /// The longest context collected. Earlier contexts win ties.
    pub fn best_context(&self) -> &str {
        self.contexts
            .iter()
            .fold("", |best, ctx| if ctx.len() > best.len() { ctx.as_str() } else { best })
    }

    pub fn in_skill_listing(&self) -> bool {
        self.sources.iter().any(|s| s.is_skill_listing())
    }

    pub fn primary_source(&self) -> Option<SourceTag> {
        self.sources.iter().next().copied()
    }

    pub fn is_ambiguous(&self) -> bool {
        AMBIGUOUS_SKILLS.contains(&self.canonical.as_str())
    }
}

pub struct SkillResolver {
    catalog: Arc<SkillCatalog>,
    analyzer: Arc<TextAnalyzer>,
}

impl SkillResolver {
    pub fn new(catalog: Arc<SkillCatalog>, analyzer: Arc<TextAnalyzer>) -> Self {
        Self { catalog, analyzer }
    }

    pub fn resolve(&self, candidates: &[Candidate]) -> Vec<SkillEvidence> {
        self.accumulate(candidates)
            .into_iter()
            .filter(|evidence| self.retain(evidence))
            .collect()
    }

    pub fn accumulate(&self, candidates: &[Candidate]) -> Vec<SkillEvidence> {
        let mut by_name: HashMap<String, SkillEvidence> = HashMap::new();

        for candidate in candidates {
            for (canonical, category, offset) in self.resolve_candidate(candidate) {
                by_name
                    .entry(canonical.to_lowercase())
                    .or_insert_with(|| SkillEvidence::new(canonical, category, offset))
                    .record(candidate, offset);
            }
        }

        let mut evidence: Vec<SkillEvidence> = by_name.into_values().collect();
        evidence.sort_by(|a, b| {
            a.first_offset
                .cmp(&b.first_offset)
                .then_with(|| a.canonical.cmp(&b.canonical))
        });
        evidence
    }

    fn resolve_candidate(&self, candidate: &Candidate) -> Vec<(String, SkillCategory, usize)> {
        let raw = candidate.raw_text.trim();

        if let Some(canonical) = self.catalog.canonical_name(raw) {
            // Short names only count when written with their own casing,
            // unless they come straight from a labelled skills line.
            let listed = candidate.source_tag == SourceTag::SkillsSection && candidate.priority >= 3;
            if canonical.chars().count() > 2 || raw == canonical || listed {
                return vec![(
                    canonical.to_string(),
                    self.catalog.category(canonical),
                    candidate.offset,
                )];
            }
        }

        let found: Vec<_> = self
            .catalog
            .scan_phrases(&self.analyzer, &candidate.raw_text)
            .into_iter()
            .map(|m| {
                let category = self.catalog.category(&m.canonical);
                (m.canonical, category, candidate.offset + m.start)
            })
            .collect();

        if found.is_empty() && candidate.source_tag.is_skill_listing() && is_plain_term(raw) {
            debug!("Keeping uncatalogued listed skill '{}'", raw);
            return vec![(raw.to_string(), SkillCategory::Unknown, candidate.offset)];
        }

        found
    }

    fn retain(&self, evidence: &SkillEvidence) -> bool {
        let corroborated = evidence.mention_count >= 2 && evidence.sources.len() >= 2;
        let explicit = evidence.max_priority >= 2;
        let strong = evidence
            .contexts
            .iter()
            .any(|ctx| self.claims_skill(ctx, &evidence.canonical));

        if !(corroborated || explicit || strong) {
            info!(
                "Dropping '{}': {} mention(s), priority {}, no strong context",
                evidence.canonical, evidence.mention_count, evidence.max_priority
            );
            return false;
        }

        if evidence.is_ambiguous()
            && evidence.max_priority < 2
            && evidence.mention_count < 2
            && !self.programming_context(evidence)
        {
            info!(
                "Dropping ambiguous '{}': no programming-language context",
                evidence.canonical
            );
            return false;
        }

        true
    }

    fn claims_skill(&self, context: &str, canonical: &str) -> bool {
        claimed_clauses(context).any(|clause| self.catalog.mentions(&self.analyzer, clause, canonical))
    }

    fn programming_context(&self, evidence: &SkillEvidence) -> bool {
        evidence.contexts.iter().any(|ctx| {
            ctx.lines()
                .filter(|line| contains_word(line, &evidence.canonical))
                .any(|line| PROGRAMMING_CONTEXT.is_match(line))
        })
    }
}

pub(crate) fn claimed_clauses(context: &str) -> impl Iterator<Item = &str> {
    STRONG_CONTEXT.find_iter(context).map(move |m| {
        let tail = &context[m.end()..];
        let reach = floor_boundary(tail, clause_end(tail).min(STRONG_CONTEXT_REACH));
        &tail[..reach]
    })
}

pub(crate) fn clause_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| {
            b == b'\n'
                || b == b';'
                || (b == b'.' && bytes.get(i + 1).map_or(true, |n| n.is_ascii_whitespace()))
        })
        .map_or(text.len(), |(i, _)| i)
}

fn is_plain_term(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= 40
        && raw.chars().any(|c| c.is_alphabetic())
        && raw
            .chars()
            .all(|c| c.is_alphanumeric() || " +#.-/".contains(c))
}
