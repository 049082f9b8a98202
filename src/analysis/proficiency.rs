use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::rules::{EvidenceCategory, LevelTable, ProficiencyRules};
use crate::error::Result;
use crate::models::skill::{clamp_confidence, ProficiencyLevel};
use crate::text::{contains_word, count_phrase, find_words, TextAnalyzer};

static NUMERIC_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:\s*(?:-|–|to)\s*(\d{1,2}))?\s*(\+)?\s*(?:years?|yrs?)\b")
        .expect("numeric duration pattern is valid")
});

static CONCRETE_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:developed|built|implemented|created|deployed|engineered|delivered)\b")
        .expect("concrete use pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelScores([f32; 4]);

impl LevelScores {
    pub fn add(&mut self, level: ProficiencyLevel, points: f32) {
        self.0[level.index()] += points;
    }

    pub fn add_all(&mut self, points: &[f32; 4]) {
        for level in ProficiencyLevel::ALL {
            self.add(level, points[level.index()]);
        }
    }

    pub fn get(&self, level: ProficiencyLevel) -> f32 {
        self.0[level.index()]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|s| *s == 0.0)
    }

    pub fn nonzero_levels(&self) -> usize {
        self.0.iter().filter(|s| **s > 0.0).count()
    }

    /// Highest-scoring level. Exact ties go to the more conservative level.
    pub fn top(&self) -> (ProficiencyLevel, f32) {
        let mut best = (ProficiencyLevel::Beginner, self.get(ProficiencyLevel::Beginner));
        for level in ProficiencyLevel::ALL.into_iter().skip(1) {
            let score = self.get(level);
            if score > best.1 {
                best = (level, score);
            }
        }
        best
    }

    pub fn runner_up(&self) -> f32 {
        let mut sorted = self.0;
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        sorted[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub category: EvidenceCategory,
    pub level: ProficiencyLevel,
    pub phrase: String,
    pub points: f32,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' -> {} (+{:.1})",
            self.category, self.phrase, self.level, self.points
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProficiencyAssessment {
    pub level: ProficiencyLevel,
    pub confidence: f32,
    pub scores: LevelScores,
    pub indicators: Vec<Indicator>,
}

impl ProficiencyAssessment {
    pub fn key_indicators(&self, limit: usize) -> Vec<&Indicator> {
        let mut supporting: Vec<&Indicator> = self
            .indicators
            .iter()
            .filter(|i| i.level == self.level)
            .collect();
        supporting.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(std::cmp::Ordering::Equal));
        supporting.truncate(limit);
        supporting
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringInput<'a> {
    pub skill: &'a str,
    pub context: &'a str,
    pub certification_text: Option<&'a str>,
    pub is_backed: bool,
    pub confidence_boost: f32,
    pub is_technical: bool,
    pub in_skills_section: bool,
}

impl<'a> ScoringInput<'a> {
    pub fn new(skill: &'a str, context: &'a str) -> Self {
        Self {
            skill,
            context,
            ..Default::default()
        }
    }
}

pub struct ProficiencyScorer {
    rules: ProficiencyRules,
    analyzer: Arc<TextAnalyzer>,
    duration_patterns: [Vec<Regex>; 4],
}

impl ProficiencyScorer {
    pub fn new(rules: ProficiencyRules, analyzer: Arc<TextAnalyzer>) -> Result<Self> {
        let duration_patterns = rules.compile_duration_patterns()?;

        Ok(Self {
            rules,
            analyzer,
            duration_patterns,
        })
    }

    pub fn rules(&self) -> &ProficiencyRules {
        &self.rules
    }

    pub fn assess(&self, input: &ScoringInput<'_>) -> ProficiencyAssessment {
        let mut tally = Tally::default();

        // Step 1: Keyword indicators
        self.score_phrases(
            &mut tally,
            EvidenceCategory::Keyword,
            &self.rules.keywords,
            input.context,
        );

        // Step 2: Duration indicators
        self.score_duration(&mut tally, input.context);

        // Step 3: Cognitive verbs in sentences that mention the skill
        let sentences = self.sentences_mentioning(input.context, input.skill);
        self.score_phrases(
            &mut tally,
            EvidenceCategory::Cognitive,
            &self.rules.cognitive_verbs,
            &sentences,
        );

        // Step 4: Certification language
        if let Some(cert_text) = input.certification_text.filter(|t| !t.trim().is_empty()) {
            let near_skill = self.sentences_mentioning(cert_text, input.skill);
            let before = tally.indicators.len();
            self.score_phrases(
                &mut tally,
                EvidenceCategory::Certification,
                &self.rules.certification_terms,
                &near_skill,
            );
            if tally.indicators.len() == before {
                tally.push(
                    EvidenceCategory::Certification,
                    ProficiencyLevel::Intermediate,
                    "certification",
                    self.rules.adjustments.certification_default,
                );
            }
        }

        // Step 5: Responsibility language
        self.score_phrases(
            &mut tally,
            EvidenceCategory::Responsibility,
            &self.rules.responsibility,
            input.context,
        );

        // Step 6: Project scale
        self.score_phrases(
            &mut tally,
            EvidenceCategory::ProjectScale,
            &self.rules.project_scale,
            input.context,
        );

        let had_evidence = !tally.scores.is_zero();
        let adjustments = &self.rules.adjustments;

        if input.is_backed {
            tally.adjust(&adjustments.backed, "certification backing");
        }
        if input.is_technical && input.in_skills_section {
            tally.adjust(&adjustments.skills_section, "listed in skills section");
        }
        if !had_evidence {
            tally.adjust(&adjustments.no_signal, "listed without supporting detail");
        }
        if self.shows_concrete_use(input.context, input.skill) {
            tally.adjust(&adjustments.concrete_use, "concrete use");
        }

        let (level, confidence) = self.select_level(&tally.scores, input);

        ProficiencyAssessment {
            level,
            confidence,
            scores: tally.scores,
            indicators: tally.indicators,
        }
    }

    fn select_level(&self, scores: &LevelScores, input: &ScoringInput<'_>) -> (ProficiencyLevel, f32) {
        let policy = &self.rules.confidence;

        if scores.is_zero() {
            return (
                policy.default_level.level(),
                clamp_confidence(policy.default_confidence + input.confidence_boost),
            );
        }

        let (mut level, top) = scores.top();
        let mut confidence = if scores.nonzero_levels() >= 2 {
            (policy.base + (top - scores.runner_up()) * policy.margin_factor + input.confidence_boost)
                .min(policy.ceiling)
        } else {
            policy.flat_default + input.confidence_boost
        };

        if !input.is_backed && level.is_superlative() {
            confidence = confidence.min(policy.unbacked_superlative_cap);
        }
        if confidence < policy.downgrade_below && level.is_superlative() {
            level = ProficiencyLevel::Intermediate;
        }

        (level, clamp_confidence(confidence))
    }

    fn score_phrases(
        &self,
        tally: &mut Tally,
        category: EvidenceCategory,
        table: &LevelTable,
        text: &str,
    ) {
        if text.is_empty() {
            return;
        }
        let weight = self.rules.weights.weight(category);
        for (level, phrases) in table.iter() {
            for phrase in phrases {
                let hits = count_phrase(text, phrase);
                if hits > 0 {
                    tally.push(category, level, phrase, hits as f32 * weight);
                }
            }
        }
    }

    fn score_duration(&self, tally: &mut Tally, context: &str) {
        let weight = self.rules.weights.weight(EvidenceCategory::Duration);

        for caps in NUMERIC_YEARS.captures_iter(context) {
            let low: f32 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
            let high: f32 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(low);
            let years = if caps.get(3).is_some() { high + 0.5 } else { high };
            let level = self.rules.year_thresholds.level_for(years);
            tally.push(EvidenceCategory::Duration, level, &caps[0], weight);
        }

        for level in ProficiencyLevel::ALL {
            for pattern in &self.duration_patterns[level.index()] {
                for m in pattern.find_iter(context) {
                    tally.push(EvidenceCategory::Duration, level, m.as_str(), weight);
                }
            }
        }
    }

    fn sentences_mentioning(&self, text: &str, skill: &str) -> String {
        let matching: Vec<&str> = self
            .analyzer
            .sentences(text)
            .into_iter()
            .map(|s| s.text)
            .filter(|s| contains_word(s, skill))
            .collect();

        if matching.is_empty() {
            text.to_string()
        } else {
            matching.join(" ")
        }
    }

    fn shows_concrete_use(&self, context: &str, skill: &str) -> bool {
        self.analyzer.sentences(context).into_iter().any(|sentence| {
            let Some(&(mention, _)) = find_words(sentence.text, skill).first() else {
                return false;
            };
            CONCRETE_USE.is_match(&sentence.text[..mention])
                || contains_word(sentence.text, "project")
                || contains_word(sentence.text, "projects")
        })
    }
}

#[derive(Default)]
struct Tally {
    scores: LevelScores,
    indicators: Vec<Indicator>,
}

impl Tally {
    fn push(&mut self, category: EvidenceCategory, level: ProficiencyLevel, phrase: &str, points: f32) {
        if points == 0.0 {
            return;
        }
        self.scores.add(level, points);
        self.indicators.push(Indicator {
            category,
            level,
            phrase: phrase.to_string(),
            points,
        });
    }

    fn adjust(&mut self, points: &[f32; 4], reason: &str) {
        for level in ProficiencyLevel::ALL {
            self.push(EvidenceCategory::Adjustment, level, reason, points[level.index()]);
        }
    }
}
