use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::candidate::{Candidate, SourceTag};
use crate::taxonomy::{PhraseMatch, SkillCatalog};
use crate::text::{truncate, TextAnalyzer};

const CONTEXT_RADIUS_CHARS: usize = 100;
const CONTEXT_RADIUS_TOKENS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitMode {
    Aggressive,
    Conservative,
}

struct PatternRule {
    regex: Regex,
    tag: SourceTag,
    priority: u8,
    split: SplitMode,
}

fn rule(pattern: &str, tag: SourceTag, priority: u8, split: SplitMode) -> PatternRule {
    PatternRule {
        regex: Regex::new(pattern).expect("candidate pattern is valid"),
        tag,
        priority,
        split,
    }
}

// Ordered from the most to the least explicit resume idiom.
static PATTERN_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        rule(
            r"(?im)^[ \t\-•*>]*(?:technical skills|core competencies|key skills|core skills|skills summary|areas of expertise|competencies|skills)[ \t]*[:\-–][ \t]*(.+)$",
            SourceTag::SkillsSection,
            3,
            SplitMode::Aggressive,
        ),
        rule(
            r"(?im)^[ \t\-•*>]*(?:programming languages|languages|technologies|tools|frameworks|software|platforms|databases|tech stack)[ \t]*[:\-–][ \t]*(.+)$",
            SourceTag::TechnologySection,
            2,
            SplitMode::Aggressive,
        ),
        rule(
            r"(?i)\b(?:proficient (?:in|with)|experience (?:with|in)|experienced (?:in|with)|expertise (?:in|with)|skilled in|knowledge of|familiar with|competent in|speciali[sz]ing in|background in|worked with|expert in|trained in)\s+((?:[^.;:\n]|\.[^\s])+)",
            SourceTag::PatternMatch,
            2,
            SplitMode::Aggressive,
        ),
        rule(
            r"(?m)^[ \t]*([A-Z][A-Za-z0-9+#./&\-]*(?: [A-Za-z0-9+#./&\-]+){0,4})[ \t]*:?[ \t]*$",
            SourceTag::SectionHeader,
            1,
            SplitMode::Conservative,
        ),
        rule(
            r"\(([^()\n]{2,80})\)",
            SourceTag::Parenthetical,
            1,
            SplitMode::Conservative,
        ),
        rule(
            r"(?m)^[ \t]*[\-•*>▪◦][ \t]+(.+)$",
            SourceTag::BulletLine,
            0,
            SplitMode::Conservative,
        ),
    ]
});

const ONE_LETTER_CUES: [&str; 6] = [
    "language",
    "languages",
    "programming",
    "skills",
    "statistical",
    "technologies",
];

pub struct CandidateExtractor {
    catalog: Arc<SkillCatalog>,
    analyzer: Arc<TextAnalyzer>,
    max_chars: usize,
}

impl CandidateExtractor {
    pub fn new(catalog: Arc<SkillCatalog>, analyzer: Arc<TextAnalyzer>, max_chars: usize) -> Self {
        Self {
            catalog,
            analyzer,
            max_chars,
        }
    }

    pub fn extract(&self, text: &str) -> Vec<Candidate> {
        let text = truncate(text, self.max_chars);

        let mut candidates = self.extract_by_patterns(text);
        let pattern_count = candidates.len();
        candidates.extend(self.extract_by_tokens(text));

        debug!(
            "Extracted {} pattern candidates and {} token candidates",
            pattern_count,
            candidates.len() - pattern_count
        );

        candidates
    }

    pub fn extract_by_patterns(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for rule in PATTERN_RULES.iter() {
            for caps in rule.regex.captures_iter(text) {
                let Some(group) = caps.get(1) else {
                    continue;
                };

                for (start, end) in self.split(group.as_str(), group.start(), rule.split) {
                    let Some((start, end)) = trim_piece(text, start, end) else {
                        continue;
                    };
                    let context = self.analyzer.char_window(text, start, end, CONTEXT_RADIUS_CHARS);
                    candidates.push(Candidate::new(
                        &text[start..end],
                        context,
                        rule.tag,
                        rule.priority,
                        start,
                    ));
                }
            }
        }

        candidates
    }

    pub fn extract_by_tokens(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for sentence in self.analyzer.sentences(text) {
            let tokens = self.analyzer.tokens(sentence.text);
            let matches = self.catalog.scan_phrases(&self.analyzer, sentence.text);

            for m in &matches {
                if m.canonical.chars().count() == 1
                    && !self.supports_one_letter(sentence.text, &m.canonical, &matches)
                {
                    debug!("Skipping one-letter token '{}' without language context", m.canonical);
                    continue;
                }

                let (tag, priority) = if m.last_token > m.first_token {
                    (SourceTag::NlpPhrase, 1)
                } else {
                    (SourceTag::NlpToken, 0)
                };
                let context = self.analyzer.token_window(
                    sentence.text,
                    &tokens,
                    m.first_token,
                    m.last_token,
                    CONTEXT_RADIUS_TOKENS,
                );

                candidates.push(Candidate::new(
                    &sentence.text[m.start..m.end],
                    context,
                    tag,
                    priority,
                    sentence.start + m.start,
                ));
            }
        }

        candidates
    }

    fn supports_one_letter(
        &self,
        sentence: &str,
        canonical: &str,
        matches: &[PhraseMatch],
    ) -> bool {
        let has_peer = matches
            .iter()
            .any(|other| other.canonical != canonical && self.catalog.is_technical(&other.canonical));
        has_peer
            || self
                .analyzer
                .tokens(sentence)
                .iter()
                .any(|t| ONE_LETTER_CUES.iter().any(|cue| t.text.eq_ignore_ascii_case(cue)))
    }

    fn split(&self, group: &str, base: usize, mode: SplitMode) -> Vec<(usize, usize)> {
        match mode {
            SplitMode::Conservative => split_on(group, base, &[",", ";", "|"]),
            SplitMode::Aggressive => split_on(group, base, &[",", ";", "|", "•", "·"])
                .into_iter()
                .flat_map(|(start, end)| {
                    let piece = &group[start - base..end - base];
                    if self.catalog.is_known_skill(piece) {
                        vec![(start, end)]
                    } else {
                        split_on(piece, start, &[" and ", " & ", "/", " or "])
                    }
                })
                .collect(),
        }
    }
}

fn split_on(text: &str, base: usize, delims: &[&str]) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        if let Some(delim) = delims.iter().find(|d| text[i..].starts_with(**d)) {
            pieces.push((base + start, base + i));
            i += delim.len();
            start = i;
        } else {
            i += text[i..].chars().next().map_or(1, char::len_utf8);
        }
    }
    pieces.push((base + start, base + text.len()));

    pieces
}

fn trim_piece(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let piece = &text[start..end];
    let leading = piece.len()
        - piece
            .trim_start_matches(|c: char| c.is_whitespace() || "\"'`:;,!?*•-–()".contains(c))
            .len();
    let trailing = piece.len()
        - piece
            .trim_end_matches(|c: char| c.is_whitespace() || "\"'`:;,.!?*•-–()".contains(c))
            .len();

    if leading + trailing >= piece.len() {
        return None;
    }
    let mut start = start + leading;
    let end = end - trailing;

    for conjunction in ["and ", "or ", "& "] {
        let rest = &text[start..end];
        if rest.len() > conjunction.len()
            && rest.is_char_boundary(conjunction.len())
            && rest[..conjunction.len()].eq_ignore_ascii_case(conjunction)
        {
            start += conjunction.len();
        }
    }

    let piece = text[start..end].trim_start();
    let start = end - piece.len();
    (!piece.is_empty()).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CandidateExtractor {
        CandidateExtractor::new(
            Arc::new(SkillCatalog::builtin()),
            Arc::new(TextAnalyzer::new()),
            10_000,
        )
    }

    fn raw_with_tag(candidates: &[Candidate], tag: SourceTag) -> Vec<&str> {
        candidates
            .iter()
            .filter(|c| c.source_tag == tag)
            .map(|c| c.raw_text.as_str())
            .collect()
    }

    #[test]
    fn test_skills_section_is_split_aggressively() {
        let candidates = extractor().extract("Technical Skills: Python, Java; SQL and Docker");
        assert_eq!(
            raw_with_tag(&candidates, SourceTag::SkillsSection),
            vec!["Python", "Java", "SQL", "Docker"]
        );
        assert!(candidates
            .iter()
            .filter(|c| c.source_tag == SourceTag::SkillsSection)
            .all(|c| c.priority == 3));
    }

    #[test]
    fn test_known_compounds_survive_splitting() {
        let candidates = extractor().extract("Tools: Jenkins, CI/CD, TCP/IP");
        assert_eq!(
            raw_with_tag(&candidates, SourceTag::TechnologySection),
            vec!["Jenkins", "CI/CD", "TCP/IP"]
        );
    }

    #[test]
    fn test_experience_phrasing() {
        let candidates = extractor().extract("Proficient in Node.js and React. Enjoys hiking.");
        let found = raw_with_tag(&candidates, SourceTag::PatternMatch);
        assert_eq!(found, vec!["Node.js", "React"]);
        assert!(candidates
            .iter()
            .filter(|c| c.source_tag == SourceTag::PatternMatch)
            .all(|c| c.priority == 2));
    }

    #[test]
    fn test_bullets_and_parentheticals() {
        let text = "- Built data pipelines using Python\nReporting suite (Tableau, Excel)";
        let candidates = extractor().extract(text);
        assert_eq!(
            raw_with_tag(&candidates, SourceTag::BulletLine),
            vec!["Built data pipelines using Python"]
        );
        assert_eq!(
            raw_with_tag(&candidates, SourceTag::Parenthetical),
            vec!["Tableau", "Excel"]
        );
    }

    #[test]
    fn test_token_strategy_tags_phrases() {
        let candidates = extractor().extract("I enjoy Python and machine learning.");
        let tokens = raw_with_tag(&candidates, SourceTag::NlpToken);
        let phrases = raw_with_tag(&candidates, SourceTag::NlpPhrase);
        assert_eq!(tokens, vec!["Python"]);
        assert_eq!(phrases, vec!["machine learning"]);
        let phrase = candidates
            .iter()
            .find(|c| c.source_tag == SourceTag::NlpPhrase)
            .unwrap();
        assert_eq!(phrase.priority, 1);
    }

    #[test]
    fn test_one_letter_names_need_context() {
        let candidates = extractor().extract("Analyzed survey results in R.");
        assert!(candidates.iter().all(|c| c.raw_text != "R"));

        let candidates = extractor().extract("Statistical programming in R and Python.");
        assert!(candidates
            .iter()
            .any(|c| c.raw_text == "R" && c.source_tag == SourceTag::NlpToken));
    }

    #[test]
    fn test_offsets_point_at_mentions() {
        let text = "Summary line\nSkills: Kubernetes, Terraform\nUsed Docker daily.";
        for candidate in extractor().extract(text) {
            let end = candidate.offset + candidate.raw_text.len();
            assert_eq!(&text[candidate.offset..end], candidate.raw_text);
        }
    }

    #[test]
    fn test_context_window_covers_mention() {
        let text = "Led migration work.\nSkills: Kubernetes, Terraform";
        let candidates = extractor().extract(text);
        let kube = candidates
            .iter()
            .find(|c| c.source_tag == SourceTag::SkillsSection && c.raw_text == "Kubernetes")
            .unwrap();
        assert!(kube.context_window.contains("Skills: Kubernetes, Terraform"));
    }

    #[test]
    fn test_input_is_capped() {
        let extractor = CandidateExtractor::new(
            Arc::new(SkillCatalog::builtin()),
            Arc::new(TextAnalyzer::new()),
            20,
        );
        let candidates = extractor.extract("Skills: Python, SQL\nUsed Kubernetes and Terraform");
        assert!(candidates.iter().all(|c| c.raw_text != "Kubernetes"));
    }

    #[test]
    fn test_trim_piece() {
        let text = " and .NET.";
        assert_eq!(trim_piece(text, 0, text.len()), Some((5, 9)));
        assert_eq!(trim_piece(" , ", 0, 3), None);
    }
}
