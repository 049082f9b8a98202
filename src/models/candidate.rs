use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    SkillsSection,
    TechnologySection,
    PatternMatch,
    SectionHeader,
    Parenthetical,
    BulletLine,
    NlpPhrase,
    NlpToken,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::SkillsSection => "skills_section",
            SourceTag::TechnologySection => "technology_section",
            SourceTag::PatternMatch => "pattern_match",
            SourceTag::SectionHeader => "section_header",
            SourceTag::Parenthetical => "parenthetical",
            SourceTag::BulletLine => "bullet_line",
            SourceTag::NlpPhrase => "nlp_phrase",
            SourceTag::NlpToken => "nlp_token",
        }
    }

    pub fn is_skill_listing(self) -> bool {
        matches!(self, SourceTag::SkillsSection | SourceTag::TechnologySection)
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub raw_text: String,
    pub context_window: String,
    pub source_tag: SourceTag,
    /// 0 (generic bullet) to 3 (explicit labeled skills section).
    pub priority: u8,
    /// Byte offset of the mention in the source document.
    pub offset: usize,
}

impl Candidate {
    pub fn new(
        raw_text: impl Into<String>,
        context_window: impl Into<String>,
        source_tag: SourceTag,
        priority: u8,
        offset: usize,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            context_window: context_window.into(),
            source_tag,
            priority: priority.min(3),
            offset,
        }
    }
}
