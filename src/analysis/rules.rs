use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::models::skill::ProficiencyLevel;

pub const RULES_VERSION: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceCategory {
    Keyword,
    Duration,
    Cognitive,
    Certification,
    Responsibility,
    ProjectScale,
    Adjustment,
}

impl std::fmt::Display for EvidenceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceCategory::Keyword => write!(f, "keyword"),
            EvidenceCategory::Duration => write!(f, "duration"),
            EvidenceCategory::Cognitive => write!(f, "cognitive"),
            EvidenceCategory::Certification => write!(f, "certification"),
            EvidenceCategory::Responsibility => write!(f, "responsibility"),
            EvidenceCategory::ProjectScale => write!(f, "project scale"),
            EvidenceCategory::Adjustment => write!(f, "adjustment"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTable {
    pub beginner: Vec<String>,
    pub intermediate: Vec<String>,
    pub advanced: Vec<String>,
    pub expert: Vec<String>,
}

impl LevelTable {
    fn from_static(table: [&[&str]; 4]) -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            beginner: owned(table[0]),
            intermediate: owned(table[1]),
            advanced: owned(table[2]),
            expert: owned(table[3]),
        }
    }

    pub fn get(&self, level: ProficiencyLevel) -> &[String] {
        match level {
            ProficiencyLevel::Beginner => &self.beginner,
            ProficiencyLevel::Intermediate => &self.intermediate,
            ProficiencyLevel::Advanced => &self.advanced,
            ProficiencyLevel::Expert => &self.expert,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProficiencyLevel, &[String])> {
        ProficiencyLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub keyword: f32,
    pub duration: f32,
    pub cognitive: f32,
    pub certification: f32,
    pub responsibility: f32,
    pub project_scale: f32,
}

impl CategoryWeights {
    pub fn weight(&self, category: EvidenceCategory) -> f32 {
        match category {
            EvidenceCategory::Keyword => self.keyword,
            EvidenceCategory::Duration => self.duration,
            EvidenceCategory::Cognitive => self.cognitive,
            EvidenceCategory::Certification => self.certification,
            EvidenceCategory::Responsibility => self.responsibility,
            EvidenceCategory::ProjectScale => self.project_scale,
            EvidenceCategory::Adjustment => 1.0,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            keyword: 1.0,
            duration: 2.0,
            cognitive: 1.5,
            certification: 3.0,
            responsibility: 1.3,
            project_scale: 1.0,
        }
    }
}

/// Points added per level, indexed Beginner..Expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustments {
    pub backed: [f32; 4],
    pub skills_section: [f32; 4],
    pub no_signal: [f32; 4],
    pub concrete_use: [f32; 4],
    pub certification_default: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            backed: [1.0, 2.0, 1.0, 0.0],
            skills_section: [0.0, 1.5, 0.0, 0.0],
            no_signal: [0.0, 1.0, 0.0, 0.0],
            concrete_use: [0.0, 1.0, 0.5, 0.0],
            certification_default: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultLevelPolicy {
    Beginner,
    Intermediate,
}

impl DefaultLevelPolicy {
    pub fn level(self) -> ProficiencyLevel {
        match self {
            DefaultLevelPolicy::Beginner => ProficiencyLevel::Beginner,
            DefaultLevelPolicy::Intermediate => ProficiencyLevel::Intermediate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    pub base: f32,
    pub margin_factor: f32,
    pub ceiling: f32,
    pub flat_default: f32,
    pub unbacked_superlative_cap: f32,
    pub downgrade_below: f32,
    pub default_level: DefaultLevelPolicy,
    pub default_confidence: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            base: 0.5,
            margin_factor: 0.1,
            ceiling: 0.9,
            flat_default: 0.65,
            unbacked_superlative_cap: 0.8,
            downgrade_below: 0.65,
            default_level: DefaultLevelPolicy::Intermediate,
            default_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearThresholds {
    pub beginner_max: f32,
    pub intermediate_max: f32,
    pub advanced_max: f32,
}

impl YearThresholds {
    pub fn level_for(&self, years: f32) -> ProficiencyLevel {
        if years <= self.beginner_max {
            ProficiencyLevel::Beginner
        } else if years <= self.intermediate_max {
            ProficiencyLevel::Intermediate
        } else if years <= self.advanced_max {
            ProficiencyLevel::Advanced
        } else {
            ProficiencyLevel::Expert
        }
    }
}

impl Default for YearThresholds {
    fn default() -> Self {
        Self {
            beginner_max: 1.0,
            intermediate_max: 3.0,
            advanced_max: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProficiencyRules {
    pub version: u32,
    pub weights: CategoryWeights,
    pub keywords: LevelTable,
    pub duration_patterns: LevelTable,
    pub year_thresholds: YearThresholds,
    pub cognitive_verbs: LevelTable,
    pub certification_terms: LevelTable,
    pub responsibility: LevelTable,
    pub project_scale: LevelTable,
    pub adjustments: Adjustments,
    pub confidence: ConfidencePolicy,
}

impl ProficiencyRules {
    pub fn builtin() -> Self {
        Self {
            version: RULES_VERSION,
            weights: CategoryWeights::default(),
            keywords: LevelTable::from_static([
                &[
                    "basic", "basics", "familiar", "familiarity", "learning", "entry-level",
                    "fundamental", "fundamentals", "coursework", "introduction", "introductory",
                    "beginner", "novice", "studied", "exposure", "exposure to", "classroom",
                    "training", "guided", "academic", "course", "101", "new to",
                ],
                &[
                    "applied", "practical", "experience", "working knowledge",
                    "solid understanding", "hands-on", "intermediate", "proficient", "competent",
                    "functional", "participated in", "contributed to", "team member",
                    "responsible for", "maintained", "implemented", "developed", "built",
                ],
                &[
                    "advanced", "extensive", "in-depth", "thorough", "comprehensive",
                    "specialized", "seasoned", "strong", "mastery", "senior", "complex",
                    "mentor", "trained others", "key contributor", "significant", "optimization",
                    "optimized",
                ],
                &[
                    "expert", "authority", "specialist", "thought leader", "5+ years",
                    "deep expertise", "recognized", "acclaimed", "pioneered", "pioneering",
                    "strategic", "outstanding", "exceptional", "cutting-edge", "industry leader",
                    "speaker", "published", "researcher", "invented", "patent", "revolutionized",
                    "principal", "consultant", "advisor",
                ],
            ]),
            duration_patterns: LevelTable::from_static([
                &[
                    r"\b\d{1,2}\s*(?:days?|weeks?|months?)\b",
                    r"\bless than (?:a|one|1) years?\b",
                    r"\brecently\b",
                ],
                &[r"\bcouple (?:of )?years\b", r"\b(?:two|three) years\b"],
                &[r"\bseveral years\b", r"\bmany years\b", r"\b(?:four|five) years\b"],
                &[
                    r"\bdecades?\b",
                    r"\b(?:long|extensive) (?:career|history|background)\b",
                    r"\b(?:six|seven|eight|nine|ten) years\b",
                ],
            ]),
            year_thresholds: YearThresholds::default(),
            cognitive_verbs: LevelTable::from_static([
                &[
                    "understand", "understood", "define", "defined", "describe", "described",
                    "identify", "identified", "recognize", "recognized", "recall", "observe",
                    "observed", "follow", "followed", "assist", "assisted", "learned",
                ],
                &[
                    "apply", "applied", "implement", "implemented", "use", "used", "utilized",
                    "demonstrate", "demonstrated", "operate", "operated", "solve", "solved",
                    "modify", "modified", "perform", "performed", "configure", "configured",
                ],
                &[
                    "analyze", "analyzed", "compare", "compared", "diagnose", "diagnosed",
                    "examine", "examined", "investigate", "investigated", "integrate",
                    "integrated", "optimize", "optimized", "design", "designed", "plan",
                    "planned", "debug", "debugged", "refactor", "refactored",
                ],
                &[
                    "evaluate", "evaluated", "assess", "assessed", "synthesize", "synthesized",
                    "invent", "formulate", "formulated", "devise", "devised", "theorize",
                    "theorized", "innovate", "innovated", "predict", "propose", "proposed",
                    "author", "authored",
                ],
            ]),
            certification_terms: LevelTable::from_static([
                &["fundamentals", "foundations", "foundational", "foundation", "entry", "basic", "introduction"],
                &["practitioner", "professional", "associate", "applied", "standard"],
                &["advanced", "specialist", "specialty", "senior", "architect"],
                &["master", "distinguished", "elite", "fellow", "authority", "subject matter expert"],
            ]),
            responsibility: LevelTable::from_static([
                &[
                    "assisted", "helped", "supported", "followed", "shadowed", "observed",
                    "participated",
                ],
                &[
                    "contributed", "implemented", "executed", "handled", "coordinated",
                    "developed", "managed", "responsible for",
                ],
                &[
                    "led", "leading", "lead", "designed", "architected", "directed",
                    "orchestrated", "supervised", "oversaw", "mentored", "headed", "spearheaded",
                ],
                &[
                    "founded", "founder", "pioneered", "established", "chief", "head of",
                    "executive", "strategized", "transformed", "revolutionized", "keynote",
                ],
            ]),
            project_scale: LevelTable::from_static([
                &["small", "minor", "simple", "single", "individual", "personal"],
                &["moderate", "team", "component", "module", "feature", "mid-sized"],
                &[
                    "large", "large-scale", "complex", "major", "platform", "enterprise",
                    "organization", "department", "cross-functional",
                ],
                &[
                    "enterprise-wide", "cross-organizational", "industry-wide", "global",
                    "international", "multi-system", "mission-critical", "nationwide",
                    "worldwide", "company-wide",
                ],
            ]),
            adjustments: Adjustments::default(),
            confidence: ConfidencePolicy::default(),
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rules: Self = serde_json::from_str(&content)?;
        rules.compile_duration_patterns()?;
        Ok(rules)
    }

    pub fn compile_duration_patterns(&self) -> Result<[Vec<Regex>; 4]> {
        Ok([
            compile(self.duration_patterns.get(ProficiencyLevel::Beginner))?,
            compile(self.duration_patterns.get(ProficiencyLevel::Intermediate))?,
            compile(self.duration_patterns.get(ProficiencyLevel::Advanced))?,
            compile(self.duration_patterns.get(ProficiencyLevel::Expert))?,
        ])
    }

    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::from_json_file(path) {
                Ok(rules) => {
                    tracing::info!("Loaded proficiency rules v{} from {}", rules.version, path.display());
                    rules
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load proficiency rules {}: {}; using built-in rules",
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

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).map_err(Into::into))
        .collect()
}

impl Default for ProficiencyRules {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_thresholds() {
        let thresholds = YearThresholds::default();
        assert_eq!(thresholds.level_for(0.5), ProficiencyLevel::Beginner);
        assert_eq!(thresholds.level_for(3.0), ProficiencyLevel::Intermediate);
        assert_eq!(thresholds.level_for(5.0), ProficiencyLevel::Advanced);
        assert_eq!(thresholds.level_for(5.5), ProficiencyLevel::Expert);
    }

    #[test]
    fn test_partial_rules_file_keeps_defaults() {
        let rules: ProficiencyRules =
            serde_json::from_str(r#"{"version": 7, "weights": {"keyword": 2.0, "duration": 2.0, "cognitive": 1.5, "certification": 3.0, "responsibility": 1.3, "project_scale": 1.0}}"#)
                .unwrap();
        assert_eq!(rules.version, 7);
        assert_eq!(rules.weights.weight(EvidenceCategory::Keyword), 2.0);
        assert!(rules.keywords.get(ProficiencyLevel::Expert).contains(&"pioneered".to_string()));
        assert_eq!(rules.confidence.default_level, DefaultLevelPolicy::Intermediate);
    }

    #[test]
    fn test_builtin_tables_cover_every_level() {
        let rules = ProficiencyRules::builtin();
        for table in [
            &rules.keywords,
            &rules.duration_patterns,
            &rules.cognitive_verbs,
            &rules.certification_terms,
            &rules.responsibility,
            &rules.project_scale,
        ] {
            assert!(table.iter().all(|(_, items)| !items.is_empty()));
        }
    }

    #[test]
    fn test_malformed_rules_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").unwrap();
        let rules = ProficiencyRules::load(Some(&path));
        assert_eq!(rules.version, RULES_VERSION);
    }

    #[test]
    fn test_bad_duration_pattern_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"version": 9, "duration_patterns": {"beginner": [], "intermediate": [], "advanced": [], "expert": ["(unclosed"]}}"#,
        )
        .unwrap();

        assert!(matches!(
            ProficiencyRules::from_json_file(&path),
            Err(crate::error::Error::Pattern(_))
        ));

        let rules = ProficiencyRules::load(Some(&path));
        assert_eq!(rules.version, RULES_VERSION);
        assert!(rules.compile_duration_patterns().is_ok());
    }
}
