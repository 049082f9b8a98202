pub mod candidate_extractor;
pub mod catalog_update;
pub mod certification;
pub mod context_validator;
pub mod engine;
pub mod pipeline;
pub mod proficiency;
pub mod resolver;
pub mod rules;
pub mod skill_validator;

pub use candidate_extractor::CandidateExtractor;
pub use catalog_update::{update_certifications_catalog, update_skills_catalog};
pub use certification::{CertificationCatalog, CertificationExtractor, CertificationLinker};
pub use context_validator::ContextValidator;
pub use engine::{detect_industry, SkillEngine};
pub use pipeline::AnalysisPipeline;
pub use proficiency::{ProficiencyAssessment, ProficiencyScorer, ScoringInput};
pub use resolver::SkillResolver;
pub use rules::ProficiencyRules;
pub use skill_validator::SkillValidator;
