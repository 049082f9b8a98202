use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::candidate_extractor::CandidateExtractor;
use crate::analysis::certification::{
    fallback_name, CertificationCatalog, CertificationExtractor, CertificationLinker,
};
use crate::analysis::context_validator::{is_mentioned, ContextValidator};
use crate::analysis::proficiency::{ProficiencyScorer, ScoringInput};
use crate::analysis::resolver::{SkillEvidence, SkillResolver};
use crate::analysis::rules::ProficiencyRules;
use crate::analysis::skill_validator::SkillValidator;
use crate::config::{Config, DEFAULT_MAX_DOCUMENT_CHARS};
use crate::error::Result;
use crate::models::{
    CertificateDocument, Certification, CertificationSet, DocumentKind, DocumentReport, Skill,
    SkillCategory, SkillRepository, SkillResult,
};
use crate::taxonomy::catalog_data::INDUSTRY_KEYWORDS;
use crate::taxonomy::SkillCatalog;
use crate::text::{count_phrase, truncate, TextAnalyzer};

const PROVISIONAL_CONFIDENCE: f32 = 0.5;
const KEY_INDICATORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryScores {
    pub industry: Option<String>,
    pub scores: Vec<(String, usize)>,
}

pub fn detect_industry(text: &str) -> IndustryScores {
    let scores: Vec<(String, usize)> = INDUSTRY_KEYWORDS
        .iter()
        .map(|(industry, keywords)| {
            let hits = keywords.iter().map(|k| count_phrase(text, k)).sum();
            (industry.to_string(), hits)
        })
        .collect();

    let industry = scores
        .iter()
        .fold(None::<&(String, usize)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ if entry.1 > 0 => Some(entry),
            _ => best,
        })
        .map(|(name, _)| name.clone());

    IndustryScores { industry, scores }
}

struct Annotation {
    category: SkillCategory,
    indicators: Vec<String>,
}

pub struct SkillEngine {
    catalog: Arc<SkillCatalog>,
    analyzer: Arc<TextAnalyzer>,
    extractor: CandidateExtractor,
    resolver: SkillResolver,
    context_validator: ContextValidator,
    certification_extractor: CertificationExtractor,
    linker: CertificationLinker,
    scorer: ProficiencyScorer,
    validator: SkillValidator,
    max_chars: usize,
}

impl SkillEngine {
    pub fn new(
        catalog: SkillCatalog,
        certifications: CertificationCatalog,
        rules: ProficiencyRules,
        max_chars: usize,
    ) -> Result<Self> {
        info!(
            "Skill catalog ready: {} skills, {} variations",
            catalog.len(),
            catalog.variation_count()
        );
        let catalog = Arc::new(catalog);
        let analyzer = Arc::new(TextAnalyzer::new());

        Ok(Self {
            extractor: CandidateExtractor::new(catalog.clone(), analyzer.clone(), max_chars),
            resolver: SkillResolver::new(catalog.clone(), analyzer.clone()),
            context_validator: ContextValidator::new(catalog.clone(), analyzer.clone()),
            certification_extractor: CertificationExtractor::new(certifications),
            linker: CertificationLinker::new(),
            scorer: ProficiencyScorer::new(rules, analyzer.clone())?,
            validator: SkillValidator::new(catalog.clone()),
            catalog,
            analyzer,
            max_chars,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(
            SkillCatalog::builtin(),
            CertificationCatalog::builtin(),
            ProficiencyRules::builtin(),
            DEFAULT_MAX_DOCUMENT_CHARS,
        )
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            SkillCatalog::load(config.skills_catalog_path.as_deref()),
            CertificationCatalog::load(config.certifications_catalog_path.as_deref()),
            ProficiencyRules::load(config.rules_path.as_deref()),
            config.max_document_chars,
        )
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &ProficiencyRules {
        self.scorer.rules()
    }

    pub fn analyze_document(
        &self,
        file: &str,
        kind: DocumentKind,
        text: &str,
        certifications: &CertificationSet,
    ) -> DocumentReport {
        let text = truncate(text, self.max_chars);

        // Step 1: Certifications listed in the document itself
        let listed = self.certification_extractor.extract_from_resume(text);
        let mut available = certifications.clone();
        available.extend(listed.clone());

        let mut certification_names: Vec<String> = listed.iter().map(|c| c.name.clone()).collect();
        for name in certifications.names() {
            if !certification_names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                certification_names.push(name);
            }
        }

        if text.trim().is_empty() {
            warn!("No text extracted from {}; reporting no skills", file);
            return DocumentReport::empty(file, kind, certification_names);
        }

        // Step 2: Candidates from patterns and tokens
        let candidates = self.extractor.extract(text);
        debug!("{} candidates in {}", candidates.len(), file);

        // Step 3: Resolve and retain
        let resolved = self.resolver.resolve(&candidates);
        info!("Resolved {} skills in {}", resolved.len(), file);

        // Step 4: Context checks, linking, scoring and final validation
        let mut repository = SkillRepository::new();
        let mut annotations: HashMap<String, Annotation> = HashMap::new();

        for evidence in &resolved {
            if let Some(reason) = self.context_validator.check(evidence, text) {
                info!("Rejected '{}' in {}: {}", evidence.canonical, file, reason);
                continue;
            }

            let Some((skill, indicators)) = self.score(evidence, &available) else {
                continue;
            };

            if !is_mentioned(&skill.name, text) {
                info!("Dropped '{}': not mentioned verbatim in {}", skill.name, file);
                continue;
            }

            annotations
                .entry(skill.name.clone())
                .or_insert_with(|| Annotation {
                    category: evidence.category.clone(),
                    indicators,
                });
            repository.add_skill(skill);
        }

        // Step 5: Assemble the report
        let mut skills: Vec<SkillResult> = repository
            .all()
            .into_iter()
            .filter_map(|skill| {
                let annotation = annotations.get(&skill.name)?;
                Some(SkillResult {
                    name: skill.name.clone(),
                    proficiency: skill.proficiency?,
                    confidence: skill.confidence_score,
                    is_technical: annotation.category.is_technical(),
                    is_backed: skill.is_backed,
                    backing_certificate: skill.backing_certificate.clone(),
                    category: annotation.category.clone(),
                    source: skill.source.clone(),
                    indicators: annotation.indicators.clone(),
                })
            })
            .collect();

        skills.sort_by(|a, b| {
            b.proficiency
                .cmp(&a.proficiency)
                .then(
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then_with(|| a.name.cmp(&b.name))
        });

        info!(
            "Extracted {} skills from {} ({} backed)",
            skills.len(),
            file,
            skills.iter().filter(|s| s.is_backed).count()
        );

        let mut report = DocumentReport::empty(file, kind, certification_names);
        report.skills = skills;
        report.industry = detect_industry(text).industry;
        report
    }

    fn score(&self, evidence: &SkillEvidence, certifications: &CertificationSet) -> Option<(Skill, Vec<String>)> {
        let boost = evidence.confidence_boost();
        let source = evidence.primary_source().map(|s| s.as_str().to_string());

        let skill = Skill::new(evidence.canonical.as_str(), PROVISIONAL_CONFIDENCE + boost, source);
        let skill = self.linker.link(skill, certifications);

        let certification_text = if skill.is_backed {
            certifications.text_for_skill(&evidence.canonical)
        } else {
            None
        };

        let input = ScoringInput {
            skill: &evidence.canonical,
            context: evidence.best_context(),
            certification_text: certification_text.as_deref(),
            is_backed: skill.is_backed,
            confidence_boost: boost,
            is_technical: evidence.category.is_technical(),
            in_skills_section: evidence.in_skill_listing(),
        };
        let assessment = self.scorer.assess(&input);
        debug!(
            "'{}' scored {} at {:.2}",
            evidence.canonical, assessment.level, assessment.confidence
        );

        let indicators: Vec<String> = assessment
            .key_indicators(KEY_INDICATORS)
            .iter()
            .map(|i| i.to_string())
            .collect();

        let mut skill = skill.with_assessment(assessment.level, assessment.confidence);
        skill.name = self.validator.validate(&skill.name)?;
        Some((skill, indicators))
    }

    pub fn analyze_certificate(&self, file: &str, text: &str) -> (CertificateDocument, Vec<Certification>) {
        let text = truncate(text, self.max_chars);
        let certifications = self
            .certification_extractor
            .extract_from_certificate_document(text, file);

        let name = certifications
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| fallback_name(file));

        let mut skills: Vec<String> = Vec::new();
        for found in self.catalog.scan_phrases(&self.analyzer, text) {
            if !skills.contains(&found.canonical) {
                skills.push(found.canonical);
            }
        }

        info!(
            "Certificate {} -> '{}' covering {} skills",
            file,
            name,
            skills.len()
        );

        let document = CertificateDocument {
            file: file.to_string(),
            certification: name,
            text: text.to_string(),
            skills,
        };
        (document, certifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProficiencyLevel;

    fn engine() -> SkillEngine {
        SkillEngine::builtin().unwrap()
    }

    fn resume(text: &str) -> DocumentReport {
        engine().analyze_document("resume.txt", DocumentKind::Resume, text, &CertificationSet::new())
    }

    #[test]
    fn test_skills_section_is_extracted() {
        let report = resume("Jane Doe\nTechnical Skills: Python, Docker, Kubernetes\n");
        for name in ["Python", "Docker", "Kubernetes"] {
            let skill = report.skill(name).unwrap();
            assert!(skill.is_technical);
            assert!(!skill.is_backed);
            assert!(skill.confidence >= 0.0 && skill.confidence <= 1.0);
        }
        assert_eq!(report.kind, DocumentKind::Resume);
    }

    #[test]
    fn test_certificate_backs_resume_skill() {
        let engine = engine();
        let mut set = CertificationSet::new();
        let (document, certs) = engine.analyze_certificate(
            "python_certificate.txt",
            "Certificate of Completion\nThis certifies that Jane Doe has completed the Python Certificate program.",
        );
        assert!(document.skills.contains(&"Python".to_string()));
        set.add_document(document, certs);

        let report = engine.analyze_document(
            "resume.txt",
            DocumentKind::Resume,
            "Experience\nBuilt data pipelines using Python at Acme.",
            &set,
        );
        let python = report.skill("Python").unwrap();
        assert!(python.is_backed);
        assert!(python.backing_certificate.is_some());
        assert!(python.confidence >= 0.75);
    }

    #[test]
    fn test_negated_and_education_only_skills_are_dropped() {
        let report = resume(
            "Summary\nNot familiar with Java but eager to grow.\nEducation: basic coursework in Python, introduction to programming\nSkills: Docker, Git",
        );
        assert!(report.skill("Java").is_none());
        assert!(report.skill("Python").is_none());
        assert!(report.skill("Docker").is_some());
    }

    #[test]
    fn test_emitted_names_are_mentioned() {
        let text = "Skills: JS, k8s, Postgres, Terraform\nLed AWS cloud architecture for 6 years.";
        let report = resume(text);
        assert!(report.skill("Terraform").is_some());
        for skill in &report.skills {
            assert!(crate::text::contains_word(text, &skill.name), "{} not in text", skill.name);
        }
    }

    #[test]
    fn test_listed_certifications_are_reported() {
        let report = resume("Skills: AWS, Linux\nCertifications\nAWS Certified Solutions Architect - Associate\n");
        assert!(report
            .certifications
            .iter()
            .any(|c| c.starts_with("AWS Certified Solutions Architect")));
        assert!(report.skill("AWS").map_or(false, |s| s.is_backed));
    }

    #[test]
    fn test_empty_text_yields_no_skills() {
        let report = resume("   \n ");
        assert!(report.skills.is_empty());
        assert!(report.industry.is_none());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let engine = engine();
        let text = "Professional Summary\n5+ years of extensive experience leading AWS cloud architecture, pioneered the migration strategy.\nSkills: AWS, Python, Docker, Leadership";
        let set = CertificationSet::new();
        let first = engine.analyze_document("a.txt", DocumentKind::Resume, text, &set);
        let second = engine.analyze_document("a.txt", DocumentKind::Resume, text, &set);
        assert_eq!(first.skills, second.skills);
        assert!(first
            .skills
            .iter()
            .all(|s| ProficiencyLevel::ALL.contains(&s.proficiency)));
    }

    #[test]
    fn test_detect_industry() {
        let scores = detect_industry("Software development and cloud programming on a database team");
        assert_eq!(scores.industry.as_deref(), Some("technology"));
        assert_eq!(scores.scores.len(), INDUSTRY_KEYWORDS.len());

        let scores = detect_industry("Patient care and clinical treatment");
        assert_eq!(scores.industry.as_deref(), Some("healthcare"));

        assert!(detect_industry("nothing relevant here").industry.is_none());
    }

    #[test]
    fn test_certificate_name_falls_back_to_file() {
        let (document, certs) = engine().analyze_certificate("docker_basics.txt", "Awarded for Docker fundamentals");
        assert_eq!(document.certification, "Docker Basics Certificate");
        assert_eq!(certs[0].name, "Docker Basics Certificate");
        assert_eq!(document.skills, vec!["Docker".to_string()]);
    }
}
