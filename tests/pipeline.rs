use std::sync::Arc;

use skillproof::analysis::proficiency::{ProficiencyScorer, ScoringInput};
use skillproof::analysis::resolver::SkillResolver;
use skillproof::analysis::rules::ProficiencyRules;
use skillproof::analysis::skill_validator::SkillValidator;
use skillproof::models::{
    merge, Candidate, CertificationSet, ConsolidatedProfile, DocumentKind, ProficiencyLevel, Skill,
    SourceTag,
};
use skillproof::taxonomy::SkillCatalog;
use skillproof::text::{contains_word, TextAnalyzer};
use skillproof::{AnalysisPipeline, Config, FileTextSource, PipelineConfig, SkillEngine, Storage};

const RESUME: &str = "Jane Doe
Senior Data Engineer

Professional Summary
5+ years of extensive experience leading AWS cloud architecture, pioneered the migration strategy.

Technical Skills: Python, SQL, Docker, Kubernetes, Terraform
Soft Skills: Leadership, Communication

Experience
- Built data pipelines using Python and Apache Spark for enterprise-wide reporting
- Worked on a C++ project for an embedded team
- Not familiar with Java but eager to grow

Education
B.S. Computer Science, basic coursework in Ruby, introduction to programming
";

fn engine() -> SkillEngine {
    SkillEngine::builtin().unwrap()
}

#[test]
fn senior_claim_scores_expert_with_capped_confidence() {
    let scorer = ProficiencyScorer::new(ProficiencyRules::builtin(), Arc::new(TextAnalyzer::new())).unwrap();
    let context = "5+ years of extensive experience leading AWS cloud architecture, pioneered the migration strategy";
    let result = scorer.assess(&ScoringInput::new("AWS", context));

    assert_eq!(result.level, ProficiencyLevel::Expert);
    assert!(result.confidence <= 0.8 + f32::EPSILON);
}

#[test]
fn education_only_language_is_not_reported() {
    let report = engine().analyze_document(
        "resume.txt",
        DocumentKind::Resume,
        "Education\nbasic coursework in Python, introduction to programming\nSkills: Excel",
        &CertificationSet::new(),
    );
    assert!(report.skill("Python").is_none());
}

#[test]
fn ambiguous_token_without_language_context_is_dropped() {
    let report = engine().analyze_document(
        "resume.txt",
        DocumentKind::Resume,
        "Experience\nWorked on a C++ project at Acme.",
        &CertificationSet::new(),
    );
    assert!(report.skill("C++").is_none());
}

#[tokio::test]
async fn certificate_backs_resume_skill() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("jane_resume.txt"),
        "Experience\nBuilt data pipelines using Python at Acme.\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("python_certificate.txt"),
        "Python Certificate\nAwarded to Jane Doe for Python programming.",
    )
    .unwrap();

    let pipeline = AnalysisPipeline::new(FileTextSource::new(), engine(), None, PipelineConfig::default());
    let batch = pipeline.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();

    let report = &batch.documents[0];
    let python = report.skill("Python").unwrap();
    assert!(python.is_backed);
    assert_eq!(python.backing_certificate.as_deref(), Some("Python Certificate"));
    assert!(python.confidence >= 0.75);
    assert!(batch.certifications.iter().any(|c| c.name == "Python Certificate"));
}

#[test]
fn sentence_fragment_is_never_a_skill() {
    let validator = SkillValidator::new(Arc::new(SkillCatalog::builtin()));
    assert!(validator
        .validate("Collaborated with peers for departmental planning")
        .is_none());
}

#[test]
fn duplicate_mentions_keep_the_strongest_priority() {
    let resolver = SkillResolver::new(Arc::new(SkillCatalog::builtin()), Arc::new(TextAnalyzer::new()));
    let candidates = vec![
        Candidate::new("Docker", "(Docker, Compose)", SourceTag::Parenthetical, 1, 10),
        Candidate::new("docker", "Skills: Docker, Git", SourceTag::SkillsSection, 3, 60),
    ];

    let evidence = resolver.resolve(&candidates);
    assert_eq!(evidence.len(), 1);
    assert_eq!(evidence[0].canonical, "Docker");
    assert_eq!(evidence[0].max_priority, 3);
    assert!((evidence[0].confidence_boost() - 0.3).abs() < 1e-5);
}

#[test]
fn full_resume_respects_invariants() {
    let report = engine().analyze_document("jane_resume.txt", DocumentKind::Resume, RESUME, &CertificationSet::new());

    assert!(report.skill("Python").is_some());
    assert!(report.skill("Kubernetes").is_some());
    assert!(report.skill("Leadership").map_or(false, |s| !s.is_technical));
    assert!(report.skill("Java").is_none());
    assert!(report.skill("C++").is_none());
    assert!(report.skill("Ruby").is_none());
    assert_eq!(report.industry.as_deref(), Some("technology"));

    for skill in &report.skills {
        assert!((0.0..=1.0).contains(&skill.confidence), "{} out of bounds", skill.name);
        assert!(ProficiencyLevel::ALL.contains(&skill.proficiency));
        assert!(contains_word(RESUME, &skill.name), "{} not in document", skill.name);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let engine = engine();
    let set = CertificationSet::new();
    let first = engine.analyze_document("a.txt", DocumentKind::Resume, RESUME, &set);
    let second = engine.analyze_document("a.txt", DocumentKind::Resume, RESUME, &set);

    assert_eq!(first.skills, second.skills);
    assert_eq!(first.certifications, second.certifications);
}

#[test]
fn merged_backing_is_monotonic() {
    let backed = Skill::new("SQL", 0.6, None).with_backing("Oracle Database SQL", 0.75);
    let later = Skill::new("SQL", 0.4, Some("nlp_token".to_string()));

    let merged = merge(&backed, &later);
    assert!(merged.is_backed);
    assert!(merged.confidence_score >= backed.confidence_score);
}

#[test]
fn malformed_custom_catalog_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("skills.json");
    std::fs::write(&catalog, "{ not json").unwrap();

    let config = Config {
        skills_catalog_path: Some(catalog),
        ..Config::default()
    };
    let engine = SkillEngine::from_config(&config).unwrap();
    assert!(engine.catalog().is_known_skill("Python"));
}

#[tokio::test]
async fn stored_results_are_queryable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("aws_certification.txt"), "AWS Certified Solutions Architect").unwrap();
    std::fs::write(dir.path().join("resume.txt"), "Skills: AWS, Linux\n").unwrap();
    let db = dir.path().join("results.db");

    let pipeline = AnalysisPipeline::new(
        FileTextSource::new(),
        engine(),
        Some(Storage::new(&db).unwrap()),
        PipelineConfig::default(),
    );
    pipeline.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();

    let storage = Storage::new(&db).unwrap();
    assert_eq!(storage.list_reports().unwrap().len(), 1);
    assert_eq!(storage.backed_skill_counts().unwrap().get("AWS"), Some(&1));
}

#[test]
fn configured_length_cap_truncates_documents() {
    let config = Config {
        max_document_chars: 20,
        ..Config::default()
    };
    let engine = SkillEngine::from_config(&config).unwrap();
    let report = engine.analyze_document(
        "resume.txt",
        DocumentKind::Resume,
        "Skills: Python, SQL\n\n\nTechnical Skills: Docker, Terraform\n",
        &CertificationSet::new(),
    );

    assert!(report.skill("Python").is_some());
    assert!(report.skill("Docker").is_none());
}

#[tokio::test]
async fn consolidated_profile_spans_resumes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Jane Doe Resume.txt"), "Skills: React, SQL\n").unwrap();
    std::fs::write(dir.path().join("jane_doe_cv.txt"), "Skills: React, Docker\n").unwrap();

    let pipeline = AnalysisPipeline::new(FileTextSource::new(), engine(), None, PipelineConfig::default());
    let batch = pipeline.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();
    let profile = ConsolidatedProfile::from_batch(&batch, pipeline.engine().catalog());

    assert_eq!(profile.name, "Jane Doe");
    let names: Vec<&str> = profile.skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "React").count(), 1);
    assert!(names.contains(&"SQL"));
    assert!(names.contains(&"Docker"));

    let path = dir.path().join("consolidated_profile.json");
    profile.save_to_file(&path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["name"], "Jane Doe");
}
