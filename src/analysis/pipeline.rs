use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};

use crate::analysis::engine::SkillEngine;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract::{classify, discover, TextSource};
use crate::models::{BatchReport, CertificationSet, DocumentKind, DocumentReport};
use crate::storage::Storage;

pub struct AnalysisPipeline {
    source: Arc<dyn TextSource>,
    engine: Arc<SkillEngine>,
    storage: Option<Storage>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(
        source: impl TextSource + 'static,
        engine: SkillEngine,
        storage: Option<Storage>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            engine: Arc::new(engine),
            storage,
            config,
        }
    }

    pub fn engine(&self) -> &SkillEngine {
        &self.engine
    }

    pub async fn analyze_paths(&self, inputs: &[PathBuf]) -> Result<BatchReport> {
        // Step 1: Discover and classify input documents
        let files = discover(inputs, self.source.as_ref()).await?;
        let (certificates, others): (Vec<PathBuf>, Vec<PathBuf>) = files
            .into_iter()
            .partition(|p| classify(p) == DocumentKind::Certification);

        let documents: Vec<(PathBuf, DocumentKind)> = others
            .into_iter()
            .map(|p| {
                let kind = classify(&p);
                (p, kind)
            })
            .filter(|(p, kind)| {
                let keep = *kind == DocumentKind::Resume || self.config.include_unclassified;
                if !keep {
                    tracing::info!("Skipping unclassified document {}", p.display());
                }
                keep
            })
            .collect();

        tracing::info!(
            "Found {} certificate documents and {} documents to analyze",
            certificates.len(),
            documents.len()
        );

        // Step 2: Phase one, certifications
        let certifications = self.collect_certifications(&certificates).await?;
        tracing::info!(
            "Collected {} certifications from {} documents",
            certifications.certifications.len(),
            certifications.documents.len()
        );

        // Step 3: Phase two, resumes and other documents
        let reports = self.analyze_documents(&documents, &certifications).await?;

        Ok(BatchReport {
            documents: reports,
            certifications: certifications.certifications,
            processed_at: Utc::now(),
        })
    }

    async fn collect_certifications(&self, paths: &[PathBuf]) -> Result<CertificationSet> {
        let pb = progress_bar(paths.len(), "certificates");
        let mut set = CertificationSet::new();

        for path in paths {
            let file = path.display().to_string();
            match self.read(path).await? {
                Some(text) if !text.trim().is_empty() => {
                    let (document, certs) = self.engine.analyze_certificate(&file, &text);
                    set.add_document(document, certs);
                }
                Some(_) => tracing::warn!("No text extracted from certificate {}", file),
                None => {}
            }
            pb.inc(1);
        }

        pb.finish_with_message("Certificates processed");
        Ok(set)
    }

    async fn analyze_documents(
        &self,
        documents: &[(PathBuf, DocumentKind)],
        certifications: &CertificationSet,
    ) -> Result<Vec<DocumentReport>> {
        let pb = progress_bar(documents.len(), "documents");
        let mut reports = Vec::new();

        for (path, kind) in documents {
            let file = path.display().to_string();
            let text = self.read(path).await?;

            let report = match text {
                Some(text) => self.analyze_text(&file, *kind, &text, certifications)?,
                None => DocumentReport::empty(file.as_str(), *kind, certifications.names()),
            };

            reports.push(report);
            pb.inc(1);
        }

        pb.finish_with_message("Documents analyzed");
        Ok(reports)
    }

    fn analyze_text(
        &self,
        file: &str,
        kind: DocumentKind,
        text: &str,
        certifications: &CertificationSet,
    ) -> Result<DocumentReport> {
        let fingerprint = content_hash(&format!("{}\n{}", certifications.names().join("\n"), text));

        if self.config.use_cached {
            if let Some(storage) = &self.storage {
                if let Some(report) = storage.cached_report(file, &fingerprint)? {
                    tracing::info!("Using cached result for {} from {}", file, report.processed_at);
                    return Ok(report);
                }
            }
        }

        let report = self.engine.analyze_document(file, kind, text, certifications);

        if let Some(storage) = &self.storage {
            storage.save_report(&report, &fingerprint)?;
        }

        Ok(report)
    }

    async fn read(&self, path: &Path) -> Result<Option<String>> {
        match self.source.extract_text(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Skipping {} ({}): {}", path.display(), self.source.name(), e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn progress_bar(len: usize, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
        unit
    );
    match ProgressStyle::default_bar().template(&template) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => tracing::debug!("Progress template rejected: {}", e),
    }
    pb
}

pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extract::FileTextSource;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MemorySource {
        files: HashMap<PathBuf, String>,
    }

    #[async_trait]
    impl TextSource for MemorySource {
        async fn extract_text(&self, path: &Path) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| Error::Extraction {
                path: path.display().to_string(),
                reason: "not found".to_string(),
            })
        }

        fn supports(&self, _path: &Path) -> bool {
            true
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    fn pipeline(source: impl TextSource + 'static, storage: Option<Storage>, config: PipelineConfig) -> AnalysisPipeline {
        AnalysisPipeline::new(source, SkillEngine::builtin().unwrap(), storage, config)
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash("Skills: Rust"), content_hash("Skills: Rust"));
        assert_ne!(content_hash("Skills: Rust"), content_hash("Skills: Go"));
        assert_eq!(content_hash("").len(), 64);
        assert_eq!(
            content_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_certificates_are_processed_before_resumes() {
        let dir = tempfile::tempdir().unwrap();
        // Sorted discovery puts the resume first; the phases must still run
        // certificates first.
        std::fs::write(dir.path().join("a_resume.txt"), "Skills: Python, SQL\nBuilt data pipelines using Python.").unwrap();
        std::fs::write(dir.path().join("python_certificate.txt"), "Python Certificate\nPython programming fundamentals").unwrap();

        let p = pipeline(FileTextSource::new(), None, PipelineConfig::default());
        let batch = p.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();

        assert_eq!(batch.documents.len(), 1);
        let report = &batch.documents[0];
        assert_eq!(report.kind, DocumentKind::Resume);
        assert!(report.skill("Python").unwrap().is_backed);
        assert!(!report.skill("SQL").unwrap().is_backed);
        assert!(report.certifications.iter().any(|c| c == "Python Certificate"));
    }

    #[tokio::test]
    async fn test_unclassified_documents_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "Skills: Docker").unwrap();
        std::fs::write(dir.path().join("resume.txt"), "Skills: Docker").unwrap();

        let config = PipelineConfig {
            include_unclassified: false,
            ..PipelineConfig::default()
        };
        let batch = pipeline(FileTextSource::new(), None, config)
            .analyze_paths(&[dir.path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(batch.documents.len(), 1);

        let batch = pipeline(FileTextSource::new(), None, PipelineConfig::default())
            .analyze_paths(&[dir.path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(batch.documents.len(), 2);
        assert!(batch.documents.iter().any(|d| d.kind == DocumentKind::Unclassified));
    }

    #[tokio::test]
    async fn test_failed_extraction_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "placeholder").unwrap();

        // The memory source has no entry for the discovered file.
        let source = MemorySource { files: HashMap::new() };
        let batch = pipeline(source, None, PipelineConfig::default())
            .analyze_paths(&[path])
            .await
            .unwrap();
        assert_eq!(batch.documents.len(), 1);
        assert!(batch.documents[0].skills.is_empty());
    }

    #[tokio::test]
    async fn test_no_input_files_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline(FileTextSource::new(), None, PipelineConfig::default())
            .analyze_paths(&[dir.path().to_path_buf()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoInputFiles(_)));
    }

    #[tokio::test]
    async fn test_results_are_stored_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Technical Skills: Rust, Go, Docker").unwrap();

        let config = PipelineConfig {
            use_cached: true,
            ..PipelineConfig::default()
        };
        let p = pipeline(FileTextSource::new(), Some(Storage::in_memory().unwrap()), config);

        let first = p.analyze_paths(&[path.clone()]).await.unwrap();
        let second = p.analyze_paths(&[path.clone()]).await.unwrap();
        assert_eq!(first.documents[0].skills, second.documents[0].skills);
        assert_eq!(first.documents[0].processed_at, second.documents[0].processed_at);
    }
}
