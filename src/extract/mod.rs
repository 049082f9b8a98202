use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::DocumentKind;

pub const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "text"];
pub const PDF_EXTENSION: &str = "pdf";
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"];

#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, path: &Path) -> Result<String>;
    fn supports(&self, path: &Path) -> bool;
    fn name(&self) -> &str;
}

#[derive(Debug, Default, Clone)]
pub struct FileTextSource;

impl FileTextSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextSource for FileTextSource {
    async fn extract_text(&self, path: &Path) -> Result<String> {
        let ext = extension(path);
        let display = path.display().to_string();

        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Extraction {
                    path: display,
                    reason: e.to_string(),
                });
        }

        if ext == PDF_EXTENSION {
            return extract_pdf(path.to_path_buf()).await;
        }

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::UnsupportedFormat(format!(
                "{} (image text recognition is not available)",
                display
            )));
        }

        Err(Error::UnsupportedFormat(display))
    }

    fn supports(&self, path: &Path) -> bool {
        let ext = extension(path);
        TEXT_EXTENSIONS.contains(&ext.as_str()) || (cfg!(feature = "pdf") && ext == PDF_EXTENSION)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(feature = "pdf")]
async fn extract_pdf(path: PathBuf) -> Result<String> {
    let display = path.display().to_string();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
        .await
        .map_err(|e| Error::Extraction {
            path: display.clone(),
            reason: e.to_string(),
        })?;

    result.map_err(|e| Error::Extraction {
        path: display,
        reason: e.to_string(),
    })
}

#[cfg(not(feature = "pdf"))]
async fn extract_pdf(path: PathBuf) -> Result<String> {
    Err(Error::UnsupportedFormat(format!(
        "{} (built without the pdf feature)",
        path.display()
    )))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

pub fn classify(path: &Path) -> DocumentKind {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let cv_token = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "cv");

    if name.contains("resume") || cv_token {
        DocumentKind::Resume
    } else if name.contains("certif") {
        DocumentKind::Certification
    } else {
        DocumentKind::Unclassified
    }
}

pub async fn discover(inputs: &[PathBuf], source: &dyn TextSource) -> Result<Vec<PathBuf>> {
    let mut pending: Vec<PathBuf> = inputs.to_vec();
    let mut found = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(path) = pending.pop() {
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if metadata.is_dir() {
            let real = tokio::fs::canonicalize(&path).await?;
            if !visited.insert(real) {
                debug!("Skipping already visited directory {}", path.display());
                continue;
            }
            let mut entries = tokio::fs::read_dir(&path).await?;
            while let Some(entry) = entries.next_entry().await? {
                pending.push(entry.path());
            }
        } else if source.supports(&path) {
            debug!("Discovered {}", path.display());
            found.push(path);
        } else if IMAGE_EXTENSIONS.contains(&extension(&path).as_str()) {
            warn!("Skipping {}: image text recognition is not available", path.display());
        } else {
            debug!("Ignoring unsupported file {}", path.display());
        }
    }

    found.sort();
    found.dedup();

    if found.is_empty() {
        let listed: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
        return Err(Error::NoInputFiles(listed.join(", ")));
    }

    Ok(found)
}
