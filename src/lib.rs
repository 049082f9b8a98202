pub mod config;
pub mod error;
pub mod models;
pub mod text;
pub mod taxonomy;
pub mod extract;
pub mod analysis;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use extract::{FileTextSource, TextSource};
pub use analysis::{AnalysisPipeline, SkillEngine};
pub use storage::Storage;
