use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skillproof::analysis::{update_certifications_catalog, update_skills_catalog};
use skillproof::models::{BatchReport, ConsolidatedProfile, DocumentReport, ProficiencyLevel, SkillResult};
use skillproof::{AnalysisPipeline, Config, FileTextSource, PipelineConfig, SkillEngine, Storage};

#[derive(Parser, Debug)]
#[command(name = "skillproof")]
#[command(version = "0.1.0")]
#[command(about = "Extract skills from resumes, link them to certifications and score proficiency")]
struct Args {
    /// Resume and certificate files, or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Custom skills catalog JSON
    #[arg(long)]
    skills_db: Option<PathBuf>,

    /// Custom certifications catalog JSON
    #[arg(long)]
    certs_db: Option<PathBuf>,

    /// Custom proficiency rule table JSON
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Database path for storing results
    #[arg(long)]
    database: Option<String>,

    /// Do not store results
    #[arg(long)]
    no_store: bool,

    /// Reuse stored results for unchanged documents
    #[arg(long)]
    cached: bool,

    /// Skip files that are neither resumes nor certificates
    #[arg(long)]
    exclude_unclassified: bool,

    /// Write a consolidated profile across all resumes to this JSON file
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Add high-confidence findings back into the custom catalogs
    #[arg(long)]
    update_db: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("skillproof=info".parse()?))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, flags take precedence
    let mut config = Config::from_env()?;
    if args.skills_db.is_some() {
        config.skills_catalog_path = args.skills_db.clone();
    }
    if args.certs_db.is_some() {
        config.certifications_catalog_path = args.certs_db.clone();
    }
    if args.rules.is_some() {
        config.rules_path = args.rules.clone();
    }
    if let Some(ref database) = args.database {
        config.database_path = database.clone();
    }

    let storage = if args.no_store {
        None
    } else {
        Some(Storage::new(&config.database_path)?)
    };

    let mut pipeline_config = PipelineConfig::from(&config);
    pipeline_config.use_cached = args.cached;
    if args.exclude_unclassified {
        pipeline_config.include_unclassified = false;
    }

    let engine = SkillEngine::from_config(&config)?;
    let pipeline = AnalysisPipeline::new(FileTextSource::new(), engine, storage, pipeline_config);

    tracing::info!("Analyzing {} input path(s)", args.inputs.len());
    let batch = pipeline.analyze_paths(&args.inputs).await?;

    output_batch(&batch, &args)?;

    if let Some(ref path) = args.profile {
        let profile = ConsolidatedProfile::from_batch(&batch, pipeline.engine().catalog());
        profile.save_to_file(path)?;
        tracing::info!("Saved consolidated profile for {} to {}", profile.name, path.display());
    }

    if args.update_db {
        update_catalogs(&batch, &config);
    }

    Ok(())
}

fn update_catalogs(batch: &BatchReport, config: &Config) {
    match config.skills_catalog_path {
        Some(ref path) => {
            if let Err(e) = update_skills_catalog(path, batch) {
                tracing::error!("Error updating skill catalog {}: {}", path.display(), e);
            }
        }
        None => tracing::warn!("No custom skill catalog to update; pass --skills-db"),
    }

    match config.certifications_catalog_path {
        Some(ref path) => {
            if let Err(e) = update_certifications_catalog(path, batch) {
                tracing::error!("Error updating certification catalog {}: {}", path.display(), e);
            }
        }
        None => tracing::warn!("No custom certification catalog to update; pass --certs-db"),
    }
}

fn output_batch(batch: &BatchReport, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(batch)?,
        "markdown" => batch
            .documents
            .iter()
            .map(format_markdown)
            .collect::<Vec<_>>()
            .join("\n---\n\n"),
        _ => batch
            .documents
            .iter()
            .map(format_text)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn backed_percent(report: &DocumentReport) -> f32 {
    if report.skills.is_empty() {
        0.0
    } else {
        report.backed_count() as f32 / report.skills.len() as f32 * 100.0
    }
}

fn format_text(report: &DocumentReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Skills Analysis: {} ===\n\n", report.file));
    output.push_str(&format!("Document type: {}\n", report.kind));
    if let Some(ref industry) = report.industry {
        output.push_str(&format!("Industry: {}\n", industry));
    }
    output.push_str(&format!(
        "Skills: {} ({} backed by certifications)\n",
        report.skills.len(),
        report.backed_count()
    ));

    if !report.certifications.is_empty() {
        output.push_str(&format!("Certifications: {}\n", report.certifications.join(", ")));
    }

    output.push('\n');
    for skill in &report.skills {
        let backing = if skill.is_backed { " [backed]" } else { "" };
        output.push_str(&format!(
            "  - {} ({}): {} (confidence: {:.0}%){}\n",
            skill.name,
            skill.category,
            skill.proficiency,
            skill.confidence * 100.0,
            backing
        ));
    }

    output.push_str(&format!(
        "\nAnalyzed on: {}\n",
        report.processed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(report: &DocumentReport) -> String {
    let mut output = String::new();

    output.push_str("# Skills Summary\n\n");
    output.push_str(&format!("**Resume:** {}\n\n", report.file));
    if let Some(ref industry) = report.industry {
        output.push_str(&format!("**Industry:** {}\n\n", industry));
    }

    output.push_str("## Certifications\n\n");
    if report.certifications.is_empty() {
        output.push_str("None found.\n");
    } else {
        for cert in &report.certifications {
            output.push_str(&format!("- {}\n", cert));
        }
    }

    output.push_str("\n## Skills Overview\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Total Skills | {} |\n", report.skills.len()));
    output.push_str(&format!(
        "| Backed by Certification | {} ({:.0}%) |\n",
        report.backed_count(),
        backed_percent(report)
    ));

    for level in ProficiencyLevel::ALL.iter().rev() {
        let skills = report.skills_at(*level);
        if skills.is_empty() {
            continue;
        }

        output.push_str(&format!("\n## {} ({})\n\n", level, level.description()));

        let (technical, soft): (Vec<&SkillResult>, Vec<&SkillResult>) =
            skills.into_iter().partition(|s| s.is_technical);

        for (title, group) in [("Technical", technical), ("Soft / Other", soft)] {
            if group.is_empty() {
                continue;
            }
            output.push_str(&format!("### {}\n\n", title));
            for skill in group {
                let marker = if skill.is_backed { "[X]" } else { "[ ]" };
                output.push_str(&format!(
                    "- {} **{}** ({:.0}%)",
                    marker,
                    skill.name,
                    skill.confidence * 100.0
                ));
                if let Some(ref cert) = skill.backing_certificate {
                    output.push_str(&format!(" via *{}*", cert));
                }
                output.push('\n');
                for indicator in &skill.indicators {
                    output.push_str(&format!("  - {}\n", indicator));
                }
            }
            output.push('\n');
        }
    }

    output.push_str("## Legend\n\n");
    output.push_str("- [X] Backed by a certification\n");
    output.push_str("- [ ] Not backed by a certification\n");
    output.push_str("- Percentages are confidence scores\n");

    output.push_str(&format!(
        "\n---\n*Analyzed on {}*\n",
        report.processed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
