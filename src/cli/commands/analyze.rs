//! Analyze Command
//!
//! Builds the project model only and prints it.
//!
//! Usage:
//!   archweave analyze [--path DIR] [--format text|json]

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::util::CommandContext;
use crate::pipeline::Pipeline;
use crate::types::{BuildStats, ProjectModel, Result};

#[derive(Serialize)]
struct AnalysisReport<'a> {
    root: String,
    stats: &'a BuildStats,
    model: &'a ProjectModel,
}

pub fn run(path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load(path)?;
    let root = ctx.project_root.display().to_string();
    let pipeline = Pipeline::new(ctx.project_root, ctx.config);
    let (model, stats) = pipeline.analyze()?;

    println!("{}", render(&root, &model, &stats, format)?);
    Ok(())
}

/// Text table or pretty JSON for an analyzed project
pub fn render(
    root: &str,
    model: &ProjectModel,
    stats: &BuildStats,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&AnalysisReport {
            root: root.to_string(),
            stats,
            model,
        })?),
        OutputFormat::Text => Ok(render_text(root, model, stats)),
    }
}

fn render_text(root: &str, model: &ProjectModel, stats: &BuildStats) -> String {
    let width = model
        .paths()
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max("Module".len());

    let mut out = format!("Project: {}\n", root);
    out.push_str(&format!(
        "Files: {} discovered, {} analyzed, {} skipped\n\n",
        stats.discovered,
        stats.analyzed,
        stats.skipped.len()
    ));

    out.push_str(&format!(
        "{:<width$}  {:>7}  {:>9}  {:>7}\n",
        "Module",
        "Classes",
        "Functions",
        "Imports",
        width = width
    ));
    for module in model.modules() {
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>9}  {:>7}\n",
            module.path,
            module.classes.len(),
            module.functions.len(),
            module.imports.len(),
            width = width
        ));
    }

    if !stats.skipped.is_empty() {
        out.push_str("\nSkipped:\n");
        for skipped in &stats.skipped {
            out.push_str(&format!("  {}: {}\n", skipped.path, skipped.reason));
        }
    }
    out
}
