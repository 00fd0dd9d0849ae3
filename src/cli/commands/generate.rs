//! Generate Command
//!
//! Runs the full pipeline and writes the architecture document.
//!
//! Usage:
//!   archweave generate [--path DIR] [--no-ai]

use std::path::PathBuf;

use crate::ai::resolve_provider;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::Pipeline;
use crate::types::Result;

pub async fn run(path: Option<PathBuf>, no_ai: bool) -> Result<()> {
    let mut ctx = CommandContext::load(path)?;
    if no_ai {
        ctx.config.llm.enabled = false;
    }

    let out = Output::new();
    out.info(&format!(
        "Analyzing {}",
        ctx.project_root.display()
    ));

    let provider = resolve_provider(&ctx.config.llm);
    let ai_requested = ctx.config.llm.enabled;
    let pipeline = Pipeline::new(ctx.project_root, ctx.config);
    let (run, output_path) = pipeline.generate(provider).await?;

    out.header("Architecture diagrams generated");
    out.field("Modules", run.model.len());
    out.field("Discovered", run.stats.discovered);
    out.field("Skipped", run.stats.skipped.len());
    out.field(
        "AI section",
        if run.ai.is_empty() { "empty" } else { "included" },
    );
    out.field("Output", output_path.display());

    for skipped in &run.stats.skipped {
        out.warning(&format!("Skipped {}: {}", skipped.path, skipped.reason));
    }
    if ai_requested && run.ai.is_empty() {
        out.warning("AI-generated section is empty; see the log for the cause");
    }

    out.success(&format!("Wrote {}", output_path.display()));
    Ok(())
}
