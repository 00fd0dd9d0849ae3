//! Config Command
//!
//! Manage archweave configuration.
//!
//! Usage:
//!   archweave config show [--path DIR] [-f toml|json]
//!   archweave config path [--path DIR]
//!   archweave config init [--path DIR] [--force]

use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, resolve_root};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(path: Option<PathBuf>, format: ConfigFormat) -> Result<()> {
    let ctx = CommandContext::load(path)?;
    let rendered = ConfigLoader::render_config(&ctx.config, format == ConfigFormat::Json)?;
    println!("{}", rendered);
    Ok(())
}

/// Show configuration file locations
pub fn path(path: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(path)?;
    ConfigLoader::show_path(&root);
    Ok(())
}

/// Write a default project configuration
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let root = resolve_root(path)?;
    let existed = ConfigLoader::project_config_path(&root).exists();
    let config_path = ConfigLoader::init_project(&root, force)?;

    let out = Output::new();
    if existed && !force {
        out.warning(&format!(
            "Config already exists: {} (use --force to overwrite)",
            config_path.display()
        ));
    } else {
        out.success("Initialized project configuration");
        out.field("Config", config_path.display());
    }
    Ok(())
}
