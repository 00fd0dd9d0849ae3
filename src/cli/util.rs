//! CLI Common Utilities
//!
//! Shared project-root resolution and config loading for CLI commands.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigLoader};
use crate::types::{ArchError, Result};

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root directory
    pub project_root: PathBuf,
    /// Effective configuration for the project root
    pub config: Config,
}

impl CommandContext {
    /// Resolve the root (`--path` or the current directory) and load its config
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let project_root = resolve_root(path)?;
        let config = ConfigLoader::load(&project_root)?;
        Ok(Self {
            project_root,
            config,
        })
    }
}

/// Project root for a command, validated to be an existing directory
pub fn resolve_root(path: Option<PathBuf>) -> Result<PathBuf> {
    let root = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    require_directory(&root)?;
    Ok(root)
}

fn require_directory(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ArchError::Config(format!(
            "Project root is not a directory: {}",
            root.display()
        )))
    }
}
