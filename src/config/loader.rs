//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<platform config dir>/archweave/config.toml)
//! 3. Project config (<project>/.archweave/config.toml)
//! 4. Environment variables (ARCHWEAVE_* prefix, nested keys split on `__`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use super::types::Config;
use crate::constants::output::PROJECT_DIR;
use crate::types::{ArchError, Result};

/// Environment variable prefix (e.g. ARCHWEAVE_LLM__MODEL -> llm.model)
pub const ENV_PREFIX: &str = "ARCHWEAVE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project root with the full resolution chain:
    /// defaults → global → project → env vars
    pub fn load(project_root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path(project_root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ArchError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ArchError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory, if the platform has one
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "archweave").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_dir(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR)
    }

    pub fn project_config_path(project_root: &Path) -> PathBuf {
        Self::project_dir(project_root).join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Print config file locations
    pub fn show_path(project_root: &Path) {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path(project_root);
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration
    pub fn render_config(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| ArchError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project config. Existing files are kept unless `force`.
    pub fn init_project(project_root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir(project_root);
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        } else {
            info!("Project config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# archweave project configuration
# Values here override the global config; ARCHWEAVE_* env vars override both.

version = "1.0"

[analysis]
extension = "py"
# Extra directory names to skip. Hidden dirs, __pycache__, node_modules,
# venv and env are always skipped.
exclude_dirs = []
# Glob patterns over project-relative paths
exclude = []
respect_gitignore = false

# AI-generated architecture section. Credentials fall back to
# AZURE_OPENAI_API_KEY / AZURE_OPENAI_ENDPOINT / AZURE_OPENAI_API_VERSION /
# AZURE_OPENAI_DEPLOYMENT (azure-openai) or OPENAI_API_KEY (openai).
[llm]
enabled = true
provider = "azure-openai"
temperature = 0.0
timeout_secs = 120
"#
        .to_string()
    }
}
