//! Global Constants
//!
//! Centralized constants for analysis, diagram shape and output location.
//! Diagram limits are part of the output contract and are not configurable.

/// Tree walking constants
pub mod scan {
    /// Directory names never descended into (in addition to hidden directories)
    pub const EXCLUDED_DIRS: &[&str] = &["__pycache__", "node_modules", "venv", "env"];

    /// Prefix marking hidden files and directories
    pub const HIDDEN_PREFIX: char = '.';
}

/// Diagram shape constants
pub mod diagram {
    /// Class entries rendered across the whole project
    pub const MAX_CLASS_ENTRIES: usize = 15;

    /// Function names attached to a single class entry
    pub const MAX_MEMBERS_PER_CLASS: usize = 5;

    /// Modules listed in the collaborator's structural summary
    pub const AI_SUMMARY_MODULES: usize = 10;
}

/// Report output constants
pub mod output {
    /// Report location relative to the project root
    pub const REPORT_PATH: &str = "docs/architecture-diagrams.md";

    /// Project-level data directory
    pub const PROJECT_DIR: &str = ".archweave";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Upper bound for the whole AI section, retries included (seconds)
    pub const DEFAULT_SECTION_TIMEOUT_SECS: u64 = 300;

    /// Maximum retries for collaborator requests
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// First backoff delay between retries (milliseconds)
    pub const RETRY_MIN_DELAY_MS: u64 = 1_000;

    /// Longest backoff delay between retries (milliseconds)
    pub const RETRY_MAX_DELAY_MS: u64 = 30_000;
}

/// Chat-completions provider defaults
pub mod llm {
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4.1-mini";

    pub const AZURE_DEFAULT_API_VERSION: &str = "2025-01-01-preview";
    pub const AZURE_DEFAULT_DEPLOYMENT: &str = "gpt-4.1-mini";

    /// Environment variables consulted when the config leaves a value unset
    pub mod env {
        pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
        pub const AZURE_API_KEY: &str = "AZURE_OPENAI_API_KEY";
        pub const AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
        pub const AZURE_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
        pub const AZURE_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
    }
}
