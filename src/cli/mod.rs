pub mod commands;
pub mod ui;
pub mod util;

pub use util::{CommandContext, resolve_root};

use clap::ValueEnum;

/// Output format for `analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output format for `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}
