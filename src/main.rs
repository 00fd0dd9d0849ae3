use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archweave::cli::{ConfigFormat, OutputFormat};

#[derive(Parser)]
#[command(name = "archweave")]
#[command(
    version,
    about = "Architecture and flow diagram generator for Python projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, short, global = true, help = "Only log errors")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the project and write docs/architecture-diagrams.md
    Generate {
        #[arg(long, help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long = "no-ai", help = "Skip the AI-generated architecture section")]
        no_ai: bool,
    },

    /// Build the project model and print per-module counts
    Analyze {
        #[arg(long, help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(short = 'f', long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Show configuration file paths
    Path {
        #[arg(long, help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
    },
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31marchweave encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate { path, no_ai } => {
            let rt = Runtime::new()?;
            rt.block_on(archweave::cli::commands::generate::run(path, no_ai))?;
        }
        Commands::Analyze { path, format } => {
            archweave::cli::commands::analyze::run(path, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { path, format } => {
                archweave::cli::commands::config::show(path, format)?;
            }
            ConfigAction::Path { path } => {
                archweave::cli::commands::config::path(path)?;
            }
            ConfigAction::Init { path, force } => {
                archweave::cli::commands::config::init(path, force)?;
            }
        },
    }

    Ok(())
}
