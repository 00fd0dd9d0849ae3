//! archweave - Architecture & Flow Diagram Generator
//!
//! Walks a Python project, summarizes every module with tree-sitter and
//! renders a markdown document of Mermaid diagrams: a module dependency
//! graph, a class diagram, illustrative sequence and flow templates, and
//! an optional AI-generated architecture diagram.
//!
//! ## Quick Start
//!
//! ```ignore
//! use archweave::{ConfigLoader, Pipeline, ai::resolve_provider};
//!
//! let config = ConfigLoader::load(&project_root)?;
//! let provider = resolve_provider(&config.llm);
//! let pipeline = Pipeline::new(&project_root, config);
//! let (run, path) = pipeline.generate(provider).await?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: tree walking, tree-sitter parsing, model building
//! - [`diagram`]: Mermaid synthesizers and a lenient validator
//! - [`report`]: document assembly and output
//! - [`ai`]: optional chat-completions collaborator
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod pipeline;
pub mod report;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use pipeline::{Pipeline, PipelineRun};
pub use types::error::{ArchError, ErrorCategory, Result};
pub use types::{BuildStats, DiagramFragment, ModuleSummary, ProjectModel};

// =============================================================================
// Component Re-exports
// =============================================================================

pub use ai::{AiSection, LlmProvider, LlmResponse, SharedProvider};
pub use analyzer::{
    ProjectModelBuilder,
    parser::{Language, Parser, PythonParser},
    scanner::FileScanner,
};
pub use diagram::{DiagramSet, DiagramSynthesizer, MermaidValidator};
pub use report::{ReportAssembler, ReportInput};
