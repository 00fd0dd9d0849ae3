pub mod error;
pub mod fragment;
pub mod model;

pub use error::{ArchError, CollaboratorError, ErrorCategory, ErrorClassifier, Result};
pub use fragment::{DiagramFragment, MERMAID_FENCE};
pub use model::{BuildStats, ModuleSummary, ProjectModel, SkippedFile};
