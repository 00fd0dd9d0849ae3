//! Language Parser Module
//!
//! Tree-sitter based parsers that reduce one source file to a [`ModuleSummary`].
//!
//! ## Parser Factory
//!
//! Use `create_parser` to create a parser for a given language:
//!
//! ```rust,ignore
//! use archweave::analyzer::parser::{Language, create_parser};
//!
//! let parser = create_parser(Language::Python)?;
//! let summary = parser.parse("pkg/app.py", content)?;
//! ```
//!
//! [`ModuleSummary`]: crate::types::ModuleSummary

pub mod language;
pub mod python;
pub mod traits;

pub use language::Language;
pub use python::PythonParser;
pub use traits::{
    Parser, create_ts_parser, describe_syntax_error, first_syntax_error, get_node_position,
    get_node_text, walk_preorder,
};

use crate::types::{ArchError, Result};

/// Create a parser for the given language.
pub fn create_parser(language: Language) -> Result<Box<dyn Parser>> {
    match language {
        Language::Python => Ok(Box::new(PythonParser::new()?)),
    }
}

/// Create a parser for the language implied by a file extension
pub fn create_parser_for_extension(extension: &str) -> Result<Box<dyn Parser>> {
    let language = Language::from_extension(extension).ok_or_else(|| {
        ArchError::Config(format!(
            "No parser support for extension '{}'. Supported: py",
            extension
        ))
    })?;
    create_parser(language)
}
