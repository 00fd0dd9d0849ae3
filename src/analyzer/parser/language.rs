//! Language Detection
//!
//! Maps file extensions to the grammars the analyzer can parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
}

impl Language {
    /// File extensions handled by this language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
        }
    }

    /// Separator used between module name segments in import statements
    pub fn module_separator(&self) -> char {
        match self {
            Language::Python => '.',
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        [Language::Python]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            _ => Err(format!("Unsupported language: {}. Valid values: python", s)),
        }
    }
}
