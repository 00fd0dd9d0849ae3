//! Diagram fragments: opaque text blocks handed to the report assembler.

use std::fmt;

/// Info string used on fenced diagram blocks
pub const MERMAID_FENCE: &str = "mermaid";

/// A self-contained block of diagram-description text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramFragment(String);

impl DiagramFragment {
    /// Wrap a diagram body in a ```` ```mermaid ```` fenced block
    pub fn mermaid(body: &str) -> Self {
        let mut text = String::with_capacity(body.len() + 16);
        text.push_str("```");
        text.push_str(MERMAID_FENCE);
        text.push('\n');
        text.push_str(body);
        if !body.ends_with('\n') {
            text.push('\n');
        }
        text.push_str("```\n");
        Self(text)
    }

    /// Text used verbatim (collaborator output)
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
