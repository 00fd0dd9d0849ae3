use crate::types::{ArchError, ModuleSummary, Result};

/// Parses the text of one file into its structural summary.
///
/// Implementations are pure: no filesystem access, no dependency on other files.
pub trait Parser: Send + Sync {
    fn parse(&self, path: &str, content: &str) -> Result<ModuleSummary>;
    fn language(&self) -> super::Language;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based line and column of a node's start
pub fn get_node_position(node: tree_sitter::Node) -> (usize, usize) {
    let start = node.start_position();
    (start.row + 1, start.column + 1)
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| ArchError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Visit every node in document (pre-order, depth-first) order.
pub fn walk_preorder<'tree, F>(root: tree_sitter::Node<'tree>, mut visit: F)
where
    F: FnMut(tree_sitter::Node<'tree>),
{
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// First `ERROR` or `MISSING` node in document order, if the tree has one.
pub fn first_syntax_error(root: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if !root.has_error() {
        return None;
    }

    let mut found = None;
    walk_preorder(root, |node| {
        if found.is_none() && (node.is_error() || node.is_missing()) {
            found = Some(node);
        }
    });
    found.or(Some(root))
}

/// Turn a syntax error node into a readable message
pub fn describe_syntax_error(node: tree_sitter::Node) -> String {
    let (line, column) = get_node_position(node);
    if node.is_missing() {
        format!("missing '{}' at line {}, column {}", node.kind(), line, column)
    } else {
        format!("invalid syntax at line {}, column {}", line, column)
    }
}
