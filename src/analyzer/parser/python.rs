use super::{
    Language, Parser, create_ts_parser, describe_syntax_error, first_syntax_error,
    get_node_position, get_node_text, walk_preorder,
};
use crate::types::{ArchError, ModuleSummary, Result};

/// Module reported for `from __future__ import ...`
const FUTURE_MODULE: &str = "__future__";

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl Parser for PythonParser {
    fn parse(&self, path: &str, content: &str) -> Result<ModuleSummary> {
        let mut parser =
            create_ts_parser(tree_sitter_python::LANGUAGE, "Python").map_err(|mut e| {
                if let ArchError::Parse {
                    path: ref mut p, ..
                } = e
                {
                    *p = path.to_string();
                }
                e
            })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ArchError::parse(path, "Failed to parse Python file"))?;

        let root = tree.root_node();
        if let Some(node) = first_syntax_error(root) {
            return Err(ArchError::parse(path, describe_syntax_error(node)));
        }
        if let Some(message) = first_rejected_construct(root) {
            return Err(ArchError::parse(path, message));
        }

        let source = content.as_bytes();
        let mut summary = ModuleSummary::new(path);

        walk_preorder(root, |node| match node.kind() {
            "import_statement" => extract_import_names(node, source, &mut summary.imports),
            "import_from_statement" => {
                if let Some(module) = from_import_module(node, source) {
                    summary.imports.push(module);
                }
            }
            "future_import_statement" => summary.imports.push(FUTURE_MODULE.to_string()),
            "class_definition" => {
                if let Some(name) = declared_name(node, source) {
                    summary.classes.push(name);
                }
            }
            // Methods and nested functions count; `async def` does not
            "function_definition" if !is_async(node) => {
                if let Some(name) = declared_name(node, source) {
                    summary.functions.push(name);
                }
            }
            _ => {}
        });

        Ok(summary)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

/// Constructs the grammar recovers from but Python 3 rejects.
///
/// Covers Python 2 `print`/`exec` statements, `except E, e:` and blocks
/// that are not indented past their header.
fn first_rejected_construct(root: tree_sitter::Node) -> Option<String> {
    let mut found = None;
    walk_preorder(root, |node| {
        if found.is_some() {
            return;
        }
        let problem = match node.kind() {
            "print_statement" => Some("Python 2 print statement"),
            "exec_statement" => Some("Python 2 exec statement"),
            "except_clause" if has_comma_alias(node) => Some("Python 2 'except E, e' clause"),
            "block" if !is_indented_block(node) => Some("expected an indented block"),
            _ => None,
        };
        if let Some(problem) = problem {
            let (line, column) = get_node_position(node);
            found = Some(format!("{} at line {}, column {}", problem, line, column));
        }
    });
    found
}

/// `except E, e:` puts the comma directly under the clause; `except (A, B):` does not
fn has_comma_alias(node: tree_sitter::Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == ",");
    found
}

/// A block on a later line than its header must start right of the header.
/// Empty blocks are rejected; same-line suites (`def f(): pass`) are fine.
fn is_indented_block(block: tree_sitter::Node) -> bool {
    let Some(header) = block.parent() else {
        return true;
    };
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    let Some(first) = first else {
        return false;
    };

    let body = first.start_position();
    let head = header.start_position();
    body.row == head.row || body.column > head.column
}

fn is_async(node: tree_sitter::Node) -> bool {
    node.child(0).is_some_and(|child| child.kind() == "async")
}

/// `import a, b.c as d` contributes `a` and `b.c`
fn extract_import_names(node: tree_sitter::Node, source: &[u8], imports: &mut Vec<String>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let dotted = match name.kind() {
            "aliased_import" => name.child_by_field_name("name"),
            "dotted_name" => Some(name),
            _ => None,
        };
        if let Some(dotted) = dotted {
            let text = module_text(dotted, source);
            if !text.is_empty() {
                imports.push(text);
            }
        }
    }
}

/// Source module of `from m import x`.
///
/// `from .m import x` yields `m`; `from . import x` has no module name and yields nothing.
fn from_import_module(node: tree_sitter::Node, source: &[u8]) -> Option<String> {
    let module = node.child_by_field_name("module_name")?;
    let dotted = match module.kind() {
        "dotted_name" => module,
        "relative_import" => {
            let mut cursor = module.walk();
            let found = module
                .named_children(&mut cursor)
                .find(|child| child.kind() == "dotted_name");
            found?
        }
        _ => return None,
    };

    let text = module_text(dotted, source);
    (!text.is_empty()).then_some(text)
}

fn declared_name(node: tree_sitter::Node, source: &[u8]) -> Option<String> {
    let name = node.child_by_field_name("name")?;
    let text = get_node_text(name, source);
    (!text.is_empty()).then(|| text.to_string())
}

/// Dotted name with any interior whitespace removed (`a . b` -> `a.b`)
fn module_text(node: tree_sitter::Node, source: &[u8]) -> String {
    get_node_text(node, source).split_whitespace().collect()
}
