//! Import Resolution
//!
//! Maps an import string onto another module of the same project.

use std::path::Path;

use crate::analyzer::parser::Language;
use crate::types::{ModuleSummary, ProjectModel};

/// Finds the module an import refers to, if it belongs to the project
pub trait ImportResolver: Send + Sync {
    fn resolve<'m>(
        &self,
        source: &ModuleSummary,
        import: &str,
        model: &'m ProjectModel,
    ) -> Option<&'m ModuleSummary>;
}

/// Scans the other modules in model order and takes the first one whose
/// path contains the import string, or whose dotted module path equals it.
///
/// Substring matching can pick an unrelated file (`os` matches
/// `pkg/cosmos.py`); the first candidate in path order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatchResolver;

impl ImportResolver for FirstMatchResolver {
    fn resolve<'m>(
        &self,
        source: &ModuleSummary,
        import: &str,
        model: &'m ProjectModel,
    ) -> Option<&'m ModuleSummary> {
        if import.is_empty() {
            return None;
        }

        model
            .modules()
            .filter(|candidate| candidate.path != source.path)
            .find(|candidate| {
                candidate.path.contains(import) || dotted_module_path(&candidate.path) == import
            })
    }
}

/// Dotted module path of a file: `pkg/sub/util.py` -> `pkg.sub.util`
pub fn dotted_module_path(path: &str) -> String {
    let without_ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| path.strip_suffix(ext))
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(path);

    let separator = Language::Python.module_separator().to_string();
    without_ext.replace('/', &separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(entries: &[&str]) -> ProjectModel {
        entries.iter().map(|p| ModuleSummary::new(*p)).collect()
    }

    fn resolve<'m>(model: &'m ProjectModel, source: &str, import: &str) -> Option<&'m str> {
        let source = model.get(source).unwrap();
        FirstMatchResolver
            .resolve(source, import, model)
            .map(|m| m.path.as_str())
    }

    #[test]
    fn test_dotted_module_path() {
        assert_eq!(dotted_module_path("pkg/util.py"), "pkg.util");
        assert_eq!(dotted_module_path("a.py"), "a");
        assert_eq!(dotted_module_path("pkg/sub/mod.py"), "pkg.sub.mod");
        // Only the extension is stripped
        assert_eq!(dotted_module_path("pkg/copy.python.py"), "pkg.copy.python");
        assert_eq!(dotted_module_path("noext"), "noext");
    }

    #[test]
    fn test_dotted_path_match() {
        let model = model(&["pkg/main.py", "pkg/util.py"]);
        assert_eq!(resolve(&model, "pkg/main.py", "pkg.util"), Some("pkg/util.py"));
    }

    #[test]
    fn test_substring_match() {
        let model = model(&["a.py", "b.py"]);
        assert_eq!(resolve(&model, "a.py", "b"), Some("b.py"));
    }

    #[test]
    fn test_first_match_in_model_order_wins() {
        let model = model(&["app.py", "lib/b_one.py", "lib/b_two.py"]);
        assert_eq!(resolve(&model, "app.py", "b_"), Some("lib/b_one.py"));
    }

    #[test]
    fn test_source_is_never_a_candidate() {
        let model = model(&["util.py"]);
        assert_eq!(resolve(&model, "util.py", "util"), None);
    }

    #[test]
    fn test_external_import_unresolved() {
        let model = model(&["a.py", "b.py"]);
        assert_eq!(resolve(&model, "a.py", "requests"), None);
        assert_eq!(resolve(&model, "a.py", ""), None);
    }

    #[test]
    fn test_substring_heuristic_can_overmatch() {
        let model = model(&["main.py", "pkg/cosmos.py"]);
        assert_eq!(resolve(&model, "main.py", "os"), Some("pkg/cosmos.py"));
    }
}
