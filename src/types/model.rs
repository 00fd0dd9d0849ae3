//! Project Model
//!
//! Structural summaries of analyzed files and the path-keyed model that
//! every diagram synthesizer reads.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Structural summary of one source file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// Relative, `/`-separated path (unique within a model)
    pub path: String,
    /// Import targets as written, in source order
    pub imports: Vec<String>,
    /// Declared class names, document order, nested included
    pub classes: Vec<String>,
    /// Declared function names, document order, nested included
    pub functions: Vec<String>,
}

impl ModuleSummary {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Directory portion of the path, `None` for files at the project root
    pub fn directory(&self) -> Option<&str> {
        self.path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.path)
    }
}

/// Path-keyed collection of every successfully analyzed module.
///
/// Iterates in ascending path order. Only [`crate::analyzer::ProjectModelBuilder`]
/// inserts entries; once built the model is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProjectModel {
    modules: BTreeMap<String, ModuleSummary>,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a summary. Returns `false` (and keeps the first entry) if the path exists.
    pub(crate) fn insert(&mut self, summary: ModuleSummary) -> bool {
        if self.modules.contains_key(&summary.path) {
            return false;
        }
        self.modules.insert(summary.path.clone(), summary);
        true
    }

    pub fn get(&self, path: &str) -> Option<&ModuleSummary> {
        self.modules.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in model order (ascending path)
    pub fn modules(&self) -> impl Iterator<Item = &ModuleSummary> {
        self.modules.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl FromIterator<ModuleSummary> for ProjectModel {
    fn from_iter<I: IntoIterator<Item = ModuleSummary>>(iter: I) -> Self {
        let mut model = ProjectModel::new();
        for summary in iter {
            model.insert(summary);
        }
        model
    }
}

/// A file the builder discovered but could not analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Per-run counters reported by the model builder
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    pub discovered: usize,
    pub analyzed: usize,
    pub skipped: Vec<SkippedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_and_stem() {
        let root = ModuleSummary::new("main.py");
        assert_eq!(root.directory(), None);
        assert_eq!(root.stem(), "main");

        let nested = ModuleSummary::new("pkg/sub/util.py");
        assert_eq!(nested.directory(), Some("pkg/sub"));
        assert_eq!(nested.stem(), "util");
    }

    #[test]
    fn test_model_iterates_in_path_order() {
        let model: ProjectModel = ["z.py", "a/b.py", "m.py"]
            .into_iter()
            .map(ModuleSummary::new)
            .collect();

        let paths: Vec<_> = model.paths().collect();
        assert_eq!(paths, vec!["a/b.py", "m.py", "z.py"]);
    }

    #[test]
    fn test_duplicate_path_keeps_first() {
        let mut model = ProjectModel::new();
        let mut first = ModuleSummary::new("a.py");
        first.classes.push("Foo".to_string());

        assert!(model.insert(first));
        assert!(!model.insert(ModuleSummary::new("a.py")));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get("a.py").map(|m| m.classes.len()), Some(1));
    }

    #[test]
    fn test_model_serializes_as_map() {
        let model: ProjectModel = [ModuleSummary::new("a.py")].into_iter().collect();
        let json = serde_json::to_value(&model).unwrap();
        assert!(json.get("a.py").is_some());
    }
}
