use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::constants::scan::{EXCLUDED_DIRS, HIDDEN_PREFIX};
use crate::types::{ArchError, Result};

/// Lazily enumerates source files under a project root.
///
/// Hidden directories and the generated/dependency directories in
/// [`EXCLUDED_DIRS`] are pruned before descending, so their subtrees are
/// never visited. Entries are visited in file-name order.
#[derive(Debug, Clone)]
pub struct FileScanner {
    root: PathBuf,
    extension: String,
    exclude_dirs: Vec<String>,
    exclude: Vec<glob::Pattern>,
    respect_gitignore: bool,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.to_string(),
            exclude_dirs: EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            exclude: Vec::new(),
            respect_gitignore: false,
        }
    }

    /// Create a scanner configured from the `[analysis]` section
    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Result<Self> {
        let patterns = config
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    ArchError::Config(format!("Invalid exclude pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(root, &config.extension)
            .with_exclude_dirs(config.exclude_dirs.clone())
            .with_exclude(patterns)
            .respect_gitignore(config.respect_gitignore))
    }

    /// Add directory names to skip on top of the fixed exclusion set
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs.extend(dirs);
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<glob::Pattern>) -> Self {
        self.exclude = patterns;
        self
    }

    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, yielding matching files lazily.
    ///
    /// Each call starts a fresh walk. Walk errors are yielded as `Err` items
    /// so the caller can skip them and continue.
    pub fn walk(&self) -> impl Iterator<Item = Result<ScannedFile>> + '_ {
        let filter = Arc::new(EntryFilter {
            root: self.root.clone(),
            exclude_dirs: self.exclude_dirs.clone(),
            exclude: self.exclude.clone(),
        });

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .ignore(false)
            .parents(self.respect_gitignore)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| filter.keep(entry))
            .build();

        walker.filter_map(move |entry| match entry {
            Ok(entry) => self.accept(&entry).map(Ok),
            Err(e) => Some(Err(ArchError::Walk(e))),
        })
    }

    /// Collect every matching file
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        self.walk().collect()
    }

    fn accept(&self, entry: &DirEntry) -> Option<ScannedFile> {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            return None;
        }

        let path = entry.path();
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext == self.extension);
        if !has_extension {
            return None;
        }

        let relative = relative_path(&self.root, path)?;
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        Some(ScannedFile {
            path: path.to_path_buf(),
            relative,
            size,
        })
    }
}

/// Pruning rules shared with the walker threads
struct EntryFilter {
    root: PathBuf,
    exclude_dirs: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl EntryFilter {
    fn keep(&self, entry: &DirEntry) -> bool {
        // The root itself may be "." and must never be pruned
        if entry.depth() == 0 {
            return true;
        }

        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if is_dir {
            let name = entry.file_name().to_string_lossy();
            if name.starts_with(HIDDEN_PREFIX) || self.exclude_dirs.iter().any(|d| *d == name) {
                debug!("Pruning directory {}", entry.path().display());
                return false;
            }
        }

        if !self.exclude.is_empty()
            && let Some(relative) = relative_path(&self.root, entry.path())
            && self.exclude.iter().any(|p| p.matches(&relative))
        {
            return false;
        }

        true
    }
}

/// Project-relative, `/`-separated path
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Path usable for reading (root joined with the relative path)
    pub path: PathBuf,
    /// Project-relative, `/`-separated path
    pub relative: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x = 1\n").unwrap();
    }

    fn relatives(scanner: &FileScanner) -> Vec<String> {
        scanner
            .scan()
            .unwrap()
            .into_iter()
            .map(|f| f.relative)
            .collect()
    }

    #[test]
    fn test_yields_only_source_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.py");
        touch(dir.path(), "README.md");
        touch(dir.path(), "pkg/b.py");
        touch(dir.path(), "pkg/data.json");

        let scanner = FileScanner::new(dir.path(), "py");
        assert_eq!(relatives(&scanner), vec!["a.py", "pkg/b.py"]);
    }

    #[test]
    fn test_skips_hidden_and_generated_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.py");
        touch(dir.path(), ".git/hooks/x.py");
        touch(dir.path(), ".venv/lib/site.py");
        touch(dir.path(), "__pycache__/keep.cpython.py");
        touch(dir.path(), "node_modules/pkg/index.py");
        touch(dir.path(), "venv/lib/os.py");
        touch(dir.path(), "env/lib/os.py");
        touch(dir.path(), "src/env_utils.py");

        let scanner = FileScanner::new(dir.path(), "py");
        assert_eq!(relatives(&scanner), vec!["keep.py", "src/env_utils.py"]);
    }

    #[test]
    fn test_hidden_files_are_not_pruned() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden.py");

        let scanner = FileScanner::new(dir.path(), "py");
        assert_eq!(relatives(&scanner), vec![".hidden.py"]);
    }

    #[test]
    fn test_extra_exclusions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/main.py");
        touch(dir.path(), "migrations/0001.py");
        touch(dir.path(), "tests/test_main.py");

        let scanner = FileScanner::new(dir.path(), "py")
            .with_exclude_dirs(vec!["migrations".to_string()])
            .with_exclude(vec![glob::Pattern::new("tests/*").unwrap()]);
        assert_eq!(relatives(&scanner), vec!["app/main.py"]);
    }

    #[test]
    fn test_reports_file_size() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.py"), "x".repeat(64)).unwrap();

        let files = FileScanner::new(dir.path(), "py").scan().unwrap();
        assert_eq!(files[0].size, 64);
    }

    #[test]
    fn test_gitignore_is_opt_in() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.py");
        touch(dir.path(), "generated/b.py");
        fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();

        let scanner = FileScanner::new(dir.path(), "py");
        assert_eq!(relatives(&scanner), vec!["a.py", "generated/b.py"]);

        let scanner = scanner.respect_gitignore(true);
        assert_eq!(relatives(&scanner), vec!["a.py"]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.py");
        touch(dir.path(), "b/c.py");

        let scanner = FileScanner::new(dir.path(), "py");
        assert_eq!(relatives(&scanner), relatives(&scanner));
    }
}
