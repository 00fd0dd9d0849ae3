//! Project Model Builder
//!
//! Drives the scanner and the parser over a project root and accumulates
//! the per-file summaries into a [`ProjectModel`]. Files that cannot be
//! read or parsed are logged, recorded in [`BuildStats`] and left out of
//! the model.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::parser::{Parser, create_parser_for_extension};
use super::scanner::{FileScanner, ScannedFile};
use crate::config::AnalysisConfig;
use crate::types::{ArchError, BuildStats, ModuleSummary, ProjectModel, Result, SkippedFile};

pub struct ProjectModelBuilder {
    scanner: FileScanner,
    parser: Box<dyn Parser>,
    max_file_size: Option<u64>,
}

impl ProjectModelBuilder {
    pub fn new(scanner: FileScanner, parser: Box<dyn Parser>) -> Self {
        Self {
            scanner,
            parser,
            max_file_size: None,
        }
    }

    /// Record files larger than `limit` bytes as skipped instead of parsing them
    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Builder for a project root using the `[analysis]` settings
    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Result<Self> {
        let scanner = FileScanner::from_config(root, config)?;
        let parser = create_parser_for_extension(&config.extension)?;
        Ok(Self::new(scanner, parser).with_max_file_size(config.max_file_size))
    }

    /// Walk the tree once and build the model.
    ///
    /// Per-file failures never abort the build.
    pub fn build(&self) -> (ProjectModel, BuildStats) {
        let mut model = ProjectModel::new();
        let mut stats = BuildStats::default();

        info!("Scanning {}", self.scanner.root().display());

        for entry in self.scanner.walk() {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            stats.discovered += 1;

            match self.analyze(&file) {
                Ok(summary) => {
                    debug!(
                        "Analyzed {}: {} imports, {} classes, {} functions",
                        summary.path,
                        summary.imports.len(),
                        summary.classes.len(),
                        summary.functions.len()
                    );
                    if model.insert(summary) {
                        stats.analyzed += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.relative, e);
                    stats.skipped.push(SkippedFile {
                        path: file.relative.clone(),
                        reason: skip_reason(&e),
                    });
                }
            }
        }

        info!(
            "Analyzed {} of {} files ({} skipped)",
            stats.analyzed,
            stats.discovered,
            stats.skipped.len()
        );

        (model, stats)
    }

    fn analyze(&self, file: &ScannedFile) -> Result<ModuleSummary> {
        if let Some(limit) = self.max_file_size
            && file.size > limit
        {
            return Err(ArchError::Config(format!(
                "{} bytes exceeds analysis.max_file_size of {}",
                file.size, limit
            )));
        }
        let content = fs::read_to_string(&file.path)?;
        self.parser.parse(&file.relative, &content)
    }
}

/// Short reason for the skipped-file record, without the path prefix
fn skip_reason(err: &ArchError) -> String {
    match err {
        ArchError::Parse { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
