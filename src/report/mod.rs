//! Report Assembler
//!
//! Concatenates the diagram fragments and a per-module summary table into
//! one markdown document, and persists it under the project root.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::constants::output::REPORT_PATH;
use crate::diagram::DiagramSet;
use crate::types::{ArchError, DiagramFragment, ProjectModel, Result};

const TITLE: &str = "# Project Architecture & Flow Diagrams";

/// `date`-style timestamp, e.g. `Sat Oct 17 09:30:00 2026`
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Document sections in output order: heading, anchor, intro line
const SECTIONS: [(&str, &str, &str); 6] = [
    (
        "System Architecture",
        "system-architecture",
        "Overview of the system's high-level architecture:",
    ),
    (
        "Module Dependencies",
        "module-dependencies",
        "Dependency graph showing relationships between modules:",
    ),
    (
        "Class Diagram",
        "class-diagram",
        "Main classes and their methods:",
    ),
    (
        "Sequence Diagram",
        "sequence-diagram",
        "Typical workflow sequence:",
    ),
    (
        "Process Flowchart",
        "process-flowchart",
        "Detailed process flow:",
    ),
    (
        "AI-Generated Architecture",
        "ai-generated-architecture",
        "AI-generated comprehensive architecture diagram:",
    ),
];

/// Fragments feeding one document
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub diagrams: &'a DiagramSet,
    /// Collaborator output; empty when the collaborator is absent or failed
    pub ai: &'a DiagramFragment,
    pub model: &'a ProjectModel,
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Assemble the document stamped with the current local time
    pub fn assemble(input: &ReportInput<'_>) -> String {
        Self::assemble_at(input, &Local::now())
    }

    /// Assemble the document with an explicit timestamp
    pub fn assemble_at<Tz>(input: &ReportInput<'_>, generated_at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut doc = String::new();

        doc.push_str(&format!("{}\n\n", TITLE));
        doc.push_str(&format!(
            "*Generated on: {}*\n\n",
            generated_at.format(TIMESTAMP_FORMAT)
        ));

        doc.push_str("## Table of Contents\n\n");
        for (i, (heading, anchor, _)) in SECTIONS.iter().enumerate() {
            doc.push_str(&format!("{}. [{}](#{})\n", i + 1, heading, anchor));
        }
        doc.push('\n');

        let fragments = [
            &input.diagrams.flow,
            &input.diagrams.dependency,
            &input.diagrams.class,
            &input.diagrams.sequence,
            &input.diagrams.flow,
            input.ai,
        ];
        for ((heading, _, intro), fragment) in SECTIONS.iter().zip(fragments) {
            doc.push_str(&format!("## {}\n\n{}\n\n", heading, intro));
            doc.push_str(fragment.as_str());
            doc.push('\n');
        }

        doc.push_str(&Self::summary_table(input.model));
        doc
    }

    /// `## Module Summary` section, one row per module in path order
    pub fn summary_table(model: &ProjectModel) -> String {
        let mut table = String::from("## Module Summary\n\n");
        table.push_str(&format!("Total Modules: {}\n\n", model.len()));
        table.push_str("| Module | Classes | Functions | Imports |\n");
        table.push_str("|--------|---------|-----------|----------|\n");
        for module in model.modules() {
            table.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                module.path,
                module.classes.len(),
                module.functions.len(),
                module.imports.len()
            ));
        }
        table
    }

    /// Location of the document for a project root
    pub fn output_path(project_root: &Path) -> PathBuf {
        project_root.join(REPORT_PATH)
    }

    /// Write the document, creating missing parent directories
    pub fn write(project_root: &Path, document: &str) -> Result<PathBuf> {
        let path = Self::output_path(project_root);
        let output_err = |source| ArchError::Output {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(output_err)?;
        }
        fs::write(&path, document).map_err(output_err)?;

        info!("Wrote {} ({} bytes)", path.display(), document.len());
        Ok(path)
    }
}
