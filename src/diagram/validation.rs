//! Mermaid Fragment Validation
//!
//! Lenient structural checks over the Mermaid blocks inside a fragment.
//! Findings are reported, never enforced: the Mermaid renderer remains the
//! authority on syntax, so only clearly broken input is flagged.
//!
//! ## Checks
//!
//! - Recognized diagram header (graph/flowchart, sequenceDiagram, classDiagram, ...)
//! - Non-empty body and closed fences
//! - Balanced brackets and double quotes
//! - Flowchart edges with neither source nor target
//! - Sequence `end` lines without an open block, and unclosed blocks
//! - Class bodies left open

use tracing::{debug, warn};

use crate::types::{DiagramFragment, MERMAID_FENCE};

// =============================================================================
// Report Types
// =============================================================================

/// Outcome of validating every Mermaid block in a fragment
#[derive(Debug, Clone, Default)]
pub struct MermaidReport {
    pub blocks_found: usize,
    pub blocks_valid: usize,
    pub issues: Vec<MermaidIssue>,
}

impl MermaidReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.kind.severity() == IssueSeverity::Error)
    }
}

/// One finding, located by block index and line within the fragment
#[derive(Debug, Clone)]
pub struct MermaidIssue {
    /// 1-based index of the block inside the fragment
    pub block: usize,
    /// 1-based line within the fragment
    pub line: usize,
    pub kind: MermaidIssueKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidIssueKind {
    UnknownDiagramType,
    EmptyDiagram,
    UnclosedFence,
    UnbalancedBrackets,
    MismatchedQuotes,
    UnclosedBlock,
    InvalidArrow,
}

impl MermaidIssueKind {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Self::UnknownDiagramType | Self::EmptyDiagram | Self::UnclosedFence => {
                IssueSeverity::Error
            }
            Self::UnbalancedBrackets | Self::MismatchedQuotes | Self::UnclosedBlock => {
                IssueSeverity::Error
            }
            Self::InvalidArrow => IssueSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Diagram families the checks distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidDiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Gantt,
    Pie,
    Mindmap,
}

impl MermaidDiagramType {
    fn from_header(line: &str) -> Option<Self> {
        let header = line.trim().to_lowercase();
        let table = [
            ("graph", Self::Flowchart),
            ("flowchart", Self::Flowchart),
            ("sequencediagram", Self::Sequence),
            ("classdiagram", Self::Class),
            ("statediagram", Self::State),
            ("erdiagram", Self::Er),
            ("gantt", Self::Gantt),
            ("pie", Self::Pie),
            ("mindmap", Self::Mindmap),
        ];
        table
            .into_iter()
            .find(|(prefix, _)| header.starts_with(prefix))
            .map(|(_, kind)| kind)
    }
}

/// A fenced Mermaid block lifted out of markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidBlock {
    /// 1-based line of the first body line
    pub first_line: usize,
    pub body: String,
    pub closed: bool,
}

// =============================================================================
// Validator
// =============================================================================

pub struct MermaidValidator;

impl MermaidValidator {
    /// Validate every Mermaid block in a fragment
    pub fn validate(fragment: &DiagramFragment) -> MermaidReport {
        Self::validate_text(fragment.as_str())
    }

    pub fn validate_text(content: &str) -> MermaidReport {
        let blocks = Self::extract_blocks(content);
        let mut report = MermaidReport {
            blocks_found: blocks.len(),
            ..Default::default()
        };

        for (i, block) in blocks.iter().enumerate() {
            let issues = Self::check_block(block, i + 1);
            if issues.is_empty() {
                report.blocks_valid += 1;
            } else {
                report.issues.extend(issues);
            }
        }

        report
    }

    /// Validate a fragment and log what was found under the section name.
    /// The fragment is used as-is regardless of the findings.
    pub fn check_and_log(section: &str, fragment: &DiagramFragment) {
        if fragment.is_empty() {
            return;
        }

        let report = Self::validate(fragment);
        for issue in &report.issues {
            match issue.kind.severity() {
                IssueSeverity::Error => warn!(
                    "{}: Mermaid block {} line {}: {}",
                    section, issue.block, issue.line, issue.description
                ),
                IssueSeverity::Warning => debug!(
                    "{}: Mermaid block {} line {}: {}",
                    section, issue.block, issue.line, issue.description
                ),
            }
        }
        debug!(
            "{}: {}/{} Mermaid blocks valid",
            section, report.blocks_valid, report.blocks_found
        );
    }

    /// Fenced Mermaid blocks, including empty and unterminated ones
    pub fn extract_blocks(content: &str) -> Vec<MermaidBlock> {
        let opener = format!("```{}", MERMAID_FENCE);
        let mut blocks = Vec::new();
        let mut current: Option<MermaidBlock> = None;

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            match current.as_mut() {
                None => {
                    if trimmed == opener || trimmed.starts_with(&format!("{} ", opener)) {
                        current = Some(MermaidBlock {
                            first_line: idx + 2,
                            body: String::new(),
                            closed: false,
                        });
                    }
                }
                Some(block) => {
                    if trimmed == "```" {
                        block.closed = true;
                        blocks.extend(current.take());
                    } else {
                        block.body.push_str(line);
                        block.body.push('\n');
                    }
                }
            }
        }

        blocks.extend(current);
        blocks
    }

    fn check_block(block: &MermaidBlock, index: usize) -> Vec<MermaidIssue> {
        let issue = |line: usize, kind: MermaidIssueKind, description: String| MermaidIssue {
            block: index,
            line,
            kind,
            description,
        };

        let mut issues = Vec::new();
        if !block.closed {
            issues.push(issue(
                block.first_line.saturating_sub(1),
                MermaidIssueKind::UnclosedFence,
                "Mermaid fence is never closed".to_string(),
            ));
        }

        let Some((offset, header)) = block
            .body
            .lines()
            .enumerate()
            .find(|(_, l)| !l.trim().is_empty() && !l.trim().starts_with("%%"))
        else {
            issues.push(issue(
                block.first_line,
                MermaidIssueKind::EmptyDiagram,
                "Diagram is empty".to_string(),
            ));
            return issues;
        };

        let Some(diagram_type) = MermaidDiagramType::from_header(header) else {
            issues.push(issue(
                block.first_line + offset,
                MermaidIssueKind::UnknownDiagramType,
                format!(
                    "Unknown diagram type: '{}'",
                    header.trim().chars().take(30).collect::<String>()
                ),
            ));
            return issues;
        };

        let body_lines = block
            .body
            .lines()
            .enumerate()
            .skip(offset + 1)
            .map(|(i, l)| (block.first_line + i, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with("%%"));

        match diagram_type {
            MermaidDiagramType::Flowchart => {
                for (line, text) in body_lines {
                    if is_flowchart_directive(text) {
                        continue;
                    }
                    if edge_is_dangling(text) {
                        issues.push(issue(
                            line,
                            MermaidIssueKind::InvalidArrow,
                            "Edge has no source or target".to_string(),
                        ));
                    }
                }
            }
            MermaidDiagramType::Sequence => {
                let mut open_blocks: Vec<(usize, &str)> = Vec::new();
                for (line, text) in body_lines {
                    let keyword = text.split_whitespace().next().unwrap_or("");
                    if SEQUENCE_BLOCKS.contains(&keyword) {
                        open_blocks.push((line, keyword));
                    } else if text == "end" && open_blocks.pop().is_none() {
                        issues.push(issue(
                            line,
                            MermaidIssueKind::UnclosedBlock,
                            "'end' without a matching block".to_string(),
                        ));
                    }
                }
                for (line, keyword) in open_blocks {
                    issues.push(issue(
                        line,
                        MermaidIssueKind::UnclosedBlock,
                        format!("Unclosed '{}' block", keyword),
                    ));
                }
            }
            MermaidDiagramType::Class => {
                let mut open_class: Option<usize> = None;
                for (line, text) in body_lines {
                    if text.starts_with("class ") && text.ends_with('{') {
                        open_class = Some(line);
                    } else if text == "}" {
                        open_class = None;
                    }
                }
                if let Some(line) = open_class {
                    issues.push(issue(
                        line,
                        MermaidIssueKind::UnclosedBlock,
                        "Class body is never closed".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if let Some(description) = bracket_imbalance(&block.body) {
            issues.push(issue(
                block.first_line,
                MermaidIssueKind::UnbalancedBrackets,
                description,
            ));
        }
        if block.body.chars().filter(|&c| c == '"').count() % 2 != 0 {
            issues.push(issue(
                block.first_line,
                MermaidIssueKind::MismatchedQuotes,
                "Unmatched double quotes".to_string(),
            ));
        }

        issues
    }
}

const SEQUENCE_BLOCKS: &[&str] = &["loop", "alt", "opt", "par", "critical", "break", "rect"];

fn is_flowchart_directive(line: &str) -> bool {
    ["subgraph", "style", "classDef", "class ", "linkStyle", "click", "direction"]
        .iter()
        .any(|kw| line.starts_with(kw))
        || line == "end"
}

/// An arrow whose both sides are blank, such as a bare `-->`
fn edge_is_dangling(line: &str) -> bool {
    const ARROWS: [&str; 6] = ["-.->", "==>", "-->", "---", "->", "--"];

    let Some((idx, arrow)) = ARROWS
        .iter()
        .filter_map(|a| line.find(*a).map(|idx| (idx, *a)))
        .min_by_key(|(idx, _)| *idx)
    else {
        return false;
    };

    let source = line[..idx].trim();
    let rest = line[idx + arrow.len()..].trim_start();
    let target = match rest.strip_prefix('|') {
        Some(labelled) => labelled
            .split_once('|')
            .map_or(labelled, |(_, after)| after)
            .trim(),
        None => rest.trim(),
    };

    source.is_empty() && target.is_empty()
}

/// Describe the first bracket imbalance outside quoted text
fn bracket_imbalance(content: &str) -> Option<String> {
    let mut depth = [0i32; 3];
    let mut quote: Option<char> = None;

    for ch in content.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' => quote = Some(ch),
            '{' => depth[0] += 1,
            '}' => depth[0] -= 1,
            '[' => depth[1] += 1,
            ']' => depth[1] -= 1,
            '(' => depth[2] += 1,
            ')' => depth[2] -= 1,
            _ => {}
        }
        if depth.iter().any(|d| *d < 0) {
            return Some("Closing bracket without matching opening".to_string());
        }
    }

    (depth != [0, 0, 0]).then(|| {
        format!(
            "Unbalanced brackets: braces={}, brackets={}, parens={}",
            depth[0], depth[1], depth[2]
        )
    })
}
