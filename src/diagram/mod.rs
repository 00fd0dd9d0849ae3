//! Diagram Synthesizers
//!
//! Stateless renderers that turn a [`ProjectModel`] into Mermaid fragments.
//! Each synthesizer reads the model only; none depends on another.
//!
//! | Synthesizer | Output | Model-driven |
//! |-------------|--------|--------------|
//! | [`DependencyGraphSynthesizer`] | `graph TB` | yes |
//! | [`ClassDiagramSynthesizer`] | `classDiagram` | yes |
//! | [`SequenceDiagramSynthesizer`] | `sequenceDiagram` | no |
//! | [`FlowDiagramSynthesizer`] | `flowchart TD` | no |

pub mod class;
pub mod dependency;
pub mod resolve;
pub mod templates;
pub mod validation;

use std::fmt;

pub use class::ClassDiagramSynthesizer;
pub use dependency::DependencyGraphSynthesizer;
pub use resolve::{FirstMatchResolver, ImportResolver, dotted_module_path};
pub use templates::{FlowDiagramSynthesizer, SequenceDiagramSynthesizer};
pub use validation::{MermaidReport, MermaidValidator};

use crate::types::{DiagramFragment, ProjectModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Dependency,
    Class,
    Sequence,
    Flow,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dependency => "dependency graph",
            Self::Class => "class diagram",
            Self::Sequence => "sequence diagram",
            Self::Flow => "flowchart",
        };
        f.write_str(name)
    }
}

/// Renders one diagram fragment from the project model
pub trait DiagramSynthesizer: Send + Sync {
    fn kind(&self) -> DiagramKind;
    fn render(&self, model: &ProjectModel) -> DiagramFragment;
}

/// The four model-derived fragments of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSet {
    pub dependency: DiagramFragment,
    pub class: DiagramFragment,
    pub sequence: DiagramFragment,
    pub flow: DiagramFragment,
}

impl DiagramSet {
    /// Run every synthesizer over the model
    pub fn render(model: &ProjectModel) -> Self {
        let set = Self {
            dependency: DependencyGraphSynthesizer::default().render(model),
            class: ClassDiagramSynthesizer.render(model),
            sequence: SequenceDiagramSynthesizer.render(model),
            flow: FlowDiagramSynthesizer.render(model),
        };

        for (kind, fragment) in set.iter() {
            MermaidValidator::check_and_log(&kind.to_string(), fragment);
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = (DiagramKind, &DiagramFragment)> {
        [
            (DiagramKind::Dependency, &self.dependency),
            (DiagramKind::Class, &self.class),
            (DiagramKind::Sequence, &self.sequence),
            (DiagramKind::Flow, &self.flow),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModuleSummary;

    fn sample_model() -> ProjectModel {
        [
            ModuleSummary {
                imports: vec!["b".to_string()],
                classes: vec!["A".to_string()],
                functions: vec!["run".to_string()],
                ..ModuleSummary::new("a.py")
            },
            ModuleSummary::new("b.py"),
            ModuleSummary {
                imports: vec!["pkg.util".to_string(), "os".to_string()],
                ..ModuleSummary::new("pkg/main.py")
            },
            ModuleSummary::new("pkg/util.py"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = DiagramSet::render(&sample_model());
        let second = DiagramSet::render(&sample_model());
        assert_eq!(first, second);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = sample_model();
        let reversed: ProjectModel = forward
            .modules()
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        assert_eq!(DiagramSet::render(&forward), DiagramSet::render(&reversed));
    }

    #[test]
    fn test_kinds() {
        let set = DiagramSet::render(&ProjectModel::new());
        let kinds: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                DiagramKind::Dependency,
                DiagramKind::Class,
                DiagramKind::Sequence,
                DiagramKind::Flow
            ]
        );
        assert_eq!(DiagramKind::Flow.to_string(), "flowchart");
    }
}
