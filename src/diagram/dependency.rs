//! Module dependency graph (`graph TB`)

use std::collections::HashMap;

use super::resolve::{FirstMatchResolver, ImportResolver};
use super::{DiagramKind, DiagramSynthesizer};
use crate::types::{DiagramFragment, ModuleSummary, ProjectModel};

/// Renders one node per module, clustered by directory, with an edge for
/// every import the resolver maps onto another module.
pub struct DependencyGraphSynthesizer {
    resolver: Box<dyn ImportResolver>,
}

impl Default for DependencyGraphSynthesizer {
    fn default() -> Self {
        Self::new(Box::new(FirstMatchResolver))
    }
}

impl DependencyGraphSynthesizer {
    pub fn new(resolver: Box<dyn ImportResolver>) -> Self {
        Self { resolver }
    }
}

impl DiagramSynthesizer for DependencyGraphSynthesizer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Dependency
    }

    fn render(&self, model: &ProjectModel) -> DiagramFragment {
        let mut body = String::from("graph TB\n");
        let mut node_ids: HashMap<&str, String> = HashMap::with_capacity(model.len());

        for (directory, members) in group_by_directory(model) {
            let indent = match directory {
                None => "    ",
                Some(dir) => {
                    body.push_str(&format!("    subgraph {}_dir[{}]\n", subgraph_id(dir), dir));
                    "        "
                }
            };

            for module in members {
                let id = format!("M{}", node_ids.len());
                body.push_str(&format!("{}{}[{}]\n", indent, id, module.stem()));
                node_ids.insert(module.path.as_str(), id);
            }

            if directory.is_some() {
                body.push_str("    end\n");
            }
        }

        for module in model.modules() {
            let Some(source_id) = node_ids.get(module.path.as_str()) else {
                continue;
            };
            for import in &module.imports {
                if let Some(target) = self.resolver.resolve(module, import, model)
                    && let Some(target_id) = node_ids.get(target.path.as_str())
                {
                    body.push_str(&format!("    {} --> {}\n", source_id, target_id));
                }
            }
        }

        DiagramFragment::mermaid(&body)
    }
}

/// Modules grouped by directory, groups in order of first appearance.
/// `None` is the project root.
fn group_by_directory(model: &ProjectModel) -> Vec<(Option<&str>, Vec<&ModuleSummary>)> {
    let mut groups: Vec<(Option<&str>, Vec<&ModuleSummary>)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for module in model.modules() {
        let directory = module.directory();
        let slot = *index.entry(directory).or_insert_with(|| {
            groups.push((directory, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(module);
    }

    groups
}

/// Mermaid-safe identifier for a directory: `pkg/sub-dir` -> `pkg_sub_dir`
fn subgraph_id(directory: &str) -> String {
    directory
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
