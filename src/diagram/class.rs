//! Class diagram (`classDiagram`)

use super::{DiagramKind, DiagramSynthesizer};
use crate::constants::diagram::{MAX_CLASS_ENTRIES, MAX_MEMBERS_PER_CLASS};
use crate::types::{DiagramFragment, ProjectModel};

/// Pairs every class with the leading functions of the file declaring it.
///
/// Membership is file-level: a class lists its file's first functions,
/// whether or not they are its methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagramSynthesizer;

impl DiagramSynthesizer for ClassDiagramSynthesizer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Class
    }

    fn render(&self, model: &ProjectModel) -> DiagramFragment {
        let mut body = String::from("classDiagram\n");

        let entries = model
            .modules()
            .flat_map(|module| {
                let members = &module.functions[..module.functions.len().min(MAX_MEMBERS_PER_CLASS)];
                module.classes.iter().map(move |class| (class, members))
            })
            .take(MAX_CLASS_ENTRIES);

        for (class, members) in entries {
            body.push_str(&format!("    class {} {{\n", class));
            for member in members {
                body.push_str(&format!("        +{}()\n", member));
            }
            body.push_str("    }\n");
        }

        DiagramFragment::mermaid(&body)
    }
}
