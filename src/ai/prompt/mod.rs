//! Architecture Prompt
//!
//! Builds the system instruction and user prompt sent to the collaborator
//! for the AI-generated architecture section. The prompt carries only a
//! structural summary of the model, never source text.

use crate::constants::diagram::AI_SUMMARY_MODULES;
use crate::types::ProjectModel;

/// Role given to the collaborator
pub const ARCHITECT_SYSTEM_PROMPT: &str =
    "You are an expert software architect who creates clear, comprehensive Mermaid diagrams.";

const OBJECTIVES: [&str; 3] = [
    "System architecture",
    "Data flow",
    "Component interactions",
];

/// System and user messages for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitecturePrompt {
    pub system: String,
    pub user: String,
}

impl ArchitecturePrompt {
    pub fn for_model(model: &ProjectModel) -> Self {
        let mut user = String::from(
            "Based on this project structure, generate a comprehensive Mermaid diagram showing:\n",
        );
        for (i, objective) in OBJECTIVES.iter().enumerate() {
            user.push_str(&format!("{}. {}\n", i + 1, objective));
        }
        user.push('\n');
        user.push_str(&structural_summary(model));
        user.push_str("\n\nGenerate a complete Mermaid diagram that best represents the system.");

        Self {
            system: ARCHITECT_SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

/// Module count followed by class/function counts of the leading modules
pub fn structural_summary(model: &ProjectModel) -> String {
    let mut summary = format!("Project has {} modules.\n\n", model.len());
    summary.push_str("Main modules:\n");
    for module in model.modules().take(AI_SUMMARY_MODULES) {
        summary.push_str(&format!(
            "- {}: {} classes, {} functions\n",
            module.path,
            module.classes.len(),
            module.functions.len()
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModuleSummary;

    #[test]
    fn test_summary_lists_leading_modules() {
        let model: ProjectModel = (0..12)
            .map(|i| ModuleSummary {
                classes: vec!["C".to_string(); i % 3],
                functions: vec!["f".to_string(); i],
                ..ModuleSummary::new(format!("m{:02}.py", i))
            })
            .collect();

        let summary = structural_summary(&model);
        assert!(summary.starts_with("Project has 12 modules.\n\nMain modules:\n"));
        assert!(summary.contains("- m00.py: 0 classes, 0 functions\n"));
        assert!(summary.contains("- m04.py: 1 classes, 4 functions\n"));
        assert!(summary.contains("- m09.py"));
        assert!(!summary.contains("- m10.py"));
        assert_eq!(summary.lines().filter(|l| l.starts_with("- ")).count(), 10);
    }

    #[test]
    fn test_prompt_text() {
        let model: ProjectModel = [ModuleSummary {
            classes: vec!["App".to_string()],
            functions: vec!["main".to_string(), "run".to_string()],
            ..ModuleSummary::new("app.py")
        }]
        .into_iter()
        .collect();

        let prompt = ArchitecturePrompt::for_model(&model);
        assert_eq!(prompt.system, ARCHITECT_SYSTEM_PROMPT);
        assert_eq!(
            prompt.user,
            "Based on this project structure, generate a comprehensive Mermaid diagram showing:\n\
             1. System architecture\n\
             2. Data flow\n\
             3. Component interactions\n\
             \n\
             Project has 1 modules.\n\
             \n\
             Main modules:\n\
             - app.py: 1 classes, 2 functions\n\
             \n\
             \n\
             Generate a complete Mermaid diagram that best represents the system."
        );
    }

    #[test]
    fn test_prompt_for_empty_model() {
        let prompt = ArchitecturePrompt::for_model(&ProjectModel::new());
        assert!(prompt.user.contains("Project has 0 modules.\n\nMain modules:\n\n\nGenerate"));
    }
}
