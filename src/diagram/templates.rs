//! Fixed illustrative diagrams
//!
//! These render the same text for every project.

use super::{DiagramKind, DiagramSynthesizer};
use crate::types::{DiagramFragment, ProjectModel};

const SEQUENCE_BODY: &str = "sequenceDiagram
    participant User
    participant API
    participant RAGEngine
    participant KnowledgeBase
    participant TestGenerator
    participant VectorDB
    
    User->>API: Request test case generation
    API->>RAGEngine: Initialize with requirements
    RAGEngine->>KnowledgeBase: Load existing test cases
    KnowledgeBase->>VectorDB: Query similar cases
    VectorDB-->>KnowledgeBase: Return matches
    KnowledgeBase-->>RAGEngine: Provide context
    RAGEngine->>TestGenerator: Generate new tests
    TestGenerator->>TestGenerator: Apply templates
    TestGenerator-->>RAGEngine: Return generated tests
    RAGEngine->>VectorDB: Store new embeddings
    RAGEngine-->>API: Return test cases
    API-->>User: Display results
";

const FLOW_BODY: &str = "flowchart TD
    Start([Start]) --> Input[User Input: Requirements]
    Input --> Parse[Parse Requirements]
    Parse --> Search[Search Knowledge Base]
    Search --> Decision{Similar Cases Found?}
    
    Decision -->|Yes| Analyze[Analyze Similarity Score]
    Decision -->|No| Generate[Generate New Test Cases]
    
    Analyze --> Score{Score > 0.99?}
    Score -->|Yes| Return[Return Existing Cases]
    Score -->|No| Enhance{Score 0.60-0.85?}
    
    Enhance -->|Yes| Augment[Augment with Add-ons]
    Enhance -->|No| Generate
    
    Augment --> Combine[Combine Existing + New]
    Generate --> Store[Store in Vector DB]
    Combine --> Store
    Return --> Format[Format Output]
    Store --> Format
    Format --> End([End])
    
    style Start fill:#90EE90
    style End fill:#FFB6C1
    style Decision fill:#FFD700
    style Score fill:#FFD700
    style Enhance fill:#FFD700
";

/// Request/response workflow through the API, retrieval engine, knowledge
/// base, generator and vector store
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceDiagramSynthesizer;

impl DiagramSynthesizer for SequenceDiagramSynthesizer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Sequence
    }

    fn render(&self, _model: &ProjectModel) -> DiagramFragment {
        DiagramFragment::mermaid(SEQUENCE_BODY)
    }
}

/// Retrieval-and-generation decision flow
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowDiagramSynthesizer;

impl DiagramSynthesizer for FlowDiagramSynthesizer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Flow
    }

    fn render(&self, _model: &ProjectModel) -> DiagramFragment {
        DiagramFragment::mermaid(FLOW_BODY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModuleSummary;

    #[test]
    fn test_templates_ignore_model() {
        let empty = ProjectModel::new();
        let populated: ProjectModel = [ModuleSummary::new("a.py")].into_iter().collect();

        assert_eq!(
            SequenceDiagramSynthesizer.render(&empty),
            SequenceDiagramSynthesizer.render(&populated)
        );
        assert_eq!(
            FlowDiagramSynthesizer.render(&empty),
            FlowDiagramSynthesizer.render(&populated)
        );
    }

    #[test]
    fn test_sequence_shape() {
        let out = SequenceDiagramSynthesizer.render(&ProjectModel::new());
        let text = out.as_str();
        assert!(text.starts_with("```mermaid\nsequenceDiagram\n"));
        assert!(text.ends_with("    API-->>User: Display results\n```\n"));
        assert_eq!(text.matches("participant ").count(), 6);
        assert_eq!(text.matches(": ").count(), 12);
    }

    #[test]
    fn test_flow_shape() {
        let out = FlowDiagramSynthesizer.render(&ProjectModel::new());
        let text = out.as_str();
        assert!(text.starts_with("```mermaid\nflowchart TD\n"));
        assert!(text.contains("    Start([Start]) --> Input[User Input: Requirements]\n"));
        assert!(text.contains("    Format --> End([End])\n"));
        assert_eq!(text.matches("fill:#FFD700").count(), 3);
        assert!(text.ends_with("    style Enhance fill:#FFD700\n```\n"));
    }
}
