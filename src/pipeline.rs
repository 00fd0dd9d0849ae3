//! Architecture Report Pipeline
//!
//! Stages:
//! 1. Analysis: walk the tree, parse every source file, build the model
//! 2. Synthesis: render the four model-derived diagram fragments
//! 3. AI section: optional collaborator fragment (empty on any failure)
//! 4. Assembly: concatenate everything into one markdown document
//!
//! Only the final write can fail the run once analysis has started.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, TimeZone};
use tracing::{info, instrument};

use crate::ai::{AiSection, SharedProvider};
use crate::analyzer::ProjectModelBuilder;
use crate::config::Config;
use crate::diagram::DiagramSet;
use crate::report::{ReportAssembler, ReportInput};
use crate::types::{BuildStats, DiagramFragment, ProjectModel, Result};

/// Everything produced by one run, before it is written
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub model: ProjectModel,
    pub stats: BuildStats,
    pub diagrams: DiagramSet,
    /// Collaborator fragment; empty when absent or failed
    pub ai: DiagramFragment,
}

impl PipelineRun {
    fn input(&self) -> ReportInput<'_> {
        ReportInput {
            diagrams: &self.diagrams,
            ai: &self.ai,
            model: &self.model,
        }
    }

    /// The markdown document stamped with the current local time
    pub fn document(&self) -> String {
        ReportAssembler::assemble(&self.input())
    }

    pub fn document_at<Tz>(&self, generated_at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        ReportAssembler::assemble_at(&self.input(), generated_at)
    }
}

/// Runs the stages for one project root
pub struct Pipeline {
    root: PathBuf,
    config: Config,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stage 1 only: build the model
    pub fn analyze(&self) -> Result<(ProjectModel, BuildStats)> {
        let builder = ProjectModelBuilder::from_config(&self.root, &self.config.analysis)?;
        Ok(builder.build())
    }

    /// Run every stage except the write
    #[instrument(skip(self, provider), fields(root = %self.root.display()))]
    pub async fn run(&self, provider: Option<SharedProvider>) -> Result<PipelineRun> {
        let start = Instant::now();

        let (model, stats) = self.analyze()?;
        let diagrams = DiagramSet::render(&model);
        info!(
            "Rendered {} diagrams for {} modules",
            diagrams.iter().count(),
            model.len()
        );

        let ai = AiSection::new(provider, &self.config.llm)
            .render(&model)
            .await;

        info!(
            "Pipeline finished in {}ms (AI section {})",
            start.elapsed().as_millis(),
            if ai.is_empty() { "empty" } else { "present" }
        );

        Ok(PipelineRun {
            model,
            stats,
            diagrams,
            ai,
        })
    }

    /// Run every stage and write the document under the project root
    pub async fn generate(&self, provider: Option<SharedProvider>) -> Result<(PipelineRun, PathBuf)> {
        let run = self.run(provider).await?;
        let path = ReportAssembler::write(&self.root, &run.document())?;
        Ok((run, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{LlmProvider, LlmResponse};
    use crate::constants::output::REPORT_PATH;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<LlmResponse> {
            Ok(LlmResponse::content_only(self.0))
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }
    }

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    fn pipeline(dir: &TempDir) -> Pipeline {
        Pipeline::new(dir.path(), Config::default())
    }

    #[tokio::test]
    async fn test_two_file_project() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "import b\n\nclass A:\n    def go(self):\n        pass\n");
        write(&dir, "b.py", "def helper():\n    return 1\n");

        let run = pipeline(&dir).run(None).await.unwrap();

        assert_eq!(run.model.len(), 2);
        assert_eq!(
            run.diagrams.dependency.as_str(),
            "```mermaid\ngraph TB\n    M0[a]\n    M1[b]\n    M0 --> M1\n```\n"
        );
        assert_eq!(
            run.diagrams.class.as_str(),
            "```mermaid\nclassDiagram\n    class A {\n        +go()\n    }\n```\n"
        );
        assert!(run.ai.is_empty());

        let doc = run.document_at(&Utc::now());
        assert!(doc.contains("Total Modules: 2\n"));
        assert!(doc.contains("| a.py | 1 | 1 | 1 |\n"));
        assert!(doc.contains("| b.py | 0 | 1 | 0 |\n"));
    }

    #[tokio::test]
    async fn test_importer_points_at_imported_module() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "class Foo:\n    pass\n\ndef bar():\n    pass\n");
        write(&dir, "b.py", "import a\n\ndef baz():\n    return a.Foo()\n");

        let (run, path) = pipeline(&dir).generate(None).await.unwrap();

        assert_eq!(run.model.len(), 2);
        assert_eq!(
            run.diagrams.dependency.as_str(),
            "```mermaid\ngraph TB\n    M0[a]\n    M1[b]\n    M1 --> M0\n```\n"
        );
        assert_eq!(
            run.diagrams.class.as_str(),
            "```mermaid\nclassDiagram\n    class Foo {\n        +bar()\n    }\n```\n"
        );

        let doc = fs::read_to_string(path).unwrap();
        assert!(doc.ends_with(
            "| Module | Classes | Functions | Imports |\n\
             |--------|---------|-----------|----------|\n\
             | a.py | 1 | 1 | 0 |\n\
             | b.py | 0 | 1 | 1 |\n"
        ));
    }

    #[tokio::test]
    async fn test_runs_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        write(&dir, "app/main.py", "from app import util\nimport os\n");
        write(&dir, "app/util.py", "class Tool:\n    pass\n");
        write(&dir, "setup.py", "def setup():\n    pass\n");

        let stamp = Utc::now();
        let first = pipeline(&dir).run(None).await.unwrap().document_at(&stamp);
        let second = pipeline(&dir).run(None).await.unwrap().document_at(&stamp);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unparsable_file_is_excluded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.py", "def ok():\n    pass\n");
        write(&dir, "bad.py", "def broken(:\n");

        let run = pipeline(&dir).run(None).await.unwrap();

        assert!(run.model.contains("good.py"));
        assert!(!run.model.contains("bad.py"));
        assert_eq!(run.stats.discovered, 2);
        assert_eq!(run.stats.analyzed, 1);
        assert_eq!(run.stats.skipped[0].path, "bad.py");

        let doc = run.document_at(&Utc::now());
        assert!(!doc.contains("bad.py"));
        assert!(!run.diagrams.dependency.as_str().contains("[bad]"));
    }

    #[tokio::test]
    async fn test_dotted_import_edge() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pkg/main.py", "import pkg.util\n");
        write(&dir, "pkg/util.py", "");

        let run = pipeline(&dir).run(None).await.unwrap();
        let graph = run.diagrams.dependency.as_str();
        assert!(graph.contains("M0[main]"));
        assert!(graph.contains("M1[util]"));
        assert!(graph.contains("    M0 --> M1\n"));
    }

    #[tokio::test]
    async fn test_empty_tree_still_writes_document() {
        let dir = TempDir::new().unwrap();

        let (run, path) = pipeline(&dir).generate(None).await.unwrap();

        assert!(run.model.is_empty());
        assert_eq!(path, dir.path().join(REPORT_PATH));
        let doc = fs::read_to_string(path).unwrap();
        assert!(doc.starts_with("# Project Architecture & Flow Diagrams\n"));
        assert!(doc.contains("Total Modules: 0\n"));
        assert!(doc.ends_with("|--------|---------|-----------|----------|\n"));
    }

    #[tokio::test]
    async fn test_ai_fragment_is_included_verbatim() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "class A:\n    pass\n");
        let reply = "```mermaid\ngraph LR\n    A --> B\n```";
        let provider: SharedProvider = Arc::new(FixedProvider(reply));

        let run = pipeline(&dir).run(Some(provider)).await.unwrap();
        assert_eq!(run.ai.as_str(), reply);

        let doc = run.document_at(&Utc::now());
        assert!(doc.contains(&format!(
            "AI-generated comprehensive architecture diagram:\n\n{}\n",
            reply
        )));
    }

    #[tokio::test]
    async fn test_disabled_ai_leaves_section_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "");
        let mut config = Config::default();
        config.llm.enabled = false;

        let resolved = crate::ai::resolve_provider(&config.llm);
        assert!(resolved.is_none());

        let run = Pipeline::new(dir.path(), config).run(resolved).await.unwrap();
        assert!(run.ai.is_empty());
    }
}
