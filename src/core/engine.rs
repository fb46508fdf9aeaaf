use crate::config::generator_config::GeneratorConfig;
use crate::core::generator::{generate, GeneratedRepository};
use crate::domain::graph::MarkovDocument;
use crate::domain::ports::{MatrixSink, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const BUNDLE_FILENAME: &str = "markov_bundle.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

/// Renders a document. YAML output leaves node ids unquoted so they read as tags.
pub fn render(document: &MarkovDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?.replace('\'', "")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
    }
}

pub fn document_filename(repo_id: &str, format: OutputFormat) -> String {
    format!("markov_{}.{}", repo_id, format.extension())
}

pub struct MarkovEngine<S: Storage> {
    storage: S,
    format: OutputFormat,
    bundle: bool,
}

impl<S: Storage> MarkovEngine<S> {
    pub fn new(storage: S, format: OutputFormat) -> Self {
        Self {
            storage,
            format,
            bundle: false,
        }
    }

    /// Also pack every document into a single zip archive.
    pub fn with_bundle(mut self, bundle: bool) -> Self {
        self.bundle = bundle;
        self
    }

    /// Generates, renders and stores one document per repository; returns the written paths.
    pub fn run<M: MatrixSink>(
        &self,
        config: &GeneratorConfig,
        repo_count: usize,
        seed: u64,
        sink: &mut M,
    ) -> Result<Vec<String>> {
        tracing::info!(
            "Generating {} repository configuration(s) with seed {}",
            repo_count,
            seed
        );
        let repos = generate(config, repo_count, seed, sink)?;

        let rendered = repos
            .iter()
            .map(|repo| {
                Ok((
                    document_filename(&repo.id, self.format),
                    render(&repo.document, self.format)?,
                ))
            })
            .collect::<Result<Vec<(String, String)>>>()?;

        let mut written = Vec::with_capacity(rendered.len() + 1);
        for (name, content) in &rendered {
            self.storage.write_file(name, content.as_bytes())?;
            tracing::info!("Configuration file saved: {}", name);
            written.push(name.clone());
        }

        if self.bundle {
            let zip_data = bundle(&rendered)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(BUNDLE_FILENAME, &zip_data)?;
            written.push(BUNDLE_FILENAME.to_string());
        }

        log_summary(&repos);
        Ok(written)
    }
}

fn bundle(rendered: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in rendered {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn log_summary(repos: &[GeneratedRepository]) {
    for repo in repos {
        let graph = repo.document.graph();
        tracing::debug!("{}: {} nodes", repo.id, graph.nodes().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{GraphBuilder, IssueSequence, Transitions};
    use crate::domain::node::NodeId;

    fn document() -> MarkovDocument {
        let mut builder = GraphBuilder::new();
        builder
            .add_edge(NodeId::initial(), NodeId::issue("Issue_0"), 1.0)
            .unwrap();
        builder
            .add_edge(NodeId::issue("Issue_0"), NodeId::module("Module_0"), 1.0)
            .unwrap();
        builder
            .add_edge(NodeId::module("Module_0"), NodeId::file("File_0"), 1.0)
            .unwrap();
        builder
            .add_edge(NodeId::file("File_0"), NodeId::author("Author_0"), 1.0)
            .unwrap();
        builder
            .add_edge(NodeId::author("Author_0"), NodeId::commit(), 1.0)
            .unwrap();
        MarkovDocument {
            issue_sequence: IssueSequence {
                average_consecutive_commits: vec![(NodeId::issue("Issue_0"), 2.0)],
            },
            transitions: Transitions {
                matrix: builder.build().unwrap(),
            },
        }
    }

    #[test]
    fn test_render_yaml_keeps_tags_unquoted() {
        let yaml = render(&document(), OutputFormat::Yaml).unwrap();

        assert!(yaml.starts_with("issue_sequence:"));
        assert!(yaml.contains("!Issue Issue_0: 2.0"));
        assert!(yaml.contains("to: !Module Module_0"));
        assert!(!yaml.contains('\''));
    }

    #[test]
    fn test_render_json_shape() {
        let json = render(&document(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["issue_sequence"]["average_consecutive_commits"]["!Issue Issue_0"],
            2.0
        );
        let edges = value["transitions"]["matrix"]["!Author Author_0"]
            .as_array()
            .unwrap();
        assert_eq!(edges[0]["to"], "!Commit ");
        assert_eq!(edges[0]["p"], 1.0);
    }

    #[test]
    fn test_document_filename() {
        assert_eq!(document_filename("Repo_0", OutputFormat::Yaml), "markov_Repo_0.yaml");
        assert_eq!(document_filename("Repo_2", OutputFormat::Json), "markov_Repo_2.json");
    }
}
