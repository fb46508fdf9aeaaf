use crate::core::sampling::symmetric_dirichlet;
use crate::domain::graph::{GraphBuilder, IssueSequence, MarkovDocument, Transitions};
use crate::domain::matrix::{FileMatrix, IssueMatrix, ModuleMatrix};
use crate::domain::model::Author;
use crate::domain::node::NodeId;
use crate::utils::error::Result;
use rand::Rng;

/// The three layer matrices synthesized for one repository.
#[derive(Debug, Clone)]
pub struct RepositoryLayers {
    pub files: FileMatrix,
    pub modules: ModuleMatrix,
    pub issues: IssueMatrix,
}

impl RepositoryLayers {
    pub fn check(&self) -> Result<()> {
        self.files.check()?;
        for module in &self.modules.modules {
            module.check("module")?;
        }
        for issue in &self.issues.issues {
            issue.row.check("issue")?;
        }
        Ok(())
    }
}

/// Turns one repository's matrices into its validated transition document.
///
/// Rows come out as Initial, issues, files, modules, then authors. The Initial
/// fan-out is a fresh Dirichlet draw over the surviving issues.
pub fn assemble<R: Rng + ?Sized>(
    rng: &mut R,
    repo_id: &str,
    layers: &RepositoryLayers,
    authors: &[Author],
) -> Result<MarkovDocument> {
    layers.check()?;

    let mut builder = GraphBuilder::new();
    let initial = NodeId::initial();
    builder.add_node(initial.clone());

    let issues = &layers.issues.issues;
    let start = symmetric_dirichlet(rng, issues.len())?;
    for (issue, p) in issues.iter().zip(start) {
        if p > 0.0 {
            builder.add_edge(initial.clone(), NodeId::issue(&issue.row.id), p)?;
        }
    }
    if issues.is_empty() {
        tracing::warn!("{}: no issue reaches this repository, initial node has no edges", repo_id);
    }

    for issue in issues {
        let source = NodeId::issue(&issue.row.id);
        for (module, p) in &issue.row.weights {
            if *p > 0.0 {
                builder.add_edge(source.clone(), NodeId::module(module), *p)?;
            }
        }
    }

    let files = &layers.files;
    for (i, file) in files.files.iter().enumerate() {
        let source = NodeId::file(file);
        for (j, p) in files.rows[i].iter().enumerate() {
            if *p > 0.0 {
                builder.add_edge(source.clone(), NodeId::file(&files.files[j]), *p)?;
            }
        }
        let bound = &files.authors[i];
        if bound.escape > 0.0 {
            builder.add_edge(source, NodeId::author(&bound.author), bound.escape)?;
        }
    }

    for module in &layers.modules.modules {
        let source = NodeId::module(&module.id);
        for (file, p) in &module.weights {
            if *p > 0.0 {
                builder.add_edge(source.clone(), NodeId::file(file), *p)?;
            }
        }
    }

    for author in authors {
        builder.add_edge(NodeId::author(&author.name), NodeId::commit(), 1.0)?;
    }

    let graph = builder.build()?;
    tracing::info!(
        "{}: {} issues, {} modules, {} files, {} authors",
        repo_id,
        issues.len(),
        layers.modules.modules.len(),
        files.len(),
        authors.len()
    );

    Ok(MarkovDocument {
        issue_sequence: IssueSequence {
            average_consecutive_commits: issues
                .iter()
                .map(|i| (NodeId::issue(&i.row.id), i.average_consecutive_commits))
                .collect(),
        },
        transitions: Transitions { matrix: graph },
    })
}
