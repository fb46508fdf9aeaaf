use crate::domain::node::{Edge, NodeId, NodeKind};
use crate::utils::error::{Result, SynthError};
use crate::utils::validation::validate_probability_sum;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};

/// Slack allowed above 1.0 for a single edge before it counts as out of range.
const EDGE_EPSILON: f64 = 1e-9;

/// Adjacency-list builder; rows keep the order in which their source was first seen.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    rows: Vec<(NodeId, Vec<Edge>)>,
    index: HashMap<NodeId, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` as a source even if it never gets an edge.
    pub fn add_node(&mut self, node: NodeId) -> &mut Vec<Edge> {
        let idx = match self.index.get(&node) {
            Some(idx) => *idx,
            None => {
                self.rows.push((node.clone(), Vec::new()));
                self.index.insert(node, self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx].1
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, p: f64) -> Result<()> {
        if !p.is_finite() || p <= 0.0 || p > 1.0 + EDGE_EPSILON {
            return Err(SynthError::invariant(
                source.to_string(),
                format!("edge to {} has probability {} outside (0, 1]", target, p),
            ));
        }
        if source.kind == NodeKind::Commit {
            return Err(SynthError::invariant(
                source.to_string(),
                "commit node is a sink and cannot have outgoing edges",
            ));
        }
        self.add_node(source).push(Edge { to: target, p });
        Ok(())
    }

    /// Checks every non-empty row sums to one and that every edge target exists.
    pub fn build(self) -> Result<TransitionGraph> {
        for (node, edges) in &self.rows {
            if edges.is_empty() {
                continue;
            }
            let probabilities: Vec<f64> = edges.iter().map(|e| e.p).collect();
            validate_probability_sum(&node.to_string(), &probabilities)?;

            for edge in edges {
                if edge.to.kind != NodeKind::Commit && !self.index.contains_key(&edge.to) {
                    return Err(SynthError::invariant(
                        node.to_string(),
                        format!("edge points to unknown node {}", edge.to),
                    ));
                }
            }
        }
        Ok(TransitionGraph {
            rows: self.rows,
            index: self.index,
        })
    }
}

/// Validated, immutable transition graph of one repository.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    rows: Vec<(NodeId, Vec<Edge>)>,
    index: HashMap<NodeId, usize>,
}

impl TransitionGraph {
    pub fn edges(&self, node: &NodeId) -> Option<&[Edge]> {
        self.index.get(node).map(|idx| self.rows[*idx].1.as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&NodeId, &[Edge])> {
        self.rows.iter().map(|(node, edges)| (node, edges.as_slice()))
    }

    /// Every node that is a source or a target, sinks included.
    pub fn nodes(&self) -> BTreeSet<&NodeId> {
        self.rows
            .iter()
            .flat_map(|(node, edges)| std::iter::once(node).chain(edges.iter().map(|e| &e.to)))
            .collect()
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes().into_iter().filter(|n| n.kind == kind).count()
    }
}

impl Serialize for TransitionGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // 不給長度：serde_yaml 會把單一 `!Tag` 鍵的 map 寫成 tagged value
        let mut map = serializer.serialize_map(None)?;
        for (node, edges) in self.rows.iter().filter(|(_, e)| !e.is_empty()) {
            map.serialize_entry(node, edges)?;
        }
        map.end()
    }
}

/// Issue ids mapped to their `average_consecutive_commits`, in issue order.
#[derive(Debug, Clone, Default)]
pub struct IssueSequence {
    pub average_consecutive_commits: Vec<(NodeId, f64)>,
}

impl Serialize for IssueSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Commits<'a>(&'a [(NodeId, f64)]);

        impl Serialize for Commits<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                for (issue, commits) in self.0 {
                    map.serialize_entry(issue, commits)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            "average_consecutive_commits",
            &Commits(&self.average_consecutive_commits),
        )?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Transitions {
    pub matrix: TransitionGraph,
}

/// The document handed to the history replayer for one repository.
#[derive(Debug, Clone, Serialize)]
pub struct MarkovDocument {
    pub issue_sequence: IssueSequence,
    pub transitions: Transitions,
}

impl MarkovDocument {
    pub fn graph(&self) -> &TransitionGraph {
        &self.transitions.matrix
    }
}
