use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Initial,
    Issue,
    Module,
    File,
    Author,
    Commit,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Initial => "Initial",
            NodeKind::Issue => "Issue",
            NodeKind::Module => "Module",
            NodeKind::File => "File",
            NodeKind::Author => "Author",
            NodeKind::Commit => "Commit",
        }
    }
}

/// A vertex of the transition graph, identified by kind and name.
///
/// Renders as `!<Kind> <name>`; the singleton Initial and Commit nodes carry an
/// empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub kind: NodeKind,
    pub name: String,
}

impl NodeId {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn initial() -> Self {
        Self::new(NodeKind::Initial, "")
    }

    pub fn commit() -> Self {
        Self::new(NodeKind::Commit, "")
    }

    pub fn issue(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Issue, name)
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Module, name)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(NodeKind::File, name)
    }

    pub fn author(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Author, name)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{} {}", self.kind.as_str(), self.name)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub to: NodeId,
    pub p: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_display() {
        assert_eq!(NodeId::file("File_3").to_string(), "!File File_3");
        assert_eq!(NodeId::author("Author_0").to_string(), "!Author Author_0");
        assert_eq!(NodeId::initial().to_string(), "!Initial ");
        assert_eq!(NodeId::commit().to_string(), "!Commit ");
    }

    #[test]
    fn test_identity_is_kind_and_name() {
        assert_ne!(NodeId::file("X"), NodeId::module("X"));
        assert_eq!(NodeId::issue("Issue_1"), NodeId::new(NodeKind::Issue, "Issue_1"));
    }

    #[test]
    fn test_edge_serializes_tagged_target() {
        let edge = Edge {
            to: NodeId::module("Module_1"),
            p: 0.25,
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"to":"!Module Module_1","p":0.25}"#);
    }
}
