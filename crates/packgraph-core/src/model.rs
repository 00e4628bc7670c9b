//! Core data structures for the content dependency graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminates what kind of content entity a node represents.
///
/// The serialized labels are the ones plotting legends and older exports
/// key on, so they are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "Content Pack")]
    Pack,
    Playbook,
    Script,
    Integration,
    #[serde(rename = "Integration Command")]
    IntegrationCommand,
    Layout,
    CaseType,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Pack,
        NodeKind::Playbook,
        NodeKind::Script,
        NodeKind::Integration,
        NodeKind::IntegrationCommand,
        NodeKind::Layout,
        NodeKind::CaseType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Pack => "Content Pack",
            NodeKind::Playbook => "Playbook",
            NodeKind::Script => "Script",
            NodeKind::Integration => "Integration",
            NodeKind::IntegrationCommand => "Integration Command",
            NodeKind::Layout => "Layout",
            NodeKind::CaseType => "CaseType",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single node in the content graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Content-addressed identifier, unique within one graph.
    pub id: String,
    /// `None` until some build step has tagged the node.
    pub kind: Option<NodeKind>,
    /// Pack the item originates from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owning_pack: Option<String>,
    /// Only ever set on pack nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            kind: None,
            owning_pack: None,
            version: None,
        }
    }

    /// Overwrite every attribute that `attrs` provides, keep the rest.
    pub fn merge(&mut self, attrs: &NodeAttrs) {
        if let Some(kind) = attrs.kind {
            self.kind = Some(kind);
        }
        if let Some(pack) = &attrs.owning_pack {
            self.owning_pack = Some(pack.clone());
        }
        if let Some(version) = &attrs.version {
            self.version = Some(version.clone());
        }
    }
}

/// A partial attribute update applied to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttrs {
    pub kind: Option<NodeKind>,
    pub owning_pack: Option<String>,
    pub version: Option<String>,
}

impl NodeAttrs {
    pub fn kind(kind: NodeKind) -> Self {
        NodeAttrs {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn pack(version: Option<String>) -> Self {
        NodeAttrs {
            kind: Some(NodeKind::Pack),
            owning_pack: None,
            version,
        }
    }

    pub fn with_owning_pack(mut self, pack: impl Into<String>) -> Self {
        self.owning_pack = Some(pack.into());
        self
    }
}

/// An outbound reference discovered by a content parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub source: String,
    pub target: String,
    /// Kind the target node gets tagged with.
    pub target_kind: NodeKind,
}

impl Reference {
    pub fn new(source: impl Into<String>, target: impl Into<String>, target_kind: NodeKind) -> Self {
        Reference {
            source: source.into(),
            target: target.into(),
            target_kind,
        }
    }
}

/// An undirected edge as exposed to collaborators. Endpoints are ordered
/// lexicographically so that snapshots compare equal regardless of the
/// direction the edge was inserted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub a: String,
    pub b: String,
}

impl GraphEdge {
    pub fn new(x: &str, y: &str) -> Self {
        if x <= y {
            GraphEdge { a: x.to_string(), b: y.to_string() }
        } else {
            GraphEdge { a: y.to_string(), b: x.to_string() }
        }
    }
}

/// Deterministic, serialisable view of a graph handed to plotting and
/// export collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
