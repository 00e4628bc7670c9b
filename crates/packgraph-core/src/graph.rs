//! Graph wrapper using petgraph::StableUnGraph keyed by content id

use crate::model::*;
use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use std::collections::HashMap;

/// The content graph: an undirected simple graph whose nodes are addressed
/// by their content id.
pub struct ContentGraph {
    name: String,
    inner: StableUnGraph<GraphNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for ContentGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGraph")
            .field("name", &self.name)
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl ContentGraph {
    pub fn new(name: impl Into<String>) -> Self {
        ContentGraph {
            name: name.into(),
            inner: StableUnGraph::default(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(GraphNode::new(id));
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add a node, or merge `attrs` into the existing one.
    pub fn add_node(&mut self, id: &str, attrs: NodeAttrs) {
        let idx = self.ensure_node(id);
        if let Some(node) = self.inner.node_weight_mut(idx) {
            node.merge(&attrs);
        }
    }

    /// Add an undirected edge, creating missing endpoints. Returns `false`
    /// when the edge already existed.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        if self.inner.find_edge(ia, ib).is_some() {
            return false;
        }
        self.inner.add_edge(ia, ib, ());
        true
    }

    /// Merge `attrs` into an existing node. Unknown ids are ignored and
    /// reported with `false`.
    pub fn set_attrs(&mut self, id: &str, attrs: &NodeAttrs) -> bool {
        match self.index.get(id).and_then(|&idx| self.inner.node_weight_mut(idx)) {
            Some(node) => {
                node.merge(attrs);
                true
            }
            None => false,
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.inner.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Whether any path connects `from` and `to` in the graph built so far.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&ia), Some(&ib)) => has_path_connecting(&self.inner, ia, ib, None),
            _ => false,
        }
    }

    /// Ids adjacent to `id`, sorted.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .inner
            .neighbors(idx)
            .filter_map(|n| self.inner.node_weight(n))
            .map(|n| n.id.as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges as `(a, b)` id pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.edge_indices().filter_map(move |e| {
            let (a, b) = self.inner.edge_endpoints(e)?;
            let a = self.inner.node_weight(a)?;
            let b = self.inner.node_weight(b)?;
            Some((a.id.as_str(), b.id.as_str()))
        })
    }

    /// Get all nodes of a specific kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes().filter(move |n| n.kind == Some(kind))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<GraphNode> = self.nodes().cloned().collect();
        nodes.sort_by(|x, y| x.id.cmp(&y.id));
        let mut edges: Vec<GraphEdge> = self.edges().map(|(a, b)| GraphEdge::new(a, b)).collect();
        edges.sort();
        GraphSnapshot {
            name: self.name.clone(),
            nodes,
            edges,
        }
    }
}
