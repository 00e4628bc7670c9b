//! Folding the upstream shared-library graph into the custom graph

use crate::graph::ContentGraph;
use crate::model::{NodeAttrs, NodeKind};

/// Display names of the shared library packs.
pub const SHARED_PACKS: [&str; 3] = ["Base", "Common Playbooks", "Common Scripts"];

/// Placeholder version for pack nodes promoted from the upstream graph.
pub const SHARED_PACK_VERSION: &str = "666";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Custom items connected to a shared pack.
    pub linked_items: usize,
    /// Upstream pack nodes inserted into the custom graph.
    pub packs_promoted: usize,
}

fn shared_pack_attrs() -> NodeAttrs {
    NodeAttrs::pack(Some(SHARED_PACK_VERSION.to_string()))
}

/// Link custom items that also live in a shared upstream pack to that pack,
/// then make every upstream pack node visible in `custom`.
pub fn merge_upstream(custom: &mut ContentGraph, upstream: &ContentGraph) -> MergeStats {
    let mut stats = MergeStats::default();

    for node in upstream.nodes() {
        let Some(pack) = node.owning_pack.as_deref() else {
            continue;
        };
        if !SHARED_PACKS.contains(&pack) || !custom.contains_node(&node.id) {
            continue;
        }
        custom.add_node(pack, shared_pack_attrs());
        if custom.add_edge(&node.id, pack) {
            stats.linked_items += 1;
        }
    }

    for pack in upstream.nodes_of_kind(NodeKind::Pack) {
        custom.add_node(&pack.id, shared_pack_attrs());
        stats.packs_promoted += 1;
    }

    tracing::info!(
        "Merged upstream graph: {} shared items linked, {} packs promoted",
        stats.linked_items,
        stats.packs_promoted
    );
    stats
}
