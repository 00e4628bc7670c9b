//! Content graph model, dependency resolution and merging

pub mod graph;
pub mod model;
pub mod resolver;
pub mod merge;
pub mod export;


pub use model::{NodeKind, GraphNode, NodeAttrs, Reference, GraphEdge, GraphSnapshot};
pub use graph::ContentGraph;
pub use resolver::{Inventory, InstalledPack, ContentItems, NamedItem, InstalledIntegration, DependencyIndex, DependencyResolver, PackContents, PackMatch, MatchKind};
pub use merge::{merge_upstream, MergeStats, SHARED_PACKS, SHARED_PACK_VERSION};
pub use export::{export_graph, ExportError, ExportFormat};
