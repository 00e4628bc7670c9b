//! Whole-repository builds: custom content, the upstream shared packs and
//! the merge between them

use crate::builder::{GraphBuilder, PackOutcome};
use crate::discovery::{self, PACKS_DIR};
use crate::error::BuildError;
use packgraph_core::{merge_upstream, ContentGraph, DependencyResolver, MergeStats};
use std::path::{Path, PathBuf};

/// Shared library packs read from the upstream repository.
pub const UPSTREAM_PACK_DIRS: [&str; 3] = ["Base", "CommonPlaybooks", "CommonScripts"];

pub const CUSTOM_GRAPH: &str = "custom";
pub const UPSTREAM_GRAPH: &str = "upstream";

/// Result of a repository build.
#[derive(Debug)]
pub struct RepositoryGraphs {
    pub custom: ContentGraph,
    /// Present when an upstream repository was configured.
    pub upstream: Option<ContentGraph>,
    pub merge: Option<MergeStats>,
    /// Pack display names, in build order.
    pub built: Vec<String>,
    /// Pack directories without metadata.
    pub skipped: Vec<PathBuf>,
}

pub struct RepositoryGraph {
    repo: PathBuf,
    upstream: Option<PathBuf>,
    builder: GraphBuilder,
}

impl RepositoryGraph {
    pub fn new(repo: impl Into<PathBuf>, resolver: DependencyResolver) -> Self {
        RepositoryGraph {
            repo: repo.into(),
            upstream: None,
            builder: GraphBuilder::new(resolver),
        }
    }

    pub fn with_upstream(mut self, upstream: impl Into<PathBuf>) -> Self {
        self.upstream = Some(upstream.into());
        self
    }

    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn upstream(&self) -> Option<&Path> {
        self.upstream.as_deref()
    }

    /// Build the custom graph from `<repo>/Packs`, restricted to `packs` when
    /// given, then build and merge the upstream shared packs if configured.
    pub fn build(
        &self,
        packs: Option<&[String]>,
        exclude: &[String],
    ) -> Result<RepositoryGraphs, BuildError> {
        let mut custom = ContentGraph::new(CUSTOM_GRAPH);
        let mut built = Vec::new();
        let mut skipped = Vec::new();

        let pack_dirs = self.custom_pack_dirs(packs, exclude)?;
        tracing::info!("Building {} packs from {}", pack_dirs.len(), self.repo.display());
        for dir in &pack_dirs {
            self.record(self.builder.build_pack(dir, &mut custom)?, dir, &mut built, &mut skipped);
        }

        let (upstream, merge) = match &self.upstream {
            Some(root) => {
                let mut upstream = ContentGraph::new(UPSTREAM_GRAPH);
                for name in UPSTREAM_PACK_DIRS {
                    let dir = root.join(PACKS_DIR).join(name);
                    self.record(self.builder.build_pack(&dir, &mut upstream)?, &dir, &mut built, &mut skipped);
                }
                let stats = merge_upstream(&mut custom, &upstream);
                (Some(upstream), Some(stats))
            }
            None => (None, None),
        };

        tracing::info!(
            "Custom graph: {} nodes, {} edges",
            custom.node_count(),
            custom.edge_count()
        );
        Ok(RepositoryGraphs {
            custom,
            upstream,
            merge,
            built,
            skipped,
        })
    }

    fn custom_pack_dirs(
        &self,
        packs: Option<&[String]>,
        exclude: &[String],
    ) -> Result<Vec<PathBuf>, BuildError> {
        let mut dirs = discovery::list_packs(&self.repo)?;
        dirs.retain(|dir| !discovery::is_excluded(dir, exclude));

        if let Some(selected) = packs {
            for name in selected {
                if !dirs.iter().any(|d| discovery::pack_dir_name(d) == *name) {
                    tracing::warn!("Selected pack {} not found under {}", name, self.repo.display());
                }
            }
            dirs.retain(|dir| selected.contains(&discovery::pack_dir_name(dir)));
        }
        Ok(dirs)
    }

    fn record(&self, outcome: PackOutcome, dir: &Path, built: &mut Vec<String>, skipped: &mut Vec<PathBuf>) {
        match outcome {
            PackOutcome::Built { pack, .. } => built.push(pack),
            PackOutcome::Skipped => skipped.push(dir.to_path_buf()),
        }
    }
}
