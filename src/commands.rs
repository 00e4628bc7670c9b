//! CLI command implementations

use anyhow::Context;
use packgraph_core::{export_graph, ContentGraph, DependencyIndex, ExportFormat, NodeKind};
use packgraph_indexer::{load_inventory, ConfigOverrides, PackgraphConfig, RepositoryGraph, RepositoryGraphs};
use std::path::{Path, PathBuf};

/// Where the built graph goes.
pub struct BuildOutput {
    pub json: bool,
    pub path: Option<PathBuf>,
    pub export_format: Option<String>,
}

pub fn build(config_path: Option<PathBuf>, overrides: ConfigOverrides, output: BuildOutput) -> anyhow::Result<()> {
    // Reject unknown export formats before any I/O.
    let export_format = output
        .export_format
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()?;

    let mut config = match &config_path {
        Some(path) => PackgraphConfig::load(path)?,
        None => {
            let repo = overrides.repo.clone().unwrap_or_else(|| PathBuf::from("."));
            PackgraphConfig::discover(&repo)?.unwrap_or_default()
        }
    };
    config.apply_overrides(&overrides);
    config.validate()?;

    let resolver = config.resolver()?;
    let repo = config.repo_root();
    tracing::info!("Repository root: {}", repo.display());

    let mut repository = RepositoryGraph::new(&repo, resolver);
    if let Some(upstream) = &config.upstream {
        repository = repository.with_upstream(upstream);
    }
    let graphs = repository
        .build(config.packs.as_deref(), &config.exclude)
        .with_context(|| format!("failed to build graph for {}", repo.display()))?;

    if let (Some(format), Some(path)) = (export_format, output.path.as_deref()) {
        export_graph(&graphs.custom, path, &format.to_string())?;
        return Ok(());
    }

    if output.json || output.path.is_some() {
        let json = serde_json::to_string_pretty(&graphs.custom.snapshot())?;
        match &output.path {
            Some(path) => {
                std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!("Wrote graph to {}", path.display());
            }
            None => println!("{json}"),
        }
        return Ok(());
    }

    print_summary(&graphs);
    Ok(())
}

fn print_summary(graphs: &RepositoryGraphs) {
    print_graph(&graphs.custom);
    if let Some(upstream) = &graphs.upstream {
        print_graph(upstream);
    }
    if let Some(stats) = &graphs.merge {
        println!(
            "merged upstream: {} shared items linked, {} packs promoted",
            stats.linked_items, stats.packs_promoted
        );
    }
    for dir in &graphs.skipped {
        println!("skipped (no metadata): {}", dir.display());
    }
}

fn print_graph(graph: &ContentGraph) {
    println!(
        "{} graph: {} nodes, {} edges",
        graph.name(),
        graph.node_count(),
        graph.edge_count()
    );
    for kind in NodeKind::ALL {
        let count = graph.nodes_of_kind(kind).count();
        if count > 0 {
            println!("  {:<20} {}", kind.label(), count);
        }
    }
    let untagged = graph.nodes().filter(|n| n.kind.is_none()).count();
    if untagged > 0 {
        println!("  {:<20} {}", "(untagged)", untagged);
    }
}

pub fn resolve(name: &str, inventory: &Path) -> anyhow::Result<()> {
    let inventory = load_inventory(inventory)?;
    let index = DependencyIndex::from_inventory(&inventory);

    let matches = index.lookup(name);
    if matches.is_empty() {
        println!("{name}: not provided by any installed pack");
        return Ok(());
    }
    for m in matches {
        println!("{name} -> {} ({:?})", m.pack, m.kind);
    }
    Ok(())
}
