//! Per-pack graph construction
//!
//! Documents of one content step are parsed in parallel; the results are
//! applied to the graph one by one in sorted path order, so the graph has a
//! single writer and every run produces the same graph.

use crate::discovery::{self, ContentStep};
use crate::error::{BuildError, ContentError, Result};
use crate::parsers::{
    CaseTypeParser, ContentParser, IntegrationParser, LayoutParser, PackParser, PlaybookParser,
    ScriptParser,
};
use packgraph_core::{ContentGraph, DependencyResolver, NodeAttrs, Reference};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// What happened to one pack directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    Built { pack: String, documents: usize },
    /// No `pack_metadata.json`; the graph was left untouched.
    Skipped,
}

/// One parsed content document, ready to be applied to the graph.
#[derive(Debug)]
struct ParsedDocument {
    path: PathBuf,
    id: String,
    references: Vec<Reference>,
}

impl ParsedDocument {
    fn from_parser(path: &Path, parser: impl ContentParser) -> Result<Self> {
        Ok(ParsedDocument {
            path: path.to_path_buf(),
            id: parser.id().to_string(),
            references: parser.references()?,
        })
    }
}

pub struct GraphBuilder {
    resolver: DependencyResolver,
    steps: Vec<ContentStep>,
}

impl GraphBuilder {
    pub fn new(resolver: DependencyResolver) -> Self {
        GraphBuilder {
            resolver,
            steps: ContentStep::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Override the per-pack step order.
    pub fn with_step_order(mut self, steps: Vec<ContentStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    pub fn steps(&self) -> &[ContentStep] {
        &self.steps
    }

    /// Add one pack and all of its content to `graph`.
    pub fn build_pack(
        &self,
        pack_dir: &Path,
        graph: &mut ContentGraph,
    ) -> std::result::Result<PackOutcome, BuildError> {
        self.build_pack_inner(pack_dir, graph)
            .map_err(|source| BuildError::Pack {
                path: pack_dir.to_path_buf(),
                source,
            })
    }

    fn build_pack_inner(&self, pack_dir: &Path, graph: &mut ContentGraph) -> Result<PackOutcome> {
        let Some(metadata) = PackParser::parse(pack_dir)? else {
            tracing::warn!(
                "Skipping pack {}: no {} found",
                pack_dir.display(),
                crate::parsers::pack::METADATA_FILE
            );
            return Ok(PackOutcome::Skipped);
        };

        let pack = metadata.name;
        graph.add_node(&pack, NodeAttrs::pack(metadata.current_version));

        let mut documents = 0;
        for &step in &self.steps {
            let parsed = parse_step(pack_dir, step)?;
            tracing::debug!("{}: {} {}", pack, parsed.len(), step);
            documents += parsed.len();
            for doc in &parsed {
                self.apply(step, &pack, doc, graph);
            }
        }

        tracing::info!(
            "Built pack {} ({} documents, graph now {} nodes / {} edges)",
            pack,
            documents,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(PackOutcome::Built { pack, documents })
    }

    fn apply(&self, step: ContentStep, pack: &str, doc: &ParsedDocument, graph: &mut ContentGraph) {
        tracing::debug!("Applying {}", doc.path.display());
        let kind = step.node_kind();

        if step == ContentStep::Scripts {
            graph.add_node(&doc.id, NodeAttrs::default());
            // Scripts already used by another item of the pack hang off that item.
            if !graph.has_path(pack, &doc.id) {
                graph.add_edge(pack, &doc.id);
            }
        } else {
            graph.add_edge(pack, &doc.id);
        }
        graph.set_attrs(&doc.id, &NodeAttrs::kind(kind).with_owning_pack(pack));

        for reference in &doc.references {
            graph.add_edge(&reference.source, &reference.target);
            if step == ContentStep::Integrations {
                graph.set_attrs(
                    &reference.target,
                    &NodeAttrs::kind(reference.target_kind).with_owning_pack(pack),
                );
                continue;
            }
            graph.set_attrs(&reference.target, &NodeAttrs::kind(reference.target_kind));
            self.resolver.resolve(&reference.target, graph);
        }
    }
}

fn parse_step(pack_dir: &Path, step: ContentStep) -> Result<Vec<ParsedDocument>> {
    let files = discovery::content_files(pack_dir, step)?;
    let step_dir = pack_dir.join(step.subdir());
    files
        .par_iter()
        .filter(|path| {
            step != ContentStep::Scripts
                || !ScriptParser::is_excluded_path(path.strip_prefix(&step_dir).unwrap_or(path.as_path()))
        })
        .map(|path| parse_document(step, path))
        .collect()
}

fn parse_document(step: ContentStep, path: &Path) -> Result<ParsedDocument, ContentError> {
    match step {
        ContentStep::Playbooks => ParsedDocument::from_parser(path, PlaybookParser::open(path)?),
        ContentStep::Layouts => ParsedDocument::from_parser(path, LayoutParser::open(path)?),
        ContentStep::CaseTypes => ParsedDocument::from_parser(path, CaseTypeParser::open(path)?),
        ContentStep::Integrations => {
            ParsedDocument::from_parser(path, IntegrationParser::open(path)?)
        }
        ContentStep::Scripts => ParsedDocument::from_parser(path, ScriptParser::open(path)?),
    }
}
