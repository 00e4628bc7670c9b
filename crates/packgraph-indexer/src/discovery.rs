//! Locating packs and the content documents inside them

use crate::error::{BuildError, ContentError, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use packgraph_core::NodeKind;
use std::fmt;
use std::path::{Path, PathBuf};

pub const PACKS_DIR: &str = "Packs";

/// Packs that never take part in a build.
pub const ALWAYS_EXCLUDED: &[&str] = &["DeprecatedContent"];

/// One content kind inside a pack and where its documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentStep {
    Playbooks,
    Layouts,
    CaseTypes,
    Integrations,
    Scripts,
}

impl ContentStep {
    /// Scripts come last: items parsed earlier may already reach them.
    pub const DEFAULT_ORDER: [ContentStep; 5] = [
        ContentStep::Playbooks,
        ContentStep::Layouts,
        ContentStep::CaseTypes,
        ContentStep::Integrations,
        ContentStep::Scripts,
    ];

    pub fn subdir(self) -> &'static str {
        match self {
            ContentStep::Playbooks => "Playbooks",
            ContentStep::Layouts => "Layouts",
            ContentStep::CaseTypes => "IncidentTypes",
            ContentStep::Integrations => "Integrations",
            ContentStep::Scripts => "Scripts",
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            ContentStep::Layouts | ContentStep::CaseTypes => "*.json",
            _ => "*.yml",
        }
    }

    /// Integrations and scripts live one directory per item.
    pub fn recursive(self) -> bool {
        matches!(self, ContentStep::Integrations | ContentStep::Scripts)
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            ContentStep::Playbooks => NodeKind::Playbook,
            ContentStep::Layouts => NodeKind::Layout,
            ContentStep::CaseTypes => NodeKind::CaseType,
            ContentStep::Integrations => NodeKind::Integration,
            ContentStep::Scripts => NodeKind::Script,
        }
    }
}

impl fmt::Display for ContentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdir())
    }
}

fn matcher(pattern: &'static str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| ContentError::Pattern { pattern, source })
}

/// Documents of `step` inside `pack_dir`, sorted by path.
pub fn content_files(pack_dir: &Path, step: ContentStep) -> Result<Vec<PathBuf>> {
    let dir = pack_dir.join(step.subdir());
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let glob = matcher(step.pattern())?;

    let mut walker = WalkBuilder::new(&dir);
    walker.standard_filters(false).follow_links(true);
    if !step.recursive() {
        walker.max_depth(Some(1));
    }

    let mut files = Vec::new();
    for entry in walker.build() {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            ContentError::Io {
                path: dir.clone(),
                source: e.into_io_error().unwrap_or_else(|| std::io::Error::other(message)),
            }
        })?;
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && glob.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Pack directory name, as matched against exclude lists.
pub fn pack_dir_name(pack_dir: &Path) -> String {
    pack_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_excluded(pack_dir: &Path, exclude: &[String]) -> bool {
    let name = pack_dir_name(pack_dir);
    ALWAYS_EXCLUDED.contains(&name.as_str()) || exclude.iter().any(|e| *e == name)
}

/// Every pack directory under `<repo>/Packs`, sorted by name.
pub fn list_packs(repo: &Path) -> std::result::Result<Vec<PathBuf>, BuildError> {
    let packs_dir = repo.join(PACKS_DIR);
    let entries = std::fs::read_dir(&packs_dir).map_err(|source| BuildError::Discovery {
        path: packs_dir.clone(),
        source,
    })?;

    let mut packs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::Discovery {
            path: packs_dir.clone(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            packs.push(path);
        }
    }
    packs.sort();
    Ok(packs)
}
