//! Build configuration
//!
//! Loaded from `packgraph.toml` in the repository root (or an explicit
//! path), then overridden by command line values.

use crate::discovery::PACKS_DIR;
use crate::error::ConfigError;
use packgraph_core::{DependencyResolver, Inventory};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const CONFIG_FILE_NAME: &str = "packgraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackgraphConfig {
    /// Content repository holding `Packs/`.
    pub repo: Option<PathBuf>,
    /// Checkout of the upstream shared-library repository.
    pub upstream: Option<PathBuf>,
    /// JSON inventory of installed packs.
    pub inventory: Option<PathBuf>,
    /// Pack directory names left out of the build.
    pub exclude: Vec<String>,
    /// Restrict the build to these pack directory names.
    pub packs: Option<Vec<String>>,
}

/// Values given on the command line. `None` and empty lists keep the file
/// value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo: Option<PathBuf>,
    pub upstream: Option<PathBuf>,
    pub inventory: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub packs: Vec<String>,
}

impl PackgraphConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `packgraph.toml` in `repo`, if present.
    pub fn discover(repo: &Path) -> Result<Option<Self>, ConfigError> {
        let path = repo.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            trace!("No config at {}", path.display());
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(repo) = &overrides.repo {
            self.repo = Some(repo.clone());
        }
        if let Some(upstream) = &overrides.upstream {
            self.upstream = Some(upstream.clone());
        }
        if let Some(inventory) = &overrides.inventory {
            self.inventory = Some(inventory.clone());
        }
        if !overrides.exclude.is_empty() {
            self.exclude = overrides.exclude.clone();
        }
        if !overrides.packs.is_empty() {
            self.packs = Some(overrides.packs.clone());
        }
    }

    pub fn repo_root(&self) -> PathBuf {
        self.repo.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Check the configured repositories before any content is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let repo = self.repo_root();
        if !repo.join(PACKS_DIR).is_dir() {
            return Err(ConfigError::MissingPacksDir(repo));
        }
        if let Some(upstream) = &self.upstream {
            if !upstream.join(PACKS_DIR).is_dir() {
                return Err(ConfigError::MissingPacksDir(upstream.clone()));
            }
        }
        Ok(())
    }

    /// Resolver over the configured inventory; inert without one.
    pub fn resolver(&self) -> Result<DependencyResolver, ConfigError> {
        match &self.inventory {
            Some(path) => {
                let inventory = load_inventory(path)?;
                Ok(DependencyResolver::new(Some(&inventory)))
            }
            None => Ok(DependencyResolver::inert()),
        }
    }
}

pub fn load_inventory(path: &Path) -> Result<Inventory, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let inventory: Inventory =
        serde_json::from_str(&text).map_err(|source| ConfigError::Inventory {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Loaded inventory of {} packs from {}", inventory.len(), path.display());
    Ok(inventory)
}
