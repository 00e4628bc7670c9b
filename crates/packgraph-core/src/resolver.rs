//! Reverse lookup from content item names to the installed packs that
//! provide them.

use crate::graph::ContentGraph;
use crate::model::{NodeAttrs, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Snapshot of installed content, as reported by a marketplace listing.
pub type Inventory = Vec<InstalledPack>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstalledPack {
    pub id: String,
    #[serde(rename = "contentItems", default)]
    pub content_items: ContentItems,
}

/// Any of the arrays may be missing or `null` in real listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItems {
    #[serde(default)]
    pub automation: Option<Vec<NamedItem>>,
    #[serde(default)]
    pub integration: Option<Vec<InstalledIntegration>>,
    #[serde(default)]
    pub playbook: Option<Vec<NamedItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedItem {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledIntegration {
    pub id: String,
    #[serde(default)]
    pub commands: Option<Vec<NamedItem>>,
}

/// Everything one installed pack provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackContents {
    pub automation_names: BTreeSet<String>,
    pub playbook_names: BTreeSet<String>,
    pub integration_commands: BTreeMap<String, BTreeSet<String>>,
}

/// How a name matched an installed pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    Automation,
    Playbook,
    IntegrationCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackMatch {
    pub pack: String,
    pub kind: MatchKind,
}

/// Immutable index built once from an [`Inventory`].
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    packs: BTreeMap<String, PackContents>,
    owners: HashMap<String, Vec<PackMatch>>,
}

impl DependencyIndex {
    pub fn from_inventory(inventory: &[InstalledPack]) -> Self {
        let mut packs: BTreeMap<String, PackContents> = BTreeMap::new();

        for pack in inventory {
            let contents = packs.entry(pack.id.clone()).or_default();
            let items = &pack.content_items;

            for automation in items.automation.iter().flatten() {
                contents.automation_names.insert(automation.name.clone());
            }
            for playbook in items.playbook.iter().flatten() {
                contents.playbook_names.insert(playbook.name.clone());
            }
            for integration in items.integration.iter().flatten() {
                let commands = contents
                    .integration_commands
                    .entry(integration.id.clone())
                    .or_default();
                commands.extend(integration.commands.iter().flatten().map(|c| c.name.clone()));
            }
        }

        let mut owners: HashMap<String, Vec<PackMatch>> = HashMap::new();
        for (pack, contents) in &packs {
            let mut push = |name: &String, kind: MatchKind| {
                let matches = owners.entry(name.clone()).or_default();
                let m = PackMatch { pack: pack.clone(), kind };
                if !matches.contains(&m) {
                    matches.push(m);
                }
            };
            for name in &contents.automation_names {
                push(name, MatchKind::Automation);
            }
            for name in &contents.playbook_names {
                push(name, MatchKind::Playbook);
            }
            for name in contents.integration_commands.values().flatten() {
                push(name, MatchKind::IntegrationCommand);
            }
        }
        for matches in owners.values_mut() {
            matches.sort();
        }

        tracing::debug!("Dependency index built for {} installed packs", packs.len());
        DependencyIndex { packs, owners }
    }

    pub fn pack(&self, id: &str) -> Option<&PackContents> {
        self.packs.get(id)
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    /// Every pack providing `name`, in pack-id order.
    pub fn lookup(&self, name: &str) -> &[PackMatch] {
        self.owners.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Attaches installed packs to items the repository references but does
/// not define. Inert when built without an inventory.
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    index: Option<DependencyIndex>,
}

impl DependencyResolver {
    pub fn new(inventory: Option<&[InstalledPack]>) -> Self {
        DependencyResolver {
            index: inventory.filter(|i| !i.is_empty()).map(DependencyIndex::from_inventory),
        }
    }

    pub fn inert() -> Self {
        Self::default()
    }

    pub fn is_inert(&self) -> bool {
        self.index.is_none()
    }

    pub fn index(&self) -> Option<&DependencyIndex> {
        self.index.as_ref()
    }

    pub fn lookup(&self, name: &str) -> &[PackMatch] {
        self.index.as_ref().map(|i| i.lookup(name)).unwrap_or(&[])
    }

    /// Connect `name` to every installed pack that provides it. Integration
    /// command matches also tag `name` with the providing pack.
    pub fn resolve(&self, name: &str, graph: &mut ContentGraph) {
        for m in self.lookup(name) {
            graph.add_node(&m.pack, NodeAttrs::kind(NodeKind::Pack));
            graph.add_edge(name, &m.pack);
            if m.kind == MatchKind::IntegrationCommand {
                graph.set_attrs(
                    name,
                    &NodeAttrs::kind(NodeKind::IntegrationCommand).with_owning_pack(&m.pack),
                );
            }
        }
    }
}
