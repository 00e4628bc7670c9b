//! Integration tests for packgraph
//!
//! Builds a custom content repository and an upstream shared-library
//! repository on disk, then checks the merged graph through the library
//! and through the CLI.

use packgraph_core::{DependencyResolver, GraphEdge, GraphSnapshot, NodeKind, SHARED_PACK_VERSION};
use packgraph_indexer::{load_inventory, RepositoryGraph};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn pack(root: &Path, dir: &str, name: &str) {
    write(
        root,
        &format!("Packs/{dir}/pack_metadata.json"),
        &format!(r#"{{"name": "{name}", "currentVersion": "1.2.0"}}"#),
    );
}

fn script(root: &Path, pack_dir: &str, id: &str, source: &str) {
    let mut doc = format!("commonfields:\n  id: {id}\nname: {id}\ntype: python\nscript: |-\n");
    for line in source.lines() {
        doc.push_str(&format!("  {line}\n"));
    }
    write(root, &format!("Packs/{pack_dir}/Scripts/{id}/{id}.yml"), &doc);
}

/// Custom repo, upstream repo and inventory file.
fn fixture() -> (TempDir, TempDir, TempDir) {
    let custom = TempDir::new().unwrap();
    let c = custom.path();
    pack(c, "Phishing", "Phishing");
    write(
        c,
        "Packs/Phishing/Playbooks/Phishing_Triage.yml",
        r#"id: Phishing Triage
name: Phishing Triage
tasks:
  "0":
    task:
      scriptName: SetGridField
  "1":
    task:
      scriptName: Sleep
  "2":
    task:
      playbookId: Block IP - Generic v3
"#,
    );
    script(c, "Phishing", "ParseEmail", "user = demisto.executeCommand(\"ad-get-user\", {\"username\": sender})");
    script(c, "Phishing", "ParseEmail_test", "execute_command(\"never-seen\")");
    pack(c, "DeprecatedContent", "Deprecated Content");
    script(c, "DeprecatedContent", "OldScript", "execute_command(\"old\")");

    let upstream = TempDir::new().unwrap();
    let u = upstream.path();
    pack(u, "Base", "Base");
    script(u, "Base", "CommonServerPython", "def return_results(x):\n    pass");
    pack(u, "CommonScripts", "Common Scripts");
    script(u, "CommonScripts", "SetGridField", "demisto.results('ok')");
    pack(u, "CommonPlaybooks", "Common Playbooks");
    write(u, "Packs/CommonPlaybooks/Playbooks/Block_IP.yml", "id: Block IP - Generic v3\ntasks: {}\n");
    pack(u, "Unrelated", "Unrelated");

    let inventory = TempDir::new().unwrap();
    write(
        inventory.path(),
        "inventory.json",
        r#"[
            {"id": "Core", "contentItems": {"automation": [{"name": "Sleep"}], "integration": null}},
            {"id": "ActiveDirectory", "contentItems": {"integration": [
                {"id": "Active Directory Query v2", "commands": [{"name": "ad-get-user"}]}
            ]}}
        ]"#,
    );

    (custom, upstream, inventory)
}

#[test]
fn test_custom_and_upstream_merge() -> anyhow::Result<()> {
    let (custom, upstream, inventory) = fixture();
    let inv = load_inventory(&inventory.path().join("inventory.json"))?;

    let graphs = RepositoryGraph::new(custom.path(), DependencyResolver::new(Some(&inv)))
        .with_upstream(upstream.path())
        .build(None, &[])?;
    let graph = &graphs.custom;

    assert_eq!(graphs.built, ["Phishing", "Base", "Common Playbooks", "Common Scripts"]);

    // Scripts used by a playbook hang off the playbook; standalone ones off the pack.
    assert!(graph.has_edge("Phishing", "Phishing Triage"));
    assert!(graph.has_edge("Phishing", "ParseEmail"));
    assert!(!graph.contains_node("ParseEmail_test"));
    assert!(!graph.contains_node("never-seen"));
    assert!(!graph.contains_node("OldScript"));

    // Installed packs.
    assert!(graph.has_edge("Sleep", "Core"));
    let command = graph.node("ad-get-user").unwrap();
    assert_eq!(command.kind, Some(NodeKind::IntegrationCommand));
    assert_eq!(command.owning_pack.as_deref(), Some("ActiveDirectory"));

    // Shared upstream packs.
    assert!(graph.has_edge("SetGridField", "Common Scripts"));
    assert!(graph.has_edge("Block IP - Generic v3", "Common Playbooks"));
    assert!(!graph.contains_node("CommonServerPython"));
    for name in ["Base", "Common Scripts", "Common Playbooks"] {
        let node = graph.node(name).unwrap();
        assert_eq!(node.kind, Some(NodeKind::Pack));
        assert_eq!(node.version.as_deref(), Some(SHARED_PACK_VERSION));
    }
    assert!(graph.neighbors("Base").is_empty());

    let stats = graphs.merge.unwrap();
    assert_eq!(stats.linked_items, 2);
    assert_eq!(stats.packs_promoted, 3);
    Ok(())
}

#[test]
fn test_cli_json_output() -> anyhow::Result<()> {
    let (custom, upstream, inventory) = fixture();

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .arg("build")
        .arg("--repo")
        .arg(custom.path())
        .arg("--upstream")
        .arg(upstream.path())
        .arg("--inventory")
        .arg(inventory.path().join("inventory.json"))
        .arg("--json")
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let snapshot: GraphSnapshot = serde_json::from_slice(&output.stdout)?;
    assert_eq!(snapshot.name, "custom");
    assert!(snapshot.edges.contains(&GraphEdge::new("SetGridField", "Common Scripts")));
    assert!(snapshot.edges.contains(&GraphEdge::new("Phishing Triage", "SetGridField")));
    Ok(())
}

#[test]
fn test_cli_config_file_and_pack_selection() -> anyhow::Result<()> {
    let (custom, _upstream, _inventory) = fixture();
    write(custom.path(), "packgraph.toml", "exclude = [\"Phishing\"]\n");

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .args(["build", "--json", "--repo"])
        .arg(custom.path())
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let snapshot: GraphSnapshot = serde_json::from_slice(&output.stdout)?;
    assert!(snapshot.nodes.is_empty());
    Ok(())
}

#[test]
fn test_cli_rejects_unknown_export_format() -> anyhow::Result<()> {
    let (custom, _upstream, _inventory) = fixture();
    let out = custom.path().join("graph.dot");

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .args(["build", "--export-format", "DOT", "--repo"])
        .arg(custom.path())
        .arg("--output")
        .arg(&out)
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Output format DOT not one of GraphML,GML"), "{stderr}");
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_cli_rejects_export_format_before_reading_config() {
    let empty = TempDir::new().unwrap();
    let config = empty.path().join("missing.toml");

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .args(["build", "--export-format", "DOT", "--repo"])
        .arg(empty.path())
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(empty.path().join("graph.dot"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Output format DOT not one of GraphML,GML"), "{stderr}");
    assert!(!stderr.contains("failed to read config"), "{stderr}");
    assert!(!stderr.contains("has no Packs directory"), "{stderr}");
}

#[test]
fn test_cli_resolve() -> anyhow::Result<()> {
    let (_custom, _upstream, inventory) = fixture();

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .args(["resolve", "ad-get-user", "--inventory"])
        .arg(inventory.path().join("inventory.json"))
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ad-get-user -> ActiveDirectory (IntegrationCommand)"), "{stdout}");
    Ok(())
}

#[test]
fn test_cli_missing_packs_dir() {
    let empty = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_packgraph"))
        .args(["build", "--repo"])
        .arg(empty.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("has no Packs directory"));
}
