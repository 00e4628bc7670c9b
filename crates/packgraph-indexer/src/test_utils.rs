//! Test utilities for building content repositories on disk

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty content repository with a `Packs/` directory.
pub fn create_content_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("Packs")).unwrap();
    temp_dir
}

pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// YAML playbook with one task per `(field, value)` pair.
pub fn playbook_yaml(id: &str, tasks: &[(&str, &str)]) -> String {
    let mut out = format!("id: {id}\nname: {id}\ntasks:\n");
    for (i, (field, value)) in tasks.iter().enumerate() {
        out.push_str(&format!(
            "  \"{i}\":\n    id: \"{i}\"\n    task:\n      id: task-{i}\n      {field}: {value}\n"
        ));
    }
    out
}

/// YAML script with the given source inlined as a block scalar.
pub fn script_yaml(id: &str, script_type: &str, source: &str) -> String {
    let mut out = format!("commonfields:\n  id: {id}\n  version: -1\nname: {id}\ntype: {script_type}\n");
    if source.is_empty() {
        out.push_str("script: '-'\n");
    } else {
        out.push_str("script: |-\n");
        for line in source.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn integration_yaml(id: &str, commands: &[&str]) -> String {
    let mut out = format!("commonfields:\n  id: {id}\nname: {id}\nscript:\n  type: python\n  commands:\n");
    for command in commands {
        out.push_str(&format!("  - name: {command}\n    arguments: []\n"));
    }
    out
}

/// A pack directory under `<repo>/Packs`.
pub struct PackFixture {
    dir: PathBuf,
}

impl PackFixture {
    /// Create the pack directory and its `pack_metadata.json`.
    pub fn new(repo: &Path, dir_name: &str, display_name: &str) -> Self {
        let dir = repo.join("Packs").join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        let metadata = serde_json::json!({
            "name": display_name,
            "currentVersion": "1.0.0",
        });
        fs::write(dir.join("pack_metadata.json"), metadata.to_string()).unwrap();
        PackFixture { dir }
    }

    /// A pack directory with no metadata file.
    pub fn without_metadata(repo: &Path, dir_name: &str) -> Self {
        let dir = repo.join("Packs").join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        PackFixture { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        write_file(&self.dir, rel, contents);
        self
    }

    pub fn playbook(&self, id: &str, tasks: &[(&str, &str)]) -> &Self {
        self.file(&format!("Playbooks/{id}.yml"), &playbook_yaml(id, tasks))
    }

    /// Script at `Scripts/<id>/<id>.yml` with inline source.
    pub fn script(&self, id: &str, source: &str) -> &Self {
        self.file(&format!("Scripts/{id}/{id}.yml"), &script_yaml(id, "python", source))
    }

    pub fn integration(&self, id: &str, commands: &[&str]) -> &Self {
        self.file(&format!("Integrations/{id}/{id}.yml"), &integration_yaml(id, commands))
    }

    pub fn layout(&self, id: &str, details: serde_json::Value) -> &Self {
        let doc = serde_json::json!({ "id": id, "detailsV2": details });
        self.file(&format!("Layouts/layoutscontainer-{id}.json"), &doc.to_string())
    }

    pub fn casetype(&self, doc: serde_json::Value) -> &Self {
        let id = doc["id"].as_str().unwrap_or("case").to_string();
        self.file(&format!("IncidentTypes/incidenttype-{id}.json"), &doc.to_string())
    }
}
