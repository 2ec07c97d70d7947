//! Every workspace crate must inherit `version.workspace = true`.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .unwrap()
        .to_path_buf()
}

fn read_manifest(path: &Path) -> toml::Value {
    let raw = std::fs::read_to_string(path.join("Cargo.toml")).unwrap();
    raw.parse().unwrap()
}

fn uses_workspace_version(manifest: &toml::Value) -> bool {
    manifest
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_table())
        .and_then(|t| t.get("workspace"))
        .and_then(|w| w.as_bool())
        == Some(true)
}

#[test]
fn all_members_use_workspace_version() {
    let root = workspace_root();
    let workspace = read_manifest(&root);
    let members = workspace["workspace"]["members"].as_array().unwrap();
    assert!(!members.is_empty());

    for member in members {
        let member = member.as_str().unwrap();
        let manifest = read_manifest(&root.join(member));
        assert!(
            uses_workspace_version(&manifest),
            "{member} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let workspace = read_manifest(&workspace_root());
    let version = workspace["workspace"]["package"]["version"].as_str().unwrap();
    assert_eq!(version, env!("CARGO_PKG_VERSION"));
}
