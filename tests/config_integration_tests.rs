//! Project configuration loaded from a real directory
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use vn_script_compiler::config::{Args, Config, PROJECT_CONFIG_FILE};

fn args(project: &std::path::Path, extra: &[&str]) -> Args {
    let mut argv = vec!["vnc".to_string(), project.display().to_string()];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn test_project_config_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(PROJECT_CONFIG_FILE),
        "entry = \"prologue\"\nscript_extension = \"vns\"\nasset_root = \"../art/\"\n",
    )
    .unwrap();

    let config = Config::from_args(args(dir.path(), &[])).expect("create config");

    assert!(config.has_project_config());
    assert_eq!(config.entry, "prologue");
    assert_eq!(config.script_extension, "vns");
    assert_eq!(config.generator.asset_root, "../art/");
    assert_eq!(config.script_dir, dir.path().join("project"));
}

#[test]
fn test_missing_project_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_args(args(dir.path(), &["--output", "/tmp/out"])).unwrap();

    assert!(!config.has_project_config());
    assert_eq!(config.entry, "startup");
    assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn test_malformed_project_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(PROJECT_CONFIG_FILE), "entry = [").unwrap();

    let err = Config::from_args(args(dir.path(), &[])).unwrap_err();
    assert!(format!("{:#}", err).contains(PROJECT_CONFIG_FILE));
}
