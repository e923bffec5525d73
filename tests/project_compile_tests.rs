//! Compiling a project directory through the driver
use std::fs;
use std::path::Path;

use clap::Parser;
use vn_script_compiler::config::{Args, Config};
use vn_script_compiler::core::{DirectorySource, SourceError, SourceProvider};
use vn_script_compiler::driver;

fn write_scene(project: &Path, name: &str, text: &str) {
    let dir = project.join("project");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.txt", name)), text).unwrap();
}

fn config(project: &Path, extra: &[&str]) -> Config {
    let mut argv = vec!["vnc".to_string(), project.display().to_string()];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Config::from_args(Args::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn test_directory_source_reads_units() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(dir.path(), "startup", "Hello");

    let source = DirectorySource::new(dir.path().join("project"), "txt");
    assert_eq!(source.read_source("startup").unwrap(), "Hello");
    assert!(matches!(
        source.read_source("nowhere"),
        Err(SourceError::NotFound { .. })
    ));
}

#[test]
fn test_run_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(
        dir.path(),
        "startup",
        "*background \"bg.png\"\nWelcome.\n*goto_scene ending\n",
    );
    write_scene(dir.path(), "ending", "*music \"end.vgm\"\nThe end.\n*finish\n");

    driver::run(&config(dir.path(), &[])).expect("project compiles");

    let source = fs::read_to_string(dir.path().join("src/generated_scripts.c")).unwrap();
    assert!(source.starts_with("#include \"vn_engine.h\"\n"));
    assert!(source.contains("void *VS_startup() {"));
    assert!(source.contains("void *VS_ending() {"));

    let gfx = fs::read_to_string(dir.path().join("res/gfx.res")).unwrap();
    assert_eq!(gfx, "IMAGE img_bg \"../project/bg.png\" APLIB");
    let music = fs::read_to_string(dir.path().join("res/music.res")).unwrap();
    assert_eq!(music, "XGM xgm_end \"../project/end.vgm\" APLIB");
}

#[test]
fn test_check_mode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(dir.path(), "startup", "*wait 10\n");

    driver::run(&config(dir.path(), &["--check"])).expect("project compiles");
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_failed_compile_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(dir.path(), "startup", "*wait\n");

    let err = driver::run(&config(dir.path(), &["--format", "json"])).unwrap_err();
    assert!(err.to_string().contains("1 error(s)"));
    assert!(!dir.path().join("src").exists());
    assert!(!dir.path().join("res").exists());
}

#[test]
fn test_missing_entry_unit_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(dir.path(), "other", "Hi\n");

    let err = driver::run(&config(dir.path(), &[])).unwrap_err();
    assert!(format!("{:#}", err).contains("Source unit not found: \"startup\""));
}

#[test]
fn test_schema_file_from_command_line() {
    let dir = tempfile::tempdir().unwrap();
    write_scene(dir.path(), "startup", "*shake 3\n");
    let schema = dir.path().join("extra.toml");
    fs::write(
        &schema,
        "[schema]\nname = \"extra\"\n\n[[commands]]\nname = \"shake\"\npositional = [\"strength\"]\n",
    )
    .unwrap();

    // Unknown without the extra table
    assert!(driver::run(&config(dir.path(), &["--check"])).is_err());

    let schema_arg = schema.display().to_string();
    driver::run(&config(dir.path(), &["--check", "--schema", &schema_arg])).expect("compiles");
}
