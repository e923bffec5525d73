//! Configuration management for the scene compiler.
//!
//! Handles:
//! - Command-line argument parsing
//! - The optional `vn-project.toml` project file
//! - Merging both over built-in defaults (command line wins)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::codegen::GeneratorOptions;

/// Name of the optional per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = "vn-project.toml";

/// How diagnostics are reported on failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments for the scene compiler
#[derive(Debug, Parser)]
#[command(name = "vnc")]
#[command(about = "Compile visual novel scene scripts to C sources and resource manifests")]
#[command(version)]
pub struct Args {
    /// Project directory
    pub project: PathBuf,

    /// Source unit to start compiling from
    #[arg(long, help = "Entry scene (defaults to 'startup')")]
    pub entry: Option<String>,

    /// Where `src/` and `res/` outputs are written
    #[arg(long, help = "Output directory (defaults to the project directory)")]
    pub output: Option<PathBuf>,

    /// Extra command table layered over the built-in one
    #[arg(long, help = "Command table TOML file")]
    pub schema: Option<PathBuf>,

    /// Validate only, write nothing
    #[arg(long)]
    pub check: bool,

    /// Diagnostic report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Contents of `vn-project.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub entry: Option<String>,
    pub script_dir: Option<PathBuf>,
    pub script_extension: Option<String>,
    pub asset_root: Option<String>,
    pub compression: Option<String>,
    pub include: Option<String>,
    pub schema: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `<project>/vn-project.toml`, if there is one
    pub fn load(project: &Path) -> Result<Option<Self>> {
        let path = project.join(PROJECT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Reading {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Parsing {}", path.display()))?;
        Ok(Some(config))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub entry: String,
    /// Directory holding the scene scripts
    pub script_dir: PathBuf,
    pub script_extension: String,
    pub output_dir: PathBuf,
    /// Command tables layered over the built-in one, in order
    pub schema_files: Vec<PathBuf>,
    pub generator: GeneratorOptions,
    pub check_only: bool,
    pub format: OutputFormat,
    pub log_level: String,
    /// Path of the project file, if one was found
    pub project_config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from the process command line
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let project = ProjectConfig::load(&args.project)?;
        let project_config_path = project
            .as_ref()
            .map(|_| args.project.join(PROJECT_CONFIG_FILE));

        Ok(Self::merge(args, project.unwrap_or_default(), project_config_path))
    }

    fn merge(args: Args, project: ProjectConfig, project_config_path: Option<PathBuf>) -> Self {
        let defaults = GeneratorOptions::default();
        let project_dir = args.project;

        // Project-relative paths from the project file
        let mut schema_files: Vec<PathBuf> = project
            .schema
            .into_iter()
            .map(|p| project_dir.join(p))
            .collect();
        schema_files.extend(args.schema);

        Config {
            entry: args
                .entry
                .or(project.entry)
                .unwrap_or_else(|| "startup".to_string()),
            script_dir: project_dir.join(project.script_dir.unwrap_or_else(|| PathBuf::from("project"))),
            script_extension: project
                .script_extension
                .unwrap_or_else(|| "txt".to_string()),
            output_dir: args.output.unwrap_or_else(|| project_dir.clone()),
            schema_files,
            generator: GeneratorOptions {
                asset_root: project.asset_root.unwrap_or(defaults.asset_root),
                compression: project.compression.unwrap_or(defaults.compression),
                include: project.include.unwrap_or(defaults.include),
            },
            check_only: args.check,
            format: args.format,
            log_level: args.log_level,
            project_config_path,
            project_dir,
        }
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(project: &str, extra: &[&str]) -> Args {
        let mut argv = vec!["vnc", project];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_project_file() {
        let config = Config::merge(args("/games/demo", &[]), ProjectConfig::default(), None);

        assert_eq!(config.entry, "startup");
        assert_eq!(config.script_dir, PathBuf::from("/games/demo/project"));
        assert_eq!(config.script_extension, "txt");
        assert_eq!(config.output_dir, PathBuf::from("/games/demo"));
        assert_eq!(config.generator, GeneratorOptions::default());
        assert!(config.schema_files.is_empty());
        assert!(!config.check_only);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.has_project_config());
    }

    #[test]
    fn test_command_line_overrides_project_file() {
        let project = ProjectConfig::from_toml_str(
            r#"
            entry = "intro"
            script_dir = "scenes"
            compression = "NONE"
            schema = "commands.toml"
            "#,
        )
        .unwrap();

        let config = Config::merge(
            args(
                "/games/demo",
                &["--entry", "chapter1", "--schema", "/extra.toml", "--format", "json", "--check"],
            ),
            project,
            Some(PathBuf::from("/games/demo/vn-project.toml")),
        );

        assert_eq!(config.entry, "chapter1");
        assert_eq!(config.script_dir, PathBuf::from("/games/demo/scenes"));
        assert_eq!(config.generator.compression, "NONE");
        assert_eq!(config.generator.asset_root, "../project/");
        assert_eq!(
            config.schema_files,
            vec![
                PathBuf::from("/games/demo/commands.toml"),
                PathBuf::from("/extra.toml")
            ]
        );
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.check_only);
        assert!(config.has_project_config());
    }

    #[test]
    fn test_unknown_project_key_is_rejected() {
        assert!(ProjectConfig::from_toml_str("entyr = \"typo\"").is_err());
    }
}
