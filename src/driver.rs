//! Command-line driver
//!
//! Glue between configuration, the compiler and the file system.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::codegen::Artifact;
use crate::compiler::{CompileError, Compiler, UnitDiagnostics};
use crate::config::{Config, OutputFormat};
use crate::core::DirectorySource;
use crate::schema::CommandRegistry;

/// Build the command registry the configuration asks for
pub fn load_registry(config: &Config) -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::builtin()?;
    for path in &config.schema_files {
        registry = registry.with_file(path)?;
    }

    log::info!("Command tables: {}", registry.sources().join(", "));
    log::debug!("Known commands: {}", registry.command_names().join(", "));
    Ok(registry)
}

/// Compile the configured project and write its outputs
pub fn run(config: &Config) -> Result<()> {
    if let Some(path) = &config.project_config_path {
        log::info!("Using project configuration {}", path.display());
    }

    let registry = load_registry(config)?;
    let compiler = Compiler::new(registry, config.generator.clone());
    let provider = DirectorySource::new(&config.script_dir, &config.script_extension);

    let artifact = match compiler.compile_project(&provider, &config.entry) {
        Ok(artifact) => artifact,
        Err(CompileError::Diagnostics(units)) => {
            report(&units, config.format)?;
            bail!(CompileError::Diagnostics(units));
        }
        Err(err) => return Err(err).context("Compiling project"),
    };

    if config.check_only {
        log::info!("Check passed, nothing written");
        return Ok(());
    }

    write_artifact(&artifact, &config.output_dir)
}

/// Print diagnostics to stderr (text) or stdout (JSON)
pub fn report(units: &[UnitDiagnostics], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for unit in units {
                for diagnostic in &unit.diagnostics {
                    eprintln!("{}:{}: {}", unit.unit, diagnostic.line, diagnostic.message);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(units).context("Serializing diagnostics")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Write sources under `<output>/src` and manifests under `<output>/res`
pub fn write_artifact(artifact: &Artifact, output: &Path) -> Result<()> {
    let groups = [("src", &artifact.sources), ("res", &artifact.resources)];

    for (subdir, files) in groups {
        let dir = output.join(subdir);
        fs::create_dir_all(&dir).with_context(|| format!("Creating {}", dir.display()))?;

        for (name, content) in files {
            let path = dir.join(name);
            fs::write(&path, content).with_context(|| format!("Writing {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_artifact_layout() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact {
            sources: BTreeMap::from([("generated_scripts.c".to_string(), "int x;".to_string())]),
            resources: BTreeMap::from([
                ("gfx.res".to_string(), "IMAGE img_a \"a.png\" APLIB".to_string()),
                ("music.res".to_string(), String::new()),
            ]),
        };

        write_artifact(&artifact, dir.path()).unwrap();

        let source = fs::read_to_string(dir.path().join("src/generated_scripts.c")).unwrap();
        assert_eq!(source, "int x;");
        let gfx = fs::read_to_string(dir.path().join("res/gfx.res")).unwrap();
        assert_eq!(gfx, "IMAGE img_a \"a.png\" APLIB");
        assert!(dir.path().join("res/music.res").exists());
    }

    #[test]
    fn test_load_registry_layers_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("extra.toml");
        fs::write(
            &schema,
            "[schema]\nname = \"extra\"\n\n[[commands]]\nname = \"shake\"\npositional = [\"strength\"]\n",
        )
        .unwrap();

        let argv = ["vnc", "/games/demo", "--schema", schema.to_str().unwrap()];
        let config = Config::from_args(crate::config::Args::try_parse_from(argv).unwrap()).unwrap();
        let registry = load_registry(&config).unwrap();

        assert_eq!(registry.sources(), ["vn-script", "extra"]);
        assert!(registry.command_names().contains(&"shake"));
        assert!(registry.get("wait").is_some());
    }
}
