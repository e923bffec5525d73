//! Command Registry
//!
//! Immutable lookup table from command name to its definition and a
//! pre-configured parameter parser. Built once, then shared by reference
//! with every compile.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::definition::{CommandDef, SchemaFile};
use crate::parser::ExpressionParser;

/// Embedded built-in command table
pub const BUILTIN_SCHEMA: &str = include_str!("../../resources/commands.toml");

#[derive(Debug, Clone)]
struct RegisteredCommand {
    def: CommandDef,
    parser: ExpressionParser,
}

/// Command table keyed by lowercase command name
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
    sources: Vec<String>,
}

impl CommandRegistry {
    /// An empty registry; every command is unknown
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in command table
    pub fn builtin() -> Result<Self> {
        Self::new()
            .with_toml_str(BUILTIN_SCHEMA)
            .context("Parsing built-in command table")
    }

    /// Layer a TOML command table over this registry
    pub fn with_toml_str(self, content: &str) -> Result<Self> {
        let file: SchemaFile = toml::from_str(content)?;
        self.with_schema(file)
    }

    /// Layer a command table read from disk over this registry
    pub fn with_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading command table {}", path.display()))?;
        self.with_toml_str(&content)
            .with_context(|| format!("Loading command table {}", path.display()))
    }

    /// Layer a parsed command table; later definitions replace earlier ones
    pub fn with_schema(mut self, file: SchemaFile) -> Result<Self> {
        for def in file.commands {
            def.validate().map_err(|e| anyhow!(e))?;

            let key = def.name.to_lowercase();
            if self.commands.contains_key(&key) {
                log::warn!(
                    "Command '{}' from '{}' replaces an earlier definition",
                    key,
                    file.schema.name
                );
            }

            let parser = ExpressionParser::new(&def.flags, &def.keywords());
            self.commands.insert(key, RegisteredCommand { def, parser });
        }

        log::info!(
            "Loaded command table '{}' ({} commands registered)",
            file.schema.name,
            self.commands.len()
        );
        self.sources.push(file.schema.name);
        Ok(self)
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&CommandDef> {
        self.lookup(name).map(|cmd| &cmd.def)
    }

    /// Parser configured with the command's flags and keywords
    pub fn parser_for(&self, name: &str) -> Option<&ExpressionParser> {
        self.lookup(name).map(|cmd| &cmd.parser)
    }

    /// Sorted list of registered command names
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Names of the command tables layered into this registry, in order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredCommand> {
        match self.commands.get(name) {
            Some(cmd) => Some(cmd),
            None => self.commands.get(&name.to_lowercase()),
        }
    }
}
