//! Command Schema Types
//!
//! Serde types for command tables (matches the TOML layout of
//! `resources/commands.toml`) and their load-time checks.

use serde::Deserialize;

/// Root command-table file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaFile {
    pub schema: SchemaMeta,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

/// Command-table metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// One command of the scripting language
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandDef {
    pub name: String,
    pub description: Option<String>,
    /// Positional parameter names, in binding order
    #[serde(default)]
    pub positional: Vec<String>,
    /// Literal keywords accepted as flags
    #[serde(default)]
    pub flags: Vec<String>,
    /// Keyword records such as `at(x, y)`
    #[serde(default)]
    pub named: Vec<NamedDef>,
    /// How the command is lowered to generated code, if at all
    pub generate: Option<GenerationRule>,
    /// Positional parameter naming another source unit to compile
    pub scene: Option<String>,
}

/// A keyword record parameter
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NamedDef {
    pub keyword: String,
    pub fields: Vec<String>,
}

/// Code-generation behaviour of a command
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationRule {
    Background,
    Image,
    Music,
    Wait,
}

impl GenerationRule {
    /// Positional parameter the rule reads
    pub fn required_parameter(self) -> &'static str {
        match self {
            GenerationRule::Background | GenerationRule::Image | GenerationRule::Music => {
                "fileName"
            }
            GenerationRule::Wait => "duration",
        }
    }
}

impl CommandDef {
    pub fn find_named(&self, keyword: &str) -> Option<&NamedDef> {
        self.named.iter().find(|n| n.keyword == keyword)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.named.iter().map(|n| n.keyword.clone()).collect()
    }

    /// Check the definition is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if !is_identifier(&self.name) {
            return Err(format!("Command name '{}' is not an identifier", self.name));
        }

        for (idx, param) in self.positional.iter().enumerate() {
            if self.positional[..idx].contains(param) {
                return Err(format!(
                    "Command '{}' declares positional parameter '{}' twice",
                    self.name, param
                ));
            }
        }

        for flag in &self.flags {
            if !is_identifier(flag) {
                return Err(format!(
                    "Flag '{}' of command '{}' is not an identifier",
                    flag, self.name
                ));
            }
        }

        for named in &self.named {
            if !is_identifier(&named.keyword) {
                return Err(format!(
                    "Keyword '{}' of command '{}' is not an identifier",
                    named.keyword, self.name
                ));
            }
            if self.flags.contains(&named.keyword) {
                return Err(format!(
                    "Keyword '{}' of command '{}' is also declared as a flag",
                    named.keyword, self.name
                ));
            }
            if named.fields.is_empty() {
                return Err(format!(
                    "Keyword '{}' of command '{}' declares no fields",
                    named.keyword, self.name
                ));
            }
        }

        if let Some(rule) = self.generate {
            let required = rule.required_parameter();
            if !self.positional.iter().any(|p| p == required) {
                return Err(format!(
                    "Command '{}' is generated as {:?} but does not declare the '{}' parameter",
                    self.name, rule, required
                ));
            }
        }

        if let Some(scene) = &self.scene {
            if !self.positional.contains(scene) {
                return Err(format!(
                    "Command '{}' names scene parameter '{}' but does not declare it",
                    self.name, scene
                ));
            }
        }

        Ok(())
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
