//! Code Generator
//!
//! Lowers completed scripts to C source for the VN engine runtime and
//! collects the resource declarations that source depends on.
//!
//! Only commands with a generation rule produce code; every other command
//! is accepted and skipped.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::identifier;
use super::manifest::{Manifest, ResourceEntry, ResourceKind};
use crate::core::{Diagnostics, UNIT_LINE};
use crate::parser::{BoundCommand, BoundParams, Expr, NamedValue, Node};
use crate::schema::{CommandRegistry, GenerationRule};

pub const SOURCE_FILE: &str = "generated_scripts.c";
pub const GFX_MANIFEST: &str = "gfx.res";
pub const MUSIC_MANIFEST: &str = "music.res";

/// Settings that shape the emitted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Prefix joined with asset filenames in manifest paths
    pub asset_root: String,
    /// Compression scheme written into every manifest entry
    pub compression: String,
    /// Header included at the top of the generated source
    pub include: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            asset_root: "../project/".to_string(),
            compression: "APLIB".to_string(),
            include: "vn_engine.h".to_string(),
        }
    }
}

/// Generated source files and resource manifests, keyed by filename
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact {
    pub sources: BTreeMap<String, String>,
    pub resources: BTreeMap<String, String>,
}

/// Accumulates generating functions and manifests across source units
#[derive(Debug)]
pub struct CodeGenerator<'a> {
    registry: &'a CommandRegistry,
    options: &'a GeneratorOptions,
    gfx: Manifest,
    music: Manifest,
    functions: Vec<String>,
    /// Reserved function name to the unit it belongs to
    function_units: HashMap<String, String>,
    emitted: HashSet<String>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(registry: &'a CommandRegistry, options: &'a GeneratorOptions) -> Self {
        Self {
            registry,
            options,
            gfx: Manifest::new(),
            music: Manifest::new(),
            functions: Vec::new(),
            function_units: HashMap::new(),
            emitted: HashSet::new(),
        }
    }

    /// Reserve the generating-function name of `unit`.
    ///
    /// Fails with a message when the name is degenerate or already belongs
    /// to another unit. Reserving the same unit again is a no-op.
    pub fn reserve_function(&mut self, unit: &str) -> Result<String, String> {
        let Some(function) = identifier::function_name(unit) else {
            return Err(format!(
                "Scene name \"{}\" does not produce a valid identifier.",
                unit
            ));
        };

        match self.function_units.get(&function) {
            Some(owner) if owner != unit => Err(format!(
                "Scene \"{}\" generates \"{}\", which is already used by scene \"{}\".",
                unit, function, owner
            )),
            Some(_) => Ok(function),
            None => {
                self.function_units.insert(function.clone(), unit.to_string());
                Ok(function)
            }
        }
    }

    /// Emit the generating function for one source unit
    pub fn generate_unit(&mut self, unit: &str, nodes: &[Node], diagnostics: &mut Diagnostics) {
        let function = match self.reserve_function(unit) {
            Ok(function) if self.emitted.contains(&function) => {
                diagnostics.push(UNIT_LINE, format!("Scene \"{}\" is generated twice.", unit));
                None
            }
            Ok(function) => Some(function),
            Err(message) => {
                diagnostics.push(UNIT_LINE, message);
                None
            }
        };
        log::debug!("Generating unit \"{}\" from {} nodes", unit, nodes.len());

        // The body is still generated so its errors are reported
        let mut body = Vec::new();
        for node in nodes {
            body.extend(self.generate_node(node, diagnostics));
        }

        let Some(function) = function else {
            return;
        };
        body.push("VN_flushText();".to_string());
        body.push(format!("return {};", function));

        self.functions
            .push(format!("void *{}() {{\n{}\n}}", function, indent(&body)));
        self.emitted.insert(function);
    }

    /// Assemble the final source file and manifests
    pub fn finish(self) -> Artifact {
        let source = format!(
            "#include \"{}\"\n{}",
            self.options.include,
            self.functions.join("\n\n")
        );

        Artifact {
            sources: BTreeMap::from([(SOURCE_FILE.to_string(), source)]),
            resources: BTreeMap::from([
                (GFX_MANIFEST.to_string(), self.gfx.render()),
                (MUSIC_MANIFEST.to_string(), self.music.render()),
            ]),
        }
    }

    fn generate_node(&mut self, node: &Node, diagnostics: &mut Diagnostics) -> Vec<String> {
        match node {
            Node::Text(text) => vec![format!("VN_text(\"{}\");", text.text)],
            Node::Blank { .. } => Vec::new(),
            Node::Command(cmd) => self.generate_command(cmd, diagnostics),
        }
    }

    fn generate_command(&mut self, cmd: &BoundCommand, diagnostics: &mut Diagnostics) -> Vec<String> {
        // Unknown or unparseable commands were already reported
        let Some(params) = &cmd.params else {
            return Vec::new();
        };
        let Some(rule) = self.registry.get(&cmd.command).and_then(|def| def.generate) else {
            return Vec::new();
        };

        let line = cmd.line;
        match rule {
            GenerationRule::Background => {
                self.image_command("VN_background", line, params, diagnostics)
            }
            GenerationRule::Image => self.image_command("VN_image", line, params, diagnostics),
            GenerationRule::Music => self.music_command(line, params, diagnostics),
            GenerationRule::Wait => {
                let duration = number(
                    line,
                    params.positional(rule.required_parameter()),
                    "Wait duration",
                    diagnostics,
                );
                duration
                    .map(|d| vec![format!("VN_wait({});", d)])
                    .unwrap_or_default()
            }
        }
    }

    fn image_command(
        &mut self,
        function: &str,
        line: usize,
        params: &BoundParams,
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let Some(file_name) =
            string_constant(line, params.positional("fileName"), "Image filename", diagnostics)
        else {
            return Vec::new();
        };
        let Some(variable) = identifier::image_identifier(&file_name) else {
            diagnostics.push(line, "Image filename does not produce a valid identifier.");
            return Vec::new();
        };

        self.register(ResourceKind::Image, line, &variable, &file_name, diagnostics);

        let mut lines = Vec::new();
        if let Some(NamedValue::Record(at)) = params.named("at") {
            let x = number(line, at.get("x"), "Image position x", diagnostics);
            let y = number(line, at.get("y"), "Image position y", diagnostics);
            if let (Some(x), Some(y)) = (x, y) {
                lines.push(format!("VN_imageAt({}, {});", x, y));
            }
        }
        lines.push(format!("{}(&{});", function, variable));
        lines
    }

    fn music_command(
        &mut self,
        line: usize,
        params: &BoundParams,
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let Some(file_name) =
            string_constant(line, params.positional("fileName"), "Music filename", diagnostics)
        else {
            return Vec::new();
        };
        let Some(variable) = identifier::music_identifier(&file_name) else {
            diagnostics.push(line, "Music filename does not produce a valid identifier.");
            return Vec::new();
        };

        self.register(ResourceKind::Music, line, &variable, &file_name, diagnostics);
        vec![format!("VN_music({});", variable)]
    }

    fn register(
        &mut self,
        kind: ResourceKind,
        line: usize,
        variable: &str,
        file_name: &str,
        diagnostics: &mut Diagnostics,
    ) {
        let entry = ResourceEntry {
            kind,
            identifier: variable.to_string(),
            path: format!("{}{}", self.options.asset_root, file_name),
            compression: self.options.compression.clone(),
        };
        let manifest = match kind {
            ResourceKind::Image => &mut self.gfx,
            ResourceKind::Music => &mut self.music,
        };

        if let Err(clash) = manifest.register(entry) {
            diagnostics.push(
                line,
                format!(
                    "Resource identifier \"{}\" is already used by \"{}\".",
                    clash.identifier, clash.existing_path
                ),
            );
        }
    }
}

/// Read a string-constant parameter.
///
/// Missing values yield `None`; values of the wrong kind are reported and
/// their source text is used in place of the string.
fn string_constant(
    line: usize,
    param: Option<&Expr>,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match param {
        None => {
            diagnostics.push(line, format!("{} was not informed.", label));
            None
        }
        Some(Expr::Str(value)) => Some(value.clone()),
        Some(other) => {
            diagnostics.push(line, format!("{} must be a string constant.", label));
            Some(other.to_string())
        }
    }
}

/// Read a number-constant parameter, with the same policy as [`string_constant`]
fn number(
    line: usize,
    param: Option<&Expr>,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match param {
        None => {
            diagnostics.push(line, format!("{} was not informed.", label));
            None
        }
        Some(Expr::Number(value)) => Some(value.to_string()),
        Some(other) => {
            diagnostics.push(line, format!("{} must be a number.", label));
            Some(other.to_string())
        }
    }
}

fn indent(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("\t{}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
