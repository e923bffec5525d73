//! Compile pipeline
//!
//! Source text → scanned lines → completed nodes → generated C and
//! resource manifests. Diagnostics from every stage of every unit are
//! collected before deciding the outcome; an artifact is only returned
//! when there are none.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::codegen::{Artifact, CodeGenerator, GeneratorOptions};
use crate::core::{Diagnostic, Diagnostics, SourceError, SourceProvider};
use crate::parser::{Expr, Node};
use crate::schema::CommandRegistry;
use crate::validation::validate_document;

/// Diagnostics of one source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitDiagnostics {
    pub unit: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Why a compile produced no artifact
#[derive(Debug)]
pub enum CompileError {
    /// A source unit could not be read
    Source(SourceError),
    /// The scripts were read but contain errors
    Diagnostics(Vec<UnitDiagnostics>),
}

impl CompileError {
    /// Diagnostics grouped by unit, empty for source failures
    pub fn diagnostics(&self) -> &[UnitDiagnostics] {
        match self {
            CompileError::Source(_) => &[],
            CompileError::Diagnostics(units) => units,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Source(err) => write!(f, "{}", err),
            CompileError::Diagnostics(units) => {
                let count: usize = units.iter().map(|u| u.diagnostics.len()).sum();
                write!(f, "Compilation failed with {} error(s)", count)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Source(err) => Some(err),
            CompileError::Diagnostics(_) => None,
        }
    }
}

impl From<SourceError> for CompileError {
    fn from(err: SourceError) -> Self {
        CompileError::Source(err)
    }
}

/// Compiles source units against one command registry
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: CommandRegistry,
    options: GeneratorOptions,
}

impl Compiler {
    pub fn new(registry: CommandRegistry, options: GeneratorOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Compile a single unit whose text is already at hand
    pub fn compile_source(&self, unit: &str, source: &str) -> Result<Artifact, CompileError> {
        let mut generator = CodeGenerator::new(&self.registry, &self.options);
        let mut failures = Vec::new();

        let (_, diagnostics) = self.compile_into(&mut generator, unit, source);
        record(&mut failures, unit, diagnostics);
        Self::conclude(generator, failures)
    }

    /// Compile the named units, in order, into one artifact
    pub fn compile_units<P>(&self, provider: &P, units: &[&str]) -> Result<Artifact, CompileError>
    where
        P: SourceProvider + ?Sized,
    {
        let mut generator = CodeGenerator::new(&self.registry, &self.options);
        let mut failures = Vec::new();

        for unit in units {
            let source = provider.read_source(unit)?;
            let (_, diagnostics) = self.compile_into(&mut generator, unit, &source);
            record(&mut failures, unit, diagnostics);
        }

        Self::conclude(generator, failures)
    }

    /// Compile `entry` and every unit reachable from it through scene jumps.
    ///
    /// A jump target is scheduled once. Targets containing a path separator,
    /// or whose function name is degenerate or taken, are reported on the
    /// jump's line instead.
    pub fn compile_project<P>(&self, provider: &P, entry: &str) -> Result<Artifact, CompileError>
    where
        P: SourceProvider + ?Sized,
    {
        let mut generator = CodeGenerator::new(&self.registry, &self.options);
        let mut failures = Vec::new();

        let mut seen = HashSet::from([entry.to_string()]);
        let mut queue = VecDeque::from([entry.to_string()]);

        while let Some(unit) = queue.pop_front() {
            let source = provider.read_source(&unit)?;
            let (nodes, mut diagnostics) = self.compile_into(&mut generator, &unit, &source);

            for (line, target) in self.scene_targets(&nodes) {
                if seen.contains(&target) {
                    continue;
                }
                if target.contains(['/', '\\']) {
                    diagnostics.push(
                        line,
                        format!("Scene name \"{}\" must not contain a path separator.", target),
                    );
                    continue;
                }

                match generator.reserve_function(&target) {
                    Ok(_) => {
                        log::debug!("Unit \"{}\" schedules \"{}\"", unit, target);
                        seen.insert(target.clone());
                        queue.push_back(target);
                    }
                    Err(message) => diagnostics.push(line, message),
                }
            }

            record(&mut failures, &unit, diagnostics);
        }

        log::info!("Compiled {} source unit(s)", seen.len());
        Self::conclude(generator, failures)
    }

    fn compile_into(
        &self,
        generator: &mut CodeGenerator<'_>,
        unit: &str,
        source: &str,
    ) -> (Vec<Node>, Diagnostics) {
        log::debug!("Compiling unit \"{}\"", unit);

        let validated = validate_document(source, &self.registry);
        let mut diagnostics = validated.diagnostics;
        generator.generate_unit(unit, &validated.nodes, &mut diagnostics);

        (validated.nodes, diagnostics)
    }

    /// Units named by scene parameters, with their lines, in source order
    fn scene_targets(&self, nodes: &[Node]) -> Vec<(usize, String)> {
        nodes
            .iter()
            .filter_map(|node| match node {
                Node::Command(cmd) => Some(cmd),
                _ => None,
            })
            .filter_map(|cmd| {
                let param = self.registry.get(&cmd.command)?.scene.as_deref()?;
                match cmd.params.as_ref()?.positional(param)? {
                    Expr::Identifier(name) | Expr::Str(name) => Some((cmd.line, name.clone())),
                    _ => None,
                }
            })
            .collect()
    }

    fn conclude(
        generator: CodeGenerator<'_>,
        failures: Vec<UnitDiagnostics>,
    ) -> Result<Artifact, CompileError> {
        if failures.is_empty() {
            Ok(generator.finish())
        } else {
            Err(CompileError::Diagnostics(failures))
        }
    }
}

fn record(failures: &mut Vec<UnitDiagnostics>, unit: &str, diagnostics: Diagnostics) {
    if !diagnostics.is_empty() {
        log::debug!("Unit \"{}\" has {} error(s)", unit, diagnostics.len());
        failures.push(UnitDiagnostics {
            unit: unit.to_string(),
            diagnostics: diagnostics.into_vec(),
        });
    }
}
