//! Validation Engine
//!
//! Completes the scanned script: every command line is resolved against the
//! command registry, its parameter string parsed, and the parsed values
//! bound to the declared names. Problems are accumulated, never raised.

use std::collections::BTreeMap;

use crate::core::Diagnostics;
use crate::parser::{
    BoundCommand, BoundParams, CommandLine, NamedValue, Node, Param, ScannedLine,
};
use crate::schema::{CommandDef, CommandRegistry};

/// A completed script and everything found wrong with it
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub nodes: Vec<Node>,
    pub diagnostics: Diagnostics,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Scan and complete a whole script
pub fn validate_document(content: &str, registry: &CommandRegistry) -> ValidationResult {
    let scan = crate::parser::scan(content);
    let mut diagnostics = scan.diagnostics;
    let nodes = complete(scan.lines, registry, &mut diagnostics);

    ValidationResult { nodes, diagnostics }
}

/// Complete scanned lines, preserving their order one-to-one
pub fn complete(
    lines: Vec<ScannedLine>,
    registry: &CommandRegistry,
    diagnostics: &mut Diagnostics,
) -> Vec<Node> {
    lines
        .into_iter()
        .map(|line| match line {
            ScannedLine::Text(text) => Node::Text(text),
            ScannedLine::Blank { line } => Node::Blank { line },
            ScannedLine::Command(cmd) => {
                Node::Command(complete_command(cmd, registry, diagnostics))
            }
        })
        .collect()
}

/// Resolve, parse and bind one command line
pub fn complete_command(
    cmd: CommandLine,
    registry: &CommandRegistry,
    diagnostics: &mut Diagnostics,
) -> BoundCommand {
    let unbound = |cmd: CommandLine| BoundCommand {
        line: cmd.line,
        command: cmd.command,
        params: None,
    };

    // Already reported by the scanner
    if cmd.command.is_empty() {
        return unbound(cmd);
    }

    let (Some(def), Some(parser)) = (registry.get(&cmd.command), registry.parser_for(&cmd.command))
    else {
        diagnostics.push(cmd.line, format!("Unknown command: \"{}\"", cmd.command));
        return unbound(cmd);
    };

    match parser.parse(&cmd.param) {
        Ok(params) => {
            let bound = bind_params(cmd.line, def, params, diagnostics);
            BoundCommand {
                line: cmd.line,
                command: cmd.command,
                params: Some(bound),
            }
        }
        Err(err) => {
            let err = err.offset_by(cmd.param_offset);
            log::debug!("line {}: {}", cmd.line, err);
            diagnostics.push(cmd.line, err.to_string());
            unbound(cmd)
        }
    }
}

/// Bind parsed parameters to the names declared by `def`
///
/// Expressions fill positional slots in order; slots left over stay `None`
/// and are checked lazily by whoever consumes them.
pub fn bind_params(
    line: usize,
    def: &CommandDef,
    params: Vec<Param>,
    diagnostics: &mut Diagnostics,
) -> BoundParams {
    let mut bound = BoundParams {
        positional: def.positional.iter().map(|name| (name.clone(), None)).collect(),
        named: BTreeMap::new(),
    };

    let mut found_positional = 0;
    for param in params {
        match param {
            Param::Expr(expr) => {
                if let Some(name) = def.positional.get(found_positional) {
                    bound.positional.insert(name.clone(), Some(expr));
                }
                found_positional += 1;
            }
            Param::Flag(flag) => {
                if bound.named.contains_key(&flag) {
                    diagnostics.push(
                        line,
                        format!("Duplicate flag \"{}\" for \"{}\".", flag, def.name),
                    );
                }
                bound.named.insert(flag.clone(), NamedValue::Flag(flag));
            }
            Param::Named { keyword, values } => {
                // The parser only produces records for declared keywords
                let Some(named_def) = def.find_named(&keyword) else {
                    continue;
                };

                if values.len() != named_def.fields.len() {
                    diagnostics.push(
                        line,
                        format!(
                            "Named parameter \"{}\" of \"{}\" expects {} values ({}), found {}.",
                            keyword,
                            def.name,
                            named_def.fields.len(),
                            named_def.fields.join(", "),
                            values.len()
                        ),
                    );
                    continue;
                }

                if bound.named.contains_key(&keyword) {
                    diagnostics.push(
                        line,
                        format!("Duplicate named parameter \"{}\" for \"{}\".", keyword, def.name),
                    );
                }

                let record = named_def.fields.iter().cloned().zip(values).collect();
                bound.named.insert(keyword, NamedValue::Record(record));
            }
        }
    }

    if found_positional > def.positional.len() {
        diagnostics.push(
            line,
            format!(
                "Too many parameters for \"{}\": expected at most {}, found {}.",
                def.name,
                def.positional.len(),
                found_positional
            ),
        );
    }

    bound
}
