//! Line Scanner
//!
//! Splits script text into line-numbered nodes. Each line is classified on
//! its own, without looking at its neighbours.

use crate::core::Diagnostics;
use crate::parser::ast::{CommandLine, ScannedLine, TextLine};

/// Sigil that starts a command line
pub const COMMAND_SIGIL: char = '*';

/// Result of scanning a whole script
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub lines: Vec<ScannedLine>,
    pub diagnostics: Diagnostics,
}

/// Scan a whole script
///
/// Line numbers are 1-based and count every line, including zero-length
/// lines, which produce no node at all.
pub fn scan(source: &str) -> Scan {
    let mut diagnostics = Diagnostics::new();
    let lines = source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| scan_line(idx + 1, line, &mut diagnostics))
        .collect();

    Scan { lines, diagnostics }
}

/// Classify a single line
pub fn scan_line(line_num: usize, line: &str, diagnostics: &mut Diagnostics) -> Option<ScannedLine> {
    if line.is_empty() {
        return None;
    }

    let content = line.trim_start();
    if content.is_empty() {
        return Some(ScannedLine::Blank { line: line_num });
    }

    if let Some(after_sigil) = content.strip_prefix(COMMAND_SIGIL) {
        return Some(ScannedLine::Command(scan_command(
            line_num,
            line,
            after_sigil,
            diagnostics,
        )));
    }

    Some(ScannedLine::Text(TextLine {
        line: line_num,
        text: line.trim_end().to_string(),
    }))
}

fn scan_command(
    line_num: usize,
    line: &str,
    after_sigil: &str,
    diagnostics: &mut Diagnostics,
) -> CommandLine {
    let body = after_sigil.trim_start();
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(body.len());
    let (name, param) = body.split_at(name_end);

    if name.is_empty() {
        diagnostics.push(line_num, format!("Missing command name after \"{}\".", COMMAND_SIGIL));
    }

    // `param` is a suffix of `line`, so its start is the line length minus its own
    let param_offset = line.chars().count() - param.chars().count();

    CommandLine {
        line: line_num,
        command: name.to_lowercase(),
        param: param.to_string(),
        param_offset,
    }
}
