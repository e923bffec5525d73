//! Expression Parser
//!
//! Parses a command's raw parameter string into a list of [`Param`]s.
//! Operators are resolved by binding power (Pratt parsing):
//!
//! | level | operators | associativity |
//! |-------|-----------|---------------|
//! | unary | `-`       | prefix        |
//! | 20    | `*` `/`   | left          |
//! | 10    | `+` `-`   | left          |
//!
//! On failure the parser reports the furthest column it reached together
//! with everything it would have accepted there. Parentheses and prefix
//! operators nest at most [`MAX_NESTING`] deep.

use std::collections::BTreeSet;
use std::fmt;

use crate::parser::ast::{BinaryOp, Expr, Param};

/// Binding power pair for an infix operator.
///
/// Left-associative operators have `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BindingPower {
    left: u8,
    right: u8,
}

impl BindingPower {
    const fn left(power: u8) -> Self {
        Self {
            left: power,
            right: power + 1,
        }
    }
}

/// Deepest accepted chain of parentheses and prefix operators
pub const MAX_NESTING: usize = 256;

const ADDITIVE: BindingPower = BindingPower::left(10);
const MULTIPLICATIVE: BindingPower = BindingPower::left(20);

impl BinaryOp {
    fn binding_power(self) -> BindingPower {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => ADDITIVE,
            BinaryOp::Multiply | BinaryOp::Divide => MULTIPLICATIVE,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(BinaryOp::Multiply),
            '/' => Some(BinaryOp::Divide),
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Subtract),
            _ => None,
        }
    }
}

/// A parameter list that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-based column within the parsed text
    pub column: usize,
    /// What would have been accepted at `column`, sorted
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Shift the column, e.g. from parameter-relative to line-relative
    pub fn offset_by(mut self, columns: usize) -> Self {
        self.column += columns;
        self
    }

    pub fn expectation_summary(&self) -> String {
        match self.expected.as_slice() {
            [single] => format!("Expected: {}", single),
            many => format!("Expected one of the following: {}", many.join(", ")),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error on the expression on column {}: {}",
            self.column,
            self.expectation_summary()
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Parameter-list parser configured for one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionParser {
    flags: Vec<String>,
    keywords: Vec<String>,
}

impl ExpressionParser {
    /// `flags` are matched verbatim; `keywords` introduce `keyword(...)` records
    pub fn new(flags: &[String], keywords: &[String]) -> Self {
        Self {
            flags: flags.to_vec(),
            keywords: keywords.to_vec(),
        }
    }

    /// Parse a comma-separated parameter list. Empty input is an empty list.
    pub fn parse(&self, source: &str) -> Result<Vec<Param>, SyntaxError> {
        let mut cursor = Cursor::new(source, self);
        cursor.parse_list().map_err(|Failed| cursor.error())
    }
}

/// Marker for "a failure was recorded in the cursor"
struct Failed;

type PResult<T> = Result<T, Failed>;

struct Cursor<'p> {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    furthest: usize,
    expected: BTreeSet<String>,
    config: &'p ExpressionParser,
}

impl<'p> Cursor<'p> {
    fn new(source: &str, config: &'p ExpressionParser) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
            furthest: 0,
            expected: BTreeSet::new(),
            config,
        }
    }

    fn error(&self) -> SyntaxError {
        SyntaxError {
            column: self.furthest + 1,
            expected: self.expected.iter().cloned().collect(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Record that `what` would have been accepted at the current position
    fn expect(&mut self, what: &str) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            self.expected.insert(what.to_string());
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            self.expect(&format!("'{}'", c));
            false
        }
    }

    /// True if `word` appears at the current position and ends on a word boundary
    fn looking_at_word(&self, word: &str) -> bool {
        let len = word.chars().count();
        let matches = self
            .chars
            .get(self.pos..self.pos + len)
            .is_some_and(|slice| slice.iter().copied().eq(word.chars()));
        matches && !self.chars.get(self.pos + len).copied().is_some_and(is_word_char)
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            self.expect("expression nested less deeply");
            return Err(Failed);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_list(&mut self) -> PResult<Vec<Param>> {
        let mut params = Vec::new();

        self.skip_whitespace();
        if self.at_end() {
            return Ok(params);
        }

        loop {
            params.push(self.parse_param()?);
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
        }

        self.skip_whitespace();
        if !self.at_end() {
            self.expect("end of parameters");
            return Err(Failed);
        }

        Ok(params)
    }

    fn parse_param(&mut self) -> PResult<Param> {
        self.skip_whitespace();

        let config = self.config;
        if let Some(flag) = config.flags.iter().find(|f| self.looking_at_word(f)) {
            self.pos += flag.chars().count();
            return Ok(Param::Flag(flag.clone()));
        }

        if let Some(keyword) = config.keywords.iter().find(|k| self.looking_at_word(k)) {
            let start = self.pos;
            self.pos += keyword.chars().count();
            self.skip_whitespace();
            if self.peek() == Some('(') {
                self.pos += 1;
                let values = self.parse_record_values()?;
                return Ok(Param::Named {
                    keyword: keyword.clone(),
                    values,
                });
            }
            // A bare keyword is just an identifier
            self.pos = start;
        }

        for flag in &config.flags {
            self.expect(&format!("\"{}\"", flag));
        }

        Ok(Param::Expr(self.parse_expression(0)?))
    }

    /// Values inside `keyword( ... )`, the opening paren already consumed
    fn parse_record_values(&mut self) -> PResult<Vec<Expr>> {
        let mut values = Vec::new();
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(values);
        }

        loop {
            values.push(self.parse_expression(0)?);
            self.skip_whitespace();
            if self.eat(')') {
                return Ok(values);
            }
            if !self.eat(',') {
                return Err(Failed);
            }
        }
    }

    fn parse_expression(&mut self, min_bp: u8) -> PResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            self.skip_whitespace();
            let Some(op) = self.peek().and_then(BinaryOp::from_char) else {
                for symbol in ["'*'", "'+'", "'-'", "'/'"] {
                    self.expect(symbol);
                }
                break;
            };

            let bp = op.binding_power();
            if bp.left < min_bp {
                break;
            }

            self.pos += 1;
            let rhs = self.parse_expression(bp.right)?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        self.skip_whitespace();

        match self.peek() {
            Some('-') => self.nested(|cursor| {
                cursor.pos += 1;
                Ok(Expr::negate(cursor.parse_prefix()?))
            }),
            Some('(') => self.nested(|cursor| {
                cursor.pos += 1;
                let inner = cursor.parse_expression(0)?;
                cursor.skip_whitespace();
                if cursor.eat(')') {
                    Ok(inner)
                } else {
                    Err(Failed)
                }
            }),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(self.parse_identifier()),
            _ => {
                for what in ["'('", "'-'", "number", "string", "identifier"] {
                    self.expect(what);
                }
                Err(Failed)
            }
        }
    }

    fn parse_number(&mut self) -> PResult<Expr> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();

        match digits.parse::<i64>() {
            Ok(value) => Ok(Expr::Number(value)),
            Err(_) => {
                self.pos = start;
                self.expect("number within 64-bit range");
                Err(Failed)
            }
        }
    }

    fn parse_string(&mut self) -> PResult<Expr> {
        // opening quote
        self.pos += 1;
        let mut raw = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.pos += 1;
                    return Ok(Expr::Str(interpret_escapes(&raw)));
                }
                Some('\\') => {
                    raw.push('\\');
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        raw.push(next);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    raw.push(c);
                    self.pos += 1;
                }
                None => {
                    self.expect("'\"'");
                    return Err(Failed);
                }
            }
        }
    }

    fn parse_identifier(&mut self) -> Expr {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        Expr::Identifier(self.chars[start..self.pos].iter().collect())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Resolve backslash escapes: `\b \f \n \r \t \uXXXX`; any other escaped
/// character stands for itself. A `\uXXXX` surrogate pair decodes to one
/// character; a lone surrogate becomes U+FFFD.
pub fn interpret_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => match take_code_unit(&mut chars) {
                Some(high @ 0xD800..=0xDBFF) => {
                    let mut rest = chars.clone();
                    let low = match (rest.next(), rest.next()) {
                        (Some('\\'), Some('u')) => take_code_unit(&mut rest)
                            .filter(|unit| (0xDC00..=0xDFFF).contains(unit)),
                        _ => None,
                    };
                    match low {
                        Some(low) => {
                            chars = rest;
                            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                        None => out.push(char::REPLACEMENT_CHARACTER),
                    }
                }
                Some(code) => out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
                None => out.push_str("\\u"),
            },
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Consume four hex digits, leaving `chars` untouched if they are not there
fn take_code_unit(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let hex: String = chars.clone().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let unit = u32::from_str_radix(&hex, 16).ok()?;
    for _ in 0..4 {
        chars.next();
    }
    Some(unit)
}
