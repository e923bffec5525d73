//! Abstract Syntax Tree for scene scripts
//!
//! Two layers: [`ScannedLine`] is what the line scanner produces, with
//! command parameters still unparsed; [`Node`] is the completed form, with
//! parameters parsed and bound to the names declared by the command table.

use std::collections::BTreeMap;
use std::fmt;

/// A line-level node straight out of the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum ScannedLine {
    /// Printable text, trailing whitespace removed
    Text(TextLine),
    /// Whitespace-only line
    Blank { line: usize },
    /// A `*command` line with its raw parameter string
    Command(CommandLine),
}

impl ScannedLine {
    pub fn line(&self) -> usize {
        match self {
            ScannedLine::Text(text) => text.line,
            ScannedLine::Blank { line } => *line,
            ScannedLine::Command(cmd) => cmd.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub line: usize,
    pub text: String,
}

/// A command line before parameter parsing
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine {
    pub line: usize,
    /// Lowercase command name
    pub command: String,
    /// Everything after the command name, untouched
    pub param: String,
    /// Number of characters on the line before `param` starts
    pub param_offset: usize,
}

/// A completed node: text and blanks pass through, commands are bound
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(TextLine),
    Blank { line: usize },
    Command(BoundCommand),
}

impl Node {
    pub fn line(&self) -> usize {
        match self {
            Node::Text(text) => text.line,
            Node::Blank { line } => *line,
            Node::Command(cmd) => cmd.line,
        }
    }
}

/// A command whose parameters went through the expression parser
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand {
    pub line: usize,
    pub command: String,
    /// `None` for unknown commands and unparseable parameter lists
    pub params: Option<BoundParams>,
}

/// Parameters bound to the names declared for a command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    /// Every declared positional name is present; `None` means omitted
    pub positional: BTreeMap<String, Option<Expr>>,
    pub named: BTreeMap<String, NamedValue>,
}

impl BoundParams {
    pub fn positional(&self, name: &str) -> Option<&Expr> {
        self.positional.get(name).and_then(|value| value.as_ref())
    }

    pub fn named(&self, keyword: &str) -> Option<&NamedValue> {
        self.named.get(keyword)
    }
}

/// Value bound under a keyword
#[derive(Debug, Clone, PartialEq)]
pub enum NamedValue {
    /// A flag literal that was present
    Flag(String),
    /// A keyword record such as `at(10, 20)`, keyed by field name
    Record(BTreeMap<String, Expr>),
}

/// One element of a parsed parameter list
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Flag(String),
    Named { keyword: String, values: Vec<Expr> },
    Expr(Expr),
}

/// Binary operators, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
        }
    }
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Str(String),
    Identifier(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn negate(operand: Expr) -> Self {
        Expr::Negate(Box::new(operand))
    }
}

/// Fully parenthesised rendering, handy for messages and debugging
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Negate(operand) => write!(f, "-{}", operand),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_display() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::Number(1),
            Expr::binary(BinaryOp::Multiply, Expr::Number(2), Expr::negate(Expr::Identifier("x".into()))),
        );
        assert_eq!(expr.to_string(), "(1 + (2 * -x))");
        assert_eq!(Expr::Str("a\"b".into()).to_string(), "\"a\\\"b\"");
    }

    #[test]
    fn test_bound_params_lookup() {
        let mut params = BoundParams::default();
        params.positional.insert("fileName".into(), None);
        params.positional.insert("duration".into(), Some(Expr::Number(30)));
        params.named.insert("loop".into(), NamedValue::Flag("loop".into()));

        assert!(params.positional("fileName").is_none());
        assert_eq!(params.positional("duration"), Some(&Expr::Number(30)));
        assert_eq!(params.named("loop"), Some(&NamedValue::Flag("loop".into())));
        assert!(params.named("at").is_none());
    }

    #[test]
    fn test_node_line() {
        let node = Node::Blank { line: 4 };
        assert_eq!(node.line(), 4);
        let scanned = ScannedLine::Text(TextLine {
            line: 2,
            text: "Hi".into(),
        });
        assert_eq!(scanned.line(), 2);
    }
}
