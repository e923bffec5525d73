//! Scene Script Parser
//!
//! Line scanning and parameter-expression parsing. Binding parameters to
//! command names happens later, in [`crate::validation`].

pub mod ast;
pub mod expression;
pub mod scanner;

pub use ast::{
    BinaryOp, BoundCommand, BoundParams, CommandLine, Expr, NamedValue, Node, Param, ScannedLine,
    TextLine,
};
pub use expression::{ExpressionParser, SyntaxError};
pub use scanner::{Scan, scan, scan_line};
