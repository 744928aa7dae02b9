// ABOUTME: Host-side error types for lexing, numeric literals, and source loading

use crate::token::Position;
use thiserror::Error;

/// Fatal lexical errors. Everything else the lexer sees is deferred to the
/// parser, which embeds error nodes in the tree instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal starting at {0}")]
    UnterminatedString(Position),

    #[error("unclosed block comment starting at {0}")]
    UnclosedComment(Position),
}

/// Malformed numeric literals. These surface as parse-error nodes, not as
/// runtime errors: a bad literal is a property of the source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("Badly formatted number: non-numeric characters in number.")]
    BadDigit,

    #[error("Badly formatted number: expecting exponent digits after 'e'.")]
    MissingExponent,

    #[error("Badly formatted number: 'i' must come last in a number.")]
    MisplacedImaginary,

    #[error("Badly formatted number: scientific notation exponent must be an integer.")]
    RadixInExponent,

    #[error("Badly formatted number: malformed ratio literal.")]
    BadRatio,

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Cannot raise a number to a complex power.")]
    ComplexExponent,

    #[error("Operations < and > are undefined on complex numbers.")]
    ComplexOrdering,
}

/// Errors that stop a whole source text before evaluation begins.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// All parse diagnostics for the text, already formatted and joined.
    #[error("{0}")]
    Parse(String),
}
