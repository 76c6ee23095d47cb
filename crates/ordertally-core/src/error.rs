//! Error types for the ordertally-core library.

use thiserror::Error;

/// Main error type for the ordertally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Document could not be opened or parsed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A document in a batch could not be opened.
    #[error("{filename}: {source}")]
    Unreadable {
        filename: String,
        #[source]
        source: DocumentError,
    },

    /// Bill expression could not be evaluated.
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TallyError {
    /// Name of the offending upload, when the error is tied to one.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Unreadable { filename, .. } => Some(filename),
            _ => None,
        }
    }
}

/// Errors raised while opening a DOCX document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes are not a zip container.
    #[error("not a valid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive has no main document part.
    #[error("archive has no {0} part")]
    MissingPart(&'static str),

    /// The main document part is not well-formed XML.
    #[error("malformed document XML: {0}")]
    Xml(String),

    /// Reading the document part failed.
    #[error("failed to read document part: {0}")]
    Read(#[from] std::io::Error),
}

/// Errors raised while evaluating a bill expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The expression text was empty.
    #[error("empty bill expression")]
    Empty,

    /// No numeric value could be derived from the expression.
    #[error("no amount found in {expression:?}")]
    NoNumber { expression: String },

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected {token:?} at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// The expression ended before it was complete.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Parentheses or unary signs nested past the evaluator's limit.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result was infinite or NaN.
    #[error("result is not a finite number")]
    NonFinite,
}

/// Result type for the ordertally library.
pub type Result<T> = std::result::Result<T, TallyError>;
