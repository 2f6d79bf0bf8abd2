use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaQueryError {
    #[error("empty media query")]
    Empty,
    #[error("expected '(' at byte {0}")]
    ExpectedParen(usize),
    #[error("unclosed '(' at byte {0}")]
    Unclosed(usize),
    #[error("missing ':' in `{0}`")]
    MissingColon(String),
    #[error("unknown media feature `{0}`")]
    UnknownFeature(String),
    #[error("invalid value `{value}` for `{feature}`")]
    InvalidValue { feature: String, value: String },
    #[error("expected `and` between conditions, found `{0}`")]
    ExpectedAnd(String),
}

/// Messages are what `ClipboardState::error` carries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard is not available")]
    Unavailable,
    #[error("Cannot copy empty or whitespace text")]
    EmptyText,
    #[error("Failed to copy")]
    Copy { reason: String },
    #[error("Failed to paste")]
    Paste { reason: String },
}
