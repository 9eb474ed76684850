use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("production '{0}' not found")]
    ProductionNotFound(String),
    /// No alternative of the root production matched.
    #[error("production '{root}' could not parse '{text}'")]
    NoMatch { root: String, text: String },
    /// The root production matched, but not all of the input.
    #[error("production '{root}' left unparsed text: '{text}'")]
    UnparsedText { root: String, text: String },
    #[error("grammar too deep: more than {limit} nested productions at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}
