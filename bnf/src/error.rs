use std::fmt::{self, Display};
use thiserror::Error;

/// A fatal error encountered while reading grammar source. Loading stops at
/// the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct SyntaxError {
    /// 1-based line number.
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(line: usize, kind: SyntaxErrorKind) -> Self {
        SyntaxError { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected production name: {0:?}")]
    ExpectedName(String),
    #[error("expected '::=': {0:?}")]
    ExpectedDefinition(String),
    #[error("expected '<production>' before '|'")]
    ContinuationWithoutProduction,
    #[error("duplicate production name '{0}'")]
    DuplicateProduction(String),
    #[error("production '{0}' has no rules")]
    EmptyProduction(String),
    #[error("no closing {quote} found: {line}")]
    UnterminatedLiteral { quote: char, line: String },
    #[error("expected 'x' after '#': {0}")]
    ExpectedHexMarker(String),
    #[error("invalid code point '{0}'")]
    InvalidCodePoint(String),
    #[error("no closing ] found: {0}")]
    UnterminatedClass(String),
    #[error("invalid character class [{spec}]: {reason}")]
    InvalidClass { spec: String, reason: String },
    #[error("unmatched ')': {0}")]
    UnmatchedParen(String),
    #[error("no closing ) found: {0}")]
    UnclosedGroup(String),
    #[error("empty group: {0}")]
    EmptyGroup(String),
    #[error("groups nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("nothing to repeat before '{0}'")]
    NothingToRepeat(char),
    #[error("invalid character '{ch}': {line}")]
    InvalidCharacter { ch: char, line: String },
}

/// A single defect found while validating a complete grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("production '{production}' rule '{rule}': production '{name}' not found")]
    UndefinedProduction {
        production: String,
        rule: String,
        name: String,
    },
    #[error("production '{production}' rule '{rule}': rule has left recursion")]
    LeftRecursion { production: String, rule: String },
    #[error("production '{production}' rule '{rule}': self reference is not in tail position")]
    NonTailRecursion { production: String, rule: String },
    #[error("production '{production}' rule '{rule}': {reason}")]
    MalformedSubtraction {
        production: String,
        rule: String,
        reason: &'static str,
    },
}

/// Every defect found in a grammar, in production name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Either failure mode of loading a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}
