use thiserror::Error;

/// Any failure of loading a grammar or parsing with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] bnf::Error),
    #[error(transparent)]
    Parse(#[from] interp::ParseError),
}

impl From<bnf::SyntaxError> for Error {
    fn from(err: bnf::SyntaxError) -> Error {
        Error::Grammar(err.into())
    }
}

impl From<bnf::ValidationErrors> for Error {
    fn from(err: bnf::ValidationErrors) -> Error {
        Error::Grammar(err.into())
    }
}
