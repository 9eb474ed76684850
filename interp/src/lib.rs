//! Backtracking interpreter for `bnf` grammars.
//!
//! Alternatives are tried in order and the first to match wins. Repetition is
//! greedy and never backtracks into fewer matches. The root production must
//! consume the entire input.

use bnf::Grammar;

mod ast;
mod config;
mod error;
mod position;
mod span;
mod state;
mod trace;

pub use ast::{DfsParseTreeIterator, Node, Nonterminal};
pub use config::ParseConfig;
pub use error::ParseError;
pub use position::Position;
pub use span::Span;
pub use state::{MatchResult, State};
pub use trace::{NullObserver, ParseEvent, ParseObserver};

/// Parses input against a grammar. The grammar is only read, so one
/// interpreter may be shared between threads.
#[derive(Debug, Clone)]
pub struct Interpreter<'g> {
    grammar: &'g Grammar,
    config: ParseConfig,
}

impl<'g> Interpreter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Interpreter {
            grammar,
            config: ParseConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Match `input` in full against the production named `root`.
    pub fn parse<'i>(&self, root: &str, input: &'i str) -> Result<Node<'g, 'i>, ParseError> {
        self.parse_with_observer(root, input, &mut NullObserver)
    }

    /// Like `parse`, reporting each step to `observer`.
    pub fn parse_with_observer<'i>(
        &self,
        root: &str,
        input: &'i str,
        observer: &mut dyn ParseObserver<'g>,
    ) -> Result<Node<'g, 'i>, ParseError> {
        let prod = self
            .grammar
            .get(root)
            .ok_or_else(|| ParseError::ProductionNotFound(root.to_owned()))?;

        let mut state = State::new(self.grammar, &self.config, observer);
        match state.production(prod, Position::new(input))? {
            None => Err(ParseError::NoMatch {
                root: root.to_owned(),
                text: input.to_owned(),
            }),
            Some((_, end)) if !end.is_end() => Err(ParseError::UnparsedText {
                root: root.to_owned(),
                text: end.rest().to_owned(),
            }),
            Some((node, _)) => Ok(node),
        }
    }
}

/// Parse `input` with the production named `root`, using the default
/// configuration.
pub fn parse<'g, 'i>(root: &str, grammar: &'g Grammar, input: &'i str) -> Result<Node<'g, 'i>, ParseError> {
    Interpreter::new(grammar).parse(root, input)
}
