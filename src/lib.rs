//! Load a BNF grammar and parse text with it.
//!
//! ```
//! let grammar = bnfparse::load_grammar(vec![
//!     "list ::= item ',' list",
//!     "       | item",
//!     "item ::= [a-z]+",
//! ])
//! .unwrap();
//!
//! let tree = bnfparse::parse("list", &grammar, "ab,c").unwrap();
//! let items: Vec<&str> = tree
//!     .iter()
//!     .filter(|n| n.name() == Some("item"))
//!     .map(|n| n.as_str())
//!     .collect();
//! assert_eq!(items, vec!["ab", "c"]);
//! ```

mod error;

pub use bnf::{
    parse_productions, validate, CharClass, Grammar, Item, Production, Quantifier, Rule,
    SyntaxError, SyntaxErrorKind, ValidationError, ValidationErrors,
};
pub use error::Error;
pub use interp::{
    Interpreter, Node, Nonterminal, NullObserver, ParseConfig, ParseError, ParseEvent,
    ParseObserver, Span,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Reads grammar source and validates it.
///
/// The first syntax error stops loading. Validation errors are all reported
/// together.
pub fn load_grammar<I, S>(lines: I) -> Result<Grammar>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(bnf::load_grammar(lines)?)
}

/// Parses all of `input` with the production named `root`.
pub fn parse<'g, 'i>(root: &str, grammar: &'g Grammar, input: &'i str) -> Result<Node<'g, 'i>> {
    Ok(interp::parse(root, grammar, input)?)
}
