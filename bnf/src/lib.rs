//! Grammar model, meta-parser and validator for line-oriented BNF grammars.
//!
//! ```text
//! ; comments start with a semicolon
//! real     ::= "-"? (fraction | integer)
//! fraction ::= digit+ "." digit+
//! integer  ::= digit+
//! digit    ::= [0-9]
//!          | #x0660
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

mod class;
mod error;
mod parser;
mod validate;

pub use class::CharClass;
pub use error::{Error, SyntaxError, SyntaxErrorKind, ValidationError, ValidationErrors};
pub use parser::parse_productions;
pub use validate::validate;

/// A postfix quantifier as written in grammar source.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Quantifier {
    /// `*`, zero or more.
    ZeroOrMore,
    /// `+`, one or more.
    OneOrMore,
    /// `?`, zero or one.
    Optional,
}

impl Quantifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Quantifier::ZeroOrMore),
            '+' => Some(Quantifier::OneOrMore),
            '?' => Some(Quantifier::Optional),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Quantifier::ZeroOrMore => '*',
            Quantifier::OneOrMore => '+',
            Quantifier::Optional => '?',
        }
    }

    /// Minimum and maximum match counts. `None` is unbounded.
    pub fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Quantifier::ZeroOrMore => (0, None),
            Quantifier::OneOrMore => (1, None),
            Quantifier::Optional => (0, Some(1)),
        }
    }
}

/// A single grammar atom.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Item {
    /// Exact text.
    Literal(String),
    /// Another production, looked up by name when matching.
    ProductionRef(String),
    /// An inline, anonymous alternation.
    Group(Vec<Rule>),
    CharClass(CharClass),
    CodePoint(char),
    /// Set difference between the neighbouring items.
    Subtract,
    /// An atom matched between `min` and `max` times. `max` of `None` is
    /// unbounded.
    Repeated {
        atom: Box<Item>,
        min: usize,
        max: Option<usize>,
    },
}

impl Item {
    pub fn is_production_ref(&self) -> bool {
        matches!(self.atom(), Item::ProductionRef(_))
    }

    pub fn is_subtract(&self) -> bool {
        matches!(self, Item::Subtract)
    }

    /// The item with any repetition stripped.
    pub fn atom(&self) -> &Item {
        match self {
            Item::Repeated { atom, .. } => atom,
            other => other,
        }
    }

    /// Repetition bounds, `(1, Some(1))` for an unrepeated item.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match self {
            Item::Repeated { min, max, .. } => (*min, *max),
            _ => (1, Some(1)),
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Item::Repeated { .. })
    }

    /// Applies a postfix quantifier. Quantifying an already repeated item
    /// widens its bounds. Returns `None` for `Subtract`, which has nothing to
    /// repeat.
    pub fn quantify(self, q: Quantifier) -> Option<Item> {
        let (qmin, qmax) = q.bounds();
        match self {
            Item::Subtract => None,
            Item::Repeated { atom, min, max } => Some(Item::Repeated {
                atom,
                min: min.min(qmin),
                max: match (max, qmax) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                },
            }),
            atom => Some(Item::Repeated {
                atom: Box::new(atom),
                min: qmin,
                max: qmax,
            }),
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Item::Literal(text) if text.contains('"') => write!(f, "'{}'", text),
            Item::Literal(text) => write!(f, "\"{}\"", text),
            Item::ProductionRef(name) => write!(f, "{}", name),
            Item::Group(rules) => {
                write!(f, "(")?;
                write_rules(f, rules)?;
                write!(f, ")")
            }
            Item::CharClass(class) => write!(f, "{}", class),
            Item::CodePoint(c) => write!(f, "#x{:X}", *c as u32),
            Item::Subtract => write!(f, "-"),
            Item::Repeated { atom, min, max } => {
                let suffix = match (min, max) {
                    (0, Some(1)) => "?",
                    (0, None) => "*",
                    _ => "+",
                };
                write!(f, "{}{}", atom, suffix)
            }
        }
    }
}

/// One alternative of a production: a concatenation of items.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Rule {
    pub items: Vec<Item>,
    /// The whole alternative may match zero times.
    ///
    /// An optional alternative always succeeds, so alternatives listed after
    /// it in the same production or group are never tried.
    pub optional: bool,
    /// The whole alternative may match one or more times.
    pub many: bool,
}

impl Rule {
    pub fn new(items: Vec<Item>) -> Self {
        Rule {
            items,
            ..Rule::default()
        }
    }

    pub fn quantify(&mut self, q: Quantifier) {
        match q {
            Quantifier::ZeroOrMore => {
                self.optional = true;
                self.many = true;
            }
            Quantifier::OneOrMore => self.many = true,
            Quantifier::Optional => self.optional = true,
        }
    }

    /// Repetition bounds of the whole alternative.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        let min = if self.optional { 0 } else { 1 };
        let max = if self.many { None } else { Some(1) };
        (min, max)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

fn write_rules(f: &mut fmt::Formatter, rules: &[Rule]) -> fmt::Result {
    for (i, rule) in rules.iter().enumerate() {
        if i != 0 {
            write!(f, " | ")?;
        }
        write!(f, "{}", rule)?;
        match (rule.optional, rule.many) {
            (true, true) => write!(f, " | *")?,
            (false, true) => write!(f, " | +")?,
            (true, false) => write!(f, " | ?")?,
            (false, false) => (),
        }
    }
    Ok(())
}

/// A named nonterminal with ordered alternatives. Rule order is the order
/// alternatives are tried in.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Production {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ::= ", self.name)?;
        write_rules(f, &self.rules)
    }
}

/// A set of productions keyed by name.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Grammar {
    productions: BTreeMap<String, Production>,
}

impl Grammar {
    pub fn get(&self, name: &str) -> Option<&Production> {
        self.productions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    /// Productions in name order.
    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Adds a production, handing it back if the name is taken.
    pub(crate) fn insert(&mut self, prod: Production) -> Result<(), Production> {
        if self.productions.contains_key(&prod.name) {
            return Err(prod);
        }
        self.productions.insert(prod.name.clone(), prod);
        Ok(())
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for prod in self.productions() {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        load_grammar(s.lines())
    }
}

/// Reads and validates a grammar. Returns the first syntax error, or every
/// validation error at once.
pub fn load_grammar<I, S>(lines: I) -> Result<Grammar, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let grammar = parse_productions(lines)?;
    validate(&grammar)?;
    Ok(grammar)
}
