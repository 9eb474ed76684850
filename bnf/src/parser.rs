use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{anychar, char, hex_digit1, space0},
    combinator::{recognize, verify},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::class::{self, CharClass};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::{Grammar, Item, Production, Quantifier, Rule};

/// Deepest allowed nesting of parenthesized groups.
pub const MAX_GROUP_DEPTH: usize = 64;

/// Reads productions from grammar source without validating references.
///
/// Stops at the first syntax error.
pub fn parse_productions<I, S>(lines: I) -> Result<Grammar, SyntaxError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut grammar = Grammar::default();
    // The production being built, with the line its header was on.
    let mut current: Option<(usize, Production)> = None;

    for (idx, raw) in lines.into_iter().enumerate() {
        let lineno = idx + 1;
        let normalized = raw.as_ref().replace('\t', " ");
        let line = normalized.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let err = |kind| SyntaxError::new(lineno, kind);

        if let Some(body) = line.strip_prefix('|') {
            let (_, prod) = current
                .as_mut()
                .ok_or_else(|| err(SyntaxErrorKind::ContinuationWithoutProduction))?;
            let alts = Scanner::new(line, body).alternatives().map_err(err)?;
            merge_alternatives(&mut prod.rules, alts).map_err(err)?;
        } else {
            if let Some(prev) = current.take() {
                finish(&mut grammar, prev)?;
            }
            let (name, body) = header(line).map_err(err)?;
            if grammar.contains(name) {
                return Err(err(SyntaxErrorKind::DuplicateProduction(name.to_owned())));
            }
            let alts = Scanner::new(line, body).alternatives().map_err(err)?;
            let mut rules = Vec::new();
            merge_alternatives(&mut rules, alts).map_err(err)?;
            current = Some((
                lineno,
                Production {
                    name: name.to_owned(),
                    rules,
                },
            ));
        }
    }

    if let Some(prev) = current {
        finish(&mut grammar, prev)?;
    }

    Ok(grammar)
}

fn finish(grammar: &mut Grammar, (lineno, prod): (usize, Production)) -> Result<(), SyntaxError> {
    if prod.rules.is_empty() {
        return Err(SyntaxError::new(
            lineno,
            SyntaxErrorKind::EmptyProduction(prod.name),
        ));
    }
    grammar.insert(prod).map_err(|prod| {
        SyntaxError::new(lineno, SyntaxErrorKind::DuplicateProduction(prod.name))
    })
}

/// Splits `name ::= body` into its name and body.
fn header(line: &str) -> Result<(&str, &str), SyntaxErrorKind> {
    let (rest, name) =
        identifier(line).map_err(|_| SyntaxErrorKind::ExpectedName(line.to_owned()))?;
    let (body, _) =
        definition(rest).map_err(|_| SyntaxErrorKind::ExpectedDefinition(line.to_owned()))?;
    Ok((name, body))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        verify(anychar, |c: &char| c.is_alphabetic()),
        take_while(is_name_char),
    ))(input)
}

fn definition(input: &str) -> IResult<&str, &str> {
    preceded(space0, tag("::="))(input)
}

pub fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

pub fn hex_code_point(input: &str) -> IResult<&str, &str> {
    preceded(tag("#x"), hex_digit1)(input)
}

pub fn bracketed(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_until("]"), char(']'))(input)
}

/// An alternative before quantifier markers are folded into their neighbours.
#[derive(PartialEq, Eq, Debug)]
enum Alternative {
    Rule(Rule),
    /// A bare `*`, `+` or `?` standing in for a whole alternative.
    Marker(Quantifier),
}

/// Appends alternatives to `rules`, applying each marker to the alternative
/// immediately before it.
fn merge_alternatives(rules: &mut Vec<Rule>, alts: Vec<Alternative>) -> Result<(), SyntaxErrorKind> {
    for alt in alts {
        match alt {
            Alternative::Rule(rule) => rules.push(rule),
            Alternative::Marker(q) => match rules.last_mut() {
                Some(prev) => prev.quantify(q),
                None => return Err(SyntaxErrorKind::NothingToRepeat(q.symbol())),
            },
        }
    }
    Ok(())
}

/// Scans a rule body, one line at a time.
struct Scanner<'a> {
    /// The full line, for diagnostics.
    line: &'a str,
    rest: &'a str,
    depth: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str, body: &'a str) -> Self {
        Scanner {
            line,
            rest: body,
            depth: 0,
        }
    }

    fn alternatives(mut self) -> Result<Vec<Alternative>, SyntaxErrorKind> {
        self.scan()
    }

    fn advance(&mut self, n: usize) {
        self.rest = &self.rest[n..];
    }

    fn line(&self) -> String {
        self.line.to_owned()
    }

    /// Collects alternatives until end of line, or until the closing `)` when
    /// inside a group.
    fn scan(&mut self) -> Result<Vec<Alternative>, SyntaxErrorKind> {
        let nested = self.depth > 0;
        let mut alts = Vec::new();
        let mut items: Vec<Item> = Vec::new();

        loop {
            self.rest = self.rest.trim_start();
            let c = match self.rest.chars().next() {
                Some(c) => c,
                None if nested => return Err(SyntaxErrorKind::UnclosedGroup(self.line())),
                None => break,
            };

            match c {
                ')' if nested => {
                    self.advance(1);
                    break;
                }
                ')' => return Err(SyntaxErrorKind::UnmatchedParen(self.line())),
                ';' if nested => return Err(SyntaxErrorKind::UnclosedGroup(self.line())),
                // Trailing comment.
                ';' => break,
                '|' => {
                    self.advance(1);
                    flush(&mut alts, &mut items);
                }
                '*' | '+' | '?' => {
                    self.advance(1);
                    let q = Quantifier::from_char(c).unwrap_or(Quantifier::Optional);
                    match items.pop() {
                        Some(prev) => {
                            let item = prev
                                .quantify(q)
                                .ok_or(SyntaxErrorKind::NothingToRepeat(c))?;
                            items.push(item);
                        }
                        None => alts.push(Alternative::Marker(q)),
                    }
                }
                '-' => {
                    self.advance(1);
                    items.push(Item::Subtract);
                }
                '"' | '\'' => {
                    let (rest, text) = quoted(self.rest).map_err(|_| {
                        SyntaxErrorKind::UnterminatedLiteral {
                            quote: c,
                            line: self.line(),
                        }
                    })?;
                    items.push(Item::Literal(text.to_owned()));
                    self.rest = rest;
                }
                '#' => items.push(self.code_point()?),
                '[' => items.push(self.char_class()?),
                '(' => {
                    self.advance(1);
                    items.push(self.group()?);
                }
                c if c.is_alphabetic() => {
                    let (rest, name) = identifier(self.rest)
                        .map_err(|_| SyntaxErrorKind::InvalidCharacter { ch: c, line: self.line() })?;
                    items.push(Item::ProductionRef(name.to_owned()));
                    self.rest = rest;
                }
                ch => {
                    return Err(SyntaxErrorKind::InvalidCharacter {
                        ch,
                        line: self.line(),
                    })
                }
            }
        }

        flush(&mut alts, &mut items);
        Ok(alts)
    }

    fn group(&mut self) -> Result<Item, SyntaxErrorKind> {
        if self.depth >= MAX_GROUP_DEPTH {
            return Err(SyntaxErrorKind::NestingTooDeep(MAX_GROUP_DEPTH));
        }
        self.depth += 1;
        let alts = self.scan()?;
        self.depth -= 1;

        let mut rules = Vec::new();
        merge_alternatives(&mut rules, alts)?;
        if rules.is_empty() {
            return Err(SyntaxErrorKind::EmptyGroup(self.line()));
        }
        Ok(Item::Group(rules))
    }

    fn code_point(&mut self) -> Result<Item, SyntaxErrorKind> {
        if !self.rest.starts_with("#x") {
            return Err(SyntaxErrorKind::ExpectedHexMarker(self.line()));
        }
        let (rest, hex) = hex_code_point(self.rest).map_err(|_| {
            let text = self.rest.split_whitespace().next().unwrap_or(self.rest);
            SyntaxErrorKind::InvalidCodePoint(text.to_owned())
        })?;
        let c = class::code_point(hex)
            .ok_or_else(|| SyntaxErrorKind::InvalidCodePoint(format!("#x{}", hex)))?;
        self.rest = rest;
        Ok(Item::CodePoint(c))
    }

    fn char_class(&mut self) -> Result<Item, SyntaxErrorKind> {
        let (rest, spec) =
            bracketed(self.rest).map_err(|_| SyntaxErrorKind::UnterminatedClass(self.line()))?;
        let class: CharClass = spec.parse().map_err(|reason| SyntaxErrorKind::InvalidClass {
            spec: spec.to_owned(),
            reason,
        })?;
        self.rest = rest;
        Ok(Item::CharClass(class))
    }
}

/// Ends the current alternative. Empty alternatives are dropped.
fn flush(alts: &mut Vec<Alternative>, items: &mut Vec<Item>) {
    if !items.is_empty() {
        alts.push(Alternative::Rule(Rule::new(std::mem::take(items))));
    }
}
