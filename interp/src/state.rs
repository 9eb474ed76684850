use std::collections::HashMap;

use bnf::{Grammar, Item, Production, Rule};

use crate::ast::Node;
use crate::config::ParseConfig;
use crate::error::ParseError;
use crate::position::Position;
use crate::span::Span;
use crate::trace::{ParseEvent, ParseObserver};

/// `Ok(None)` is an ordinary match failure, which the caller backtracks
/// from. `Err` aborts the whole parse.
pub type MatchResult<'i, T> = Result<Option<(T, Position<'i>)>, ParseError>;

/// Identifies a production attempt: production address, input address and
/// length, offset. Subtraction matches against a slice of the input, so the
/// input is part of the key.
type MemoKey = (usize, usize, usize, usize);

/// Matching state for a single parse.
///
/// Every match takes a starting position and returns the position it ended
/// at. A failed match returns nothing, so the caller retries from the
/// position it already holds.
pub struct State<'g, 'i, 'o> {
    grammar: &'g Grammar,
    config: &'o ParseConfig,
    observer: &'o mut dyn ParseObserver<'g>,
    depth: usize,
    /// Offset of the current input within the whole input. Non-zero while
    /// matching the right operand of a subtraction.
    base: usize,
    memo: HashMap<MemoKey, Option<(Node<'g, 'i>, Position<'i>)>>,
}

impl<'g, 'i, 'o> State<'g, 'i, 'o> {
    pub fn new(
        grammar: &'g Grammar,
        config: &'o ParseConfig,
        observer: &'o mut dyn ParseObserver<'g>,
    ) -> Self {
        State {
            grammar,
            config,
            observer,
            depth: 0,
            base: 0,
            memo: HashMap::new(),
        }
    }

    /// Match a production, trying its rules in order.
    pub fn production(
        &mut self,
        prod: &'g Production,
        pos: Position<'i>,
    ) -> MatchResult<'i, Node<'g, 'i>> {
        let key = memo_key(prod, pos);
        if self.config.memoize {
            if let Some(hit) = self.memo.get(&key) {
                let offset = self.offset(pos);
                self.observer.event(ParseEvent::MemoHit {
                    production: &prod.name,
                    offset,
                });
                return Ok(hit.clone());
            }
        }

        let offset = self.offset(pos);
        self.observer.event(ParseEvent::Enter {
            production: &prod.name,
            offset,
        });

        let matched =
            self.nested(pos, |s| s.alternatives(&prod.rules, pos, Some(prod.name.as_str())))?;
        let result = matched.map(|((rule, children), end)| {
            let node = Node::nonterminal(Some(prod), rule, children, Span::between(pos, end));
            (node, end)
        });

        let base = self.base;
        self.observer.event(ParseEvent::Exit {
            production: &prod.name,
            offset,
            end: result.as_ref().map(|(_, end)| base + end.offset()),
        });

        if self.config.memoize {
            self.memo.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Ordered choice: the first rule to match wins.
    fn alternatives(
        &mut self,
        rules: &'g [Rule],
        pos: Position<'i>,
        owner: Option<&'g str>,
    ) -> MatchResult<'i, (&'g Rule, Vec<Node<'g, 'i>>)> {
        for (idx, rule) in rules.iter().enumerate() {
            if let Some((children, end)) = self.rule(rule, pos)? {
                return Ok(Some(((rule, children), end)));
            }
            let offset = self.offset(pos);
            self.observer.event(ParseEvent::RuleFailed {
                production: owner,
                rule: idx,
                offset,
            });
        }
        Ok(None)
    }

    fn rule(&mut self, rule: &'g Rule, pos: Position<'i>) -> MatchResult<'i, Vec<Node<'g, 'i>>> {
        let (min, max) = rule.bounds();
        self.repeat(pos, min, max, |s, p| s.sequence(&rule.items, p))
    }

    /// Match every item in order. Any failure fails the whole sequence.
    ///
    /// Subtraction chains fold to the left: `a - b - c` is `(a - b) - c`.
    fn sequence(&mut self, items: &'g [Item], pos: Position<'i>) -> MatchResult<'i, Vec<Node<'g, 'i>>> {
        let mut children = Vec::new();
        let mut cur = pos;
        let mut idx = 0;

        while idx < items.len() {
            let item = &items[idx];
            let matched = if items.get(idx + 1).map_or(false, Item::is_subtract) {
                let mut excluded = Vec::new();
                idx += 1;
                while items.get(idx).map_or(false, Item::is_subtract) {
                    match items.get(idx + 1) {
                        Some(right) => excluded.push(right),
                        None => return Ok(None),
                    }
                    idx += 2;
                }
                self.difference(item, &excluded, cur)?
            } else {
                idx += 1;
                self.item(item, cur)?
            };

            match matched {
                Some((nodes, end)) => {
                    children.extend(nodes);
                    cur = end;
                }
                None => return Ok(None),
            }
        }

        Ok(Some((children, cur)))
    }

    /// Match an item, honouring its repetition. Each repetition contributes
    /// one node; a skipped optional item contributes none.
    fn item(&mut self, item: &'g Item, pos: Position<'i>) -> MatchResult<'i, Vec<Node<'g, 'i>>> {
        let (min, max) = item.bounds();
        let atom = item.atom();
        self.repeat(pos, min, max, |s, p| {
            Ok(s.atom(atom, p)?.map(|(node, end)| (vec![node], end)))
        })
    }

    /// `left - right - ...`: whatever `left` matches, unless one of the
    /// right operands matches that exact text in full. Repetition on the last
    /// right operand applies to the whole.
    fn difference(
        &mut self,
        left: &'g Item,
        excluded: &[&'g Item],
        pos: Position<'i>,
    ) -> MatchResult<'i, Vec<Node<'g, 'i>>> {
        let (min, max) = excluded.last().map_or((1, Some(1)), |right| right.bounds());
        self.repeat(pos, min, max, |s, p| {
            let (nodes, end) = match s.item(left, p)? {
                Some(m) => m,
                None => return Ok(None),
            };
            for right in excluded {
                if s.matches_exactly(right.atom(), p, end)? {
                    return Ok(None);
                }
            }
            Ok(Some((nodes, end)))
        })
    }

    /// Whether `atom` matches all of the text between `start` and `end`, and
    /// nothing past it.
    fn matches_exactly(
        &mut self,
        atom: &'g Item,
        start: Position<'i>,
        end: Position<'i>,
    ) -> Result<bool, ParseError> {
        let text = &start.input()[start.offset()..end.offset()];
        let outer = self.base;
        self.base += start.offset();
        let res = self.atom(atom, Position::new(text));
        self.base = outer;
        Ok(matches!(res?, Some((_, rest)) if rest.is_end()))
    }

    fn atom(&mut self, atom: &'g Item, pos: Position<'i>) -> MatchResult<'i, Node<'g, 'i>> {
        match atom {
            Item::Literal(text) => {
                let mut end = pos;
                if end.match_str(text) {
                    Ok(Some((Node::Terminal(Span::between(pos, end)), end)))
                } else {
                    Ok(None)
                }
            }
            Item::ProductionRef(name) => {
                let grammar = self.grammar;
                let prod = grammar
                    .get(name)
                    .ok_or_else(|| ParseError::ProductionNotFound(name.clone()))?;
                self.production(prod, pos)
            }
            Item::Group(rules) => {
                let matched = self.nested(pos, |s| s.alternatives(rules, pos, None))?;
                Ok(matched.map(|((rule, children), end)| {
                    let node = Node::nonterminal(None, rule, children, Span::between(pos, end));
                    (node, end)
                }))
            }
            Item::CharClass(class) => Ok(single_char(pos, |c| class.contains(c))),
            Item::CodePoint(cp) => Ok(single_char(pos, |c| c == *cp)),
            // Repetition is never nested, see `Item::quantify`.
            Item::Repeated { atom, .. } => self.atom(atom, pos),
            // Only meaningful between two operands, handled by `sequence`.
            Item::Subtract => Ok(None),
        }
    }

    /// Apply `f` greedily between `min` and `max` times, concatenating the
    /// nodes of each match. Never gives back matches once taken.
    fn repeat<T, F>(
        &mut self,
        pos: Position<'i>,
        min: usize,
        max: Option<usize>,
        mut f: F,
    ) -> MatchResult<'i, Vec<T>>
    where
        F: FnMut(&mut Self, Position<'i>) -> MatchResult<'i, Vec<T>>,
    {
        let mut out = Vec::new();
        let mut cur = pos;
        let mut count = 0;

        while max.map_or(true, |max| count < max) {
            match f(self, cur)? {
                Some((nodes, end)) => {
                    out.extend(nodes);
                    count += 1;
                    let zero_width = end.offset() == cur.offset();
                    cur = end;
                    // Another attempt would match the same nothing forever.
                    if zero_width {
                        count = count.max(min);
                        break;
                    }
                }
                None => break,
            }
        }

        if count < min {
            Ok(None)
        } else {
            Ok(Some((out, cur)))
        }
    }

    /// Run `f` one level deeper, failing the parse past the configured
    /// depth.
    fn nested<T, F>(&mut self, pos: Position<'i>, f: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.config.max_depth,
                offset: self.offset(pos),
            });
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    /// Offset of `pos` within the whole input.
    fn offset(&self, pos: Position<'i>) -> usize {
        self.base + pos.offset()
    }
}

fn memo_key(prod: &Production, pos: Position) -> MemoKey {
    (
        prod as *const Production as usize,
        pos.input().as_ptr() as usize,
        pos.input().len(),
        pos.offset(),
    )
}

fn single_char<'g, 'i, P>(pos: Position<'i>, pred: P) -> Option<(Node<'g, 'i>, Position<'i>)>
where
    P: Fn(char) -> bool,
{
    let mut end = pos;
    match end.next_char() {
        Some(c) if pred(c) => Some((Node::Terminal(Span::between(pos, end)), end)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NullObserver;

    struct TestCase {
        grammar: &'static str,
        input: &'static str,
        // Some gives the expected consumed text, None indicates no match.
        out: Option<&'static str>,
    }

    fn run(grammar: &Grammar, root: &str, input: &str) -> Option<String> {
        let config = ParseConfig::default();
        let mut observer = NullObserver;
        let mut state = State::new(grammar, &config, &mut observer);
        let prod = grammar.get(root).unwrap();
        state
            .production(prod, Position::new(input))
            .unwrap()
            .map(|(node, _)| node.as_str().to_owned())
    }

    fn assert_test_cases(tests: Vec<TestCase>) {
        for t in tests {
            let grammar = bnf::parse_productions(t.grammar.lines()).unwrap();
            let got = run(&grammar, "a", t.input);
            assert_eq!(got.as_deref(), t.out, "grammar: {}, input: {:?}", t.grammar, t.input);
        }
    }

    #[test]
    fn match_terminals() {
        assert_test_cases(vec![
            TestCase {
                grammar: "a ::= 'abc'",
                input: "abcd",
                out: Some("abc"),
            },
            TestCase {
                grammar: "a ::= 'abc'",
                input: "ab",
                out: None,
            },
            TestCase {
                grammar: "a ::= [a-c] #x2D",
                input: "b-",
                out: Some("b-"),
            },
            TestCase {
                grammar: "a ::= [^a-c]",
                input: "é",
                out: Some("é"),
            },
            TestCase {
                grammar: "a ::= [^a-c]",
                input: "",
                out: None,
            },
        ]);
    }

    #[test]
    fn match_repetition() {
        assert_test_cases(vec![
            TestCase {
                grammar: "a ::= 'x'*",
                input: "xxxy",
                out: Some("xxx"),
            },
            TestCase {
                grammar: "a ::= 'x'*",
                input: "y",
                out: Some(""),
            },
            TestCase {
                grammar: "a ::= 'x'+",
                input: "y",
                out: None,
            },
            TestCase {
                grammar: "a ::= 'x'? 'y'",
                input: "y",
                out: Some("y"),
            },
            // Repetition never gives back what it took.
            TestCase {
                grammar: "a ::= 'x'* 'x'",
                input: "xxx",
                out: None,
            },
            // Zero width repetition terminates.
            TestCase {
                grammar: "a ::= ('' | 'y')* 'x'",
                input: "x",
                out: Some("x"),
            },
        ]);
    }

    #[test]
    fn match_rule_flags() {
        assert_test_cases(vec![
            TestCase {
                grammar: "a ::= 'ab' | *",
                input: "ababa",
                out: Some("abab"),
            },
            TestCase {
                grammar: "a ::= 'ab' | ?",
                input: "x",
                out: Some(""),
            },
            TestCase {
                grammar: "a ::= 'ab' | +",
                input: "x",
                out: None,
            },
        ]);
    }

    #[test]
    fn match_ordered_choice() {
        assert_test_cases(vec![
            TestCase {
                grammar: "a ::= 'a' | 'ab'",
                input: "ab",
                out: Some("a"),
            },
            TestCase {
                grammar: "a ::= 'ab' | 'a'",
                input: "ab",
                out: Some("ab"),
            },
            // A failed alternative leaves nothing behind.
            TestCase {
                grammar: "a ::= 'x' 'y' | 'x' 'z'",
                input: "xz",
                out: Some("xz"),
            },
            TestCase {
                grammar: "a ::= ('x' 'y' | 'x') 'z'",
                input: "xz",
                out: Some("xz"),
            },
        ]);
    }

    #[test]
    fn match_subtraction() {
        assert_test_cases(vec![
            TestCase {
                grammar: "a ::= [a-z] - [aeiou]",
                input: "b",
                out: Some("b"),
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou]",
                input: "e",
                out: None,
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou]+",
                input: "bcdea",
                out: Some("bcd"),
            },
            TestCase {
                grammar: "a ::= [a-z] - #x71",
                input: "q",
                out: None,
            },
            TestCase {
                grammar: "a ::= w - 'if'\nw ::= [a-z]+",
                input: "if",
                out: None,
            },
            TestCase {
                grammar: "a ::= w - 'if'\nw ::= [a-z]+",
                input: "ifs",
                out: Some("ifs"),
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou] - [xyz]",
                input: "b",
                out: Some("b"),
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou] - [xyz]",
                input: "e",
                out: None,
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou] - [xyz]",
                input: "x",
                out: None,
            },
            TestCase {
                grammar: "a ::= [a-z] - [aeiou] - [xyz]+",
                input: "bcdxa",
                out: Some("bcd"),
            },
        ]);
    }

    #[test]
    fn depth_limit() {
        let grammar = bnf::parse_productions(vec!["a ::= 'x' a | 'x'"]).unwrap();
        let config = ParseConfig {
            max_depth: 8,
            memoize: false,
        };
        let mut observer = NullObserver;
        let prod = grammar.get("a").unwrap();

        {
            let mut state = State::new(&grammar, &config, &mut observer);
            assert!(state.production(prod, Position::new("xxxx")).unwrap().is_some());
        }

        let mut state = State::new(&grammar, &config, &mut observer);
        let err = state.production(prod, Position::new("xxxxxxxxxxxx")).unwrap_err();
        assert_eq!(err, ParseError::TooDeep { limit: 8, offset: 8 });
    }

    #[test]
    fn undefined_production() {
        let grammar = bnf::parse_productions(vec!["a ::= 'x' | b"]).unwrap();
        let config = ParseConfig::default();
        let mut observer = NullObserver;
        let mut state = State::new(&grammar, &config, &mut observer);
        let err = state
            .production(grammar.get("a").unwrap(), Position::new("y"))
            .unwrap_err();
        assert_eq!(err, ParseError::ProductionNotFound("b".to_owned()));
    }
}
