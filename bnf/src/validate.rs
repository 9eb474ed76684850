use crate::error::{ValidationError, ValidationErrors};
use crate::{Grammar, Item, Production, Rule};

/// Checks that every referenced production exists, that self references
/// only appear in tail position, and that subtractions are well formed.
///
/// Every defect is collected, in production name order.
pub fn validate(grammar: &Grammar) -> Result<(), ValidationErrors> {
    let mut errs = Vec::new();
    for prod in grammar.productions() {
        for rule in &prod.rules {
            let mut checker = RuleChecker {
                grammar,
                prod,
                rule,
                errs: &mut errs,
            };
            checker.check(rule, Placement::TOP);
        }
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errs))
    }
}

/// Where a nested rule sits relative to the top-level rule containing it.
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Every enclosing item index is the first.
    head: bool,
    /// Every enclosing item index is the last.
    tail: bool,
}

impl Placement {
    const TOP: Placement = Placement {
        head: true,
        tail: true,
    };
}

struct RuleChecker<'g, 'e> {
    grammar: &'g Grammar,
    prod: &'g Production,
    /// The top-level rule, for messages.
    rule: &'g Rule,
    errs: &'e mut Vec<ValidationError>,
}

impl<'g, 'e> RuleChecker<'g, 'e> {
    fn check(&mut self, rule: &Rule, outer: Placement) {
        let len = rule.items.len();

        for (i, item) in rule.items.iter().enumerate() {
            let placement = Placement {
                head: outer.head && i == 0,
                tail: outer.tail && i + 1 == len,
            };

            if item.is_subtract() {
                self.check_subtract(rule, i);
                continue;
            }

            match item.atom() {
                Item::ProductionRef(name) => self.check_reference(name, placement),
                Item::Group(rules) => {
                    for nested in rules {
                        self.check(nested, placement);
                    }
                }
                _ => (),
            }
        }
    }

    fn check_reference(&mut self, name: &str, placement: Placement) {
        if !self.grammar.contains(name) {
            self.errs.push(ValidationError::UndefinedProduction {
                production: self.prod.name.clone(),
                rule: self.rule.to_string(),
                name: name.to_owned(),
            });
        } else if name == self.prod.name {
            // A lone self reference is also at the head, so it is caught here.
            if placement.head {
                self.errs.push(ValidationError::LeftRecursion {
                    production: self.prod.name.clone(),
                    rule: self.rule.to_string(),
                });
            } else if !placement.tail {
                self.errs.push(ValidationError::NonTailRecursion {
                    production: self.prod.name.clone(),
                    rule: self.rule.to_string(),
                });
            }
        }
    }

    fn check_subtract(&mut self, rule: &Rule, idx: usize) {
        let reason = if idx == 0 || idx + 1 == rule.items.len() {
            Some("'-' needs an operand on each side")
        } else {
            let left = &rule.items[idx - 1];
            let right = &rule.items[idx + 1];
            if left.is_subtract() || right.is_subtract() {
                Some("'-' needs an operand on each side")
            } else if left.is_repeated() {
                Some("left operand of '-' cannot be repeated")
            } else {
                None
            }
        };

        if let Some(reason) = reason {
            self.errs.push(ValidationError::MalformedSubtraction {
                production: self.prod.name.clone(),
                rule: self.rule.to_string(),
                reason,
            });
        }
    }
}
