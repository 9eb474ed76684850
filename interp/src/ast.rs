use bnf::{Production, Rule};

use crate::span::Span;

/// A node of the tree produced by a successful parse.
///
/// `'g` borrows the grammar, `'i` the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'g, 'i> {
    /// A production or group match.
    Nonterminal(Nonterminal<'g, 'i>),
    /// Text matched by a literal, class or code point.
    Terminal(Span<'i>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nonterminal<'g, 'i> {
    /// `None` for a group.
    pub production: Option<&'g Production>,
    /// The alternative that matched.
    pub rule: &'g Rule,
    pub children: Vec<Node<'g, 'i>>,
    pub span: Span<'i>,
}

impl<'g, 'i> Node<'g, 'i> {
    pub(crate) fn nonterminal(
        production: Option<&'g Production>,
        rule: &'g Rule,
        children: Vec<Node<'g, 'i>>,
        span: Span<'i>,
    ) -> Self {
        Node::Nonterminal(Nonterminal {
            production,
            rule,
            children,
            span,
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(_))
    }

    pub fn production(&self) -> Option<&'g Production> {
        match self {
            Node::Nonterminal(n) => n.production,
            Node::Terminal(_) => None,
        }
    }

    /// Name of the production this node matched, if any.
    pub fn name(&self) -> Option<&'g str> {
        self.production().map(|p| p.name.as_str())
    }

    pub fn rule(&self) -> Option<&'g Rule> {
        match self {
            Node::Nonterminal(n) => Some(n.rule),
            Node::Terminal(_) => None,
        }
    }

    pub fn children(&self) -> &[Node<'g, 'i>] {
        match self {
            Node::Nonterminal(n) => &n.children,
            Node::Terminal(_) => &[],
        }
    }

    pub fn span(&self) -> Span<'i> {
        match self {
            Node::Nonterminal(n) => n.span,
            Node::Terminal(span) => *span,
        }
    }

    /// The consumed input, or the matched text for a terminal.
    pub fn as_str(&self) -> &'i str {
        self.span().as_str()
    }

    /// Nodes in depth first, pre-order.
    pub fn iter(&self) -> DfsParseTreeIterator<'_, 'g, 'i> {
        DfsParseTreeIterator { stack: vec![self] }
    }

    /// The first node matching the named production, in pre-order.
    pub fn find(&self, name: &str) -> Option<&Node<'g, 'i>> {
        self.iter().find(|n| n.name() == Some(name))
    }
}

pub struct DfsParseTreeIterator<'a, 'g, 'i> {
    stack: Vec<&'a Node<'g, 'i>>,
}

impl<'a, 'g, 'i> Iterator for DfsParseTreeIterator<'a, 'g, 'i> {
    type Item = &'a Node<'g, 'i>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use bnf::Grammar;

    #[test]
    fn traversal_order() {
        let grammar: Grammar = "\
pair ::= key '=' value
key ::= [a-z]+
value ::= [0-9]+"
            .parse()
            .unwrap();
        let root = parse("pair", &grammar, "ab=12").unwrap();

        let got: Vec<(Option<&str>, &str)> = root.iter().map(|n| (n.name(), n.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (Some("pair"), "ab=12"),
                (Some("key"), "ab"),
                (None, "a"),
                (None, "b"),
                (None, "="),
                (Some("value"), "12"),
                (None, "1"),
                (None, "2"),
            ]
        );
    }

    #[test]
    fn find_and_accessors() {
        let grammar: Grammar = "greeting ::= 'hi' (' ' name)?\nname ::= [A-Z] [a-z]*"
            .parse()
            .unwrap();
        let root = parse("greeting", &grammar, "hi Bo").unwrap();

        let name = root.find("name").unwrap();
        assert_eq!(name.as_str(), "Bo");
        assert_eq!(name.rule(), Some(&grammar.get("name").unwrap().rules[0]));
        assert!(root.span().contains(&name.span()));
        assert!(root.find("missing").is_none());

        let leaf = &root.children()[0];
        assert!(leaf.is_terminal());
        assert_eq!(leaf.as_str(), "hi");
        assert_eq!(leaf.rule(), None);
        assert!(leaf.children().is_empty());

        let group = &root.children()[1];
        assert!(!group.is_terminal());
        assert_eq!(group.production(), None);
        assert_eq!(group.as_str(), " Bo");
    }
}
