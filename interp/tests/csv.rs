//! A very simple csv grammar that acts only on numbers, interpreted directly.

use anyhow::Result;
use bnf::Grammar;
use interp::{parse, Node, ParseError};

const CSV: &str = r#"
; The top level rule. A csv may have 0 or more records.
csv    ::= record | *
; A record contains fields, and is terminated by a newline.
record ::= fields #x0A
; Fields contains 1 or more fields separated by a comma.
fields ::= field ("," field)*
; A field contains 1 or more digits.
field  ::= digit+
digit  ::= "0" | "1" | "2" | "3" | "4"
       | "5" | "6" | "7" | "8" | "9"
"#;

fn grammar() -> Result<Grammar> {
    Ok(CSV.parse()?)
}

fn named<'a, 'g, 'i>(node: &'a Node<'g, 'i>, name: &str) -> Vec<&'a Node<'g, 'i>> {
    node.iter().filter(|n| n.name() == Some(name)).collect()
}

#[test]
fn digit() -> Result<()> {
    let g = grammar()?;
    let input = "7";
    let node = parse("digit", &g, input)?;

    assert_eq!(node.name(), Some("digit"));
    assert_eq!(node.as_str(), input);
    assert_eq!(node.children().len(), 1);
    Ok(())
}

#[test]
fn field() -> Result<()> {
    let g = grammar()?;
    let input = "789";
    let node = parse("field", &g, input)?;

    let digits = named(&node, "digit");
    assert_eq!(digits.len(), 3, "unexpected digits: {:?}", digits);
    assert_eq!(node.as_str(), input);
    Ok(())
}

#[test]
fn fields() -> Result<()> {
    let g = grammar()?;
    let input = "123,789";
    let node = parse("fields", &g, input)?;

    let fields: Vec<&str> = named(&node, "field").iter().map(|n| n.as_str()).collect();
    assert_eq!(fields, vec!["123", "789"]);
    Ok(())
}

#[test]
fn record() -> Result<()> {
    let g = grammar()?;
    let node = parse("record", &g, "123,789\n")?;

    assert_eq!(named(&node, "record").len(), 1);
    assert_eq!(named(&node, "fields").len(), 1);
    Ok(())
}

#[test]
fn csv() -> Result<()> {
    let g = grammar()?;
    let input = "184,754\n33,22222\n";
    let node = parse("csv", &g, input)?;

    let records = named(&node, "record");
    assert_eq!(records.len(), 2, "tree: {:?}", node);
    assert_eq!(records[1].as_str(), "33,22222\n");
    Ok(())
}

#[test]
fn empty_csv() -> Result<()> {
    let g = grammar()?;
    let node = parse("csv", &g, "")?;
    assert!(node.children().is_empty());
    Ok(())
}

#[test]
fn missing_newline() -> Result<()> {
    let g = grammar()?;
    let err = parse("csv", &g, "1,2\n3,4").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnparsedText {
            root: "csv".to_owned(),
            text: "3,4".to_owned(),
        }
    );
    Ok(())
}
