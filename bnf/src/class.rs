use std::fmt::{self, Display};
use std::str::FromStr;

/// A bracketed character set such as `[a-zA-Z_]`, `[^-]` or
/// `[#x20-#xD7FF]`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CharClass {
    spec: String,
    negated: bool,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    /// The text between the brackets, as written.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn contains(&self, c: char) -> bool {
        let in_ranges = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        in_ranges != self.negated
    }
}

impl Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.spec)
    }
}

impl FromStr for CharClass {
    type Err = String;

    /// Parses the body of a class, without the surrounding brackets.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (negated, body) = match spec.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        let mut elems = Vec::new();
        let mut rest = body;
        while !rest.is_empty() {
            let (c, after) = class_char(rest)?;
            elems.push(c);
            rest = after;
        }

        // Pair up `lo - hi` triples. A '-' that can't form a range is literal.
        let mut ranges = Vec::new();
        let mut i = 0;
        while i < elems.len() {
            let lo = elems[i];
            if i + 2 < elems.len() && elems[i + 1] == ClassChar::Dash {
                let hi = elems[i + 2];
                let (lo, hi) = (lo.value(), hi.value());
                if lo > hi {
                    return Err(format!("range '{}-{}' is out of order", lo, hi));
                }
                ranges.push((lo, hi));
                i += 3;
            } else {
                let c = lo.value();
                ranges.push((c, c));
                i += 1;
            }
        }

        if ranges.is_empty() {
            return Err("empty class".to_owned());
        }

        Ok(CharClass {
            spec: spec.to_owned(),
            negated,
            ranges,
        })
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum ClassChar {
    Char(char),
    Dash,
}

impl ClassChar {
    fn value(self) -> char {
        match self {
            ClassChar::Char(c) => c,
            ClassChar::Dash => '-',
        }
    }
}

fn class_char(s: &str) -> Result<(ClassChar, &str), String> {
    if let Some(hex) = s.strip_prefix("#x") {
        let end = hex
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(hex.len());
        let c = code_point(&hex[..end])
            .ok_or_else(|| format!("invalid code point '#x{}'", &hex[..end]))?;
        return Ok((ClassChar::Char(c), &hex[end..]));
    }

    let mut chars = s.chars();
    match chars.next() {
        Some('-') => Ok((ClassChar::Dash, chars.as_str())),
        Some(c) => Ok((ClassChar::Char(c), chars.as_str())),
        None => Err("unexpected end of class".to_owned()),
    }
}

/// Converts hex digits to a char, failing on empty input, overflow or
/// surrogates.
pub fn code_point(hex: &str) -> Option<char> {
    if hex.is_empty() {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(std::char::from_u32)
}
