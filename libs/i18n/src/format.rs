//! A small ICU MessageFormat subset.
//!
//! Supported syntax:
//! - `{name}` substitutes an argument,
//! - `{n, plural, offset:1 =0 {..} one {..} other {..}}` picks a case by exact
//!   value or plural category; `#` inside a case prints `n - offset`,
//! - `{g, select, male {..} other {..}}` picks a case by string value,
//! - `\{`, `\}` and `\#` are literal characters.

use crate::error::FormatError;
use crate::plural::{PluralCategory, PluralRules};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Exact(f64),
    Category(PluralCategory),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Arg(String),
    Hash,
    Plural {
        arg: String,
        offset: f64,
        cases: Vec<(Selector, Vec<Node>)>,
    },
    Select {
        arg: String,
        cases: Vec<(String, Vec<Node>)>,
    },
}

/// A parsed template, ready to be formatted any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    nodes: Vec<Node>,
}

impl Message {
    pub fn parse(template: &str) -> Result<Self, FormatError> {
        let mut parser = Parser {
            chars: template.chars().collect(),
            pos: 0,
        };
        let nodes = parser.parse_nodes(false, false)?;
        Ok(Self { nodes })
    }

    /// Formats the message with arguments taken from a JSON object.
    pub fn format(&self, rules: PluralRules, args: &Value) -> Result<String, FormatError> {
        let mut out = String::new();
        write_nodes(&self.nodes, rules, args, None, &mut out)?;
        Ok(out)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), FormatError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(FormatError::Expected {
                expected,
                position: self.pos,
            }),
            None => Err(FormatError::UnexpectedEnd),
        }
    }

    // Reads up to the next whitespace, ',', '{' or '}'
    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    // Parses until end of input (top level) or an unconsumed '}' (nested)
    fn parse_nodes(&mut self, nested: bool, in_plural: bool) -> Result<Vec<Node>, FormatError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    match self.peek() {
                        Some(escaped @ ('{' | '}' | '#' | '\\')) => {
                            text.push(escaped);
                            self.pos += 1;
                        }
                        _ => text.push('\\'),
                    }
                }
                '{' => {
                    if !text.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut text)));
                    }
                    self.pos += 1;
                    nodes.push(self.parse_placeholder(in_plural)?);
                }
                '}' if nested => break,
                '}' => return Err(FormatError::UnbalancedBrace(self.pos)),
                '#' if in_plural => {
                    if !text.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut text)));
                    }
                    self.pos += 1;
                    nodes.push(Node::Hash);
                }
                other => {
                    text.push(other);
                    self.pos += 1;
                }
            }
        }

        if nested && self.peek().is_none() {
            return Err(FormatError::UnexpectedEnd);
        }
        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        Ok(nodes)
    }

    // Called right after the opening '{'
    fn parse_placeholder(&mut self, in_plural: bool) -> Result<Node, FormatError> {
        self.skip_whitespace();
        let start = self.pos;
        let arg = self.read_word();
        if arg.is_empty() {
            return Err(FormatError::EmptyArgument(start));
        }
        self.skip_whitespace();

        match self.peek() {
            Some('}') => {
                self.pos += 1;
                Ok(Node::Arg(arg))
            }
            Some(',') => {
                self.pos += 1;
                self.skip_whitespace();
                let kind = self.read_word();
                self.skip_whitespace();
                self.expect(',')?;
                match kind.as_str() {
                    "plural" => self.parse_plural(arg),
                    "select" => self.parse_select(arg, in_plural),
                    _ => Err(FormatError::UnknownType(kind)),
                }
            }
            Some(_) => Err(FormatError::Expected {
                expected: '}',
                position: self.pos,
            }),
            None => Err(FormatError::UnexpectedEnd),
        }
    }

    // Parses `selector {body}` pairs up to and including the closing '}'
    fn parse_cases(&mut self, in_plural: bool) -> Result<Vec<(String, Vec<Node>)>, FormatError> {
        let mut cases = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(cases);
                }
                None => return Err(FormatError::UnexpectedEnd),
                Some(_) => {}
            }
            let selector = self.read_word();
            if selector.is_empty() {
                return Err(FormatError::Expected {
                    expected: '{',
                    position: self.pos,
                });
            }
            self.skip_whitespace();
            self.expect('{')?;
            let body = self.parse_nodes(true, in_plural)?;
            self.expect('}')?;
            cases.push((selector, body));
        }
    }

    fn parse_plural(&mut self, arg: String) -> Result<Node, FormatError> {
        self.skip_whitespace();
        let mut offset = 0.0;
        let rest: String = self.chars[self.pos..].iter().take(7).collect();
        if rest == "offset:" {
            self.pos += 7;
            let raw = self.read_word();
            offset = raw
                .parse::<f64>()
                .map_err(|_| FormatError::InvalidSelector(format!("offset:{raw}")))?;
        }

        let mut cases = Vec::new();
        for (raw, body) in self.parse_cases(true)? {
            let selector = match raw.strip_prefix('=') {
                Some(exact) => Selector::Exact(
                    exact
                        .parse::<f64>()
                        .map_err(|_| FormatError::InvalidSelector(raw.clone()))?,
                ),
                None => Selector::Category(
                    PluralCategory::parse(&raw)
                        .ok_or_else(|| FormatError::InvalidSelector(raw.clone()))?,
                ),
            };
            cases.push((selector, body));
        }

        let has_other = cases
            .iter()
            .any(|(s, _)| *s == Selector::Category(PluralCategory::Other));
        if !has_other {
            return Err(FormatError::MissingOther(arg));
        }
        Ok(Node::Plural { arg, offset, cases })
    }

    fn parse_select(&mut self, arg: String, in_plural: bool) -> Result<Node, FormatError> {
        let cases = self.parse_cases(in_plural)?;
        if !cases.iter().any(|(key, _)| key == "other") {
            return Err(FormatError::MissingOther(arg));
        }
        Ok(Node::Select { arg, cases })
    }
}

fn lookup<'a>(args: &'a Value, name: &str) -> Result<&'a Value, FormatError> {
    args.get(name)
        .ok_or_else(|| FormatError::MissingArgument(name.to_string()))
}

fn as_number(value: &Value, name: &str) -> Result<f64, FormatError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| FormatError::NotANumber(name.to_string()))
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn write_nodes(
    nodes: &[Node],
    rules: PluralRules,
    args: &Value,
    hash: Option<f64>,
    out: &mut String,
) -> Result<(), FormatError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Arg(name) => out.push_str(&as_text(lookup(args, name)?)),
            Node::Hash => {
                if let Some(n) = hash {
                    out.push_str(&format_number(n));
                }
            }
            Node::Plural { arg, offset, cases } => {
                let n = as_number(lookup(args, arg)?, arg)?;
                let category = rules.category(n - offset);
                let body = cases
                    .iter()
                    .find(|(s, _)| *s == Selector::Exact(n))
                    .or_else(|| cases.iter().find(|(s, _)| *s == Selector::Category(category)))
                    .or_else(|| {
                        cases
                            .iter()
                            .find(|(s, _)| *s == Selector::Category(PluralCategory::Other))
                    })
                    .map(|(_, body)| body)
                    .ok_or_else(|| FormatError::MissingOther(arg.clone()))?;
                write_nodes(body, rules, args, Some(n - offset), out)?;
            }
            Node::Select { arg, cases } => {
                let key = as_text(lookup(args, arg)?);
                let body = cases
                    .iter()
                    .find(|(k, _)| *k == key)
                    .or_else(|| cases.iter().find(|(k, _)| k == "other"))
                    .map(|(_, body)| body)
                    .ok_or_else(|| FormatError::MissingOther(arg.clone()))?;
                write_nodes(body, rules, args, hash, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, rules: PluralRules, args: Value) -> String {
        Message::parse(template)
            .expect("parse")
            .format(rules, &args)
            .expect("format")
    }

    #[test]
    fn test_plain_text_and_arguments() {
        assert_eq!(render("Hello world", PluralRules::English, json!({})), "Hello world");
        assert_eq!(
            render("Hi {name}, you have {n} votes", PluralRules::English, json!({"name": "Jon", "n": 3})),
            "Hi Jon, you have 3 votes"
        );
    }

    #[test]
    fn test_plural_categories_and_exact_match() {
        let template = "{count, plural, =0 {none} one {# idea} other {# ideas}}";
        assert_eq!(render(template, PluralRules::English, json!({"count": 0})), "none");
        assert_eq!(render(template, PluralRules::English, json!({"count": 1})), "1 idea");
        assert_eq!(render(template, PluralRules::English, json!({"count": 5})), "5 ideas");
        // Portuguese treats 0 as `one`, but the exact case wins
        assert_eq!(render(template, PluralRules::Portuguese, json!({"count": 0})), "none");
    }

    #[test]
    fn test_plural_offset() {
        let template = "{n, plural, offset:1 =0 {nobody} =1 {{who}} one {{who} and # other} other {{who} and # others}}";
        let rules = PluralRules::English;
        assert_eq!(render(template, rules, json!({"n": 1, "who": "Jon"})), "Jon");
        assert_eq!(render(template, rules, json!({"n": 2, "who": "Jon"})), "Jon and 1 other");
        assert_eq!(render(template, rules, json!({"n": 4, "who": "Jon"})), "Jon and 3 others");
    }

    #[test]
    fn test_select_and_nested_hash() {
        let template = "{g, select, female {She has {n, plural, one {# vote} other {# votes}}} other {They voted}}";
        assert_eq!(
            render(template, PluralRules::English, json!({"g": "female", "n": 2})),
            "She has 2 votes"
        );
        assert_eq!(render(template, PluralRules::English, json!({"g": "x", "n": 2})), "They voted");
    }

    #[test]
    fn test_escapes_and_literal_hash() {
        assert_eq!(
            render("Idea #{number} \\{raw\\}", PluralRules::English, json!({"number": 7})),
            "Idea #7 {raw}"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Message::parse("{name"), Err(FormatError::UnexpectedEnd));
        assert_eq!(Message::parse("oops}"), Err(FormatError::UnbalancedBrace(4)));
        assert_eq!(Message::parse("{}"), Err(FormatError::EmptyArgument(1)));
        assert_eq!(
            Message::parse("{n, plural, one {x}}"),
            Err(FormatError::MissingOther("n".to_string()))
        );
        assert_eq!(
            Message::parse("{n, number}"),
            Err(FormatError::Expected { expected: ',', position: 10 })
        );
        assert_eq!(
            Message::parse("{n, ordinal, other {x}}"),
            Err(FormatError::UnknownType("ordinal".to_string()))
        );
        assert!(matches!(
            Message::parse("{n, plural, few-ish {x} other {y}}"),
            Err(FormatError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_format_errors() {
        let message = Message::parse("{count, plural, other {# items}}").unwrap();
        assert_eq!(
            message.format(PluralRules::English, &json!({})),
            Err(FormatError::MissingArgument("count".to_string()))
        );
        assert_eq!(
            message.format(PluralRules::English, &json!({"count": "many"})),
            Err(FormatError::NotANumber("count".to_string()))
        );
        assert_eq!(
            message.format(PluralRules::English, &json!({"count": "3"})),
            Ok("3 items".to_string())
        );
    }
}
