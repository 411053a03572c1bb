//! Parser for the search-data artifacts emitted by documentation generators.
//!
//! An artifact is a JavaScript array literal, usually bound to a variable:
//!
//! ```text
//! var searchData=
//! [
//!   ['object_6334',['Object',['../classchip_1_1_system_1_1_object.html',1,'chip::System']]],
//!   ['objectpool_6342',['ObjectPool',['../classchip_1_1_system_1_1_object_pool.html',1,'chip::System']]]
//! ];
//! ```
//!
//! Each record is `[key, [displayName, [targetRef, flag, scopeLabel], ...]]`. Single- and
//! double-quoted strings, trailing commas and comments are accepted, so a plain JSON
//! rendition of the same data parses as well.

use crate::error::{ParseError, Position};

/// A literal value read from the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    Array(Vec<Value>),
}

impl Value {
    const fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
            Self::Array(_) => "array",
        }
    }
}

/// One link target of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTarget {
    /// Relative URL of the documentation page, possibly with an anchor
    pub target_ref: String,
    /// Generator link flag: `true` for pages of this site, `false` for tag-file links
    pub local: bool,
    /// Enclosing scope exactly as the generator wrote it
    pub scope_label: String,
}

/// One `[key, [displayName, target...]]` record, still in generator encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: String,
    pub display_name: String,
    pub targets: Vec<RawTarget>,
}

/// Parses a complete artifact into its records.
///
/// Either every record parses or an error is returned; there is no partial result.
pub fn parse_artifact(raw: &str) -> Result<Vec<RawRecord>, ParseError> {
    let value = Parser::new(raw).parse_document()?;

    let Value::Array(items) = value else {
        return Err(ParseError::NotARecordList {
            found: value.kind_name(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| record_from_value(index + 1, item))
        .collect()
}

fn record_from_value(number: usize, value: Value) -> Result<RawRecord, ParseError> {
    let mut fields = expect_array(number, Some(value), "record")?.into_iter();
    let key = expect_str(number, fields.next(), "key")?;
    let mut body = expect_array(number, fields.next(), "record body")?.into_iter();
    if fields.next().is_some() {
        return Err(ParseError::record(
            number,
            "unexpected field after record body",
        ));
    }

    let display_name = expect_str(number, body.next(), "display name")?;
    let targets = body
        .map(|target| target_from_value(number, target))
        .collect::<Result<Vec<_>, _>>()?;

    if targets.is_empty() {
        return Err(ParseError::record(number, "record has no link targets"));
    }

    Ok(RawRecord {
        key,
        display_name,
        targets,
    })
}

fn target_from_value(number: usize, value: Value) -> Result<RawTarget, ParseError> {
    let mut fields = expect_array(number, Some(value), "link target")?.into_iter();
    let target_ref = expect_str(number, fields.next(), "target reference")?;
    let local = match fields.next() {
        Some(Value::Int(flag)) => flag != 0,
        Some(Value::Bool(flag)) => flag,
        Some(other) => {
            return Err(ParseError::record(
                number,
                format!("link flag must be an integer, found {}", other.kind_name()),
            ));
        }
        None => return Err(ParseError::record(number, "missing link flag")),
    };
    let scope_label = expect_str(number, fields.next(), "scope label")?;
    if fields.next().is_some() {
        return Err(ParseError::record(
            number,
            "unexpected field after scope label",
        ));
    }

    Ok(RawTarget {
        target_ref,
        local,
        scope_label,
    })
}

fn expect_str(number: usize, value: Option<Value>, field: &str) -> Result<String, ParseError> {
    match value {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(ParseError::record(
            number,
            format!("{} must be a string, found {}", field, other.kind_name()),
        )),
        None => Err(ParseError::record(number, format!("missing {}", field))),
    }
}

fn expect_array(
    number: usize,
    value: Option<Value>,
    field: &str,
) -> Result<Vec<Value>, ParseError> {
    match value {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ParseError::record(
            number,
            format!("{} must be an array, found {}", field, other.kind_name()),
        )),
        None => Err(ParseError::record(number, format!("missing {}", field))),
    }
}

/// Deepest array nesting accepted. Records need four levels.
const MAX_DEPTH: usize = 128;

/// Recursive-descent reader for the JavaScript literal subset generators emit.
struct Parser<'a> {
    src: &'a str,
    position: Position,
    /// Arrays currently open
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            position: Position::start(),
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.position.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position.offset += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn eof(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEof {
            position: self.position,
            expected,
        }
    }

    fn unexpected(&self, found: char, expected: &'static str) -> ParseError {
        ParseError::UnexpectedChar {
            found,
            position: self.position,
            expected,
        }
    }

    /// Skips whitespace, `//` line comments and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if rest.starts_with("/*") {
                self.bump();
                self.bump();
                loop {
                    if self.rest().starts_with("*/") {
                        self.bump();
                        self.bump();
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(self.eof("end of comment"));
                    }
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_document(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        self.skip_binding()?;
        self.skip_trivia()?;

        let value = self.parse_value()?;

        self.skip_trivia()?;
        if self.peek() == Some(';') {
            self.bump();
            self.skip_trivia()?;
        }
        if self.peek().is_some() {
            return Err(ParseError::TrailingInput {
                position: self.position,
            });
        }

        Ok(value)
    }

    /// Consumes a leading `var name =` (or `let`/`const`) binding if present.
    fn skip_binding(&mut self) -> Result<(), ParseError> {
        let rest = self.rest();
        let Some(keyword) = ["var", "let", "const"].into_iter().find(|kw| {
            rest.strip_prefix(*kw)
                .and_then(|after| after.chars().next())
                .is_some_and(char::is_whitespace)
        }) else {
            return Ok(());
        };

        for _ in 0..keyword.len() {
            self.bump();
        }
        self.skip_trivia()?;

        let mut name_len = 0;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '$' | '.') {
                self.bump();
                name_len += 1;
            } else {
                break;
            }
        }
        if name_len == 0 {
            return match self.peek() {
                Some(c) => Err(self.unexpected(c, "a variable name")),
                None => Err(self.eof("a variable name")),
            };
        }

        self.skip_trivia()?;
        match self.peek() {
            Some('=') => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.unexpected(c, "'='")),
            None => Err(self.eof("'='")),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some('[') => self.parse_array(),
            Some(quote @ ('\'' | '"')) => self.parse_string(quote).map(Value::Str),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_int(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            Some(c) => Err(self.unexpected(c, "a value")),
            None => Err(self.eof("a value")),
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.position,
            });
        }
        self.depth += 1;
        let result = self.parse_array_items();
        self.depth -= 1;
        result
    }

    fn parse_array_items(&mut self) -> Result<Value, ParseError> {
        let opened = self.position;
        self.bump();
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(found @ ('}' | ')')) => {
                    return Err(ParseError::MismatchedBracket {
                        opened,
                        found,
                        position: self.position,
                    });
                }
                None => return Err(self.eof("']'")),
                Some(_) => {}
            }

            items.push(self.parse_value()?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(found @ ('}' | ')')) => {
                    return Err(ParseError::MismatchedBracket {
                        opened,
                        found,
                        position: self.position,
                    });
                }
                Some(c) => return Err(self.unexpected(c, "',' or ']'")),
                None => return Err(self.eof("']'")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.position;
        self.bump();
        let mut out = String::new();

        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.parse_escape(&mut out, start)?,
                Some('\n') | None => {
                    return Err(ParseError::UnterminatedString { position: start });
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String, start: Position) -> Result<(), ParseError> {
        let escape_at = self.position;
        let invalid = || ParseError::InvalidEscape {
            position: escape_at,
        };

        match self.bump() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            // Line continuation
            Some('\n') => {}
            Some('x') => {
                let code = self.read_hex(2).ok_or_else(invalid)?;
                out.push(char::from_u32(code).ok_or_else(invalid)?);
            }
            Some('u') => {
                let high = self.read_hex(4).ok_or_else(invalid)?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if !self.rest().starts_with("\\u") {
                        return Err(invalid());
                    }
                    self.bump();
                    self.bump();
                    let low = self.read_hex(4).ok_or_else(invalid)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(invalid());
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).ok_or_else(invalid)?);
            }
            Some(c) if !c.is_alphanumeric() => out.push(c),
            Some(_) => return Err(invalid()),
            None => return Err(ParseError::UnterminatedString { position: start }),
        }

        Ok(())
    }

    fn read_hex(&mut self, digits: usize) -> Option<u32> {
        let hex = self.rest().get(..digits)?;
        let code = u32::from_str_radix(hex, 16).ok()?;
        // from_str_radix accepts a leading '+'
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        for _ in 0..digits {
            self.bump();
        }
        Some(code)
    }

    fn parse_int(&mut self) -> Result<Value, ParseError> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.bump();
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {}
            Some(c) => return Err(self.unexpected(c, "a digit")),
            None => return Err(self.eof("a digit")),
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }

        let text = &self.src[start.offset..self.position.offset];
        text.parse().map(Value::Int).map_err(|_| ParseError::UnexpectedChar {
            found: text.chars().last().unwrap_or('0'),
            position: start,
            expected: "an integer that fits in 64 bits",
        })
    }

    fn parse_keyword(&mut self) -> Result<Value, ParseError> {
        let start = self.position;
        let word: String = self
            .rest()
            .chars()
            .take_while(char::is_ascii_alphabetic)
            .collect();

        let value = match word.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            _ => {
                return Err(ParseError::UnexpectedChar {
                    found: word.chars().next().unwrap_or_default(),
                    position: start,
                    expected: "a value",
                });
            }
        };

        for _ in 0..word.len() {
            self.bump();
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const DOXYGEN_SAMPLE: &str = r"var searchData=
[
  ['object_6334',['Object',['../classchip_1_1_system_1_1_object.html',1,'chip::System']]],
  ['optionalqrcodeinfo_6358',['OptionalQRCodeInfo',['../classchip_1_1setuppayload_1_1_optional_q_r_code_info.html',1,'chip.setuppayload.OptionalQRCodeInfo'],['../structchip_1_1_optional_q_r_code_info.html',1,'chip::OptionalQRCodeInfo']]]
];
";

    #[test]
    fn test_parses_generator_output() {
        let records = parse_artifact(DOXYGEN_SAMPLE).unwrap();
        check!(records.len() == 2);

        check!(records[0].key == "object_6334");
        check!(records[0].display_name == "Object");
        check!(
            records[0].targets
                == vec![RawTarget {
                    target_ref: "../classchip_1_1_system_1_1_object.html".to_string(),
                    local: true,
                    scope_label: "chip::System".to_string(),
                }]
        );

        check!(records[1].targets.len() == 2);
        check!(records[1].targets[1].scope_label == "chip::OptionalQRCodeInfo");
    }

    #[test]
    fn test_parses_json_with_trailing_commas_and_comments() {
        let raw = r#"
            // generated
            [
                ["vec_1", ["Vec", ["../structvec.html", 0, "std"],],], /* tail */
            ]
        "#;
        let records = parse_artifact(raw).unwrap();
        check!(records.len() == 1);
        check!(!records[0].targets[0].local);
    }

    #[rstest]
    #[case(r"['a\'b']", "a'b")]
    #[case(r#"["a\"b"]"#, "a\"b")]
    #[case(r"['\x41B']", "AB")]
    #[case(r"['🦀']", "🦀")]
    #[case(r"['tab\there']", "tab\there")]
    fn test_string_escapes(#[case] raw: &str, #[case] expected: &str) {
        let value = Parser::new(raw).parse_document().unwrap();
        check!(value == Value::Array(vec![Value::Str(expected.to_string())]));
    }

    #[test]
    fn test_empty_artifact_has_no_records() {
        check!(parse_artifact("var searchData=[];").unwrap().is_empty());
    }

    #[test]
    fn test_missing_closing_bracket() {
        let result = parse_artifact("[['a_1',['A',['a.html',1,'']]]");
        let_assert!(Err(ParseError::UnexpectedEof { expected, .. }) = result);
        check!(expected == "']'");
    }

    #[test]
    fn test_mismatched_bracket_reports_both_positions() {
        let result = parse_artifact("[\n  ['a_1',['A',['a.html',1,'']]}\n]");
        let_assert!(
            Err(ParseError::MismatchedBracket {
                opened,
                found,
                position
            }) = result
        );
        check!(found == '}');
        check!(opened.line == 2);
        check!(position.line == 2);
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let result = parse_artifact(&"[".repeat(200_000));
        let_assert!(Err(ParseError::NestingTooDeep { position }) = result);
        check!(position.offset == MAX_DEPTH);
    }

    #[test]
    fn test_nesting_at_limit_reaches_record_checks() {
        let raw = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let_assert!(Err(ParseError::InvalidRecord { record, .. }) = parse_artifact(&raw));
        check!(record == 1);
    }

    #[test]
    fn test_unterminated_string() {
        let result = parse_artifact("[['a_1");
        let_assert!(Err(ParseError::UnterminatedString { position }) = result);
        check!(position.column == 3);
    }

    #[test]
    fn test_invalid_escape() {
        let result = parse_artifact(r"[['a\q']]");
        let_assert!(Err(ParseError::InvalidEscape { .. }) = result);
    }

    #[test]
    fn test_trailing_input_rejected() {
        let result = parse_artifact("[]; alert(1)");
        let_assert!(Err(ParseError::TrailingInput { position }) = result);
        check!(position.offset == 4);
    }

    #[test]
    fn test_top_level_must_be_array() {
        let result = parse_artifact("var searchData='nope';");
        let_assert!(Err(ParseError::NotARecordList { found }) = result);
        check!(found == "string");
    }

    #[rstest]
    #[case("[['a_1']]", "missing record body")]
    #[case("[[1,['A',['a.html',1,'']]]]", "key must be a string, found integer")]
    #[case("[['a_1',[]]]", "missing display name")]
    #[case("[['a_1',['A']]]", "record has no link targets")]
    #[case("[['a_1',['A',['a.html']]]]", "missing link flag")]
    #[case("[['a_1',['A',['a.html',1]]]]", "missing scope label")]
    #[case("[['a_1',['A',['a.html','yes','']]]]", "link flag must be an integer, found string")]
    #[case("[['a_1',['A',['a.html',1,'']],'extra']]", "unexpected field after record body")]
    #[case("[['a_1',['A',['a.html',1,'','extra']]]]", "unexpected field after scope label")]
    fn test_missing_or_malformed_fields(#[case] raw: &str, #[case] reason: &str) {
        let result = parse_artifact(raw);
        let_assert!(Err(ParseError::InvalidRecord { record, reason: actual }) = result);
        check!(record == 1);
        check!(actual == reason);
    }

    #[test]
    fn test_error_points_at_later_record() {
        let raw = "[['a_1',['A',['a.html',1,'']]],\n['b_2',['B']]]";
        let_assert!(Err(ParseError::InvalidRecord { record, .. }) = parse_artifact(raw));
        check!(record == 2);
    }

    #[test]
    fn test_binding_without_equals() {
        let result = parse_artifact("var searchData [];");
        let_assert!(Err(ParseError::UnexpectedChar { found, expected, position }) = result);
        check!(found == '[');
        check!(expected == "'='");
        check!(position.column == 16);
    }
}
