//! BibTeX parser implementation using nom
//!
//! Handles:
//! - `@string` definitions, plus the built-in month macros
//! - `@preamble` and `@comment`
//! - Entries delimited by braces or parentheses
//! - Braced, quoted, numeric and macro field values, joined with `#`
//! - Nested braces in field values
//!
//! A malformed entry does not abort the parse. It is recorded in
//! [`ParseResult::errors`] and parsing resumes at the next `@`.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::map,
    error::{Error, ErrorKind},
    sequence::{delimited, preceded},
    IResult,
};
use std::collections::HashMap;

use crate::entry::{Entry, EntryType};

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// An entry that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryError {
    /// 1-based line of the `@` that starts the entry
    pub line: usize,
    pub message: String,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub entries: Vec<Entry>,
    pub preambles: Vec<String>,
    /// `@string` definitions found in the input, as written
    pub strings: HashMap<String, String>,
    pub errors: Vec<EntryError>,
}

type Macros = HashMap<String, String>;

enum Item {
    Entry(Entry),
    Macro(String, String),
    Preamble(String),
    Comment,
}

/// Parse a BibTeX string
pub fn parse(input: &str) -> ParseResult {
    let mut result = ParseResult::default();
    let mut macros: Macros = MONTHS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut rest = input;
    while let Some(at) = rest.find('@') {
        let chunk = &rest[at..];
        match item(chunk, &macros) {
            Ok((remaining, parsed)) => {
                match parsed {
                    Item::Entry(entry) => result.entries.push(entry),
                    Item::Macro(name, value) => {
                        macros.insert(name.to_lowercase(), value.clone());
                        result.strings.insert(name, value);
                    }
                    Item::Preamble(text) => result.preambles.push(text),
                    Item::Comment => {}
                }
                rest = remaining;
            }
            Err(_) => {
                let line = input[..input.len() - chunk.len()].matches('\n').count() + 1;
                result.errors.push(EntryError {
                    line,
                    message: format!("malformed entry starting with `{}`", preview(chunk)),
                });
                rest = &chunk[1..];
            }
        }
    }

    result
}

/// First line of an entry, shortened for error messages
fn preview(chunk: &str) -> String {
    let line = chunk.lines().next().unwrap_or_default().trim_end();
    if line.chars().count() > 40 {
        let short: String = line.chars().take(40).collect();
        format!("{short}...")
    } else {
        line.to_string()
    }
}

fn item<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, Item> {
    let (rest, kind) = preceded(char('@'), preceded(multispace0, identifier))(input)?;
    let (rest, _) = multispace0(rest)?;

    match kind.to_lowercase().as_str() {
        "comment" => {
            let (rest, _) = comment_body(rest)?;
            Ok((rest, Item::Comment))
        }
        "string" => {
            let (rest, open) = opening(rest)?;
            let (rest, (name, value)) = delimited(multispace0, |i| assignment(i, macros), multispace0)(rest)?;
            let (rest, _) = char(closing(open))(rest)?;
            Ok((rest, Item::Macro(name.to_string(), value)))
        }
        "preamble" => {
            let (rest, open) = opening(rest)?;
            let (rest, text) = delimited(multispace0, |i| value(i, macros), multispace0)(rest)?;
            let (rest, _) = char(closing(open))(rest)?;
            Ok((rest, Item::Preamble(text)))
        }
        _ => {
            let (rest, entry) = entry_body(rest, kind, macros)?;
            Ok((rest, Item::Entry(entry)))
        }
    }
}

fn opening(input: &str) -> IResult<&str, char> {
    alt((char('{'), char('(')))(input)
}

fn closing(open: char) -> char {
    if open == '(' {
        ')'
    } else {
        '}'
    }
}

/// Skip a braced comment, or the rest of the line
fn comment_body(input: &str) -> IResult<&str, ()> {
    if input.starts_with('{') {
        let (rest, _) = braced(input)?;
        Ok((rest, ()))
    } else {
        let end = input.find('\n').unwrap_or(input.len());
        Ok((&input[end..], ()))
    }
}

fn entry_body<'a>(input: &'a str, kind: &str, macros: &Macros) -> IResult<&'a str, Entry> {
    let (rest, open) = opening(input)?;
    let close = closing(open);
    let (mut rest, key) = delimited(multispace0, cite_key, multispace0)(rest)?;

    let mut entry = Entry::new(key, EntryType::parse(kind));
    loop {
        let (r, _) = multispace0(rest)?;
        if let Some(r) = r.strip_prefix(close) {
            return Ok((r, entry));
        }
        let (r, _) = char(',')(r)?;
        let (r, _) = multispace0(r)?;
        // Trailing comma before the closing delimiter
        if let Some(r) = r.strip_prefix(close) {
            return Ok((r, entry));
        }
        let (r, (name, text)) = assignment(r, macros)?;
        entry.add_field(name, text);
        rest = r;
    }
}

fn cite_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | '{' | '}' | '(' | ')'))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/'))(
        input,
    )
}

/// `name = value`
fn assignment<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (&'a str, String)> {
    let (rest, name) = identifier(input)?;
    let (rest, _) = delimited(multispace0, char('='), multispace0)(rest)?;
    let (rest, text) = value(rest, macros)?;
    Ok((rest, (name, text)))
}

/// A field value: one or more pieces joined with `#`
fn value<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    let (mut rest, mut text) = piece(input, macros)?;
    loop {
        let (r, _) = multispace0(rest)?;
        let Some(r) = r.strip_prefix('#') else {
            return Ok((rest, text));
        };
        let (r, _) = multispace0(r)?;
        let (r, next) = piece(r, macros)?;
        text.push_str(&next);
        rest = r;
    }
}

fn piece<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    alt((
        map(braced, |s: &str| s[1..s.len() - 1].to_string()),
        map(quoted, str::to_string),
        map(digit1, str::to_string),
        map(identifier, |name: &str| {
            macros
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        }),
    ))(input)
}

/// `{...}` with nested braces; returns the content including the braces
fn braced(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }

    let mut depth = 0usize;
    let mut escaped = false;
    for (pos, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..=pos]));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

/// `"..."`; a quote inside braces does not end the value
fn quoted(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }

    let mut depth = 0usize;
    let mut escaped = false;
    for (pos, c) in input.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => return Ok((&input[pos + 1..], &input[1..pos])),
            _ => {}
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}
