use std::ops::Range;

use maneuver_cmds::{CommandSequence, Direction};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, alphanumeric1, char, multispace0, multispace1},
    combinator::{all_consuming, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

use crate::CodegenError;

/// The `direction_sequence[]` declaration found inside a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Byte range of the whole declaration, from `Direction_t` up to and including `;`.
    pub span: Range<usize>,
    pub steps: Vec<Direction>,
}

impl Declaration {
    pub fn sequence(&self) -> CommandSequence<'_> {
        CommandSequence::new(&self.steps)
    }
}

fn ws<'a, F, O>(f: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, f, multispace0)
}

/// A C identifier.
fn symbol(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Comma separated identifiers, a trailing comma is allowed.
fn symbol_list(input: &str) -> IResult<&str, Vec<&str>> {
    terminated(
        separated_list0(ws(char(',')), ws(symbol)),
        opt(ws(char(','))),
    )(input)
}

/// `Direction_t direction_sequence[] = {`
fn declaration_head(input: &str) -> IResult<&str, ()> {
    let (input, _) = tuple((
        tag("Direction_t"),
        multispace1,
        tag("direction_sequence"),
        ws(char('[')),
        char(']'),
        ws(char('=')),
        char('{'),
    ))(input)?;
    Ok((input, ()))
}

/// `};` closing a declaration.
fn declaration_tail(input: &str) -> IResult<&str, ()> {
    let (input, _) = tuple((char('}'), multispace0, char(';')))(input)?;
    Ok((input, ()))
}

/// `Direction_t direction_sequence[] = { ... };`
fn declaration(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, _) = declaration_head(input)?;
    let (input, names) = ws(symbol_list)(input)?;
    let (input, _) = declaration_tail(input)?;
    Ok((input, names))
}

/// Same shape as [declaration], but anything up to the closing brace
/// is accepted as the body.
fn loose_declaration(input: &str) -> IResult<&str, &str> {
    let (input, _) = declaration_head(input)?;
    let (input, body) = take_till(|c: char| c == '}')(input)?;
    let (input, _) = declaration_tail(input)?;
    Ok((input, body))
}

/// `typedef enum { ... } Direction_t;`
fn vocabulary(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, _) = tuple((tag("typedef"), multispace1, tag("enum"), ws(char('{'))))(input)?;
    let (input, names) = ws(symbol_list)(input)?;
    let (input, _) = tuple((char('}'), ws(tag("Direction_t")), char(';')))(input)?;
    Ok((input, names))
}

fn to_directions(names: Vec<&str>) -> Result<Vec<Direction>, CodegenError> {
    names
        .into_iter()
        .map(|name| {
            Direction::from_name(name).ok_or_else(|| CodegenError::UnknownDirection(name.into()))
        })
        .collect()
}

fn syntax_error(err: nom::Err<nom::error::Error<&str>>) -> CodegenError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            CodegenError::Syntax(e.input.chars().take(16).collect())
        }
        nom::Err::Incomplete(_) => CodegenError::Syntax(String::new()),
    }
}

/// Parses a list of direction names such as `RIGHT, FORWARD, FLIP`.
///
/// Whitespace around names and a trailing comma are allowed.
/// Blank input is an empty list.
pub fn parse_names(input: &str) -> Result<Vec<Direction>, CodegenError> {
    all_consuming(ws(symbol_list))(input)
        .map_err(syntax_error)
        .and_then(|(_, names)| to_directions(names))
}

/// Checks that `header` has no identifier character right before `at`,
/// so that `MyDirection_t` is not mistaken for `Direction_t`.
fn starts_word(header: &str, at: usize) -> bool {
    header[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// Finds the first `direction_sequence[]` declaration in a header.
pub fn find_declaration(header: &str) -> Result<Declaration, CodegenError> {
    for (start, _) in header.match_indices("Direction_t") {
        if !starts_word(header, start) {
            continue;
        }
        if let Ok((rest, names)) = declaration(&header[start..]) {
            let end = header.len() - rest.len();
            return Ok(Declaration {
                span: start..end,
                steps: to_directions(names)?,
            });
        }
    }
    Err(CodegenError::DeclarationNotFound)
}

/// Byte range of the first `direction_sequence[]` declaration,
/// whatever its initializer list holds.
///
/// Unlike [find_declaration], unknown names or comments between the braces
/// are fine, so a stale list can still be replaced.
pub fn find_declaration_span(header: &str) -> Result<Range<usize>, CodegenError> {
    header
        .match_indices("Direction_t")
        .filter(|(start, _)| starts_word(header, *start))
        .find_map(|(start, _)| {
            loose_declaration(&header[start..])
                .ok()
                .map(|(rest, _)| start..header.len() - rest.len())
        })
        .ok_or(CodegenError::DeclarationNotFound)
}

/// Member names of the header's `Direction_t` enum, in declaration order.
pub fn parse_vocabulary(header: &str) -> Result<Vec<String>, CodegenError> {
    header
        .match_indices("typedef")
        .filter(|(start, _)| starts_word(header, *start))
        .find_map(|(start, _)| vocabulary(&header[start..]).ok())
        .map(|(_, names)| names.into_iter().map(String::from).collect())
        .ok_or(CodegenError::VocabularyNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn test_parse_symbol() {
        for input in ["FORWARD", "Direction_t", "_x", "a1"] {
            let (rem, parsed) = symbol(input).unwrap();
            assert_eq!(parsed, input);
            assert!(rem.is_empty());
        }

        for input in ["1ABC", "", ",", " LEFT"] {
            assert!(symbol(input).is_err(), "Expected '{}' to fail", input);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            parse_names("RIGHT, FORWARD,BACK,LEFT,FLIP").unwrap(),
            vec![Right, Forward, Back, Left, Flip]
        );
        assert_eq!(parse_names("  NORMAL ,\n FLIP, ").unwrap(), vec![Normal, Flip]);
        assert_eq!(parse_names("").unwrap(), Vec::<Direction>::new());
        assert!(parse_names("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_names_errors() {
        assert!(matches!(
            parse_names("RIGHT, UP"),
            Err(CodegenError::UnknownDirection(name)) if name == "UP"
        ));
        assert!(matches!(
            parse_names("RIGHT LEFT"),
            Err(CodegenError::Syntax(near)) if near == "LEFT"
        ));
        assert!(matches!(
            parse_names("RIGHT,,LEFT"),
            Err(CodegenError::Syntax(_))
        ));
    }

    #[test]
    fn test_find_declaration() {
        let header = "int x;\nDirection_t direction_sequence[] = {RIGHT, FORWARD,BACK,LEFT,FLIP};\n";
        let decl = find_declaration(header).unwrap();
        assert_eq!(decl.steps, vec![Right, Forward, Back, Left, Flip]);
        assert_eq!(
            &header[decl.span.clone()],
            "Direction_t direction_sequence[] = {RIGHT, FORWARD,BACK,LEFT,FLIP};"
        );
        assert_eq!(decl.sequence().len(), 5);
    }

    #[test]
    fn test_find_declaration_loose_spacing() {
        let header = "Direction_t   direction_sequence [ ]=\n{\n  FLIP,\n  NORMAL,\n} ;";
        let decl = find_declaration(header).unwrap();
        assert_eq!(decl.steps, vec![Flip, Normal]);
        assert_eq!(decl.span, 0..header.len());
    }

    #[test]
    fn test_find_declaration_skips_other_uses() {
        let header = "typedef enum { FORWARD } Direction_t;\n\
                      MyDirection_t direction_sequence[] = {FORWARD};\n\
                      Direction_t direction_sequence[] = {};\n";
        let decl = find_declaration(header).unwrap();
        assert!(decl.steps.is_empty());
        assert_eq!(
            &header[decl.span.clone()],
            "Direction_t direction_sequence[] = {};"
        );
    }

    #[test]
    fn test_find_declaration_errors() {
        assert!(matches!(
            find_declaration("uint8_t MAX_STATES_NUM = 0;"),
            Err(CodegenError::DeclarationNotFound)
        ));
        assert!(matches!(
            find_declaration("Direction_t direction_sequence[] = {RIGHT, UPWARD};"),
            Err(CodegenError::UnknownDirection(name)) if name == "UPWARD"
        ));
    }

    #[test]
    fn test_find_declaration_span() {
        let header = "// x\nDirection_t direction_sequence[] = {RIGHT, UP};\n";
        let span = find_declaration_span(header).unwrap();
        assert_eq!(
            &header[span],
            "Direction_t direction_sequence[] = {RIGHT, UP};"
        );

        let header = "Direction_t direction_sequence[] = {RIGHT, /* turn */ FLIP};";
        assert_eq!(find_declaration_span(header).unwrap(), 0..header.len());

        let header = "Direction_t direction_sequence[] = {};";
        assert_eq!(find_declaration_span(header).unwrap(), 0..header.len());

        assert!(matches!(
            find_declaration_span("MyDirection_t direction_sequence[] = {FLIP};"),
            Err(CodegenError::DeclarationNotFound)
        ));
        assert!(matches!(
            find_declaration_span("Direction_t direction_sequence[] = {FLIP"),
            Err(CodegenError::DeclarationNotFound)
        ));
    }

    #[test]
    fn test_parse_vocabulary() {
        let header = r#"
#include <cstdint>

typedef enum {
    FORWARD,
    RIGHT,
    LEFT,
    BACK,
    NORMAL,
    FLIP,
} Direction_t;
"#;
        assert_eq!(
            parse_vocabulary(header).unwrap(),
            vec!["FORWARD", "RIGHT", "LEFT", "BACK", "NORMAL", "FLIP"]
        );

        assert!(matches!(
            parse_vocabulary("typedef enum { A, B } Other_t;"),
            Err(CodegenError::VocabularyNotFound)
        ));
    }
}
