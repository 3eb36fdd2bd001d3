//! Textual query parser using nom
//!
//! Query format:
//! ```text
//! [whitespace] [+|-] digits [. digits] [whitespace]
//! ```
//!
//! The parser only recognises numbers. Whether a number is a valid bound is
//! decided later by [`RawInput::validate`](crate::RawInput::validate).

use nom::{
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::input::RawInput;

/// Recognise a signed decimal number, returning its text
fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

/// Parse a single textual query
pub fn parse_query(input: &str) -> Result<RawInput> {
    let (_, text) = all_consuming(delimited(multispace0, number, multispace0))(input)?;

    if text.contains('.') {
        text.parse::<f64>()
            .map(RawInput::Float)
            .map_err(|e| Error::Parse(format!("{}: {}", text, e)))
    } else {
        text.parse::<i128>()
            .map(RawInput::Int)
            .map_err(|e| Error::Parse(format!("{}: {}", text, e)))
    }
}
