// Plain decimal literal recognizer used when coercing backend rows

use nom::{
    character::complete::{char, digit1},
    combinator::{eof, opt, recognize},
    sequence::{pair, terminated, tuple},
    IResult,
};

/// Recognize a plain decimal literal spanning the whole input
/// Format: -?digits(.digits)?, with no exponent, leading `+` or bare `.`
pub fn parse_plain_decimal(input: &str) -> IResult<&str, &str> {
    terminated(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        eof,
    )(input)
}

/// Parse trimmed text as a plain decimal, if it is one
pub fn plain_decimal(text: &str) -> Option<f64> {
    parse_plain_decimal(text.trim())
        .ok()
        .and_then(|(_, literal)| literal.parse::<f64>().ok())
}
