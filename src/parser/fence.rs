// Markdown code fence parser for pasted or model-generated content

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::alpha0,
    sequence::{delimited, preceded},
    IResult,
};

/// Parse a fenced block at the start of input
/// Format: ```json ... ``` (the language tag is optional)
pub fn parse_fenced_block(input: &str) -> IResult<&str, &str> {
    let (input, body) = delimited(
        tag("```"),
        preceded(alpha0, take_until("```")),
        tag("```"),
    )(input)?;

    Ok((input, body.trim()))
}

/// Locate the first fenced block anywhere in the text and return its body
pub fn find_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    parse_fenced_block(&text[start..]).ok().map(|(_, body)| body)
}
