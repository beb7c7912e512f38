// Comma-separated field list parser (e.g. "name, price, rating")

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    IResult,
};

/// Parse a comma-separated list, trimming each entry
pub fn parse_field_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char(','), map(take_till(|c| c == ','), str::trim))(input)
}

/// Requested field names with blanks dropped
pub fn requested_fields(input: &str) -> Vec<String> {
    match parse_field_list(input) {
        Ok((_, names)) => names
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}
