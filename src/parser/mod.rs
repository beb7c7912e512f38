// Parsers for raw content handed over by content sources

pub mod fence;
pub mod fields;
pub mod number;

// Public API re-exports
pub use fence::find_fenced_block;
pub use fields::requested_fields;
pub use number::plain_decimal;
