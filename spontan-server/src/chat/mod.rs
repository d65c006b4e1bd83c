//! Drink intent parsing
//!
//! Maps free-form chat messages to a known drink plus an option bundle.
//! Pure keyword matching, no external NLP.

mod parser;

pub use parser::{DrinkIntent, ParseError, parse_message};
