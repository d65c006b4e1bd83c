//! Drink intent parser
//!
//! Lower-cases the input, scans the keyword table in order and takes the
//! first substring hit. Option extraction runs independently over the
//! same lower-cased text. Pure function: same input, same output.

use shared::models::{DrinkSize, DrinkStrength, OrderOptions};
use thiserror::Error;

/// Keyword -> canonical drink name, in match priority order.
///
/// Scanned front to back; the first keyword found anywhere in the text
/// wins (first-match, not longest-match), so the order of this table is
/// significant. Bilingual Romanian/English list.
const DRINK_KEYWORDS: &[(&str, &str)] = &[
    ("cuba libre", "Cuba Libre"),
    ("mojito", "Mojito"),
    ("gin tonic", "Gin Tonic"),
    ("gin & tonic", "Gin Tonic"),
    ("whisky", "Whisky"),
    ("vodka", "Vodka"),
    ("bere", "Bere"),
    ("beer", "Bere"),
    ("vin", "Vin"),
    ("wine", "Vin"),
    ("martini", "Martini"),
    ("cosmopolitan", "Cosmopolitan"),
    ("margarita", "Margarita"),
];

/// A parsed drink request
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkIntent {
    pub drink: String,
    pub options: OrderOptions,
}

/// Parser errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No known drink found in the message")]
    UnrecognizedDrink,
}

/// Parse a free-form message into a drink intent
pub fn parse_message(message: &str) -> Result<DrinkIntent, ParseError> {
    let text = message.to_lowercase();

    let drink = DRINK_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(*keyword))
        .map(|(_, name)| (*name).to_string())
        .ok_or(ParseError::UnrecognizedDrink)?;

    Ok(DrinkIntent {
        drink,
        options: extract_options(&text),
    })
}

/// Extract the option bundle from lower-cased text
fn extract_options(text: &str) -> OrderOptions {
    let mut options = OrderOptions::default();

    if text.contains("mare") || text.contains("large") {
        options.size = DrinkSize::Large;
    } else if text.contains("mic") || text.contains("small") {
        options.size = DrinkSize::Small;
    }

    if text.contains("fără gheață") || text.contains("no ice") {
        options.ice = false;
    }

    if text.contains("tare") || text.contains("strong") {
        options.strength = Some(DrinkStrength::Strong);
    } else if text.contains("slab") || text.contains("light") {
        options.strength = Some(DrinkStrength::Light);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_options() {
        let intent = parse_message("Aș dori un mojito mare fără gheață").unwrap();
        assert_eq!(intent.drink, "Mojito");
        assert_eq!(intent.options.size, DrinkSize::Large);
        assert!(!intent.options.ice);
        assert!(intent.options.strength.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let intent = parse_message("un mojito").unwrap();
        assert_eq!(intent.options.size, DrinkSize::Medium);
        assert!(intent.options.ice);
        assert!(intent.options.strength.is_none());
    }

    #[test]
    fn test_unrecognized_drink() {
        assert_eq!(parse_message("ceva nedefinit"), Err(ParseError::UnrecognizedDrink));
        assert_eq!(parse_message(""), Err(ParseError::UnrecognizedDrink));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_message("UN MOJITO MARE").unwrap().drink, "Mojito");
    }

    #[test]
    fn test_keyword_table_order_wins_over_text_order() {
        // "mojito" appears later in the text but earlier in the table
        let intent = parse_message("o margarita sau un mojito").unwrap();
        assert_eq!(intent.drink, "Mojito");

        // "cuba libre" is the first table entry
        let intent = parse_message("un mojito si un cuba libre").unwrap();
        assert_eq!(intent.drink, "Cuba Libre");
    }

    #[test]
    fn test_gin_tonic_spellings() {
        assert_eq!(parse_message("un gin tonic").unwrap().drink, "Gin Tonic");
        assert_eq!(parse_message("un gin & tonic").unwrap().drink, "Gin Tonic");
    }

    #[test]
    fn test_bilingual_aliases() {
        assert_eq!(parse_message("a cold beer").unwrap().drink, "Bere");
        assert_eq!(parse_message("o bere").unwrap().drink, "Bere");
        assert_eq!(parse_message("a glass of wine").unwrap().drink, "Vin");
        assert_eq!(parse_message("un pahar de vin").unwrap().drink, "Vin");
    }

    #[test]
    fn test_size_extraction() {
        assert_eq!(
            parse_message("whisky mare").unwrap().options.size,
            DrinkSize::Large
        );
        assert_eq!(
            parse_message("a small whisky").unwrap().options.size,
            DrinkSize::Small
        );
        assert_eq!(
            parse_message("un whisky mic").unwrap().options.size,
            DrinkSize::Small
        );
    }

    #[test]
    fn test_strength_extraction() {
        assert_eq!(
            parse_message("vodka tare").unwrap().options.strength,
            Some(DrinkStrength::Strong)
        );
        assert_eq!(
            parse_message("un martini slab").unwrap().options.strength,
            Some(DrinkStrength::Light)
        );
    }

    #[test]
    fn test_no_ice_english() {
        let intent = parse_message("gin tonic no ice").unwrap();
        assert!(!intent.options.ice);
    }

    #[test]
    fn test_deterministic() {
        let a = parse_message("un mojito mare tare").unwrap();
        let b = parse_message("un mojito mare tare").unwrap();
        assert_eq!(a, b);
    }
}
