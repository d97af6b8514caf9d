// 🛂 Input Validation - raw strings in, typed values out
//
// Pure functions, no state. Every check returns a WarehouseError::Validation
// describing the violated constraint; the caller decides whether to re-prompt.

use crate::entities::Colours;
use crate::error::{Result, WarehouseError};
use chrono::Datelike;

// ============================================================================
// DOMAIN BOUNDS
// ============================================================================

/// Oldest model year the warehouse accepts
pub const MIN_YEAR_MADE: u32 = 1950;

pub const MIN_PRICE: u32 = 500;
pub const MAX_PRICE: u32 = 30_000;

pub const MAX_REGISTRATION_LENGTH: usize = 6;

/// Longest digit string accepted before parsing
pub const MAX_NUMBER_LENGTH: usize = 10;

/// Field separator of both data files
pub const FIELD_SEPARATOR: char = ',';

/// Current calendar year from the local clock
pub fn current_year() -> u32 {
    chrono::Local::now().year().max(0) as u32
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Parse a non-empty string of ASCII digits (at most 10 of them)
pub fn validate_number(input: &str) -> Result<u32> {
    if input.is_empty() || input.len() > MAX_NUMBER_LENGTH {
        return Err(WarehouseError::validation("input", "is not a valid input"));
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(WarehouseError::validation("input", "is not a valid number"));
    }
    input
        .parse::<u32>()
        .map_err(|_| WarehouseError::validation("input", "is too large"))
}

/// True when `value` would split a record: a comma or a line break
pub fn has_reserved_chars(value: &str) -> bool {
    value.contains(|c| c == FIELD_SEPARATOR || c == '\n' || c == '\r')
}

/// Trimmed free text that can be stored in a data file field
///
/// Rejects blank values and values containing the field separator or a
/// line break.
pub fn validate_field_text(field: &str, input: &str) -> Result<String> {
    let value = input.trim();
    if value.is_empty() {
        return Err(WarehouseError::validation(field, "must not be blank"));
    }
    if has_reserved_chars(value) {
        return Err(WarehouseError::validation(
            field,
            "must not contain commas or line breaks",
        ));
    }
    Ok(value.to_string())
}

fn validate_range(field: &str, value: u32, min: u32, max: u32) -> Result<u32> {
    if value < min || value > max {
        return Err(WarehouseError::validation(
            field,
            format!("must be between {} and {} (both inclusive)", min, max),
        ));
    }
    Ok(value)
}

// ============================================================================
// CAR ATTRIBUTES
// ============================================================================

/// 1-6 alphanumeric characters, e.g. `8RT2WT`
pub fn validate_registration_number(input: &str) -> Result<String> {
    let length = input.chars().count();
    if length == 0 || length > MAX_REGISTRATION_LENGTH {
        return Err(WarehouseError::validation(
            "registration number",
            "must not be blank and must only have maximum 6 characters",
        ));
    }
    if !input.chars().all(char::is_alphanumeric) {
        return Err(WarehouseError::validation(
            "registration number",
            "must be numeric/alphabetic (e.g. 8RT2WT)",
        ));
    }
    Ok(input.to_string())
}

pub fn validate_year_made(input: &str, current_year: u32) -> Result<u32> {
    let year = validate_number(input)?;
    validate_range("year made", year, MIN_YEAR_MADE, current_year)
}

/// Split `White, Blue,Red` into at most three trimmed colour slots
///
/// Trailing empty entries are dropped, so `Red,Blue,Green,` is three colours.
pub fn validate_colours(input: &str) -> Result<Colours> {
    let mut entries: Vec<&str> = input.split(FIELD_SEPARATOR).map(str::trim).collect();
    while entries.last().is_some_and(|entry| entry.is_empty()) {
        entries.pop();
    }
    if entries.is_empty() {
        return Err(WarehouseError::validation("colour(s)", "must not be blank"));
    }
    Colours::new(&entries)
}

pub fn validate_price(input: &str) -> Result<u32> {
    let price = validate_number(input)?;
    validate_range("price", price, MIN_PRICE, MAX_PRICE)
}

/// Upper bound of a price search; must not undercut the chosen minimum
pub fn validate_maximum_price(minimum_price: u32, input: &str) -> Result<u32> {
    let price = validate_number(input)?;
    validate_range("maximum price", price, minimum_price, MAX_PRICE)
}

pub fn validate_age(input: &str, current_year: u32) -> Result<u32> {
    let age = validate_number(input)?;
    validate_range("age", age, 0, current_year.saturating_sub(MIN_YEAR_MADE))
}

/// Menu choice between 1 and `bound`
pub fn validate_menu_option(input: &str, bound: u32) -> Result<u32> {
    let option = validate_number(input)?;
    validate_range("menu option", option, 1, bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_number() {
        assert_eq!(validate_number("0042").unwrap(), 42);
        assert!(validate_number("").is_err());
        assert!(validate_number("12a").is_err());
        assert!(validate_number("-5").is_err());
        assert!(validate_number(" 5").is_err());
        assert!(validate_number("12345678901").is_err());
        // Ten digits but larger than u32
        assert!(validate_number("9999999999").is_err());
    }

    #[test]
    fn test_validate_registration_number() {
        assert_eq!(validate_registration_number("8RT2WT").unwrap(), "8RT2WT");
        assert!(validate_registration_number("A").is_ok());
        assert!(validate_registration_number("").is_err());
        assert!(validate_registration_number("ABCDEFG").is_err());
        assert!(validate_registration_number("AB-12").is_err());
        assert!(validate_registration_number("AB 12").is_err());
    }

    #[test]
    fn test_validate_year_made_bounds() {
        assert_eq!(validate_year_made("1950", 2024).unwrap(), 1950);
        assert_eq!(validate_year_made("2024", 2024).unwrap(), 2024);
        assert!(validate_year_made("1949", 2024).is_err());
        assert!(validate_year_made("2025", 2024).is_err());
        assert!(validate_year_made("year", 2024).is_err());
    }

    #[test]
    fn test_validate_colours_pads_and_trims() {
        let colours = validate_colours(" White , Blue").unwrap();
        assert_eq!(colours.slots(), &["White".to_string(), "Blue".to_string(), String::new()]);
        assert_eq!(colours.to_string(), "White, Blue");

        assert!(validate_colours("   ").is_err());
        assert!(validate_colours(",,").is_err());
        assert!(validate_colours("Red,Green,Blue,Black").is_err());
    }

    #[test]
    fn test_validate_colours_drops_trailing_empty_entries() {
        let colours = validate_colours("Red,Blue,Green,").unwrap();
        assert_eq!(colours.to_string(), "Red, Blue, Green");

        let colours = validate_colours("Red,,Blue").unwrap();
        assert_eq!(colours.slots(), &["Red".to_string(), String::new(), "Blue".to_string()]);
    }

    #[test]
    fn test_validate_colours_rejects_line_breaks() {
        assert!(validate_colours("Red\nBlue").is_err());
        assert!(validate_colours("Red,Bl\rue").is_err());
    }

    #[test]
    fn test_validate_price_and_maximum() {
        assert_eq!(validate_price("500").unwrap(), 500);
        assert_eq!(validate_price("30000").unwrap(), 30_000);
        assert!(validate_price("499").is_err());
        assert!(validate_price("30001").is_err());

        assert_eq!(validate_maximum_price(8000, "8000").unwrap(), 8000);
        assert!(validate_maximum_price(8000, "7999").is_err());
        assert!(validate_maximum_price(8000, "30001").is_err());
    }

    #[test]
    fn test_validate_age() {
        assert_eq!(validate_age("0", 2024).unwrap(), 0);
        assert_eq!(validate_age("74", 2024).unwrap(), 74);
        assert!(validate_age("75", 2024).is_err());
    }

    #[test]
    fn test_validate_menu_option() {
        assert_eq!(validate_menu_option("1", 5).unwrap(), 1);
        assert_eq!(validate_menu_option("5", 5).unwrap(), 5);
        assert!(validate_menu_option("0", 5).is_err());
        assert!(validate_menu_option("6", 5).is_err());
    }

    #[test]
    fn test_validate_field_text() {
        assert_eq!(validate_field_text("car maker", "  Toyota ").unwrap(), "Toyota");
        assert!(validate_field_text("car maker", "   ").is_err());
        assert!(validate_field_text("car maker", "Toy,ota").is_err());
        assert!(validate_field_text("car model", "Cor\nolla").is_err());
        // Surrounding whitespace, newlines included, is trimmed away
        assert_eq!(validate_field_text("car model", "Corolla\n").unwrap(), "Corolla");
    }

    #[test]
    fn test_validation_error_message() {
        let err = validate_price("100").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: price must be between 500 and 30000 (both inclusive)"
        );
    }
}
