// 🚗 Car Entity - one used car on the warehouse floor
//
// "The registration number is IDENTITY (never changes), everything else is a VALUE"
//
// - Registration number has no setter: a different plate is a different record
// - Every setter re-validates and leaves the car untouched when it fails
// - Colours always occupy three slots so the record file keeps a fixed width

use crate::error::{Result, WarehouseError};
use crate::validation::{has_reserved_chars, validate_field_text};
use serde::Serialize;
use std::fmt;

/// Number of colour columns in a car record
pub const COLOUR_SLOTS: usize = 3;

// ============================================================================
// COLOURS
// ============================================================================

/// Up to three colours, unused slots hold empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Colours([String; COLOUR_SLOTS]);

impl Colours {
    /// Build from one to three entries, padding the rest with ""
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.is_empty() {
            return Err(WarehouseError::validation("colour(s)", "must not be blank"));
        }
        if entries.len() > COLOUR_SLOTS {
            return Err(WarehouseError::validation(
                "colour(s)",
                format!("are limited to a maximum of {} per car", COLOUR_SLOTS),
            ));
        }
        if entries.iter().any(|c| has_reserved_chars(c.as_ref())) {
            return Err(WarehouseError::validation(
                "colour(s)",
                "must not contain commas or line breaks",
            ));
        }

        let mut slots: [String; COLOUR_SLOTS] = Default::default();
        for (slot, entry) in slots.iter_mut().zip(entries) {
            *slot = entry.as_ref().to_string();
        }
        Ok(Colours(slots))
    }

    /// Raw slots exactly as persisted, empty placeholders included
    pub fn slots(&self) -> &[String; COLOUR_SLOTS] {
        &self.0
    }

    /// Non-empty colours in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str).filter(|c| !c.is_empty())
    }
}

impl From<[String; COLOUR_SLOTS]> for Colours {
    fn from(slots: [String; COLOUR_SLOTS]) -> Self {
        Colours(slots)
    }
}

impl fmt::Display for Colours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().collect::<Vec<_>>().join(", "))
    }
}

// ============================================================================
// CAR ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    registration_number: String,

    // ========================================================================
    // VALUES (editable through the store)
    // ========================================================================
    year_made: u32,
    colours: Colours,
    car_maker: String,
    car_model: String,
    price: u32,
}

impl Car {
    /// Create a car from already-validated input
    ///
    /// Text fields are trimmed; blank or comma-containing text is rejected so
    /// the record can always be written back to the car file.
    pub fn new(
        registration_number: &str,
        year_made: u32,
        colours: Colours,
        car_maker: &str,
        car_model: &str,
        price: u32,
    ) -> Result<Self> {
        Ok(Car {
            registration_number: validate_field_text("registration number", registration_number)?,
            year_made,
            colours,
            car_maker: validate_field_text("car maker", car_maker)?,
            car_model: validate_field_text("car model", car_model)?,
            price,
        })
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn year_made(&self) -> u32 {
        self.year_made
    }

    pub fn colours(&self) -> &Colours {
        &self.colours
    }

    pub fn car_maker(&self) -> &str {
        &self.car_maker
    }

    pub fn car_model(&self) -> &str {
        &self.car_model
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    /// Years since the car was made; a car dated after `current_year` is age 0
    pub fn age(&self, current_year: u32) -> u32 {
        current_year.saturating_sub(self.year_made)
    }

    /// Case-insensitive registration comparison
    pub fn has_registration(&self, registration_number: &str) -> bool {
        self.registration_number.to_lowercase() == registration_number.to_lowercase()
    }

    pub fn set_year_made(&mut self, year_made: u32) {
        self.year_made = year_made;
    }

    pub fn set_colours(&mut self, colours: Colours) {
        self.colours = colours;
    }

    pub fn set_price(&mut self, price: u32) {
        self.price = price;
    }

    pub fn set_car_maker(&mut self, car_maker: &str) -> Result<()> {
        self.car_maker = validate_field_text("car maker", car_maker)?;
        Ok(())
    }

    pub fn set_car_model(&mut self, car_model: &str) -> Result<()> {
        self.car_model = validate_field_text("car model", car_model)?;
        Ok(())
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registration Number: {}", self.registration_number)?;
        writeln!(f, "Year Made: {}", self.year_made)?;
        writeln!(f, "Colour: {}", self.colours)?;
        writeln!(f, "Car Maker: {}", self.car_maker)?;
        writeln!(f, "Car Model: {}", self.car_model)?;
        write!(f, "Price: {}", self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_car() -> Car {
        let colours = Colours::new(&["Red", "White"]).unwrap();
        Car::new("AB12CD", 2015, colours, "Toyota", "Corolla", 8000).unwrap()
    }

    #[test]
    fn test_colours_padding() {
        let colours = Colours::new(&["Red"]).unwrap();
        assert_eq!(colours.slots(), &["Red".to_string(), String::new(), String::new()]);
        assert_eq!(colours.iter().count(), 1);
    }

    #[test]
    fn test_colours_rejects_empty_and_overflow() {
        let empty: [&str; 0] = [];
        assert!(Colours::new(&empty).is_err());
        assert!(Colours::new(&["a", "b", "c", "d"]).is_err());
        assert!(Colours::new(&["Red,Blue"]).is_err());
    }

    #[test]
    fn test_colours_rejects_line_breaks() {
        assert!(Colours::new(&["Red\nBlue"]).is_err());
        assert!(Colours::new(&["Red", "Blue\r"]).is_err());
    }

    #[test]
    fn test_colours_display_skips_placeholders() {
        let colours = Colours::from(["Red".to_string(), String::new(), "Blue".to_string()]);
        assert_eq!(colours.to_string(), "Red, Blue");
    }

    #[test]
    fn test_new_trims_and_validates_text() {
        let colours = Colours::new(&["Red"]).unwrap();
        let car = Car::new(" AB12CD ", 2015, colours.clone(), " Toyota ", "Corolla ", 8000).unwrap();
        assert_eq!(car.registration_number(), "AB12CD");
        assert_eq!(car.car_maker(), "Toyota");
        assert_eq!(car.car_model(), "Corolla");

        assert!(Car::new("", 2015, colours.clone(), "Toyota", "Corolla", 8000).is_err());
        assert!(Car::new("AB12CD", 2015, colours.clone(), "  ", "Corolla", 8000).is_err());
        assert!(Car::new("AB12CD", 2015, colours, "Toyota", "Cor,olla", 8000).is_err());
    }

    #[test]
    fn test_has_registration_ignores_case() {
        let car = create_test_car();
        assert!(car.has_registration("ab12cd"));
        assert!(car.has_registration("AB12CD"));
        assert!(!car.has_registration("AB12C"));
    }

    #[test]
    fn test_age() {
        let car = create_test_car();
        assert_eq!(car.age(2021), 6);
        assert_eq!(car.age(2015), 0);
        assert_eq!(car.age(2010), 0);
    }

    #[test]
    fn test_failed_setter_leaves_value() {
        let mut car = create_test_car();
        assert!(car.set_car_maker("   ").is_err());
        assert_eq!(car.car_maker(), "Toyota");
        assert!(car.set_car_model("Yaris").is_ok());
        assert_eq!(car.car_model(), "Yaris");
    }

    #[test]
    fn test_display() {
        let car = create_test_car();
        let text = car.to_string();
        assert!(text.contains("Registration Number: AB12CD"));
        assert!(text.contains("Colour: Red, White"));
        assert!(text.ends_with("Price: 8000"));
    }
}
