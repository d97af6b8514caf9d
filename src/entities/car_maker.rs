// 🏭 Car Maker Entity - a maker name plus its ordered model list
//
// Models are addressed by 1-based ordinal in display order. Ordinal 0 is
// reserved for "any model of this maker", carried as ModelChoice::Any
// instead of a magic string.

use crate::error::{Result, WarehouseError};
use crate::validation::validate_field_text;
use serde::Serialize;
use std::fmt;

/// Token used for ModelChoice::Any in text form
pub const ANY_MODEL: &str = "ANY";

// ============================================================================
// MODEL CHOICE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModelChoice {
    /// Every model of the chosen maker
    Any,

    /// One named model
    Specific(String),
}

impl ModelChoice {
    /// `ANY` in any case means every model, anything else names one
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case(ANY_MODEL) {
            ModelChoice::Any
        } else {
            ModelChoice::Specific(text.to_string())
        }
    }

    /// Case-insensitive match against a car's model
    pub fn matches(&self, car_model: &str) -> bool {
        match self {
            ModelChoice::Any => true,
            ModelChoice::Specific(model) => model.to_lowercase() == car_model.to_lowercase(),
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Any => write!(f, "{}", ANY_MODEL),
            ModelChoice::Specific(model) => write!(f, "{}", model),
        }
    }
}

// ============================================================================
// CAR MAKER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarMaker {
    name: String,

    /// Display and selection order
    available_models: Vec<String>,
}

impl CarMaker {
    /// Create a maker without validating the name or the models
    ///
    /// Catalog files are taken as-is; use `set_name` / `add_model` for
    /// user-supplied values.
    pub fn new(name: impl Into<String>, available_models: Vec<String>) -> Self {
        CarMaker {
            name: name.into(),
            available_models,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn models(&self) -> &[String] {
        &self.available_models
    }

    pub fn model_count(&self) -> usize {
        self.available_models.len()
    }

    /// Append a trimmed model name; blank or comma-containing names are refused
    pub fn add_model(&mut self, model: &str) -> Result<()> {
        let model = validate_field_text("car model", model)?;
        self.available_models.push(model);
        Ok(())
    }

    /// Model by selection ordinal: 0 is Any, 1..=count names a model
    pub fn get_model(&self, ordinal: usize) -> Result<ModelChoice> {
        if ordinal == 0 {
            return Ok(ModelChoice::Any);
        }
        self.available_models
            .get(ordinal - 1)
            .map(|model| ModelChoice::Specific(model.clone()))
            .ok_or(WarehouseError::OutOfRange {
                ordinal,
                min: 0,
                max: self.available_models.len(),
            })
    }

    /// Remove by 0-based index, returning the removed model
    pub fn remove_model(&mut self, index: usize) -> Result<String> {
        if index >= self.available_models.len() {
            return Err(WarehouseError::OutOfRange {
                ordinal: index,
                min: 0,
                max: self.available_models.len().saturating_sub(1),
            });
        }
        Ok(self.available_models.remove(index))
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = validate_field_text("car maker name", name)?;
        Ok(())
    }

    /// Replace the whole model list; an empty list is refused
    pub fn set_available_models(&mut self, models: Vec<String>) -> Result<()> {
        if models.is_empty() {
            return Err(WarehouseError::validation("available model(s)", "must not be blank"));
        }
        self.available_models = models;
        Ok(())
    }
}

impl fmt::Display for CarMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Car Maker Name: {}", self.name)?;
        write!(f, "Available Models: {}", self.available_models.join(", "))
    }
}
