use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of a recipe's ingredient list.
#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
pub struct Ingredient {
    #[validate(length(min = 1, message = "Ingredient name is required"))]
    pub ingredient: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be greater than 0"))]
    pub quantity: f64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
}

impl Ingredient {
    pub fn new(ingredient: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity,
            unit: unit.into(),
        }
    }
}
