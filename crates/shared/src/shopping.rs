use serde::{Deserialize, Serialize};

use crate::recipe::Ingredient;

/// One aggregated row of a shopping list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShoppingItem {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
}

impl ShoppingItem {
    pub fn new(ingredient: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

impl From<&Ingredient> for ShoppingItem {
    fn from(value: &Ingredient) -> Self {
        Self {
            ingredient: value.ingredient.to_owned(),
            quantity: value.quantity,
            unit: value.unit.to_owned(),
        }
    }
}
