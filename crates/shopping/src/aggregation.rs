//! Shopping list aggregation.
//!
//! Ingredient lines are summed per `(ingredient, unit)` key while walking
//! meals, then recipes, then lines, in the order given. Output keeps the
//! order in which each key was first seen. Units are never converted, so
//! `1 l` and `200 ml` of milk stay two rows.

use std::collections::HashMap;

use nutriplan_meal::Meal;
use nutriplan_shared::{recipe::Ingredient, shopping::ShoppingItem};
use serde::{Deserialize, Serialize};

/// How two lines are recognised as the same shopping item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Byte for byte comparison of name and unit. "Flour" and "flour" are two items.
    #[default]
    Exact,
    /// Trimmed and lower-cased comparison. The first spelling seen is kept.
    Normalized,
}

impl KeyPolicy {
    pub fn key(&self, ingredient: &str, unit: &str) -> ItemKey {
        match self {
            KeyPolicy::Exact => ItemKey::new(ingredient, unit),
            KeyPolicy::Normalized => ItemKey::new(
                ingredient.trim().to_lowercase(),
                unit.trim().to_lowercase(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub ingredient: String,
    pub unit: String,
}

impl ItemKey {
    pub fn new(ingredient: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            unit: unit.into(),
        }
    }
}

/// Keyed accumulator. `index` points into `items`, which holds first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator {
    policy: KeyPolicy,
    index: HashMap<ItemKey, usize>,
    items: Vec<ShoppingItem>,
}

impl Aggregator {
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Starts from items already on a list. A later row sharing a key replaces
    /// the earlier quantity but keeps its position.
    pub fn seed(mut self, items: impl IntoIterator<Item = ShoppingItem>) -> Self {
        for item in items {
            let key = self.policy.key(&item.ingredient, &item.unit);

            match self.index.get(&key) {
                Some(&pos) => self.items[pos].quantity = item.quantity,
                None => {
                    self.index.insert(key, self.items.len());
                    self.items.push(item);
                }
            }
        }

        self
    }

    pub fn add_meals(mut self, meals: &[Meal]) -> Self {
        for line in meals
            .iter()
            .flat_map(|meal| meal.recipes.iter())
            .flat_map(|recipe| recipe.ingredients.iter())
        {
            self.add_line(line);
        }

        self
    }

    pub fn add_line(&mut self, line: &Ingredient) {
        self.push(line.into());
    }

    pub fn finish(self) -> Vec<ShoppingItem> {
        self.items
    }

    fn push(&mut self, item: ShoppingItem) {
        let key = self.policy.key(&item.ingredient, &item.unit);

        match self.index.get(&key) {
            Some(&pos) => self.items[pos].quantity += item.quantity,
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(item);
            }
        }
    }
}

/// Builds the rows of a new shopping list from the selected meals.
pub fn aggregate(meals: &[Meal]) -> Vec<ShoppingItem> {
    aggregate_with(KeyPolicy::Exact, meals)
}

pub fn aggregate_with(policy: KeyPolicy, meals: &[Meal]) -> Vec<ShoppingItem> {
    Aggregator::new(policy).add_meals(meals).finish()
}

/// Adds the selected meals on top of the rows a list already has. Existing
/// rows come first, new keys follow in traversal order.
pub fn merge(existing: Vec<ShoppingItem>, meals: &[Meal]) -> Vec<ShoppingItem> {
    merge_with(KeyPolicy::Exact, existing, meals)
}

pub fn merge_with(
    policy: KeyPolicy,
    existing: impl IntoIterator<Item = ShoppingItem>,
    meals: &[Meal],
) -> Vec<ShoppingItem> {
    Aggregator::new(policy).seed(existing).add_meals(meals).finish()
}

#[cfg(test)]
mod tests {
    use nutriplan_recipe::Recipe;

    use super::*;

    fn recipe(ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id: "recipe".to_owned(),
            user_id: "user_1".to_owned(),
            name: "recipe".to_owned(),
            image: None,
            category: "Dinner".to_owned(),
            description: "".to_owned(),
            ingredients,
            instructions: vec![],
            created_at: 0,
            updated_at: None,
        }
    }

    fn meal(recipes: Vec<Recipe>) -> Meal {
        Meal {
            id: "meal".to_owned(),
            user_id: "user_1".to_owned(),
            name: "meal".to_owned(),
            recipes,
            created_at: 0,
            updated_at: None,
        }
    }

    fn line(ingredient: &str, quantity: f64, unit: &str) -> Ingredient {
        Ingredient::new(ingredient, quantity, unit)
    }

    fn names(items: &[ShoppingItem]) -> Vec<&str> {
        items.iter().map(|i| i.ingredient.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_single_ingredient() {
        let meals = vec![meal(vec![recipe(vec![line("flour", 2.0, "cup")])])];

        assert_eq!(aggregate(&meals), vec![ShoppingItem::new("flour", 2.0, "cup")]);
    }

    #[test]
    fn test_sum_across_meals() {
        let meals = vec![
            meal(vec![recipe(vec![line("egg", 2.0, "piece(s)")])]),
            meal(vec![recipe(vec![line("egg", 2.0, "piece(s)")])]),
        ];

        assert_eq!(
            aggregate(&meals),
            vec![ShoppingItem::new("egg", 4.0, "piece(s)")]
        );
    }

    #[test]
    fn test_sum_within_recipe_and_meal() {
        let meals = vec![meal(vec![
            recipe(vec![line("salt", 1.0, "tsp"), line("salt", 0.5, "tsp")]),
            recipe(vec![line("salt", 1.5, "tsp")]),
        ])];

        assert_eq!(aggregate(&meals), vec![ShoppingItem::new("salt", 3.0, "tsp")]);
    }

    #[test]
    fn test_distinct_units_not_merged() {
        let meals = vec![meal(vec![recipe(vec![
            line("milk", 1.0, "l"),
            line("milk", 200.0, "ml"),
        ])])];

        assert_eq!(
            aggregate(&meals),
            vec![
                ShoppingItem::new("milk", 1.0, "l"),
                ShoppingItem::new("milk", 200.0, "ml"),
            ]
        );
    }

    #[test]
    fn test_first_seen_order() {
        let meals = vec![
            meal(vec![recipe(vec![line("salt", 1.0, "tsp"), line("rice", 1.0, "cup")])]),
            meal(vec![recipe(vec![
                line("pepper", 1.0, "tsp"),
                line("salt", 1.0, "tsp"),
                line("basil", 3.0, "leaf"),
            ])]),
        ];

        for _ in 0..5 {
            assert_eq!(
                names(&aggregate(&meals)),
                vec!["salt", "rice", "pepper", "basil"]
            );
        }
    }

    #[test]
    fn test_repeated_runs_are_independent() {
        let meals = vec![
            meal(vec![recipe(vec![line("egg", 2.0, "pcs")])]),
            meal(vec![recipe(vec![line("milk", 1.0, "l"), line("egg", 1.0, "pcs")])]),
        ];

        let first = aggregate(&meals);
        let second = aggregate(&meals);

        assert_eq!(first, second);
        assert_eq!(first[0], ShoppingItem::new("egg", 3.0, "pcs"));
    }

    #[test]
    fn test_merge_with_existing() {
        let existing = vec![
            ShoppingItem::new("flour", 2.0, "cup"),
            ShoppingItem::new("sugar", 100.0, "g"),
        ];
        let meals = vec![meal(vec![recipe(vec![
            line("butter", 50.0, "g"),
            line("flour", 1.0, "cup"),
        ])])];

        assert_eq!(
            merge(existing, &meals),
            vec![
                ShoppingItem::new("flour", 3.0, "cup"),
                ShoppingItem::new("sugar", 100.0, "g"),
                ShoppingItem::new("butter", 50.0, "g"),
            ]
        );
    }

    #[test]
    fn test_merge_without_meals_keeps_existing() {
        let existing = vec![ShoppingItem::new("flour", 2.0, "cup")];

        assert_eq!(merge(existing.clone(), &[]), existing);
    }

    #[test]
    fn test_seed_duplicates_take_last_quantity() {
        let existing = vec![
            ShoppingItem::new("oil", 1.0, "tbsp"),
            ShoppingItem::new("salt", 1.0, "tsp"),
            ShoppingItem::new("oil", 2.0, "tbsp"),
        ];

        assert_eq!(
            merge(existing, &[]),
            vec![
                ShoppingItem::new("oil", 2.0, "tbsp"),
                ShoppingItem::new("salt", 1.0, "tsp"),
            ]
        );
    }

    #[test]
    fn test_seed_duplicate_then_meal_line_is_summed() {
        let existing = vec![
            ShoppingItem::new("oil", 1.0, "tbsp"),
            ShoppingItem::new("oil", 2.0, "tbsp"),
        ];
        let meals = vec![meal(vec![recipe(vec![line("oil", 1.0, "tbsp")])])];

        assert_eq!(
            merge_with(KeyPolicy::Exact, existing, &meals),
            vec![ShoppingItem::new("oil", 3.0, "tbsp")]
        );
    }

    #[test]
    fn test_empty_meals_and_recipes() {
        let meals = vec![
            meal(vec![]),
            meal(vec![recipe(vec![]), recipe(vec![line("egg", 1.0, "pcs")])]),
            meal(vec![recipe(vec![])]),
        ];

        assert_eq!(aggregate(&meals), vec![ShoppingItem::new("egg", 1.0, "pcs")]);
    }

    #[test]
    fn test_exact_policy_keeps_case_and_whitespace() {
        let meals = vec![meal(vec![recipe(vec![
            line("Flour", 1.0, "cup"),
            line("flour", 1.0, "cup"),
            line("flour ", 1.0, "cup"),
            line("flour", 1.0, "Cup"),
        ])])];

        assert_eq!(aggregate(&meals).len(), 4);
    }

    #[test]
    fn test_normalized_policy_merges_spellings() {
        let meals = vec![meal(vec![recipe(vec![
            line("Flour", 1.0, "cup"),
            line("flour", 1.0, "cup"),
            line(" flour ", 1.0, "CUP "),
            line("sugar", 1.0, "cup"),
        ])])];

        let items = Aggregator::new(KeyPolicy::Normalized)
            .add_meals(&meals)
            .finish();

        assert_eq!(
            items,
            vec![
                ShoppingItem::new("Flour", 3.0, "cup"),
                ShoppingItem::new("sugar", 1.0, "cup"),
            ]
        );
    }

    #[test]
    fn test_add_line() {
        let mut aggregator = Aggregator::new(KeyPolicy::Exact);
        aggregator.add_line(&line("egg", 1.0, "pcs"));
        aggregator.add_line(&line("egg", 2.0, "pcs"));

        assert_eq!(aggregator.finish(), vec![ShoppingItem::new("egg", 3.0, "pcs")]);
    }

    #[test]
    fn test_key_policy_from_config_value() {
        let policy: KeyPolicy = serde_json::from_str("\"normalized\"").unwrap();
        assert_eq!(policy, KeyPolicy::Normalized);
        assert_eq!(KeyPolicy::default(), KeyPolicy::Exact);
        assert_eq!(
            KeyPolicy::Normalized.key(" Egg", "PCS"),
            ItemKey::new("egg", "pcs")
        );
    }
}
