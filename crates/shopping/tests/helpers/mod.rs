use std::{path::PathBuf, str::FromStr};

use nutriplan_meal::MealInput;
use nutriplan_recipe::RecipeInput;
use nutriplan_shared::recipe::Ingredient;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<nutriplan_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    nutriplan_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(nutriplan_shared::State::new(pool))
}

/// Creates one recipe holding `ingredients` and a meal made of it.
#[allow(dead_code)]
pub async fn create_meal(
    state: &nutriplan_shared::State,
    name: impl Into<String>,
    ingredients: Vec<Ingredient>,
    user_id: &str,
) -> anyhow::Result<String> {
    let name = name.into();
    let recipe_id = nutriplan_recipe::Command::new(state.clone())
        .create(
            RecipeInput {
                name: format!("{name} recipe"),
                image: None,
                category: "Dinner".to_owned(),
                description: "For the shopping list".to_owned(),
                ingredients,
                instructions: vec!["Cook".to_owned()],
            },
            user_id,
        )
        .await?;

    Ok(nutriplan_meal::Command::new(state.clone())
        .create(
            MealInput {
                name,
                recipe_ids: vec![recipe_id],
            },
            user_id,
        )
        .await?)
}
