use std::{path::PathBuf, str::FromStr};

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

#[allow(dead_code)]
pub fn recipe_input(name: impl Into<String>, ingredients: Vec<Ingredient>) -> RecipeInput {
    RecipeInput {
        name: name.into(),
        image: None,
        category: "Dinner".to_owned(),
        description: "Quick and easy".to_owned(),
        ingredients,
        instructions: vec!["Mix everything".to_owned(), "Cook".to_owned()],
    }
}
