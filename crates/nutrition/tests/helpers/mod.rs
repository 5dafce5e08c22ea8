use std::{path::PathBuf, str::FromStr};

use nutriplan_recipe::RecipeInput;
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
pub async fn create_recipe(
    state: &nutriplan_shared::State,
    name: impl Into<String>,
) -> anyhow::Result<String> {
    Ok(nutriplan_recipe::Command::new(state.clone())
        .create(
            RecipeInput {
                name: name.into(),
                image: None,
                category: "Lunch".to_owned(),
                description: "Light".to_owned(),
                ingredients: vec![],
                instructions: vec!["Serve".to_owned()],
            },
            "user_1",
        )
        .await?)
}
