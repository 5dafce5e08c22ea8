use std::{path::PathBuf, str::FromStr};

use nutriplan_user::{RegisterInput, User};
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
pub async fn create_user(
    cmd: &nutriplan_user::Command,
    name: impl Into<String>,
) -> anyhow::Result<User> {
    let name = name.into();

    Ok(cmd
        .register(RegisterInput {
            email: format!("{name}@nutriplan.localhost"),
            username: name,
            password: "my_password".to_owned(),
        })
        .await?)
}
