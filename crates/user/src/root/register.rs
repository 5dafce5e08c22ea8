use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::{User, repository};

#[derive(Validate, Deserialize)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> nutriplan_shared::Result<User> {
        input.validate()?;

        let existing = repository::find(
            &self.read_db,
            repository::FindType::UsernameOrEmail(
                input.username.to_owned(),
                input.email.to_owned(),
            ),
        )
        .await?;

        if existing.is_some() {
            nutriplan_shared::conflict!("User already exists");
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let user = User {
            id: Ulid::new().to_string(),
            username: input.username,
            email: input.email,
            created_at: time::OffsetDateTime::now_utc().unix_timestamp(),
        };

        match repository::create(&self.write_db, &user, password_hash).await {
            Ok(_) => {}
            Err(err) if nutriplan_shared::is_unique_violation(&err) => {
                nutriplan_shared::conflict!("User already exists");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id = %user.id, "user registered");

        Ok(user)
    }
}
