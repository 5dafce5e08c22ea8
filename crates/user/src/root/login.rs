use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::Deserialize;
use validator::Validate;

use crate::{User, repository};

#[derive(Validate, Deserialize)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> nutriplan_shared::Result<User> {
        input.validate()?;

        let Some(row) =
            repository::find(&self.read_db, repository::FindType::Username(input.username))
                .await?
        else {
            nutriplan_shared::not_found!("User");
        };

        let parsed_hash = PasswordHash::new(&row.password)?;
        let argon2 = Argon2::default();

        if argon2
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!(user_id = %row.id, "invalid password");
            nutriplan_shared::unauthorized!("Invalid password");
        }

        Ok(row.into())
    }
}
