use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: u64,
    pub iat: u64,
}

/// Issues an HS256 token for `user_id`, valid for `lifetime_seconds`.
pub fn generate(
    user_id: &str,
    username: &str,
    secret: &str,
    lifetime_seconds: u64,
) -> Result<String> {
    let now = time::OffsetDateTime::now_utc().unix_timestamp() as u64;

    let claims = Claims {
        sub: user_id.to_owned(),
        username: username.to_owned(),
        exp: now + lifetime_seconds,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")
}

pub fn validate(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_at_least_32_bytes_long";

    #[test]
    fn test_generate_and_validate() {
        let token = generate("01J0USER", "alice", SECRET, 3600).unwrap();
        let claims = validate(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "01J0USER");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate("01J0USER", "alice", SECRET, 3600).unwrap();
        assert!(validate(&token, "another_secret_key_at_least_32_bytes").is_err());
    }

    #[test]
    fn test_malformed_token() {
        assert!(validate("not.a.token", SECRET).is_err());
    }
}
