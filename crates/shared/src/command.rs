#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    User(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(value: std::time::SystemTimeError) -> Self {
        Self::Unknown(value.into())
    }
}

/// True when the database rejected a write because of a unique index.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

#[macro_export]
macro_rules! user {
    ($($arg:tt)*) => {
        return Err($crate::Error::User(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($what:literal $(,)?) => {
        return Err($crate::Error::NotFound(concat!($what, " not found").to_owned()))
    };
}

#[macro_export]
macro_rules! conflict {
    ($($arg:tt)*) => {
        return Err($crate::Error::Conflict(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! unauthorized {
    ($($arg:tt)*) => {
        return Err($crate::Error::Unauthorized(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! forbidden {
    () => {
        return Err($crate::Error::Forbidden)
    };
}

#[macro_export]
macro_rules! server {
    ($($arg:tt)*) => {
        return Err($crate::Error::Server(format!($($arg)*)))
    };
}
