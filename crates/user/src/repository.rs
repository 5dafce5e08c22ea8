use nutriplan_db::table::User as UserTable;
use sea_query::{Cond, Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::User;

#[derive(FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

pub enum FindType {
    Username(String),
    UsernameOrEmail(String, String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> nutriplan_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            UserTable::Id,
            UserTable::Username,
            UserTable::Email,
            UserTable::Password,
            UserTable::CreatedAt,
        ])
        .from(UserTable::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Username(username) => {
            statement.and_where(Expr::col(UserTable::Username).eq(username))
        }
        FindType::UsernameOrEmail(username, email) => statement.cond_where(
            Cond::any()
                .add(Expr::col(UserTable::Username).eq(username))
                .add(Expr::col(UserTable::Email).eq(email)),
        ),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn create(
    pool: &SqlitePool,
    user: &User,
    password: String,
) -> Result<(), sqlx::Error> {
    let statement = Query::insert()
        .into_table(UserTable::Table)
        .columns([
            UserTable::Id,
            UserTable::Username,
            UserTable::Email,
            UserTable::Password,
            UserTable::CreatedAt,
        ])
        .values_panic([
            user.id.to_owned().into(),
            user.username.to_owned().into(),
            user.email.to_owned().into(),
            password.into(),
            user.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
