use nutriplan_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, Order, Query as SeaQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;
use std::ops::Deref;

/// Public view of an account. The password hash never leaves the repository.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct Query(pub nutriplan_shared::State);

impl Deref for Query {
    type Target = nutriplan_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }

    pub async fn list(&self) -> nutriplan_shared::Result<Vec<User>> {
        let statement = SeaQuery::select()
            .columns([
                UserTable::Id,
                UserTable::Username,
                UserTable::Email,
                UserTable::CreatedAt,
            ])
            .from(UserTable::Table)
            .order_by(UserTable::CreatedAt, Order::Asc)
            .order_by(UserTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find(&self, id: impl Into<String>) -> nutriplan_shared::Result<Option<User>> {
        let statement = SeaQuery::select()
            .columns([
                UserTable::Id,
                UserTable::Username,
                UserTable::Email,
                UserTable::CreatedAt,
            ])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}
