use std::ops::Deref;

use nutriplan_db::table::ShoppingList as ShoppingListTable;
use nutriplan_shared::shopping::ShoppingItem;
use sea_query::{Expr, ExprTrait, Order, Query as SeaQuery, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct ShoppingList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[sqlx(json)]
    pub items: Vec<ShoppingItem>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Clone)]
pub struct Query(pub nutriplan_shared::State);

impl Deref for Query {
    type Target = nutriplan_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn select() -> SelectStatement {
    SeaQuery::select()
        .columns([
            ShoppingListTable::Id,
            ShoppingListTable::UserId,
            ShoppingListTable::Name,
            ShoppingListTable::Items,
            ShoppingListTable::CreatedAt,
            ShoppingListTable::UpdatedAt,
        ])
        .from(ShoppingListTable::Table)
        .to_owned()
}

impl Query {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }

    pub async fn find(
        &self,
        id: &str,
        user_id: &str,
    ) -> nutriplan_shared::Result<Option<ShoppingList>> {
        let statement = select()
            .and_where(Expr::col(ShoppingListTable::Id).eq(id))
            .and_where(Expr::col(ShoppingListTable::UserId).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShoppingList, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    pub async fn list(&self, user_id: &str) -> nutriplan_shared::Result<Vec<ShoppingList>> {
        let statement = select()
            .and_where(Expr::col(ShoppingListTable::UserId).eq(user_id))
            .order_by(ShoppingListTable::CreatedAt, Order::Asc)
            .order_by(ShoppingListTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShoppingList, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }
}
