use std::ops::Deref;

use nutriplan_db::table::{Nutrition as NutritionTable, Recipe as RecipeTable};
use sea_query::{
    Alias, Expr, ExprTrait, Order, Query as SeaQuery, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

/// A nutrition record with the name of the recipe it was logged for.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Nutrition {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub calories: f64,
    pub fat: f64,
    pub protein: f64,
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

fn select() -> SelectStatement {
    SeaQuery::select()
        .columns([
            (NutritionTable::Table, NutritionTable::Id),
            (NutritionTable::Table, NutritionTable::UserId),
            (NutritionTable::Table, NutritionTable::RecipeId),
            (NutritionTable::Table, NutritionTable::Calories),
            (NutritionTable::Table, NutritionTable::Fat),
            (NutritionTable::Table, NutritionTable::Protein),
            (NutritionTable::Table, NutritionTable::CreatedAt),
        ])
        .expr_as(
            Expr::col((RecipeTable::Table, RecipeTable::Name)),
            Alias::new("recipe_name"),
        )
        .from(NutritionTable::Table)
        .inner_join(
            RecipeTable::Table,
            Expr::col((RecipeTable::Table, RecipeTable::Id))
                .equals((NutritionTable::Table, NutritionTable::RecipeId)),
        )
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
    ) -> nutriplan_shared::Result<Option<Nutrition>> {
        let statement = select()
            .and_where(Expr::col((NutritionTable::Table, NutritionTable::Id)).eq(id))
            .and_where(Expr::col((NutritionTable::Table, NutritionTable::UserId)).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Nutrition, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    pub async fn list(&self, user_id: &str) -> nutriplan_shared::Result<Vec<Nutrition>> {
        let statement = select()
            .and_where(Expr::col((NutritionTable::Table, NutritionTable::UserId)).eq(user_id))
            .order_by((NutritionTable::Table, NutritionTable::CreatedAt), Order::Asc)
            .order_by((NutritionTable::Table, NutritionTable::Id), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Nutrition, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }
}
