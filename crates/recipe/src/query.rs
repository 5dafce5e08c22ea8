use std::{collections::HashMap, ops::Deref};

use nutriplan_db::table::Recipe as RecipeTable;
use nutriplan_shared::recipe::Ingredient;
use sea_query::{Expr, ExprTrait, Order, Query as SeaQuery, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub image: Option<String>,
    pub category: String,
    pub description: String,
    #[sqlx(json)]
    pub ingredients: Vec<Ingredient>,
    #[sqlx(json)]
    pub instructions: Vec<String>,
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
            RecipeTable::Id,
            RecipeTable::UserId,
            RecipeTable::Name,
            RecipeTable::Image,
            RecipeTable::Category,
            RecipeTable::Description,
            RecipeTable::Ingredients,
            RecipeTable::Instructions,
            RecipeTable::CreatedAt,
            RecipeTable::UpdatedAt,
        ])
        .from(RecipeTable::Table)
        .to_owned()
}

impl Query {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }

    pub async fn find(&self, id: &str) -> nutriplan_shared::Result<Option<Recipe>> {
        let statement = select()
            .and_where(Expr::col(RecipeTable::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Recipe, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Every recipe of the catalogue, oldest first.
    pub async fn list(&self) -> nutriplan_shared::Result<Vec<Recipe>> {
        let statement = select()
            .order_by(RecipeTable::CreatedAt, Order::Asc)
            .order_by(RecipeTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Recipe, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Loads recipes in the order of `ids`. An id listed twice yields the recipe twice.
    /// Fails with not found as soon as one id is unknown.
    pub async fn find_many(&self, ids: &[String]) -> nutriplan_shared::Result<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(RecipeTable::Id).is_in(ids.iter().cloned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let recipes = sqlx::query_as_with::<_, Recipe, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(|recipe| (recipe.id.to_owned(), recipe))
            .collect::<HashMap<_, _>>();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(recipe) = recipes.get(id) else {
                nutriplan_shared::not_found!("Recipe");
            };

            ordered.push(recipe.clone());
        }

        Ok(ordered)
    }
}
