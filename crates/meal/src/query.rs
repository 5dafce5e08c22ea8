use std::{collections::HashMap, ops::Deref};

use nutriplan_db::table::{Meal as MealTable, MealRecipe, Recipe as RecipeTable};
use nutriplan_recipe::Recipe;
use sea_query::{Expr, ExprTrait, Order, Query as SeaQuery, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

/// A meal with its recipes resolved, in the order they were added.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Meal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub recipes: Vec<Recipe>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(FromRow)]
struct MealRow {
    id: String,
    user_id: String,
    name: String,
    created_at: i64,
    updated_at: Option<i64>,
}

#[derive(FromRow)]
struct MealRecipeRow {
    meal_id: String,
    #[sqlx(flatten)]
    recipe: Recipe,
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
            MealTable::Id,
            MealTable::UserId,
            MealTable::Name,
            MealTable::CreatedAt,
            MealTable::UpdatedAt,
        ])
        .from(MealTable::Table)
        .to_owned()
}

impl Query {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }

    pub async fn fetch_for_user(&self, user_id: &str) -> nutriplan_shared::Result<Vec<Meal>> {
        let statement = select()
            .and_where(Expr::col(MealTable::UserId).eq(user_id))
            .order_by(MealTable::CreatedAt, Order::Asc)
            .order_by(MealTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        self.populate(rows).await
    }

    pub async fn find(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<Option<Meal>> {
        let statement = select()
            .and_where(Expr::col(MealTable::Id).eq(id))
            .and_where(Expr::col(MealTable::UserId).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.populate(vec![row]).await?.pop())
    }

    /// Meals in the order of `ids`, repeated ids included. Any id that is
    /// unknown or belongs to another user is not found.
    pub async fn find_many(
        &self,
        ids: &[String],
        user_id: &str,
    ) -> nutriplan_shared::Result<Vec<Meal>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(MealTable::Id).is_in(ids.iter().cloned()))
            .and_where(Expr::col(MealTable::UserId).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let meals = self
            .populate(rows)
            .await?
            .into_iter()
            .map(|meal| (meal.id.to_owned(), meal))
            .collect::<HashMap<_, _>>();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(meal) = meals.get(id) else {
                nutriplan_shared::not_found!("Meal");
            };

            ordered.push(meal.clone());
        }

        Ok(ordered)
    }

    async fn populate(&self, rows: Vec<MealRow>) -> nutriplan_shared::Result<Vec<Meal>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let statement = SeaQuery::select()
            .column((MealRecipe::Table, MealRecipe::MealId))
            .columns([
                (RecipeTable::Table, RecipeTable::Id),
                (RecipeTable::Table, RecipeTable::UserId),
                (RecipeTable::Table, RecipeTable::Name),
                (RecipeTable::Table, RecipeTable::Image),
                (RecipeTable::Table, RecipeTable::Category),
                (RecipeTable::Table, RecipeTable::Description),
                (RecipeTable::Table, RecipeTable::Ingredients),
                (RecipeTable::Table, RecipeTable::Instructions),
                (RecipeTable::Table, RecipeTable::CreatedAt),
                (RecipeTable::Table, RecipeTable::UpdatedAt),
            ])
            .from(MealRecipe::Table)
            .inner_join(
                RecipeTable::Table,
                Expr::col((RecipeTable::Table, RecipeTable::Id))
                    .equals((MealRecipe::Table, MealRecipe::RecipeId)),
            )
            .and_where(
                Expr::col((MealRecipe::Table, MealRecipe::MealId))
                    .is_in(rows.iter().map(|row| row.id.to_owned())),
            )
            .order_by((MealRecipe::Table, MealRecipe::MealId), Order::Asc)
            .order_by((MealRecipe::Table, MealRecipe::Position), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let recipe_rows = sqlx::query_as_with::<_, MealRecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut recipes: HashMap<String, Vec<Recipe>> = HashMap::new();
        for row in recipe_rows {
            recipes.entry(row.meal_id).or_default().push(row.recipe);
        }

        Ok(rows
            .into_iter()
            .map(|row| Meal {
                recipes: recipes.remove(&row.id).unwrap_or_default(),
                id: row.id,
                user_id: row.user_id,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
