use std::ops::Deref;

use nutriplan_db::table::{Meal, MealRecipe};
use sea_query::{Expr, ExprTrait, InsertStatement, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct MealInput {
    #[validate(length(min = 1, max = 100, message = "Meal name is required"))]
    pub name: String,
    #[serde(default)]
    pub recipe_ids: Vec<String>,
}

#[derive(Clone)]
pub struct Command(pub nutriplan_shared::State);

impl Deref for Command {
    type Target = nutriplan_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: MealInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<String> {
        input.validate()?;
        self.check_recipes(&input.recipe_ids).await?;

        if self.has_duplicate(&input, user_id, None).await? {
            nutriplan_shared::conflict!("Meal already exists");
        }

        let id = Ulid::new().to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let mut tx = self.write_db.begin().await?;

        let (sql, values) = Query::insert()
            .into_table(Meal::Table)
            .columns([Meal::Id, Meal::UserId, Meal::Name, Meal::CreatedAt])
            .values_panic([
                id.to_owned().into(),
                user_id.into(),
                input.name.into(),
                now.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        insert_recipes(&mut *tx, &id, &input.recipe_ids).await?;

        tx.commit().await?;

        tracing::info!(meal_id = %id, recipes = input.recipe_ids.len(), "meal created");

        Ok(id)
    }

    /// Renames the meal and replaces its recipe list.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: &str,
        input: MealInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<()> {
        input.validate()?;
        self.check_exists(id, user_id).await?;
        self.check_recipes(&input.recipe_ids).await?;

        if self.has_duplicate(&input, user_id, Some(id)).await? {
            nutriplan_shared::conflict!("Meal already exists");
        }

        let mut tx = self.write_db.begin().await?;

        let (sql, values) = Query::update()
            .table(Meal::Table)
            .value(Meal::Name, input.name)
            .value(Meal::UpdatedAt, OffsetDateTime::now_utc().unix_timestamp())
            .and_where(Expr::col(Meal::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(MealRecipe::Table)
            .and_where(Expr::col(MealRecipe::MealId).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        insert_recipes(&mut *tx, id, &input.recipe_ids).await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        self.check_exists(id, user_id).await?;

        let mut tx = self.write_db.begin().await?;

        let (sql, values) = Query::delete()
            .from_table(MealRecipe::Table)
            .and_where(Expr::col(MealRecipe::MealId).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(Meal::Table)
            .and_where(Expr::col(Meal::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn check_exists(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        let (sql, values) = Query::select()
            .column(Meal::Id)
            .from(Meal::Table)
            .and_where(Expr::col(Meal::Id).eq(id))
            .and_where(Expr::col(Meal::UserId).eq(user_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let found = sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        if found.is_none() {
            nutriplan_shared::not_found!("Meal");
        }

        Ok(())
    }

    async fn check_recipes(&self, recipe_ids: &[String]) -> nutriplan_shared::Result<()> {
        nutriplan_recipe::Query::new(self.0.clone())
            .find_many(recipe_ids)
            .await?;

        Ok(())
    }

    /// A meal is a duplicate when the same user already has one with the same
    /// name and the same ordered recipe list.
    async fn has_duplicate(
        &self,
        input: &MealInput,
        user_id: &str,
        exclude: Option<&str>,
    ) -> nutriplan_shared::Result<bool> {
        let mut statement = Query::select()
            .column(Meal::Id)
            .from(Meal::Table)
            .and_where(Expr::col(Meal::UserId).eq(user_id))
            .and_where(Expr::col(Meal::Name).eq(input.name.as_str()))
            .to_owned();

        if let Some(exclude) = exclude {
            statement.and_where(Expr::col(Meal::Id).ne(exclude));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let candidates = sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        for candidate in candidates {
            if recipe_ids(&self.read_db, &candidate).await? == input.recipe_ids {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

async fn recipe_ids(pool: &SqlitePool, meal_id: &str) -> nutriplan_shared::Result<Vec<String>> {
    let (sql, values) = Query::select()
        .column(MealRecipe::RecipeId)
        .from(MealRecipe::Table)
        .and_where(Expr::col(MealRecipe::MealId).eq(meal_id))
        .order_by(MealRecipe::Position, Order::Asc)
        .build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

async fn insert_recipes(
    conn: &mut SqliteConnection,
    meal_id: &str,
    recipe_ids: &[String],
) -> nutriplan_shared::Result<()> {
    if recipe_ids.is_empty() {
        return Ok(());
    }

    let mut statement: InsertStatement = Query::insert()
        .into_table(MealRecipe::Table)
        .columns([MealRecipe::MealId, MealRecipe::Position, MealRecipe::RecipeId])
        .to_owned();

    for (position, recipe_id) in recipe_ids.iter().enumerate() {
        statement.values_panic([
            meal_id.into(),
            (position as i64).into(),
            recipe_id.to_owned().into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
