use std::ops::Deref;

use nutriplan_db::table::{MealRecipe, Nutrition, Recipe};
use nutriplan_shared::recipe::Ingredient;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 100, message = "Recipe name is required"))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    #[validate(nested)]
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[validate(length(min = 1, message = "At least one instruction is required"))]
    pub instructions: Vec<String>,
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
        input: RecipeInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<String> {
        input.validate()?;

        let id = Ulid::new().to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::Id,
                Recipe::UserId,
                Recipe::Name,
                Recipe::Image,
                Recipe::Category,
                Recipe::Description,
                Recipe::Ingredients,
                Recipe::Instructions,
                Recipe::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.into(),
                input.name.into(),
                input.image.into(),
                input.category.into(),
                input.description.into(),
                serde_json::to_string(&input.ingredients)?.into(),
                serde_json::to_string(&input.instructions)?.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(recipe_id = %id, "recipe created");

        Ok(id)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: &str,
        input: RecipeInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<()> {
        input.validate()?;
        self.check_owner(id, user_id).await?;

        let statement = Query::update()
            .table(Recipe::Table)
            .value(Recipe::Name, input.name)
            .value(Recipe::Image, input.image)
            .value(Recipe::Category, input.category)
            .value(Recipe::Description, input.description)
            .value(
                Recipe::Ingredients,
                serde_json::to_string(&input.ingredients)?,
            )
            .value(
                Recipe::Instructions,
                serde_json::to_string(&input.instructions)?,
            )
            .value(
                Recipe::UpdatedAt,
                OffsetDateTime::now_utc().unix_timestamp(),
            )
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    /// Removes the recipe along with its meal slots and nutrition records.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        self.check_owner(id, user_id).await?;

        let mut tx = self.write_db.begin().await?;

        let (sql, values) = Query::delete()
            .from_table(MealRecipe::Table)
            .and_where(Expr::col(MealRecipe::RecipeId).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(Nutrition::Table)
            .and_where(Expr::col(Nutrition::RecipeId).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = %id, "recipe deleted");

        Ok(())
    }

    async fn check_owner(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        let Some(owner_id) = find_owner(&self.read_db, id).await? else {
            nutriplan_shared::not_found!("Recipe");
        };

        if owner_id != user_id {
            nutriplan_shared::forbidden!();
        }

        Ok(())
    }
}

async fn find_owner(pool: &SqlitePool, id: &str) -> nutriplan_shared::Result<Option<String>> {
    let (sql, values) = Query::select()
        .column(Recipe::UserId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}
