use std::ops::Deref;

use nutriplan_db::table::Nutrition;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct NutritionInput {
    #[validate(length(min = 1, message = "Recipe is required"))]
    pub recipe_id: String,
    #[validate(range(min = 0.0, message = "Calories must not be negative"))]
    pub calories: f64,
    #[validate(range(min = 0.0, message = "Fat must not be negative"))]
    pub fat: f64,
    #[validate(range(min = 0.0, message = "Protein must not be negative"))]
    pub protein: f64,
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

    #[tracing::instrument(skip(self, input), fields(recipe_id = %input.recipe_id))]
    pub async fn create(
        &self,
        input: NutritionInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<String> {
        input.validate()?;
        self.check_recipe(&input.recipe_id).await?;

        if self.recipe_taken(&input.recipe_id, user_id, None).await? {
            nutriplan_shared::conflict!("Nutrition already exists for this recipe");
        }

        let id = Ulid::new().to_string();
        let statement = Query::insert()
            .into_table(Nutrition::Table)
            .columns([
                Nutrition::Id,
                Nutrition::UserId,
                Nutrition::RecipeId,
                Nutrition::Calories,
                Nutrition::Fat,
                Nutrition::Protein,
                Nutrition::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.into(),
                input.recipe_id.into(),
                input.calories.into(),
                input.fat.into(),
                input.protein.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(err) if nutriplan_shared::is_unique_violation(&err) => {
                nutriplan_shared::conflict!("Nutrition already exists for this recipe");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(id)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: &str,
        input: NutritionInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<()> {
        input.validate()?;

        if crate::Query::new(self.0.clone())
            .find(id, user_id)
            .await?
            .is_none()
        {
            nutriplan_shared::not_found!("Nutrition");
        }

        self.check_recipe(&input.recipe_id).await?;

        if self.recipe_taken(&input.recipe_id, user_id, Some(id)).await? {
            nutriplan_shared::conflict!("Nutrition already exists for this recipe");
        }

        let statement = Query::update()
            .table(Nutrition::Table)
            .value(Nutrition::RecipeId, input.recipe_id)
            .value(Nutrition::Calories, input.calories)
            .value(Nutrition::Fat, input.fat)
            .value(Nutrition::Protein, input.protein)
            .and_where(Expr::col(Nutrition::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        let (sql, values) = Query::delete()
            .from_table(Nutrition::Table)
            .and_where(Expr::col(Nutrition::Id).eq(id))
            .and_where(Expr::col(Nutrition::UserId).eq(user_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            nutriplan_shared::not_found!("Nutrition");
        }

        Ok(())
    }

    async fn check_recipe(&self, recipe_id: &str) -> nutriplan_shared::Result<()> {
        if nutriplan_recipe::Query::new(self.0.clone())
            .find(recipe_id)
            .await?
            .is_none()
        {
            nutriplan_shared::not_found!("Recipe");
        }

        Ok(())
    }

    async fn recipe_taken(
        &self,
        recipe_id: &str,
        user_id: &str,
        exclude: Option<&str>,
    ) -> nutriplan_shared::Result<bool> {
        let mut statement = Query::select()
            .column(Nutrition::Id)
            .from(Nutrition::Table)
            .and_where(Expr::col(Nutrition::UserId).eq(user_id))
            .and_where(Expr::col(Nutrition::RecipeId).eq(recipe_id))
            .limit(1)
            .to_owned();

        if let Some(exclude) = exclude {
            statement.and_where(Expr::col(Nutrition::Id).ne(exclude));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
            .is_some())
    }
}
