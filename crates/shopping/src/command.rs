use std::{collections::HashSet, ops::Deref};

use nutriplan_db::table::ShoppingList as ShoppingListTable;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use crate::{ItemKey, KeyPolicy, aggregate_with, merge_with};

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 100, message = "Shopping list name is required"))]
    pub name: String,
    #[serde(default)]
    pub meal_ids: Vec<String>,
}

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct UpdateInput {
    #[validate(length(min = 1, max = 100, message = "Shopping list name is required"))]
    pub name: String,
    /// Meals whose ingredients are added on top of the current items.
    #[serde(default)]
    pub meal_ids: Vec<String>,
    /// Items dropped from the list before the new meals are merged in.
    #[serde(default)]
    pub remove: Vec<ItemKey>,
}

#[derive(Clone)]
pub struct Command(pub nutriplan_shared::State, pub KeyPolicy);

impl Deref for Command {
    type Target = nutriplan_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state, KeyPolicy::default())
    }

    pub fn with_policy(mut self, policy: KeyPolicy) -> Self {
        self.1 = policy;
        self
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: CreateInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<String> {
        input.validate()?;

        if input.meal_ids.is_empty() {
            nutriplan_shared::user!("Please select at least one meal");
        }

        if self.name_taken(&input.name, user_id, None).await? {
            nutriplan_shared::conflict!("Shopping list already exists");
        }

        let meals = nutriplan_meal::Query::new(self.0.clone())
            .find_many(&input.meal_ids, user_id)
            .await?;

        let items = aggregate_with(self.1, &meals);

        let id = Ulid::new().to_string();
        let statement = Query::insert()
            .into_table(ShoppingListTable::Table)
            .columns([
                ShoppingListTable::Id,
                ShoppingListTable::UserId,
                ShoppingListTable::Name,
                ShoppingListTable::Items,
                ShoppingListTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.into(),
                input.name.into(),
                serde_json::to_string(&items)?.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(err) if nutriplan_shared::is_unique_violation(&err) => {
                nutriplan_shared::conflict!("Shopping list already exists");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(shopping_list_id = %id, items = items.len(), "shopping list created");

        Ok(id)
    }

    /// Removes the listed items, then merges the selected meals into what is left.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: &str,
        input: UpdateInput,
        user_id: &str,
    ) -> nutriplan_shared::Result<()> {
        input.validate()?;

        let Some(list) = crate::Query::new(self.0.clone()).find(id, user_id).await? else {
            nutriplan_shared::not_found!("Shopping list");
        };

        if list.name != input.name && self.name_taken(&input.name, user_id, Some(id)).await? {
            nutriplan_shared::conflict!("Shopping list already exists");
        }

        let meals = nutriplan_meal::Query::new(self.0.clone())
            .find_many(&input.meal_ids, user_id)
            .await?;

        let policy = self.1;
        let remove = input
            .remove
            .iter()
            .map(|key| policy.key(&key.ingredient, &key.unit))
            .collect::<HashSet<_>>();

        let kept = list
            .items
            .into_iter()
            .filter(|item| !remove.contains(&policy.key(&item.ingredient, &item.unit)));

        let items = merge_with(policy, kept, &meals);

        let statement = Query::update()
            .table(ShoppingListTable::Table)
            .value(ShoppingListTable::Name, input.name)
            .value(ShoppingListTable::Items, serde_json::to_string(&items)?)
            .value(
                ShoppingListTable::UpdatedAt,
                OffsetDateTime::now_utc().unix_timestamp(),
            )
            .and_where(Expr::col(ShoppingListTable::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(err) if nutriplan_shared::is_unique_violation(&err) => {
                nutriplan_shared::conflict!("Shopping list already exists");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(shopping_list_id = %id, items = items.len(), "shopping list updated");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str, user_id: &str) -> nutriplan_shared::Result<()> {
        let (sql, values) = Query::delete()
            .from_table(ShoppingListTable::Table)
            .and_where(Expr::col(ShoppingListTable::Id).eq(id))
            .and_where(Expr::col(ShoppingListTable::UserId).eq(user_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            nutriplan_shared::not_found!("Shopping list");
        }

        Ok(())
    }

    async fn name_taken(
        &self,
        name: &str,
        user_id: &str,
        exclude: Option<&str>,
    ) -> nutriplan_shared::Result<bool> {
        let mut statement = Query::select()
            .column(ShoppingListTable::Id)
            .from(ShoppingListTable::Table)
            .and_where(Expr::col(ShoppingListTable::UserId).eq(user_id))
            .and_where(Expr::col(ShoppingListTable::Name).eq(name))
            .limit(1)
            .to_owned();

        if let Some(exclude) = exclude {
            statement.and_where(Expr::col(ShoppingListTable::Id).ne(exclude));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
            .is_some())
    }
}
