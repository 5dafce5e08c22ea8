use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Nutrition;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Nutrition::Table)
        .col(
            ColumnDef::new(Nutrition::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Nutrition::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Nutrition::RecipeId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(Nutrition::Calories).double().not_null())
        .col(ColumnDef::new(Nutrition::Fat).double().not_null())
        .col(ColumnDef::new(Nutrition::Protein).double().not_null())
        .col(ColumnDef::new(Nutrition::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Nutrition::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateUk1;

fn create_uk_1() -> IndexCreateStatement {
    Index::create()
        .name("uk_nutrition_user_id_recipe_id")
        .table(Nutrition::Table)
        .unique()
        .col(Nutrition::UserId)
        .col(Nutrition::RecipeId)
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop()
        .name("uk_nutrition_user_id_recipe_id")
        .table(Nutrition::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
