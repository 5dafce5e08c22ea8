use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Recipe;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Recipe::Table)
        .col(
            ColumnDef::new(Recipe::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Recipe::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(Recipe::Name).string().not_null())
        .col(ColumnDef::new(Recipe::Image).string())
        .col(ColumnDef::new(Recipe::Category).string().not_null())
        .col(ColumnDef::new(Recipe::Description).text().not_null())
        .col(ColumnDef::new(Recipe::Ingredients).text().not_null())
        .col(ColumnDef::new(Recipe::Instructions).text().not_null())
        .col(ColumnDef::new(Recipe::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Recipe::UpdatedAt).big_integer())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Recipe::Table).to_owned()
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

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_recipe_user_id")
        .table(Recipe::Table)
        .col(Recipe::UserId)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_recipe_user_id")
        .table(Recipe::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
