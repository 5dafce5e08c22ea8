use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::ShoppingList;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ShoppingList::Table)
        .col(
            ColumnDef::new(ShoppingList::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(ShoppingList::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(ShoppingList::Name).string().not_null())
        .col(ColumnDef::new(ShoppingList::Items).text().not_null())
        .col(
            ColumnDef::new(ShoppingList::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(ShoppingList::UpdatedAt).big_integer())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ShoppingList::Table).to_owned()
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
        .name("uk_shopping_list_user_id_name")
        .table(ShoppingList::Table)
        .unique()
        .col(ShoppingList::UserId)
        .col(ShoppingList::Name)
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop()
        .name("uk_shopping_list_user_id_name")
        .table(ShoppingList::Table)
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
