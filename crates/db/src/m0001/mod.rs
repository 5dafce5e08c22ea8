mod meal;
mod meal_recipe;
mod nutrition;
mod recipe;
mod shopping_list;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "nutriplan",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        recipe::CreateTable,
        recipe::CreateIdx1,
        meal::CreateTable,
        meal::CreateIdx1,
        meal_recipe::CreateTable,
        meal_recipe::CreateIdx1,
        shopping_list::CreateTable,
        shopping_list::CreateUk1,
        nutrition::CreateTable,
        nutrition::CreateUk1
    ]
);
