use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Username,
    Email,
    Password,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    UserId,
    Name,
    Image,
    Category,
    Description,
    Ingredients,
    Instructions,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Meal {
    Table,
    Id,
    UserId,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum MealRecipe {
    Table,
    MealId,
    Position,
    RecipeId,
}

#[derive(Iden, Clone)]
pub enum ShoppingList {
    Table,
    Id,
    UserId,
    Name,
    Items,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Nutrition {
    Table,
    Id,
    UserId,
    RecipeId,
    Calories,
    Fat,
    Protein,
    CreatedAt,
}
