use nutriplan_shared::{Error, recipe::Ingredient};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_create_and_update() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nutriplan_recipe::Command::new(state.clone());
    let query = nutriplan_recipe::Query::new(state);

    let id = cmd
        .create(
            helpers::recipe_input(
                "Omelette",
                vec![
                    Ingredient::new("egg", 2.0, "pcs"),
                    Ingredient::new("milk", 0.1, "l"),
                ],
            ),
            "user_1",
        )
        .await?;

    let recipe = query.find(&id).await?.unwrap();
    assert_eq!(recipe.name, "Omelette");
    assert_eq!(recipe.user_id, "user_1");
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0], Ingredient::new("egg", 2.0, "pcs"));
    assert_eq!(recipe.instructions, vec!["Mix everything", "Cook"]);
    assert!(recipe.updated_at.is_none());

    let mut input = helpers::recipe_input("Big omelette", vec![Ingredient::new("egg", 4.0, "pcs")]);
    input.image = Some("https://nutriplan.localhost/omelette.png".to_owned());
    cmd.update(&id, input, "user_1").await?;

    let recipe = query.find(&id).await?.unwrap();
    assert_eq!(recipe.name, "Big omelette");
    assert_eq!(
        recipe.image.as_deref(),
        Some("https://nutriplan.localhost/omelette.png")
    );
    assert_eq!(recipe.ingredients, vec![Ingredient::new("egg", 4.0, "pcs")]);
    assert!(recipe.updated_at.is_some());

    Ok(())
}

#[tokio::test]
async fn validate_recipe_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nutriplan_recipe::Command::new(state);

    let mut input = helpers::recipe_input("", vec![Ingredient::new("egg", 0.0, "pcs")]);
    input.instructions = vec![];

    let Err(Error::Validate(errors)) = cmd.create(input, "user_1").await else {
        panic!("expected validation errors");
    };

    assert!(errors.errors().contains_key("ingredients"));

    let fields = errors.field_errors();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("instructions"));

    Ok(())
}

#[tokio::test]
async fn test_only_owner_can_change_recipe() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nutriplan_recipe::Command::new(state.clone());
    let query = nutriplan_recipe::Query::new(state);

    let id = cmd
        .create(helpers::recipe_input("Soup", vec![]), "user_1")
        .await?;

    let resp = cmd
        .update(&id, helpers::recipe_input("Stolen soup", vec![]), "user_2")
        .await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    let resp = cmd.delete(&id, "user_2").await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    let resp = cmd.delete("unknown", "user_1").await;
    assert_eq!(resp.unwrap_err().to_string(), "Recipe not found");

    cmd.delete(&id, "user_1").await?;
    assert!(query.find(&id).await?.is_none());

    Ok(())
}
