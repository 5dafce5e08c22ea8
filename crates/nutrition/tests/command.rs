use nutriplan_nutrition::NutritionInput;
use nutriplan_shared::Error;
use temp_dir::TempDir;

mod helpers;

fn input(recipe_id: &str, calories: f64) -> NutritionInput {
    NutritionInput {
        recipe_id: recipe_id.to_owned(),
        calories,
        fat: 12.5,
        protein: 30.0,
    }
}

#[tokio::test]
async fn test_create_and_list() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let salad = helpers::create_recipe(&state, "Salad").await?;
    let cmd = nutriplan_nutrition::Command::new(state.clone());
    let query = nutriplan_nutrition::Query::new(state);

    let id = cmd.create(input(&salad, 350.0), "user_1").await?;

    let nutrition = query.find(&id, "user_1").await?.unwrap();
    assert_eq!(nutrition.recipe_name, "Salad");
    assert_eq!(nutrition.calories, 350.0);
    assert_eq!(nutrition.fat, 12.5);

    assert_eq!(query.list("user_1").await?.len(), 1);
    assert!(query.list("user_2").await?.is_empty());

    cmd.create(input(&salad, 400.0), "user_2").await?;

    Ok(())
}

#[tokio::test]
async fn validate_nutrition() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let salad = helpers::create_recipe(&state, "Salad").await?;
    let cmd = nutriplan_nutrition::Command::new(state);

    let resp = cmd.create(input(&salad, -1.0), "user_1").await;
    assert!(matches!(resp, Err(Error::Validate(_))));

    let resp = cmd.create(input("missing", 100.0), "user_1").await;
    assert_eq!(resp.unwrap_err().to_string(), "Recipe not found");

    cmd.create(input(&salad, 100.0), "user_1").await?;
    let resp = cmd.create(input(&salad, 200.0), "user_1").await;
    assert!(matches!(resp, Err(Error::Conflict(_))));
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Nutrition already exists for this recipe"
    );

    Ok(())
}

#[tokio::test]
async fn test_update_and_delete() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let salad = helpers::create_recipe(&state, "Salad").await?;
    let soup = helpers::create_recipe(&state, "Soup").await?;
    let cmd = nutriplan_nutrition::Command::new(state.clone());
    let query = nutriplan_nutrition::Query::new(state.clone());

    let salad_id = cmd.create(input(&salad, 100.0), "user_1").await?;
    let soup_id = cmd.create(input(&soup, 200.0), "user_1").await?;

    let resp = cmd.update(&salad_id, input(&soup, 150.0), "user_1").await;
    assert!(matches!(resp, Err(Error::Conflict(_))));

    cmd.update(&salad_id, input(&salad, 150.0), "user_1").await?;
    assert_eq!(query.find(&salad_id, "user_1").await?.unwrap().calories, 150.0);

    let resp = cmd.update(&salad_id, input(&salad, 150.0), "user_2").await;
    assert_eq!(resp.unwrap_err().to_string(), "Nutrition not found");

    cmd.delete(&soup_id, "user_1").await?;
    assert!(matches!(
        cmd.delete(&soup_id, "user_1").await,
        Err(Error::NotFound(_))
    ));

    nutriplan_recipe::Command::new(state)
        .delete(&salad, "user_1")
        .await?;
    assert!(query.list("user_1").await?.is_empty());

    Ok(())
}
