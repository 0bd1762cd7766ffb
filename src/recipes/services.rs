use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::generator::GenerateError;
use crate::state::AppState;
use crate::store::{NewRecipe, Owner, Recipe};

/// API owner for `user_id` within this application instance.
pub fn owner_for(state: &AppState, user_id: Option<&str>) -> Result<Owner, AppError> {
    match user_id.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user_id) => Ok(Owner::new(state.config.app_id.clone(), user_id)),
        None => {
            warn!("request without user_id");
            Err(AppError::Input("user_id is required".into()))
        }
    }
}

/// Generate, resolve the image and persist. Nothing is stored if generation fails.
#[instrument(skip(state))]
pub async fn create_recipe(
    state: &AppState,
    owner: Option<Owner>,
    query: &str,
) -> Result<Recipe, AppError> {
    let title = query.trim();
    if title.is_empty() {
        warn!("empty dish rejected");
        return Err(AppError::Input("dish must not be empty".into()));
    }

    let body = state.generator.generate(title).await?;
    if body.is_empty() {
        return Err(GenerateError::Validation("generated recipe is empty".into()).into());
    }
    let image_url = state.images.resolve(title);

    let recipe = state
        .store
        .append(NewRecipe {
            owner,
            title: title.to_string(),
            body,
            image_url,
            created_at: OffsetDateTime::now_utc(),
        })
        .await
        .map_err(AppError::Store)?;

    info!(id = recipe.id, title = %recipe.title, "recipe created");
    Ok(recipe)
}

pub async fn list_recipes(state: &AppState, owner: Option<&Owner>) -> Result<Vec<Recipe>, AppError> {
    state.store.list_all(owner).await.map_err(AppError::Store)
}

#[instrument(skip(state))]
pub async fn delete_recipe(state: &AppState, owner: &Owner, id: i64) -> Result<(), AppError> {
    if state.store.delete(id, owner).await.map_err(AppError::Store)? {
        info!(id, "recipe deleted");
        Ok(())
    } else {
        Err(AppError::NotFound("Recipe not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecipeBody;

    #[tokio::test]
    async fn create_then_list_returns_the_new_record() {
        let state = AppState::fake().await;
        let created = create_recipe(&state, None, "  tomato soup ").await.unwrap();
        assert_eq!(created.title, "tomato soup");
        assert!(!created.image_url.is_empty());

        let listed = list_recipes(&state, None).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        let RecipeBody::Text(text) = &listed[0].body else {
            panic!("template body");
        };
        assert!(text.contains("tomato soup"));
    }

    #[tokio::test]
    async fn blank_input_creates_nothing() {
        let state = AppState::fake().await;
        for input in ["", "   ", "\n\t"] {
            let err = create_recipe(&state, None, input).await.unwrap_err();
            assert!(matches!(err, AppError::Input(_)));
        }
        assert!(list_recipes(&state, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_requires_user_id() {
        let state = AppState::fake().await;
        assert!(owner_for(&state, None).is_err());
        assert!(owner_for(&state, Some("  ")).is_err());
        let owner = owner_for(&state, Some("u1")).unwrap();
        assert_eq!(owner, Owner::new("test-app", "u1"));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let state = AppState::fake().await;
        let owner = Owner::new("test-app", "u1");
        let err = delete_recipe(&state, &owner, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
