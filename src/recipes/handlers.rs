use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateRecipeRequest, OwnerQuery, RecipeResponse};
use super::services;
use crate::{error::AppError, state::AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/:id", delete(delete_recipe))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let owner = services::owner_for(&state, body.user_id.as_deref())?;
    let prompt = body.prompt.unwrap_or_default();
    let recipe = services::create_recipe(&state, Some(owner), &prompt).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(q): Query<OwnerQuery>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let owner = services::owner_for(&state, q.user_id.as_deref())?;
    let recipes = services::list_recipes(&state, Some(&owner)).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    let owner = services::owner_for(&state, q.user_id.as_deref())?;
    services::delete_recipe(&state, &owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;
    use crate::generator::{llm_fixtures, LlmGenerator};

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn create_then_list() {
        let app = build_app(AppState::fake().await);

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "prompt": "tomato soup", "user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "tomato soup");
        assert!(created["recipe"].as_str().unwrap().contains("tomato soup"));
        assert!(!created["image_url"].as_str().unwrap().is_empty());
        assert!(created["created_at"].as_str().unwrap().ends_with('Z'));

        let (status, listed) = call(&app, Method::GET, "/api/v1/recipes?user_id=u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn dish_is_accepted_as_prompt_alias() {
        let app = build_app(AppState::fake().await);
        let (status, created) = call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "dish": "pancakes", "user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "pancakes");
    }

    #[tokio::test]
    async fn missing_input_is_rejected_without_a_record() {
        let app = build_app(AppState::fake().await);

        for body in [
            json!({ "prompt": "", "user_id": "u1" }),
            json!({ "user_id": "u1" }),
            json!({ "prompt": "soup" }),
        ] {
            let (status, err) = call(&app, Method::POST, "/api/v1/recipes", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(err["error"].is_string());
        }

        let (status, _) = call(&app, Method::GET, "/api/v1/recipes", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = call(&app, Method::GET, "/api/v1/recipes?user_id=u1", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_per_user() {
        let app = build_app(AppState::fake().await);
        for dish in ["first", "second", "third"] {
            call(
                &app,
                Method::POST,
                "/api/v1/recipes",
                Some(json!({ "prompt": dish, "user_id": "u1" })),
            )
            .await;
        }
        call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "prompt": "other", "user_id": "u2" })),
        )
        .await;

        let (_, listed) = call(&app, Method::GET, "/api/v1/recipes?user_id=u1", None).await;
        let listed = listed.as_array().unwrap();
        let titles: Vec<_> = listed.iter().map(|r| r["title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["third", "second", "first"]);
        let stamps: Vec<_> = listed.iter().map(|r| r["created_at"].as_str().unwrap().to_string()).collect();
        let parsed: Vec<_> = stamps
            .iter()
            .map(|s| time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339).unwrap())
            .collect();
        assert!(parsed.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_is_not_found() {
        let app = build_app(AppState::fake().await);
        let (_, created) = call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "prompt": "stew", "user_id": "u1" })),
        )
        .await;
        let uri = format!("/api/v1/recipes/{}?user_id=u1", created["id"]);

        let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/recipes/{}?user_id=u2", created["id"]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = call(&app, Method::GET, "/api/v1/recipes?user_id=u1", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn llm_recipe_is_returned_as_object() {
        let base = llm_fixtures::spawn_upstream(StatusCode::OK, llm_fixtures::soup_candidate()).await;
        let generator = Arc::new(LlmGenerator::new(&llm_fixtures::config(base)).unwrap());
        let app = build_app(AppState::fake_with_generator(generator).await);

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "prompt": "tomato soup", "user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "tomato soup");
        assert_eq!(created["recipe"]["title"], "Tomato Soup");
        assert_eq!(created["recipe"]["instructions"][1], "Simmer 20 minutes.");
    }

    #[tokio::test]
    async fn upstream_failure_persists_nothing() {
        let base = llm_fixtures::spawn_upstream(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "overloaded" }),
        )
        .await;
        let generator = Arc::new(LlmGenerator::new(&llm_fixtures::config(base)).unwrap());
        let app = build_app(AppState::fake_with_generator(generator).await);

        let (status, err) = call(
            &app,
            Method::POST,
            "/api/v1/recipes",
            Some(json!({ "prompt": "tomato soup", "user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(err["error"], "recipe generation failed");

        let (_, listed) = call(&app, Method::GET, "/api/v1/recipes?user_id=u1", None).await;
        assert_eq!(listed, json!([]));
    }
}
