use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use minijinja::{context, Environment};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use tracing::instrument;

use super::dto::DishForm;
use super::services;
use crate::{error::AppError, state::AppState, store::Recipe};

const INDEX: &str = "index.html";

pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX, include_str!("../../templates/index.html"))?;
    Ok(env)
}

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(submit))
}

#[derive(Debug, Serialize)]
struct RecipeView {
    title: String,
    text: String,
    image_url: String,
    created_at: String,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            text: r.body.to_display_text(),
            created_at: r
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| r.created_at.to_string()),
            title: r.title,
            image_url: r.image_url,
        }
    }
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    render(&state, StatusCode::OK, None).await
}

/// Post/redirect/get on success; on failure the page is re-rendered with the
/// error and the matching status.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<DishForm>,
) -> Result<Response, AppError> {
    let dish = form.dish.unwrap_or_default();
    match services::create_recipe(&state, None, &dish).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e) => {
            let (status, message) = e.report();
            render(&state, status, Some(message)).await
        }
    }
}

async fn render(
    state: &AppState,
    status: StatusCode,
    error: Option<String>,
) -> Result<Response, AppError> {
    let recipes: Vec<RecipeView> = services::list_recipes(state, None)
        .await?
        .into_iter()
        .map(RecipeView::from)
        .collect();

    let html = state
        .pages
        .get_template(INDEX)
        .and_then(|t| {
            t.render(context! {
                title => &state.config.app_title,
                recipes => recipes,
                error => error,
            })
        })
        .map_err(|e| AppError::Internal(anyhow::anyhow!("render {INDEX}: {e}")))?;

    Ok((status, Html(html)).into_response())
}
