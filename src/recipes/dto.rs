use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Recipe, RecipeBody};

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default, alias = "dish")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DishForm {
    #[serde(default)]
    pub dish: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub recipe: RecipeBody,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            recipe: r.body,
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}
