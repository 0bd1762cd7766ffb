use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Partition key for API records: one user inside one application instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner {
    pub app_id: String,
    pub user_id: String,
}

impl Owner {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Recipe fields returned by the LLM generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeBody {
    Text(String),
    Structured(StructuredRecipe),
}

pub const FORMAT_TEXT: &str = "text";
pub const FORMAT_JSON: &str = "json";

impl RecipeBody {
    pub fn format(&self) -> &'static str {
        match self {
            RecipeBody::Text(_) => FORMAT_TEXT,
            RecipeBody::Structured(_) => FORMAT_JSON,
        }
    }

    /// Column value for `body`; structured bodies are stored as JSON.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            RecipeBody::Text(text) => Ok(text.clone()),
            RecipeBody::Structured(recipe) => serde_json::to_string(recipe),
        }
    }

    pub fn decode(format: &str, raw: String) -> Result<Self, serde_json::Error> {
        if format == FORMAT_JSON {
            Ok(RecipeBody::Structured(serde_json::from_str(&raw)?))
        } else {
            Ok(RecipeBody::Text(raw))
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RecipeBody::Text(text) => text.trim().is_empty(),
            RecipeBody::Structured(r) => r.ingredients.is_empty() && r.instructions.is_empty(),
        }
    }

    /// Plain-text rendering used by the HTML page.
    pub fn to_display_text(&self) -> String {
        match self {
            RecipeBody::Text(text) => text.clone(),
            RecipeBody::Structured(r) => {
                let mut out = format!("{}\n\nIngredients:\n", r.title);
                for item in &r.ingredients {
                    out.push_str(&format!("- {item}\n"));
                }
                out.push_str("\nInstructions:\n");
                for (i, step) in r.instructions.iter().enumerate() {
                    out.push_str(&format!("{}. {step}\n", i + 1));
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub owner: Option<Owner>,
    pub title: String,
    pub body: RecipeBody,
    pub image_url: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub owner: Option<Owner>,
    pub title: String,
    pub body: RecipeBody,
    pub image_url: String,
    pub created_at: OffsetDateTime,
}

/// `created_at` column text: UTC, fixed width, so text order is time order.
pub fn encode_timestamp(at: OffsetDateTime) -> anyhow::Result<String> {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
        ))
        .context("format created_at")
}

pub fn decode_timestamp(raw: &str) -> anyhow::Result<OffsetDateTime> {
    let at = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"),
    )
    .with_context(|| format!("parse created_at {raw:?}"))?;
    Ok(at.assume_utc())
}

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub app_id: Option<String>,
    pub user_id: Option<String>,
    pub query: String,
    pub body: String,
    pub body_format: String,
    pub image_url: String,
    pub created_at: String,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = anyhow::Error;

    fn try_from(r: RecipeRow) -> Result<Self, Self::Error> {
        let owner = match (r.app_id, r.user_id) {
            (Some(app_id), Some(user_id)) => Some(Owner { app_id, user_id }),
            _ => None,
        };
        Ok(Self {
            id: r.id,
            owner,
            title: r.query,
            body: RecipeBody::decode(&r.body_format, r.body).context("decode recipe body")?,
            image_url: r.image_url,
            created_at: decode_timestamp(&r.created_at)?,
        })
    }
}
