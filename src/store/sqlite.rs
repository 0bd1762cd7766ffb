use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::types::{encode_timestamp, NewRecipe, Owner, Recipe, RecipeRow};
use super::RecipeStore;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// In-memory URLs get a single long-lived connection, otherwise every
    /// pooled connection would see its own empty database.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(url, "recipe store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn append(&self, recipe: NewRecipe) -> anyhow::Result<Recipe> {
        let body = recipe.body.encode().context("encode recipe body")?;
        let created_at = encode_timestamp(recipe.created_at)?;
        let (app_id, user_id) = match &recipe.owner {
            Some(o) => (Some(o.app_id.as_str()), Some(o.user_id.as_str())),
            None => (None, None),
        };

        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (app_id, user_id, query, body, body_format, image_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, app_id, user_id, query, body, body_format, image_url, created_at
            "#,
        )
        .bind(app_id)
        .bind(user_id)
        .bind(&recipe.title)
        .bind(&body)
        .bind(recipe.body.format())
        .bind(&recipe.image_url)
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await
        .context("insert recipe")?;

        Recipe::try_from(row)
    }

    async fn list_all(&self, owner: Option<&Owner>) -> anyhow::Result<Vec<Recipe>> {
        // `IS` matches NULL against NULL, so one query serves both partitions.
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, app_id, user_id, query, body, body_format, image_url, created_at
            FROM recipes
            WHERE app_id IS ?1 AND user_id IS ?2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner.map(|o| o.app_id.as_str()))
        .bind(owner.map(|o| o.user_id.as_str()))
        .fetch_all(&self.pool)
        .await
        .context("list recipes")?;

        rows.into_iter().map(Recipe::try_from).collect()
    }

    async fn delete(&self, id: i64, owner: &Owner) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = ?1 AND app_id = ?2 AND user_id = ?3
            "#,
        )
        .bind(id)
        .bind(&owner.app_id)
        .bind(&owner.user_id)
        .execute(&self.pool)
        .await
        .context("delete recipe")?;
        Ok(result.rows_affected() > 0)
    }
}
