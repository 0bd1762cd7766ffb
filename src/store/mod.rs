//! Recipe persistence.
//!
//! Handlers only see [`RecipeStore`]; the SQLite implementation lives in
//! [`sqlite`].

mod sqlite;
mod types;

use async_trait::async_trait;

pub use sqlite::SqliteStore;
pub use types::{NewRecipe, Owner, Recipe, RecipeBody, StructuredRecipe};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a record and return it with its store-assigned id.
    async fn append(&self, recipe: NewRecipe) -> anyhow::Result<Recipe>;

    /// All records in a partition, newest first. `None` selects unowned records.
    async fn list_all(&self, owner: Option<&Owner>) -> anyhow::Result<Vec<Recipe>>;

    /// Returns `false` when no record with that id belongs to `owner`.
    async fn delete(&self, id: i64, owner: &Owner) -> anyhow::Result<bool>;
}
