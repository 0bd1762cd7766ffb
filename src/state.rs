use std::sync::Arc;

use anyhow::Context;
use minijinja::Environment;

use crate::config::AppConfig;
use crate::generator::{self, RecipeGenerator};
use crate::images::{self, ImageResolver};
use crate::recipes::pages;
use crate::store::{RecipeStore, SqliteStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecipeStore>,
    pub generator: Arc<dyn RecipeGenerator>,
    pub images: Arc<dyn ImageResolver>,
    pub pages: Arc<Environment<'static>>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = SqliteStore::connect(&config.database_url)
            .await
            .with_context(|| format!("open recipe store at {}", config.database_url))?;
        let generator = generator::from_config(&config.generator).context("build recipe generator")?;
        let images = images::from_kind(config.image_resolver);

        Self::from_parts(Arc::new(config), Arc::new(store), generator, images)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn RecipeStore>,
        generator: Arc<dyn RecipeGenerator>,
        images: Arc<dyn ImageResolver>,
    ) -> anyhow::Result<Self> {
        let pages = Arc::new(pages::environment().context("load page templates")?);
        Ok(Self {
            config,
            store,
            generator,
            images,
            pages,
        })
    }

    /// In-memory store, template generator, slug images.
    #[cfg(test)]
    pub async fn fake() -> Self {
        Self::fake_with_generator(Arc::new(generator::TemplateGenerator)).await
    }

    #[cfg(test)]
    pub async fn fake_with_generator(generator: Arc<dyn RecipeGenerator>) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "APP_ID" => Some("test-app".into()),
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            _ => None,
        })
        .expect("test config");
        let store = SqliteStore::connect(&config.database_url)
            .await
            .expect("in-memory store");
        Self::from_parts(
            Arc::new(config),
            Arc::new(store),
            generator,
            Arc::new(images::SlugImageResolver::default()),
        )
        .expect("test state")
    }
}
