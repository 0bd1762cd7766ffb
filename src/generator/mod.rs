//! Recipe body generation.

mod llm;
mod template;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::store::RecipeBody;

pub use llm::LlmGenerator;
pub use template::TemplateGenerator;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Network failure or a response that could not be read as a recipe.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The response was readable but lacked required recipe fields.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        GenerateError::Upstream(e.to_string())
    }
}

#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(&self, query: &str) -> Result<RecipeBody, GenerateError>;
}

pub fn from_config(config: &GeneratorConfig) -> anyhow::Result<Arc<dyn RecipeGenerator>> {
    let generator: Arc<dyn RecipeGenerator> = match config {
        GeneratorConfig::Template => Arc::new(TemplateGenerator),
        GeneratorConfig::Llm(llm) => Arc::new(LlmGenerator::new(llm)?),
    };
    Ok(generator)
}

#[cfg(test)]
pub(crate) use llm::tests as llm_fixtures;
