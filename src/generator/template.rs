use async_trait::async_trait;

use super::{GenerateError, RecipeGenerator};
use crate::store::RecipeBody;

/// Fills the dish name into a fixed recipe. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn render(dish: &str) -> String {
        format!(
            "\nIngredients:\n\
             - 2 cups {dish}\n\
             - 1 tsp salt\n\
             - 1 tbsp olive oil\n\
             - Herbs to taste\n\
             \n\
             Instructions:\n\
             1. Preheat oven to 180\u{b0}C.\n\
             2. Mix {dish} with salt and herbs.\n\
             3. Drizzle olive oil.\n\
             4. Bake for 20 minutes.\n\
             5. Serve hot and enjoy!\n"
        )
    }
}

#[async_trait]
impl RecipeGenerator for TemplateGenerator {
    async fn generate(&self, query: &str) -> Result<RecipeBody, GenerateError> {
        Ok(RecipeBody::Text(Self::render(query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn substitutes_the_dish() {
        let body = TemplateGenerator.generate("tomato soup").await.unwrap();
        let RecipeBody::Text(text) = body else {
            panic!("template output is text");
        };
        assert!(text.contains("- 2 cups tomato soup"));
        assert!(text.contains("2. Mix tomato soup with salt and herbs."));
        assert!(text.contains("5. Serve hot and enjoy!"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(TemplateGenerator::render("pie"), TemplateGenerator::render("pie"));
        assert_ne!(TemplateGenerator::render("pie"), TemplateGenerator::render("cake"));
    }
}
