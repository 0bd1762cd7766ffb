mod services;

use std::sync::Arc;

use crate::config::ImageResolverKind;

pub use services::{RandomImageResolver, SlugImageResolver};

/// Produces an image URL for a dish. The URL is not fetched or checked.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, query: &str) -> String;
}

pub fn from_kind(kind: ImageResolverKind) -> Arc<dyn ImageResolver> {
    match kind {
        ImageResolverKind::Slug => Arc::new(SlugImageResolver::default()),
        ImageResolverKind::Random => Arc::new(RandomImageResolver),
    }
}
