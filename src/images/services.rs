use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use regex::Regex;

use super::ImageResolver;

const LOREMFLICKR_BASE: &str = "https://loremflickr.com/640/480";

pub const PLACEHOLDER_IMAGES: &[&str] = &[
    "https://picsum.photos/seed/recipe-1/640/480",
    "https://picsum.photos/seed/recipe-2/640/480",
    "https://picsum.photos/seed/recipe-3/640/480",
    "https://picsum.photos/seed/recipe-4/640/480",
    "https://picsum.photos/seed/recipe-5/640/480",
    "https://picsum.photos/seed/recipe-6/640/480",
];

/// `{base}/{slug}` where the slug is the query with whitespace runs as `+`.
#[derive(Debug, Clone)]
pub struct SlugImageResolver {
    base: String,
}

impl Default for SlugImageResolver {
    fn default() -> Self {
        Self {
            base: LOREMFLICKR_BASE.to_string(),
        }
    }
}

pub(crate) fn slug(query: &str) -> String {
    lazy_static! {
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
        static ref PATH_UNSAFE_RE: Regex = Regex::new(r"[/?#%&]").unwrap();
    }
    let cleaned = PATH_UNSAFE_RE.replace_all(query.trim(), "");
    WHITESPACE_RE.replace_all(cleaned.trim(), "+").into_owned()
}

impl ImageResolver for SlugImageResolver {
    fn resolve(&self, query: &str) -> String {
        format!("{}/{}", self.base, slug(query))
    }
}

/// Picks one of [`PLACEHOLDER_IMAGES`] at random, ignoring the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomImageResolver;

impl ImageResolver for RandomImageResolver {
    fn resolve(&self, _query: &str) -> String {
        PLACEHOLDER_IMAGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(LOREMFLICKR_BASE)
            .to_string()
    }
}
