use portfolio_content_types::Document;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Scheme prepended to the protocol-relative asset URLs the CMS stores.
pub const ASSET_URL_SCHEME: &str = "https:";

/// One `project` entry, read-only once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub thumbnail: Thumbnail,
    pub details: Document,
}

/// Banner image reference with the intrinsic size reported by the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn absolute_url(&self) -> String {
        format!("{ASSET_URL_SCHEME}{}", self.url)
    }
}

/// Route parameters of a generated project page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageParams {
    pub slug: String,
}

impl PageParams {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    /// Parse a slug taken from a request path.
    pub fn from_path(raw: &str) -> Result<Self, DomainError> {
        let slug = raw.trim_matches('/');
        if slug.is_empty() {
            return Err(DomainError::validation("slug must not be empty"));
        }
        if !is_path_segment(slug) {
            return Err(DomainError::validation(format!(
                "slug `{slug}` must be a single path segment"
            )));
        }
        Ok(Self::new(slug))
    }

    /// Whether the slug can name one directory below an output root.
    pub fn is_single_segment(&self) -> bool {
        is_path_segment(&self.slug)
    }
}

fn is_path_segment(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
