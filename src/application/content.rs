//! Content source abstraction over the headless CMS.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::project::ProjectEntry;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content request failed: {0}")]
    Transport(String),
    #[error("content service responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed content: {0}")]
    Malformed(String),
    #[error("entry `{entry}` links asset `{asset}` that was not included")]
    MissingAsset { entry: String, asset: String },
}

impl ContentError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Read-only entry query: a content type, optionally narrowed by one exact
/// field match (`fields.<name>=<value>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: String,
    pub field_equals: Option<(String, String)>,
}

impl EntryQuery {
    pub fn content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            field_equals: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.field_equals = Some((field.into(), value.into()));
        self
    }
}

/// Source of project entries. Implemented over HTTP by
/// [`crate::infra::contentful::ContentfulClient`] and by in-memory doubles in tests.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Entries matching `query`, in the order the service returns them.
    async fn entries(&self, query: &EntryQuery) -> Result<Vec<ProjectEntry>, ContentError>;
}
