//! Static generation contract for project pages: path enumeration and props
//! resolution.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info};

use crate::application::content::{ContentError, ContentSource, EntryQuery};
use crate::domain::project::{PageParams, ProjectEntry};

pub const PROJECT_CONTENT_TYPE: &str = "project";
pub const SLUG_FIELD: &str = "slug";
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(1);
pub const NOT_FOUND_DESTINATION: &str = "/";

const SOURCE: &str = "portfolio::pages";

/// How a request for a slug that was not generated ahead of time is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Serve the loading placeholder and generate the page in the background.
    #[default]
    Placeholder,
    /// Generate the page before answering the request.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<PageParams>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub destination: String,
    pub permanent: bool,
}

impl Redirect {
    pub fn temporary(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            permanent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageProps {
    pub project: ProjectEntry,
    pub revalidate: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Redirect(Redirect),
    Props(PageProps),
}

#[derive(Clone)]
pub struct ProjectPages {
    source: Arc<dyn ContentSource>,
    revalidate: Duration,
    fallback: Fallback,
}

impl ProjectPages {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            revalidate: DEFAULT_REVALIDATE,
            fallback: Fallback::default(),
        }
    }

    pub fn with_revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// One path per `project` entry. An empty space yields an empty set.
    pub async fn enumerate_paths(&self) -> Result<StaticPaths, ContentError> {
        let entries = self
            .source
            .entries(&EntryQuery::content_type(PROJECT_CONTENT_TYPE))
            .await?;

        let paths: Vec<PageParams> = entries
            .into_iter()
            .map(|entry| PageParams::new(entry.slug))
            .collect();

        info!(target = SOURCE, count = paths.len(), "enumerated project paths");

        Ok(StaticPaths {
            paths,
            fallback: self.fallback,
        })
    }

    /// Props for one page, or a temporary redirect to the site root when no
    /// entry carries the slug.
    pub async fn resolve_props(&self, params: &PageParams) -> Result<RenderResult, ContentError> {
        let query =
            EntryQuery::content_type(PROJECT_CONTENT_TYPE).with_field(SLUG_FIELD, &params.slug);
        let entries = self.source.entries(&query).await?;

        let Some(project) = entries.into_iter().next() else {
            debug!(target = SOURCE, slug = %params.slug, "no entry for slug, redirecting");
            return Ok(RenderResult::Redirect(Redirect::temporary(
                NOT_FOUND_DESTINATION,
            )));
        };

        Ok(RenderResult::Props(PageProps {
            project,
            revalidate: self.revalidate,
        }))
    }
}
