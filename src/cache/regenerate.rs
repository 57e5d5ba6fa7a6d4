//! Stale-while-revalidate serving of project pages.
//!
//! A fresh page is served as is. A stale page is still served while one
//! background task per slug regenerates it. A slug that was never generated
//! follows the configured [`Fallback`]; when its last generation failed, the
//! failure is answered for one revalidation interval before a retry.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use bytes::Bytes;
use dashmap::DashMap;
use metrics::counter;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    application::{
        content::ContentError,
        error::HttpError,
        pages::{Fallback, ProjectPages, RenderResult, StaticPaths},
        render::{PageState, render_page},
    },
    domain::project::PageParams,
    presentation::views::TemplateRenderError,
};

use super::{
    config::CacheConfig,
    in_flight::{FillLocks, InFlightPages},
    store::{CachedPage, Lookup, PageBody, PageStore},
};

const SOURCE: &str = "portfolio::cache::regenerate";

pub(crate) const METRIC_PAGE_REGENERATE: &str = "portfolio_page_regenerate_total";
pub(crate) const METRIC_PAGE_REGENERATE_FAILED: &str = "portfolio_page_regenerate_failed_total";

#[derive(Debug, Error)]
pub enum RegenerateError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    /// A recent generation of a page with no cached copy failed.
    #[error(transparent)]
    Failed(Arc<RegenerateError>),
}

impl From<&RegenerateError> for HttpError {
    fn from(error: &RegenerateError) -> Self {
        match error {
            RegenerateError::Content(err) => err.into(),
            RegenerateError::Render(err) => err.into(),
            RegenerateError::Failed(previous) => HttpError::from(&**previous),
        }
    }
}

impl From<RegenerateError> for HttpError {
    fn from(error: RegenerateError) -> Self {
        HttpError::from(&error)
    }
}

/// What the HTTP layer should answer with.
#[derive(Debug, Clone)]
pub enum Served {
    Page(CachedPage),
    /// The page is being generated; answer with the loading placeholder.
    Loading,
}

#[derive(Debug, Clone)]
struct FailedGeneration {
    error: Arc<RegenerateError>,
    failed_at: Instant,
}

impl FailedGeneration {
    fn is_current(&self, now: Instant, revalidate: Duration) -> bool {
        now.saturating_duration_since(self.failed_at) < revalidate
    }
}

#[derive(Clone)]
pub struct PageCache {
    config: CacheConfig,
    store: Arc<PageStore>,
    pages: ProjectPages,
    in_flight: InFlightPages,
    fill_locks: FillLocks,
    failures: Arc<DashMap<String, FailedGeneration>>,
}

impl PageCache {
    pub fn new(pages: ProjectPages, config: CacheConfig) -> Self {
        Self {
            store: Arc::new(PageStore::new(&config)),
            config,
            pages,
            in_flight: InFlightPages::new(),
            fill_locks: FillLocks::new(),
            failures: Arc::new(DashMap::new()),
        }
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub async fn serve(&self, params: &PageParams) -> Result<Served, RegenerateError> {
        if !self.config.enabled {
            return self.generate(params).await.map(Served::Page);
        }

        match self.store.lookup(&params.slug, Instant::now()) {
            Lookup::Fresh(page) => Ok(Served::Page(page)),
            Lookup::Stale(page) => {
                self.spawn_regeneration(params.clone());
                Ok(Served::Page(page))
            }
            Lookup::Miss => self.serve_miss(params).await,
        }
    }

    async fn serve_miss(&self, params: &PageParams) -> Result<Served, RegenerateError> {
        if let Some(error) = self.recent_failure(&params.slug) {
            return Err(RegenerateError::Failed(error));
        }

        match self.pages.fallback() {
            Fallback::Placeholder => {
                self.spawn_regeneration(params.clone());
                Ok(Served::Loading)
            }
            Fallback::Blocking => self.fill(params).await.map(Served::Page),
        }
    }

    /// Generate inline, letting concurrent misses for the slug share one
    /// generation.
    async fn fill(&self, params: &PageParams) -> Result<CachedPage, RegenerateError> {
        let _fill = self.fill_locks.acquire(&params.slug).await;

        if let Some(page) = self.store.peek(&params.slug) {
            return Ok(page);
        }
        if let Some(error) = self.recent_failure(&params.slug) {
            return Err(RegenerateError::Failed(error));
        }
        self.regenerate(params).await
    }

    /// Resolve and render one page without touching the store.
    pub async fn generate(&self, params: &PageParams) -> Result<CachedPage, RegenerateError> {
        let page = match self.pages.resolve_props(params).await? {
            RenderResult::Redirect(redirect) => {
                CachedPage::new(PageBody::Redirect(redirect), self.pages.revalidate())
            }
            RenderResult::Props(props) => {
                let html = render_page(&PageState::Loaded(props.project))?;
                CachedPage::new(PageBody::Html(Bytes::from(html)), props.revalidate)
            }
        };
        Ok(page)
    }

    /// Generate a page and store it. On failure the previous copy, if any,
    /// stays; without one the failure is remembered for the slug.
    pub async fn regenerate(&self, params: &PageParams) -> Result<CachedPage, RegenerateError> {
        counter!(METRIC_PAGE_REGENERATE).increment(1);

        let page = match self.generate(params).await {
            Ok(page) => page,
            Err(err) => {
                counter!(METRIC_PAGE_REGENERATE_FAILED).increment(1);
                return Err(self.record_failure(&params.slug, err));
            }
        };

        self.failures.remove(&params.slug);
        if let Some(evicted) = self.store.insert(params.slug.clone(), page.clone()) {
            debug!(target = SOURCE, slug = %params.slug, evicted = %evicted, "evicted cached page");
        }
        Ok(page)
    }

    fn record_failure(&self, slug: &str, error: RegenerateError) -> RegenerateError {
        if self.store.peek(slug).is_some() {
            return error;
        }

        let now = Instant::now();
        let revalidate = self.pages.revalidate();
        self.failures
            .retain(|_, failure| failure.is_current(now, revalidate));

        let error = match error {
            RegenerateError::Failed(shared) => shared,
            other => Arc::new(other),
        };
        self.failures.insert(
            slug.to_string(),
            FailedGeneration {
                error: Arc::clone(&error),
                failed_at: now,
            },
        );
        RegenerateError::Failed(error)
    }

    fn recent_failure(&self, slug: &str) -> Option<Arc<RegenerateError>> {
        let failure = self.failures.get(slug).map(|entry| entry.value().clone())?;
        if failure.is_current(Instant::now(), self.pages.revalidate()) {
            return Some(failure.error);
        }
        self.failures
            .remove_if(slug, |_, stored| stored.failed_at == failure.failed_at);
        None
    }

    /// Regenerate in the background unless a regeneration for the slug is
    /// already running. Returns the task handle when one was spawned.
    pub fn spawn_regeneration(&self, params: PageParams) -> Option<JoinHandle<()>> {
        let guard = match self.in_flight.acquire(&params.slug) {
            Ok(guard) => guard,
            Err(err) => {
                debug!(target = SOURCE, reason = %err, "skipping regeneration");
                return None;
            }
        };

        let cache = self.clone();
        Some(tokio::spawn(async move {
            let _guard = guard;
            if let Err(err) = cache.regenerate(&params).await {
                warn!(
                    target = SOURCE,
                    slug = %params.slug,
                    error = %err,
                    "page regeneration failed"
                );
            }
        }))
    }

    /// Generate every enumerated path ahead of the first request.
    pub async fn warm(&self) -> Result<StaticPaths, RegenerateError> {
        let paths = self.pages.enumerate_paths().await?;
        for params in &paths.paths {
            self.regenerate(params).await?;
        }
        debug!(target = SOURCE, pages = paths.paths.len(), "page cache warmed");
        Ok(paths)
    }

    pub fn is_regenerating(&self, slug: &str) -> bool {
        self.in_flight.contains(slug)
    }
}
