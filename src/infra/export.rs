//! Static export: every enumerated project page written as `<slug>/index.html`.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::stream::{self, TryStreamExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    application::{
        content::ContentError,
        pages::{ProjectPages, RenderResult},
        render::{PageState, render_page},
    },
    domain::project::PageParams,
    presentation::views::TemplateRenderError,
};

const SOURCE: &str = "portfolio::export";
const MAX_CONCURRENCY: usize = 32;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped: usize,
}

pub async fn export_pages(
    pages: &ProjectPages,
    out_dir: &Path,
    concurrency: usize,
) -> Result<ExportSummary, ExportError> {
    let concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
    let paths = pages.enumerate_paths().await?;

    info!(
        target = SOURCE,
        concurrency,
        pages = paths.paths.len(),
        out_dir = %out_dir.display(),
        "Starting export"
    );

    let written = Arc::new(AtomicUsize::new(0));
    let skipped = Arc::new(AtomicUsize::new(0));
    let written_handle = written.clone();
    let skipped_handle = skipped.clone();

    stream::iter(paths.paths.into_iter().map(Ok::<_, ExportError>))
        .try_for_each_concurrent(Some(concurrency), move |params| {
            let written = written_handle.clone();
            let skipped = skipped_handle.clone();
            async move {
                if export_page(pages, out_dir, &params).await? {
                    written.fetch_add(1, Ordering::Relaxed);
                } else {
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
                Ok(())
            }
        })
        .await?;

    let summary = ExportSummary {
        written: written.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
    };
    info!(
        target = SOURCE,
        written = summary.written,
        skipped = summary.skipped,
        "Exported project pages"
    );
    Ok(summary)
}

/// Returns `false` when nothing was written: the slug cannot name a directory
/// below `out_dir` or it resolved to a redirect.
async fn export_page(
    pages: &ProjectPages,
    out_dir: &Path,
    params: &PageParams,
) -> Result<bool, ExportError> {
    if !params.is_single_segment() {
        warn!(
            target = SOURCE,
            slug = %params.slug,
            "slug is not a single path segment, skipping"
        );
        return Ok(false);
    }

    let props = match pages.resolve_props(params).await? {
        RenderResult::Props(props) => props,
        RenderResult::Redirect(redirect) => {
            warn!(
                target = SOURCE,
                slug = %params.slug,
                destination = %redirect.destination,
                "slug resolved to a redirect, skipping"
            );
            return Ok(false);
        }
    };

    let html = render_page(&PageState::Loaded(props.project))?;

    let dir = out_dir.join(&params.slug);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;

    let file = dir.join("index.html");
    tokio::fs::write(&file, html)
        .await
        .map_err(|source| ExportError::Io { path: file, source })?;

    Ok(true)
}
