//! View models and askama templates for project pages.

use askama::{Error as AskamaError, Template};
use axum::http::StatusCode;
use thiserror::Error;

use crate::application::error::HttpError;

pub const SITE_NAME: &str = "Next Portfolio";
pub const META_DESCRIPTION: &str = "Generated by create next app";
pub const FAVICON_HREF: &str = "/favicon.ico";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<&TemplateRenderError> for HttpError {
    fn from(err: &TemplateRenderError) -> Self {
        HttpError::from_error(
            err.source,
            StatusCode::INTERNAL_SERVER_ERROR,
            err.public_message,
            &err.error,
        )
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        HttpError::from(&err)
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub favicon: String,
}

impl PageMetaView {
    pub fn for_title(title: &str) -> Self {
        Self {
            title: format!("{title} • {SITE_NAME}"),
            description: META_DESCRIPTION.to_string(),
            favicon: FAVICON_HREF.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BannerView {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub banner: BannerView,
    pub details_html: String,
}

#[derive(Template)]
#[template(path = "project.html")]
pub struct ProjectTemplate {
    pub meta: PageMetaView,
    pub view: ProjectView,
}

/// Placeholder served while a page is generated in the background.
#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate;
