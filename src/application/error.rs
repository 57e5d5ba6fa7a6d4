use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::content::ContentError,
    cache::RegenerateError,
    domain::error::DomainError,
    infra::{error::InfraError, export::ExportError},
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<&ContentError> for HttpError {
    fn from(error: &ContentError) -> Self {
        const SOURCE: &str = "application::error::content_error_to_http_error";
        match error {
            ContentError::Transport(_) | ContentError::Status { .. } => HttpError::from_error(
                SOURCE,
                StatusCode::BAD_GATEWAY,
                "Content service unavailable",
                error,
            ),
            ContentError::Malformed(_) | ContentError::MissingAsset { .. } => {
                HttpError::from_error(
                    SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Content could not be rendered",
                    error,
                )
            }
        }
    }
}

impl From<ContentError> for HttpError {
    fn from(error: ContentError) -> Self {
        HttpError::from(&error)
    }
}

impl From<DomainError> for HttpError {
    fn from(error: DomainError) -> Self {
        HttpError::from_error(
            "application::error::domain_error_to_http_error",
            StatusCode::NOT_FOUND,
            "Page not found",
            &error,
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Regenerate(#[from] RegenerateError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_map_to_bad_gateway() {
        let error = HttpError::from(ContentError::transport("connection refused"));
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn malformed_content_maps_to_internal_error() {
        let error = HttpError::from(ContentError::MissingAsset {
            entry: "e".to_string(),
            asset: "a".to_string(),
        });
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn report_collects_source_chain() {
        let inner = std::io::Error::other("disk full");
        let outer = InfraError::from(inner);
        let report =
            ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &outer);
        assert_eq!(report.messages.len(), 2);
        assert!(report.messages[1].contains("disk full"));
    }
}
