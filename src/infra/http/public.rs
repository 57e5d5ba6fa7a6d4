use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderName, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;

use crate::{
    application::{
        error::{ErrorReport, HttpError},
        pages::Redirect,
        render::{PageState, render_page},
    },
    cache::{CachedPage, PageBody, PageCache, Served},
    domain::project::PageParams,
};

use super::middleware::{log_responses, set_request_context};

const SOURCE: &str = "infra::http::public";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const REFRESH: HeaderName = HeaderName::from_static("refresh");
const LOADING_REFRESH_SECONDS: &str = "1";

#[derive(Clone)]
pub struct HttpState {
    pub cache: PageCache,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/_health", get(health))
        .route("/favicon.ico", get(favicon))
        .route("/{slug}", get(project_detail))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn project_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let params = match PageParams::from_path(&slug) {
        Ok(params) => params,
        Err(err) => return HttpError::from(err).into_response(),
    };

    match state.cache.serve(&params).await {
        Ok(Served::Page(page)) => cached_page_response(page),
        Ok(Served::Loading) => loading_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

fn cached_page_response(page: CachedPage) -> Response {
    let cache_control = cache_control_value(page.revalidate);
    let mut response = match page.body {
        PageBody::Html(body) => html_response(StatusCode::OK, body),
        PageBody::Redirect(redirect) => redirect_response(&redirect),
    };
    response.headers_mut().insert(CACHE_CONTROL, cache_control);
    response
}

fn html_response(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    response
}

fn redirect_response(redirect: &Redirect) -> Response {
    let status = if redirect.permanent {
        StatusCode::PERMANENT_REDIRECT
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };

    match HeaderValue::from_str(&redirect.destination) {
        Ok(location) => {
            let mut response = status.into_response();
            response.headers_mut().insert(LOCATION, location);
            response
        }
        Err(err) => HttpError::from_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid redirect destination",
            &err,
        )
        .into_response(),
    }
}

fn loading_response() -> Response {
    match render_page(&PageState::Loading) {
        Ok(html) => {
            let mut response = html_response(StatusCode::OK, Bytes::from(html));
            let headers = response.headers_mut();
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(REFRESH, HeaderValue::from_static(LOADING_REFRESH_SECONDS));
            response
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

fn cache_control_value(revalidate: Duration) -> HeaderValue {
    let value = format!("s-maxage={}, stale-while-revalidate", revalidate.as_secs());
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn favicon() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    ErrorReport::from_message(
        "infra::http::public::favicon",
        StatusCode::NOT_FOUND,
        "no favicon is bundled",
    )
    .attach(&mut response);
    response
}
