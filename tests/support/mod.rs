#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use portfolio::{
    application::{
        content::{ContentError, ContentSource, EntryQuery},
        pages::SLUG_FIELD,
    },
    domain::project::{ProjectEntry, Thumbnail},
};
use portfolio_content_types::{Document, Node, NodeType};

/// In-memory content service with switchable failure and a call counter.
#[derive(Default)]
pub struct InMemorySource {
    entries: Mutex<Vec<ProjectEntry>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemorySource {
    pub fn with_entries(entries: Vec<ProjectEntry>) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(entries),
            ..Default::default()
        })
    }

    pub fn replace(&self, entries: Vec<ProjectEntry>) {
        *self.entries.lock().expect("entries lock") = entries;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn entries(&self, query: &EntryQuery) -> Result<Vec<ProjectEntry>, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ContentError::transport("connection refused"));
        }

        let entries = self.entries.lock().expect("entries lock");
        Ok(entries
            .iter()
            .filter(|entry| match &query.field_equals {
                Some((field, value)) => field == SLUG_FIELD && &entry.slug == value,
                None => true,
            })
            .cloned()
            .collect())
    }
}

pub fn project(slug: &str, title: &str, description: &str, tags: &[&str]) -> ProjectEntry {
    ProjectEntry {
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        thumbnail: Thumbnail {
            url: format!("//images.ctfassets.net/space/{slug}/banner.png"),
            width: 1200,
            height: 630,
        },
        details: Document::new(vec![Node::block(
            NodeType::Paragraph,
            vec![Node::text(format!("About {title}"))],
        )]),
    }
}

pub fn demo_project() -> ProjectEntry {
    project("demo", "Demo", "Desc", &["a", "b"])
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}
