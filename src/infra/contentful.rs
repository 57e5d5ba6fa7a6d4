//! Contentful Content Delivery API client.

use async_trait::async_trait;
use portfolio_content_types::{Entry, EntryCollection, ErrorResponse, Includes, ProjectFields};
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::{
    application::content::{ContentError, ContentSource, EntryQuery},
    config::ContentfulSettings,
    domain::project::{ProjectEntry, Thumbnail},
};

use super::error::InfraError;

const SOURCE: &str = "portfolio::infra::contentful";
const PAGE_SIZE: u64 = 100;

#[derive(Clone, Debug)]
pub struct ContentfulClient {
    client: Client,
    entries_url: Url,
    access_token: String,
}

impl ContentfulClient {
    pub fn new(settings: &ContentfulSettings) -> Result<Self, InfraError> {
        let mut entries_url = settings.base_url.clone();
        entries_url
            .path_segments_mut()
            .map_err(|_| {
                InfraError::configuration(format!(
                    "contentful.base_url `{}` cannot carry a path",
                    settings.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "spaces",
                settings.space_id.as_str(),
                "environments",
                settings.environment.as_str(),
                "entries",
            ]);

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build http client: {err}"))
            })?;

        Ok(Self {
            client,
            entries_url,
            access_token: settings.access_token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("portfolio/", env!("CARGO_PKG_VERSION"))
    }

    pub fn entries_url(&self) -> &Url {
        &self.entries_url
    }

    fn page_url(&self, query: &EntryQuery, skip: u64) -> Url {
        let mut url = self.entries_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("content_type", &query.content_type);
            if let Some((field, value)) = &query.field_equals {
                pairs.append_pair(&format!("fields.{field}"), value);
            }
            pairs.append_pair("skip", &skip.to_string());
            pairs.append_pair("limit", &PAGE_SIZE.to_string());
        }
        url
    }

    async fn fetch_page(
        &self,
        query: &EntryQuery,
        skip: u64,
    ) -> Result<EntryCollection<ProjectFields>, ContentError> {
        let url = self.page_url(query, skip);
        debug!(target = SOURCE, %url, "requesting entries");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(ContentError::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ContentError::transport)?;

        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ContentError::malformed(format!("failed to decode entries: {err}")))
    }
}

#[async_trait]
impl ContentSource for ContentfulClient {
    #[instrument(skip_all, fields(content_type = %query.content_type))]
    async fn entries(&self, query: &EntryQuery) -> Result<Vec<ProjectEntry>, ContentError> {
        let mut projects = Vec::new();
        let mut skip = 0;

        loop {
            let page = self.fetch_page(query, skip).await?;
            let fetched = page.items.len() as u64;

            for entry in page.items {
                projects.push(into_project(entry, &page.includes)?);
            }

            skip += fetched;
            if fetched == 0 || skip >= page.total {
                break;
            }
        }

        debug!(target = SOURCE, count = projects.len(), "fetched entries");
        Ok(projects)
    }
}

fn into_project(
    entry: Entry<ProjectFields>,
    includes: &Includes,
) -> Result<ProjectEntry, ContentError> {
    let Entry { sys, fields } = entry;
    let asset_id = &fields.thumbnail.sys.id;

    let asset = includes
        .asset(asset_id)
        .ok_or_else(|| ContentError::MissingAsset {
            entry: sys.id.clone(),
            asset: asset_id.clone(),
        })?;

    let dimensions = asset.fields.file.details.image.ok_or_else(|| {
        ContentError::malformed(format!(
            "asset `{asset_id}` linked from entry `{}` has no image dimensions",
            sys.id
        ))
    })?;

    Ok(ProjectEntry {
        slug: fields.slug,
        title: fields.title,
        description: fields.description,
        tags: fields.tags,
        thumbnail: Thumbnail {
            url: asset.fields.file.url.clone(),
            width: dimensions.width,
            height: dimensions.height,
        },
        details: fields.details,
    })
}

fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(error) => error.message.unwrap_or(error.sys.id),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
