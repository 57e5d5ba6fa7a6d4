//! Wire types for Contentful Content Delivery API payloads.
//!
//! Only the parts of the delivery format the portfolio reads are modelled:
//! entry collections with their `includes`, asset links, the `project`
//! content type fields and the rich-text document tree.

pub mod rich_text;

use serde::{Deserialize, Serialize};

pub use rich_text::{Document, Mark, MarkType, Node, NodeData, NodeType};

/// Response body of `GET /spaces/{space}/environments/{env}/entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCollection<F> {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    pub items: Vec<Entry<F>>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry<F> {
    pub sys: Sys,
    pub fields: F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sys {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reference to another entry or asset, resolved through [`Includes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSys {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "linkType")]
    pub link_type: String,
}

impl Link {
    pub fn asset(id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                id: id.into(),
                kind: "Link".to_string(),
                link_type: "Asset".to_string(),
            },
        }
    }
}

/// Linked resources shipped alongside a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(rename = "Asset", default)]
    pub assets: Vec<Asset>,
}

impl Includes {
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.sys.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub sys: Sys,
    pub fields: AssetFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default)]
    pub title: Option<String>,
    pub file: AssetFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    /// Protocol-relative URL, e.g. `//images.ctfassets.net/...`.
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub details: FileDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDetails {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub image: Option<ImageDimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Fields of the `project` content type.
///
/// Contentful omits empty fields from the payload, so the optional ones
/// default instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFields {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnail: Link,
    #[serde(default)]
    pub details: Document,
}

/// Error body returned by the delivery API for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub sys: Sys,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}
