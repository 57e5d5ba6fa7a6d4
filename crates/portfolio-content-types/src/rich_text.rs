//! Contentful rich-text document tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of a rich-text field (`nodeType: "document"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub content: Vec<Node>,
    #[serde(default)]
    pub data: NodeData,
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            content,
            data: NodeData::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn block(node_type: NodeType, content: Vec<Node>) -> Self {
        Self {
            node_type,
            content,
            value: None,
            marks: Vec::new(),
            data: NodeData::default(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            content: Vec::new(),
            value: Some(value.into()),
            marks: Vec::new(),
            data: NodeData::default(),
        }
    }

    pub fn marked(value: impl Into<String>, marks: &[MarkType]) -> Self {
        let mut node = Self::text(value);
        node.marks = marks.iter().map(|kind| Mark { kind: *kind }).collect();
        node
    }

    pub fn hyperlink(uri: impl Into<String>, content: Vec<Node>) -> Self {
        let mut node = Self::block(NodeType::Hyperlink, content);
        node.data.uri = Some(uri.into());
        node
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading-1")]
    Heading1,
    #[serde(rename = "heading-2")]
    Heading2,
    #[serde(rename = "heading-3")]
    Heading3,
    #[serde(rename = "heading-4")]
    Heading4,
    #[serde(rename = "heading-5")]
    Heading5,
    #[serde(rename = "heading-6")]
    Heading6,
    #[serde(rename = "ordered-list")]
    OrderedList,
    #[serde(rename = "unordered-list")]
    UnorderedList,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "blockquote")]
    Quote,
    #[serde(rename = "hr")]
    Hr,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "table-row")]
    TableRow,
    #[serde(rename = "table-cell")]
    TableCell,
    #[serde(rename = "table-header-cell")]
    TableHeaderCell,
    #[serde(rename = "hyperlink")]
    Hyperlink,
    #[serde(rename = "entry-hyperlink")]
    EntryHyperlink,
    #[serde(rename = "asset-hyperlink")]
    AssetHyperlink,
    #[serde(rename = "resource-hyperlink")]
    ResourceHyperlink,
    #[serde(rename = "embedded-entry-block")]
    EmbeddedEntry,
    #[serde(rename = "embedded-asset-block")]
    EmbeddedAsset,
    #[serde(rename = "embedded-resource-block")]
    EmbeddedResource,
    #[serde(rename = "embedded-entry-inline")]
    EmbeddedEntryInline,
    #[serde(rename = "embedded-resource-inline")]
    EmbeddedResourceInline,
    #[serde(rename = "text")]
    Text,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    Code,
    Superscript,
    Subscript,
    Strikethrough,
    #[serde(other)]
    Unknown,
}

/// Node payload. Hyperlinks carry `uri`; embeds and entry links carry `target`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}
