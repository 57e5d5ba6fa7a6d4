//! Rich-text document to HTML expansion.
//!
//! Mirrors the default node and mark mapping of Contentful's document
//! renderers. Embedded entries and assets have no default markup and render
//! nothing. The assembled fragment goes through `ammonia` before it is
//! returned.

use portfolio_content_types::{Document, MarkType, Node, NodeType};

pub fn render_document(document: &Document) -> String {
    let mut raw = String::new();
    render_nodes(&document.content, &mut raw);
    ammonia::clean(&raw)
}

fn render_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        render_node(node, out);
    }
}

fn render_node(node: &Node, out: &mut String) {
    match node.node_type {
        NodeType::Text => render_text(node, out),
        NodeType::Paragraph => wrap("p", node, out),
        NodeType::Heading1 => wrap("h1", node, out),
        NodeType::Heading2 => wrap("h2", node, out),
        NodeType::Heading3 => wrap("h3", node, out),
        NodeType::Heading4 => wrap("h4", node, out),
        NodeType::Heading5 => wrap("h5", node, out),
        NodeType::Heading6 => wrap("h6", node, out),
        NodeType::OrderedList => wrap("ol", node, out),
        NodeType::UnorderedList => wrap("ul", node, out),
        NodeType::ListItem => wrap("li", node, out),
        NodeType::Quote => wrap("blockquote", node, out),
        NodeType::Hr => out.push_str("<hr/>"),
        NodeType::Table => {
            out.push_str("<table><tbody>");
            render_nodes(&node.content, out);
            out.push_str("</tbody></table>");
        }
        NodeType::TableRow => wrap("tr", node, out),
        NodeType::TableCell => wrap("td", node, out),
        NodeType::TableHeaderCell => wrap("th", node, out),
        NodeType::Hyperlink => {
            let uri = node.data.uri.as_deref().unwrap_or_default();
            out.push_str("<a href=\"");
            out.push_str(&ammonia::clean_text(uri));
            out.push_str("\">");
            render_nodes(&node.content, out);
            out.push_str("</a>");
        }
        NodeType::EntryHyperlink | NodeType::AssetHyperlink | NodeType::ResourceHyperlink => {
            render_nodes(&node.content, out)
        }
        NodeType::EmbeddedEntry
        | NodeType::EmbeddedAsset
        | NodeType::EmbeddedResource
        | NodeType::EmbeddedEntryInline
        | NodeType::EmbeddedResourceInline => {}
        NodeType::Document | NodeType::Unknown => render_nodes(&node.content, out),
    }
}

fn wrap(tag: &str, node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_nodes(&node.content, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_text(node: &Node, out: &mut String) {
    let value = node.value.as_deref().unwrap_or_default();

    let mut html = String::with_capacity(value.len());
    for (index, line) in value.split('\n').enumerate() {
        if index > 0 {
            html.push_str("<br/>");
        }
        html.push_str(&ammonia::clean_text(line));
    }

    // First mark ends up innermost.
    for mark in &node.marks {
        let Some(tag) = mark_tag(mark.kind) else {
            continue;
        };
        html = format!("<{tag}>{html}</{tag}>");
    }

    out.push_str(&html);
}

fn mark_tag(kind: MarkType) -> Option<&'static str> {
    match kind {
        MarkType::Bold => Some("b"),
        MarkType::Italic => Some("i"),
        MarkType::Underline => Some("u"),
        MarkType::Code => Some("code"),
        MarkType::Superscript => Some("sup"),
        MarkType::Subscript => Some("sub"),
        MarkType::Strikethrough => Some("s"),
        MarkType::Unknown => None,
    }
}
