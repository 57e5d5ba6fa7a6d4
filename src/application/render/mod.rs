//! Page renderer: maps a [`PageState`] to a complete HTML document.

pub mod rich_text;

use askama::Template;

use crate::domain::project::ProjectEntry;
use crate::presentation::views::{
    BannerView, LoadingTemplate, PageMetaView, ProjectTemplate, ProjectView, TemplateRenderError,
};

pub use rich_text::render_document;

const SOURCE: &str = "application::render::render_page";

/// What the renderer is asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// The page is still being generated; no entry is available yet.
    Loading,
    Loaded(ProjectEntry),
}

pub fn render_page(state: &PageState) -> Result<String, TemplateRenderError> {
    match state {
        PageState::Loading => LoadingTemplate
            .render()
            .map_err(|err| TemplateRenderError::new(SOURCE, "Failed to render loading page", err)),
        PageState::Loaded(entry) => project_template(entry)
            .render()
            .map_err(|err| TemplateRenderError::new(SOURCE, "Failed to render project page", err)),
    }
}

fn project_template(entry: &ProjectEntry) -> ProjectTemplate {
    ProjectTemplate {
        meta: PageMetaView::for_title(&entry.title),
        view: ProjectView {
            title: entry.title.clone(),
            description: entry.description.clone(),
            tags: entry.tags.clone(),
            banner: BannerView {
                src: entry.thumbnail.absolute_url(),
                width: entry.thumbnail.width,
                height: entry.thumbnail.height,
            },
            details_html: render_document(&entry.details),
        },
    }
}

#[cfg(test)]
mod tests {
    use portfolio_content_types::{Document, Node, NodeType};

    use super::*;
    use crate::domain::project::Thumbnail;

    fn entry() -> ProjectEntry {
        ProjectEntry {
            slug: "demo".to_string(),
            title: "Demo".to_string(),
            description: "Desc".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            thumbnail: Thumbnail {
                url: "//images.ctfassets.net/space/asset/banner.png".to_string(),
                width: 1200,
                height: 630,
            },
            details: Document::new(vec![Node::block(
                NodeType::Paragraph,
                vec![Node::text("Details")],
            )]),
        }
    }

    #[test]
    fn loaded_page_carries_title_and_head_tags() {
        let html = render_page(&PageState::Loaded(entry())).expect("render");

        assert!(html.contains("<title>Demo • Next Portfolio</title>"));
        assert!(html.contains("content=\"Generated by create next app\""));
        assert!(html.contains("rel=\"icon\" href=\"/favicon.ico\""));
        assert!(html.contains("<h2>Demo</h2>"));
        assert!(html.contains("<p>Desc</p>"));
        assert!(html.contains("<div class=\"details\"><p>Details</p></div>"));
        assert!(html.contains("&larr; Back to Home"));
    }

    #[test]
    fn banner_uses_intrinsic_dimensions() {
        let mut project = entry();
        project.thumbnail.width = 317;
        project.thumbnail.height = 91;
        let html = render_page(&PageState::Loaded(project)).expect("render");

        assert!(html.contains("width=\"317\""));
        assert!(html.contains("height=\"91\""));
        assert!(html.contains("https:"));
        assert!(html.contains("banner.png"));
    }

    #[test]
    fn tags_render_in_order() {
        let html = render_page(&PageState::Loaded(entry())).expect("render");

        let first = html.find("data-key=\"a\"").expect("tag a");
        let second = html.find("data-key=\"b\"").expect("tag b");
        assert!(first < second);
        assert_eq!(html.matches("class=\"hashtag\"").count(), 2);
    }

    #[test]
    fn empty_tag_list_renders_no_tag_elements() {
        let mut project = entry();
        project.tags.clear();
        let html = render_page(&PageState::Loaded(project)).expect("render");

        assert_eq!(html.matches("class=\"hashtag\"").count(), 0);
    }

    #[test]
    fn loading_state_renders_only_the_placeholder() {
        let html = render_page(&PageState::Loading).expect("render");

        assert_eq!(html, LoadingTemplate.render().expect("placeholder"));
        assert!(html.contains("Loading..."));
        assert!(!html.contains("Next Portfolio"));
    }

    #[test]
    fn markup_in_fields_is_escaped() {
        let mut project = entry();
        project.title = "<b>Bold</b>".to_string();
        let html = render_page(&PageState::Loaded(project)).expect("render");

        assert!(!html.contains("<b>"));
        let heading_start = html.find("<h2>").expect("heading") + "<h2>".len();
        let heading_end = html[heading_start..].find("</h2>").expect("heading end") + heading_start;
        let heading = &html[heading_start..heading_end];
        assert!(heading.contains("Bold"));
        assert!(!heading.contains('<'));
    }
}
