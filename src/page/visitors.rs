//! The fixed visitor table applied to the page shell.

use crate::page::TransformContext;
use crate::rewrite::{
    escape_attribute, escape_text, ContentType, Element, ElementVisitor, SelectorBinding,
    SelectorError, VisitorError,
};

/// One insertion point of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVisitor {
    /// Append one anchor per link.
    Links,
    /// Reveal the profile block.
    Profile,
    /// Point the avatar at the configured image.
    Avatar,
    /// Replace the heading text with the display name.
    Name,
    /// Reveal the social block and append its icon anchors.
    Social,
    /// Set the body class.
    Body,
    /// Replace the document title.
    Title,
}

/// Selector and visitor pairs, in the order they run.
pub const PAGE_TABLE: [(&str, PageVisitor); 7] = [
    ("div#links", PageVisitor::Links),
    ("div#profile", PageVisitor::Profile),
    ("img#avatar", PageVisitor::Avatar),
    ("h1#name", PageVisitor::Name),
    ("div#social", PageVisitor::Social),
    ("body", PageVisitor::Body),
    ("title", PageVisitor::Title),
];

/// Compile [`PAGE_TABLE`].
pub fn page_bindings() -> Result<Vec<SelectorBinding<PageVisitor>>, SelectorError> {
    PAGE_TABLE
        .iter()
        .map(|&(selector, visitor)| SelectorBinding::new(selector, visitor))
        .collect()
}

fn anchor(url: &str, inner_html: &str) -> String {
    format!("<a href='{}'>{}</a>", escape_attribute(url), inner_html)
}

impl ElementVisitor for PageVisitor {
    type Context = TransformContext;

    fn on_element_open(
        &self,
        element: &mut Element<'_, '_, '_>,
        context: &TransformContext,
    ) -> Result<(), VisitorError> {
        match self {
            PageVisitor::Links => {
                for link in &context.links {
                    element.append(&anchor(&link.url, &escape_text(&link.name)), ContentType::Html)?;
                }
            }
            PageVisitor::Profile => element.remove_attribute("style"),
            PageVisitor::Avatar => element.set_attribute("src", &context.avatar_url)?,
            PageVisitor::Name => {
                element.set_inner_content(&context.display_name, ContentType::Text)?
            }
            PageVisitor::Social => {
                element.remove_attribute("style");
                for social in &context.social {
                    element.append(&anchor(&social.url, &social.icon_svg), ContentType::Html)?;
                }
            }
            PageVisitor::Body => element.set_attribute("class", &context.body_class)?,
            PageVisitor::Title => element.set_inner_content(&context.page_title, ContentType::Text)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProfileConfig, SocialLink};
    use crate::links::{Link, LinkCollection};
    use crate::rewrite::TransformPipeline;

    fn profile() -> ProfileConfig {
        ProfileConfig {
            display_name: "Sam <Dev>".into(),
            page_title: "Sam's Links".into(),
            avatar_url: "https://img.test/a.png".into(),
            body_class: "bg-indigo-800".into(),
            social: vec![SocialLink {
                service: "github".into(),
                url: "https://github.com/sam".into(),
                icon_svg: "<svg></svg>".into(),
            }],
        }
    }

    fn render(html: &str, links: Vec<Link>) -> String {
        let context = TransformContext::new(LinkCollection::new(links).unwrap(), &profile());
        let pipeline = TransformPipeline::new(page_bindings().unwrap(), context);
        String::from_utf8(pipeline.transform_bytes(html.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_links_appended_in_order() {
        let out = render(
            r#"<div id="links"></div>"#,
            vec![Link::new("A", "https://a"), Link::new("B", "https://b")],
        );
        assert_eq!(
            out,
            r#"<div id="links"><a href='https://a'>A</a><a href='https://b'>B</a></div>"#
        );
    }

    #[test]
    fn test_empty_links_leave_container_empty() {
        assert_eq!(render(r#"<div id="links"></div>"#, vec![]), r#"<div id="links"></div>"#);
    }

    #[test]
    fn test_link_values_are_escaped() {
        let out = render(
            r#"<div id="links"></div>"#,
            vec![Link::new("Q&A <live>", "https://x/?a='1'")],
        );
        assert_eq!(
            out,
            r#"<div id="links"><a href='https://x/?a=&#39;1&#39;'>Q&amp;A &lt;live&gt;</a></div>"#
        );
    }

    #[test]
    fn test_full_page() {
        let shell = concat!(
            "<!DOCTYPE html><html><head><title>Static Links</title></head>",
            "<body class=\"bg-gray-900\">",
            "<div id=\"profile\" style=\"display: none\"><img id=\"avatar\" src=\"x.png\">",
            "<h1 id=\"name\">Your name</h1></div>",
            "<div id=\"links\"></div>",
            "<div id=\"social\" style=\"display: none\"></div>",
            "</body></html>"
        );
        let out = render(shell, vec![Link::new("Blog", "https://blog")]);
        assert_eq!(
            out,
            concat!(
                "<!DOCTYPE html><html><head><title>Sam's Links</title></head>",
                "<body class=\"bg-indigo-800\">",
                "<div id=\"profile\"><img id=\"avatar\" src=\"https://img.test/a.png\">",
                "<h1 id=\"name\">Sam &lt;Dev&gt;</h1></div>",
                "<div id=\"links\"><a href='https://blog'>Blog</a></div>",
                "<div id=\"social\"><a href='https://github.com/sam'><svg></svg></a></div>",
                "</body></html>"
            )
        );
    }

    #[test]
    fn test_self_closed_links_container() {
        let links = || vec![Link::new("A", "https://a")];
        assert_eq!(
            render(r#"<div id="links"/></div>"#, links()),
            r#"<div id="links"/><a href='https://a'>A</a></div>"#
        );
        assert_eq!(
            render(r#"<div id="links"><div class="x"/>hi</div></div>"#, links()),
            r#"<div id="links"><div class="x"/>hi</div><a href='https://a'>A</a></div>"#
        );
    }

    #[test]
    fn test_other_elements_untouched() {
        let html = "<div id=\"links-old\" style=\"a\"><h1>t</h1><span id=links></span></div>";
        assert_eq!(render(html, vec![Link::new("A", "https://a")]), html);
    }
}
