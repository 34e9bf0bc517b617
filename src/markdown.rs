//! Product Text Rendering
//!
//! Markdown for product descriptions and size information, rendered
//! through pulldown-cmark:
//! - Raw HTML in the source is shown as text, never injected
//! - Single newlines become line breaks
//! - Links and images with script URLs are neutralised

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES
}

/// Render product text to HTML
pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

/// Render for inline use (strips the outer <p> tags)
pub fn parse_markdown_inline(text: &str) -> String {
    let html = parse_markdown(text);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut skip_depth: Option<usize> = None;

    for event in parser {
        // Alt text of an image already rendered as <img>
        if let Some(depth) = skip_depth {
            skip_depth = match event {
                Event::Start(_) => Some(depth + 1),
                Event::End(_) if depth == 0 => None,
                Event::End(_) => Some(depth - 1),
                _ => Some(depth),
            };
            continue;
        }

        match event {
            Event::Html(html) | Event::InlineHtml(html) => events.push(Event::Text(html)),
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                events.push(Event::Start(Tag::Link { link_type, dest_url: safe_url(dest_url), title, id }));
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                let html = format!(
                    r#"<img src="{}" style="max-width: 100%; max-height: 400px; display: block; border-radius: 4px;" />"#,
                    escape_html(&safe_url(dest_url))
                );
                events.push(Event::Html(CowStr::from(html)));
                skip_depth = Some(0);
            }
            other => events.push(other),
        }
    }

    events
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lower = url.trim().to_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:text") {
        CowStr::from("#")
    } else {
        url
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_breaks_from_size_info() {
        let html = parse_markdown_inline("S: 250ml  \nL: 400ml");
        assert_eq!(html, "S: 250ml<br />\nL: 400ml");
    }

    #[test]
    fn test_soft_breaks_become_line_breaks() {
        let html = parse_markdown_inline("first\nsecond");
        assert_eq!(html, "first<br />\nsecond");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = parse_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let inline = parse_markdown_inline("a <b>bold</b> move");
        assert!(inline.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_script_links_are_neutralised() {
        let html = parse_markdown_inline("[click](javascript:alert(1))");
        assert_eq!(html, r##"<a href="#">click</a>"##);
    }

    #[test]
    fn test_image_rendered_without_alt_text() {
        let html = parse_markdown_inline("![a *photo*](https://cdn.test/x.png)");
        assert!(html.starts_with(r#"<img src="https://cdn.test/x.png""#));
        assert!(!html.contains("photo"));
    }

    #[test]
    fn test_formatting_kept() {
        assert_eq!(parse_markdown_inline("**bold** ~~old~~"), "<strong>bold</strong> <del>old</del>");
    }
}
