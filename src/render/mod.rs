//! Render Module
//!
//! Turns a grid layout of media into the feed page markup.

use crate::grid::{GridCell, GridLayout};
use crate::upstream::Media;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/css/feed.css">
</head>
<body>
<div class="container">
<h1>{title}</h1>
{body}</div>
<script src="/js/feed.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

fn render_cell(out: &mut String, cell: &GridCell<Media>, column_width: usize) {
    match cell {
        GridCell::Occupied { item, href } => {
            out.push_str(&format!(
                "<div class=\"col-md-{column_width} feed-item\">\n<a href=\"{}\">\n",
                escape_html(href)
            ));
            if let Some(image) = item.display_image() {
                out.push_str(&format!(
                    "<img class=\"img-responsive\" src=\"{}\" width=\"{}\" height=\"{}\" alt=\"{}\">\n",
                    escape_html(&image.url),
                    image.width,
                    image.height,
                    escape_html(item.caption_text()),
                ));
            }
            out.push_str("</a>\n");
            if !item.caption_text().is_empty() {
                out.push_str(&format!(
                    "<p class=\"caption\">{}</p>\n",
                    escape_html(item.caption_text())
                ));
            }
            out.push_str(&format!(
                "<span class=\"likes\">{} likes</span>\n</div>\n",
                item.like_count()
            ));
        }
        GridCell::Empty => {
            out.push_str(&format!(
                "<div class=\"col-md-{column_width} feed-item empty\"></div>\n"
            ));
        }
    }
}

/// Renders the full feed page for `layout`.
pub fn render_page(title: &str, layout: &GridLayout<Media>) -> String {
    let mut body = String::new();
    if layout.rows.is_empty() {
        body.push_str("<p class=\"empty-feed\">No photos yet.</p>\n");
    }
    for row in &layout.rows {
        body.push_str("<div class=\"row\">\n");
        for cell in &row.cells {
            render_cell(&mut body, cell, layout.column_width);
        }
        body.push_str("</div>\n");
    }
    page(title, &body)
}

/// Degraded page shown when the feed cannot be loaded.
pub fn render_error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<div class=\"alert alert-warning\">The feed is unavailable right now: {}</div>\n",
        escape_html(message)
    );
    page(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayoutBuilder;
    use crate::upstream::{Comment, Image, Images};

    fn media(i: usize, caption: &str) -> Media {
        Media {
            id: i.to_string(),
            link: format!("https://example.com/p/{i}/"),
            caption: Some(Comment {
                text: caption.to_string(),
                ..Comment::default()
            }),
            images: Some(Images {
                low_resolution: Some(Image {
                    url: format!("https://cdn.example.com/{i}.jpg"),
                    width: 306,
                    height: 306,
                }),
                ..Images::default()
            }),
            ..Media::default()
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_page_rows_and_padding() {
        let items = (0..5).map(|i| media(i, "peony")).collect();
        let layout = GridLayoutBuilder::new(4).unwrap().layout(items);

        let html = render_page("Feed", &layout);

        assert_eq!(html.matches(r#"<div class="row">"#).count(), 2);
        assert_eq!(html.matches("col-md-3 feed-item\"").count(), 5);
        assert_eq!(html.matches("feed-item empty").count(), 3);
        assert!(html.contains("https://cdn.example.com/4.jpg"));
        assert!(html.contains(r#"href="https://example.com/p/0/""#));
    }

    #[test]
    fn test_render_cell_markup() {
        let mut out = String::new();
        let item = media(7, "tulips");
        let href = item.link.clone();
        render_cell(&mut out, &GridCell::Occupied { item, href }, 4);
        render_cell(&mut out, &GridCell::Empty, 4);

        assert_eq!(
            out,
            "<div class=\"col-md-4 feed-item\">\n\
             <a href=\"https://example.com/p/7/\">\n\
             <img class=\"img-responsive\" src=\"https://cdn.example.com/7.jpg\" width=\"306\" height=\"306\" alt=\"tulips\">\n\
             </a>\n\
             <p class=\"caption\">tulips</p>\n\
             <span class=\"likes\">0 likes</span>\n\
             </div>\n\
             <div class=\"col-md-4 feed-item empty\"></div>\n"
        );
    }

    #[test]
    fn test_render_page_escapes_captions() {
        let layout = GridLayoutBuilder::new(1)
            .unwrap()
            .layout(vec![media(0, "<script>alert(1)</script>")]);

        let html = render_page("Feed", &layout);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_render_empty_feed() {
        let layout = GridLayoutBuilder::new(3).unwrap().layout(Vec::<Media>::new());
        let html = render_page("Feed", &layout);

        assert!(html.contains("No photos yet."));
        assert!(!html.contains(r#"<div class="row">"#));
    }

    #[test]
    fn test_render_error_page() {
        let html = render_error_page("Feed", "rate <limited>");
        assert!(html.contains("rate &lt;limited&gt;"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
