use std::fmt::Write;

use crate::registry::DemoRegistry;
use crate::ui::markdown::{Inline, parse_inline};

const STYLE: &str = include_str!("../../assets/style.css");

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Render a status message to HTML. Blank lines separate paragraphs.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = String::new();
    for paragraph in markdown.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        html.push_str("<p>");
        for (i, line) in paragraph.lines().enumerate() {
            if i > 0 {
                html.push_str("<br>");
            }
            for inline in parse_inline(line) {
                match inline {
                    Inline::Text(t) => html.push_str(&escape(&t)),
                    Inline::Bold(t) => {
                        let _ = write!(html, "<strong>{}</strong>", escape(&t));
                    }
                    Inline::Link { text, url } if is_web_url(&url) => {
                        let _ = write!(
                            html,
                            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                            escape(&url),
                            escape(&text)
                        );
                    }
                    Inline::Link { text, url } => {
                        let _ = write!(html, "{} ({})", escape(&text), escape(&url));
                    }
                }
            }
        }
        html.push_str("</p>");
    }
    html
}

/// The launcher page: title, status, demo radio list, Launch and Stop All.
pub fn render(
    title: &str,
    registry: &DemoRegistry,
    status: &str,
    selected: Option<&str>,
) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape(title);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<main>\n\
         <h1>{title}</h1>\n"
    );

    let _ = writeln!(
        html,
        "<section class=\"status\" id=\"status\">{}</section>",
        markdown_to_html(status)
    );

    html.push_str("<form method=\"post\">\n<fieldset>\n<legend>Available Demos</legend>\n");
    for demo in registry.iter() {
        let name = escape(&demo.display_name);
        let checked = if selected == Some(demo.display_name.as_str()) {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"demo\" value=\"{name}\"{checked}> {name}\
             <span class=\"url\">{}</span></label>",
            escape(&demo.url)
        );
    }
    html.push_str(
        "</fieldset>\n<div class=\"actions\">\n\
         <button class=\"primary\" type=\"submit\" formaction=\"/launch\">🚀 Launch Demo</button>\n\
         <button type=\"submit\" formaction=\"/stop\">⏹️ Stop All Demos</button>\n\
         </div>\n</form>\n</main>\n</body>\n</html>\n",
    );
    html
}
