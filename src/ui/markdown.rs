// Minimal markdown → ratatui conversion for status messages.
//
// Handles what launcher messages use: `# ` headings, `**bold**` and
// `[text](url)` links. Anything else is shown verbatim.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::style::link_style;

/// An inline fragment of a markdown line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Link { text: String, url: String },
}

/// Split one line into inline fragments.
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**")
            && let Some(end) = after.find("**")
            && end > 0
        {
            flush(&mut text, &mut out);
            out.push(Inline::Bold(after[..end].to_string()));
            rest = &after[end + 2..];
            continue;
        }

        if let Some(after) = rest.strip_prefix('[')
            && let Some(close) = after.find("](")
            && let Some(end) = after[close + 2..].find(')')
        {
            flush(&mut text, &mut out);
            let label = &after[..close];
            let url = &after[close + 2..close + 2 + end];
            out.push(Inline::Link {
                text: label.to_string(),
                url: url.to_string(),
            });
            rest = &after[close + 2 + end + 1..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            text.push(c);
        }
        rest = chars.as_str();
    }

    flush(&mut text, &mut out);
    out
}

fn flush(text: &mut String, out: &mut Vec<Inline>) {
    if !text.is_empty() {
        out.push(Inline::Text(std::mem::take(text)));
    }
}

/// Render markdown into styled lines.
pub fn to_lines(markdown: &str) -> Vec<Line<'static>> {
    markdown
        .lines()
        .map(|raw| {
            let (body, heading) = match raw.trim_start_matches('#') {
                stripped if stripped.len() < raw.len() && stripped.starts_with(' ') => {
                    (stripped.trim_start(), true)
                }
                _ => (raw, false),
            };
            let base = if heading {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let spans: Vec<Span<'static>> = parse_inline(body)
                .into_iter()
                .map(|inline| match inline {
                    Inline::Text(t) => Span::styled(t, base),
                    Inline::Bold(t) => Span::styled(t, base.add_modifier(Modifier::BOLD)),
                    Inline::Link { text, url } if text == url => Span::styled(url, link_style()),
                    Inline::Link { text, url } => {
                        Span::styled(format!("{text} <{url}>"), link_style())
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
