//! Markdown Rendering Module
//!
//! Turns untrusted service output (simplified documents, follow-up answers)
//! into HTML that is safe to inject with `dangerous_inner_html`.
//! Uses pulldown-cmark for parsing CommonMark-compliant markdown.
//!
//! ## Raw HTML policy
//! The service mixes Markdown with a little inline HTML, mainly
//! `<span style='color:red'>` around risky terms. Raw HTML never passes
//! through verbatim:
//! - `<span>` is rebuilt without attributes; red-tagged spans (a `red`
//!   class or a `color: red` style) become risk highlights
//! - `<br>` is kept
//! - `<script>`, `<style>` and friends are removed with their content
//! - every other tag is dropped, its text kept and escaped
//!
//! Links keep only http(s), mailto, fragment and relative destinations.
//! Images are reduced to their alt text.

use std::sync::OnceLock;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Markup emitted for a red-tagged span
pub const RISK_SPAN_OPEN: &str =
    r#"<span class="risk" style="color: var(--warning-text, #ef4444); font-weight: 600;">"#;

/// Elements whose content is dropped along with the tags
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "noscript", "template", "textarea", "title", "select",
];

/// Rendered output plus what the sanitizer had to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkdown {
    pub html: String,
    /// Number of risk highlights kept
    pub highlights: usize,
    /// Whether any markup or link had to be removed
    pub stripped: bool,
}

/// Render untrusted markdown to sanitized HTML
pub fn render_markdown(input: &str) -> RenderedMarkdown {
    let parser = Parser::new_ext(input, build_options());
    let mut sanitizer = Sanitizer::default();

    let events = parser.filter_map(|event| sanitizer.filter(event));
    let mut html_output = String::with_capacity(input.len() * 2);
    html::push_html(&mut html_output, events);

    for _ in 0..sanitizer.open_spans {
        html_output.push_str("</span>");
    }

    RenderedMarkdown {
        html: html_output,
        highlights: sanitizer.highlights,
        stripped: sanitizer.stripped,
    }
}

/// Render markdown to HTML string (simple interface)
pub fn render_to_html(input: &str) -> String {
    render_markdown(input).html
}

fn build_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

#[derive(Debug, Default)]
struct Sanitizer {
    open_spans: usize,
    highlights: usize,
    stripped: bool,
    /// Inside a dropped element such as `<script>`
    skipping: Option<String>,
}

impl Sanitizer {
    fn filter<'a>(&mut self, event: Event<'a>) -> Option<Event<'a>> {
        match event {
            Event::Html(raw) => {
                let clean = self.fragment(&raw);
                (!clean.is_empty()).then(|| Event::Html(clean.into()))
            }
            Event::InlineHtml(raw) => {
                let clean = self.fragment(&raw);
                (!clean.is_empty()).then(|| Event::InlineHtml(clean.into()))
            }
            Event::Text(_) | Event::Code(_) if self.skipping.is_some() => None,
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Some(Event::Start(Tag::Link {
                link_type,
                dest_url: self.link_destination(dest_url),
                title,
                id,
            })),
            // Alt text events in between render as plain text
            Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image) => None,
            other => Some(other),
        }
    }

    fn link_destination<'a>(&mut self, dest_url: CowStr<'a>) -> CowStr<'a> {
        if is_safe_url(&dest_url) {
            dest_url
        } else {
            self.stripped = true;
            CowStr::Borrowed("#")
        }
    }

    /// Sanitize one raw HTML chunk
    fn fragment(&mut self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut cursor = 0;

        for caps in tag_regex().captures_iter(raw) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if self.skipping.is_none() {
                push_escaped(&mut out, &raw[cursor..whole.start()]);
            }
            cursor = whole.end();

            // Comments and doctypes
            let Some(name) = caps.get(2) else {
                self.stripped = true;
                continue;
            };
            let name = name.as_str().to_ascii_lowercase();
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let attrs = caps.get(3).map_or("", |m| m.as_str());

            if let Some(skipped) = &self.skipping {
                if closing && *skipped == name {
                    self.skipping = None;
                }
                continue;
            }

            match (name.as_str(), closing) {
                ("span", false) => {
                    if attrs.trim_end().ends_with('/') {
                        continue;
                    }
                    self.open_spans += 1;
                    if is_red_tagged(attrs) {
                        self.highlights += 1;
                        out.push_str(RISK_SPAN_OPEN);
                    } else {
                        if !attrs.trim().is_empty() {
                            self.stripped = true;
                        }
                        out.push_str("<span>");
                    }
                }
                ("span", true) => {
                    if self.open_spans > 0 {
                        self.open_spans -= 1;
                        out.push_str("</span>");
                    }
                }
                ("br", false) => out.push_str("<br>"),
                (tag, false) if SKIPPED_ELEMENTS.contains(&tag) => {
                    self.stripped = true;
                    if !attrs.trim_end().ends_with('/') {
                        self.skipping = Some(name.clone());
                    }
                }
                _ => self.stripped = true,
            }
        }

        if self.skipping.is_none() {
            push_escaped(&mut out, &raw[cursor..]);
        }
        out
    }
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"(?s)<!--.*?-->|<![^>]*>|<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("tag pattern is valid")
    })
}

fn red_class_regex() -> &'static Regex {
    static RED_CLASS: OnceLock<Regex> = OnceLock::new();
    RED_CLASS.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"[^"]*\bred\b[^"]*"|'[^']*\bred\b[^']*'|red\b)"#)
            .expect("class pattern is valid")
    })
}

fn red_style_regex() -> &'static Regex {
    static RED_STYLE: OnceLock<Regex> = OnceLock::new();
    RED_STYLE.get_or_init(|| {
        Regex::new(r#"(?i)\bstyle\s*=\s*(?:"(?:[^"]*[;\s])?color\s*:\s*red\b[^"]*"|'(?:[^']*[;\s])?color\s*:\s*red\b[^']*')"#)
            .expect("style pattern is valid")
    })
}

fn is_red_tagged(attrs: &str) -> bool {
    red_class_regex().is_match(attrs) || red_style_regex().is_match(attrs)
}

/// http(s), mailto, fragments and scheme-less relative paths
fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = normalized.find(':');
    let path_start = normalized.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (None, _) => true,
        (Some(colon), Some(slash)) if slash < colon => true,
        _ => {
            normalized.starts_with("http:")
                || normalized.starts_with("https:")
                || normalized.starts_with("mailto:")
        }
    }
}

/// Escape text, keeping well-formed character references intact
fn push_escaped(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.as_bytes()[0] {
            b'&' => {
                let entity_len = entity_length(tail);
                if entity_len > 0 {
                    out.push_str(&tail[..entity_len]);
                    rest = &tail[entity_len..];
                    continue;
                }
                out.push_str("&amp;");
            }
            b'<' => out.push_str("&lt;"),
            b'>' => out.push_str("&gt;"),
            b'"' => out.push_str("&quot;"),
            _ => out.push_str("&#x27;"),
        }
        rest = &tail[1..];
    }
    out.push_str(rest);
}

/// Length of a character reference at the start of `text`, or 0
fn entity_length(text: &str) -> usize {
    let Some(end) = text.find(';') else {
        return 0;
    };
    if end > 32 {
        return 0;
    }
    let body = &text[1..end];
    let valid = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(dec) = body.strip_prefix('#') {
        !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit())
    } else {
        !body.is_empty() && body.chars().all(|c| c.is_ascii_alphanumeric())
    };
    if valid {
        end + 1
    } else {
        0
    }
}
