use dioxus::prelude::*;

use crate::render::render_markdown;

pub const DISCLAIMER: &str =
    "IMPORTANT DISCLAIMER: This is for educational purposes only, not legal advice.";

/// Service output rendered through the sanitizing markdown pipeline
#[component]
pub fn RichText(markdown: String) -> Element {
    let rendered = render_markdown(&markdown);
    if rendered.stripped {
        dioxus_logger::tracing::debug!("Sanitizer removed markup from service output");
    }
    let html = rendered.html;

    rsx! {
        div {
            class: "result-text",
            dangerous_inner_html: "{html}"
        }
    }
}

#[component]
pub fn ResultCard(title: String, markdown: String) -> Element {
    rsx! {
        div {
            class: "card result-box",
            h3 { "{title}" }
            RichText { markdown }
            em { class: "disclaimer", "{DISCLAIMER}" }
        }
    }
}
