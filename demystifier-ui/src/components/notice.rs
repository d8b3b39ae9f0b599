use dioxus::prelude::*;

#[component]
pub fn NoticeBanner(title: String, message: String, on_dismiss: Callback<()>) -> Element {
    rsx! {
        div {
            class: "notice",
            "role": "alert",
            div {
                div { class: "notice-title", "{title}" }
                div { style: "font-size: 0.875rem;", "{message}" }
            }
            button {
                class: "btn-link",
                r#type: "button",
                title: "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "✕"
            }
        }
    }
}
