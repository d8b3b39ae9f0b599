use dioxus::prelude::*;

#[component]
pub fn FollowUpForm(
    query: String,
    asking: bool,
    on_query: Callback<String>,
    on_ask: Callback<()>,
) -> Element {
    rsx! {
        div {
            class: "query-section",
            input {
                class: "input-box",
                r#type: "text",
                placeholder: "Ask a follow-up question...",
                value: "{query}",
                oninput: move |e| on_query.call(e.value()),
                onkeydown: move |e| {
                    if e.key() == Key::Enter && !asking {
                        on_ask.call(());
                    }
                }
            }
            button {
                class: "btn",
                r#type: "button",
                disabled: asking,
                onclick: move |_| on_ask.call(()),
                if asking { "Asking..." } else { "Ask" }
            }
        }
    }
}
