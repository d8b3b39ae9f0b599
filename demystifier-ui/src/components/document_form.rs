use demystifier_types::accept_attribute;
use dioxus::prelude::*;

use crate::interop::FILE_INPUT_ID;

#[component]
pub fn DocumentForm(
    document_text: String,
    user_role_goal: String,
    #[props(!optional)]
    file_name: Option<String>,
    #[props(!optional)]
    file_size: Option<String>,
    loading: bool,
    reading_file: bool,
    on_text: Callback<String>,
    on_role_goal: Callback<String>,
    on_file_changed: Callback<()>,
    on_clear_file: Callback<()>,
    on_submit: Callback<()>,
) -> Element {
    let text_disabled = file_name.is_some() || reading_file;

    rsx! {
        form {
            class: "input-section",
            onsubmit: move |e| {
                e.prevent_default();
                on_submit.call(());
            },

            div {
                class: "card",
                label { "Document Input" }
                textarea {
                    class: "input-box",
                    rows: "4",
                    disabled: text_disabled,
                    placeholder: "Paste your legal document...",
                    value: "{document_text}",
                    oninput: move |e| on_text.call(e.value()),
                }
                label { "Your Role/Goal" }
                input {
                    class: "input-box",
                    r#type: "text",
                    placeholder: "Tenant, Freelancer...",
                    value: "{user_role_goal}",
                    oninput: move |e| on_role_goal.call(e.value()),
                }
            }

            div {
                class: "card",
                h4 { "Upload File / Image" }
                input {
                    id: FILE_INPUT_ID,
                    class: "file-input",
                    r#type: "file",
                    accept: accept_attribute(),
                    onchange: move |_| on_file_changed.call(()),
                }
                if let Some(name) = file_name.as_ref() {
                    div {
                        class: "file-meta",
                        span {
                            "{name}"
                            if let Some(size) = file_size.as_ref() {
                                " ({size})"
                            }
                        }
                        button {
                            class: "btn-link",
                            r#type: "button",
                            title: "Remove file and use pasted text",
                            onclick: move |_| on_clear_file.call(()),
                            "Clear"
                        }
                    }
                }
                button {
                    class: "btn",
                    r#type: "submit",
                    disabled: loading || reading_file,
                    if loading {
                        "Processing..."
                    } else if reading_file {
                        "Reading file..."
                    } else {
                        "Submit"
                    }
                }
            }
        }
    }
}
