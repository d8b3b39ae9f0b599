//! Root component: owns the session signal and wires views to the drivers.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing::{error, info, warn};

use crate::api::HttpSimplifyApi;
use crate::components::{
    DocumentForm, FollowUpForm, NoticeBanner, ResultCard, RichText, APP_STYLES, DISCLAIMER,
};
use crate::controller::{ask_follow_up, submit_document};
use crate::interop::{read_selected_file, reset_file_input, FILE_INPUT_ID};
use crate::session::{FileRead, Session, SubmitPhase};

#[component]
pub fn DemystifierApp() -> Element {
    let mut session = use_signal(Session::new);
    let api = use_hook(|| Rc::new(HttpSimplifyApi::from_build_env()));
    let contract = api.config().follow_up_contract;

    let submit_api = api.clone();
    let on_submit = move |_: ()| {
        let api = submit_api.clone();
        spawn(async move {
            submit_document(api.as_ref(), session).await;
        });
    };

    let ask_api = api.clone();
    let on_ask = move |_: ()| {
        let api = ask_api.clone();
        spawn(async move {
            ask_follow_up(api.as_ref(), contract, session).await;
        });
    };

    let on_file_changed = move |_: ()| {
        let read = session.write().begin_file_read();
        spawn(async move {
            let outcome = read_selected_file(FILE_INPUT_ID).await;
            if let Err(e) = &outcome {
                error!("Failed to read selected file: {}", e);
            }

            let result = session.write().finish_file_read(read, outcome);
            match result {
                FileRead::Selected => {
                    if let Some(file) = session.read().selected_file() {
                        info!("Selected file '{}' ({})", file.name, file.size_label());
                    }
                }
                FileRead::Rejected(e) => {
                    warn!("File rejected: {}", e);
                    reset_file_input(FILE_INPUT_ID);
                }
                FileRead::Stale => info!("Ignored superseded file read {}", read),
                FileRead::Cleared => {}
            }
        });
    };

    let on_clear_file = move |_: ()| {
        session.write().clear_file();
        reset_file_input(FILE_INPUT_ID);
    };

    let state = session.read();
    let document_text = state.document_text.clone();
    let user_role_goal = state.user_role_goal.clone();
    let follow_up_query = state.follow_up_query.clone();
    let file_name = state.selected_file().map(|f| f.name.clone());
    let file_size = state.selected_file().map(|f| f.size_label());
    let loading = state.is_loading();
    let reading_file = state.is_reading_file();
    let asking = state.is_asking();
    let notice = state
        .notice()
        .map(|e| (e.title().to_string(), e.to_string()));
    let result = match state.submit_phase() {
        SubmitPhase::Ready { text, .. } => Some(text.clone()),
        _ => None,
    };
    let answers = state.answers().to_vec();
    drop(state);

    rsx! {
        style { {APP_STYLES} }
        div {
            class: "app-container",
            h2 { class: "title", "Legal Document Demystifier" }

            if let Some((title, message)) = notice {
                NoticeBanner {
                    title,
                    message,
                    on_dismiss: move |_| session.write().dismiss_notice(),
                }
            }

            DocumentForm {
                document_text,
                user_role_goal,
                file_name,
                file_size,
                loading,
                reading_file,
                on_text: move |text| session.write().set_document_text(text),
                on_role_goal: move |role_goal| session.write().set_user_role_goal(role_goal),
                on_file_changed,
                on_clear_file,
                on_submit,
            }

            if let Some(markdown) = result {
                div {
                    class: "card result-box",
                    h3 { "Result:" }
                    RichText { markdown }
                    em { class: "disclaimer", "{DISCLAIMER}" }
                    FollowUpForm {
                        query: follow_up_query,
                        asking,
                        on_query: move |query| session.write().set_follow_up_query(query),
                        on_ask,
                    }
                }
            }

            for (idx, answer) in answers.into_iter().enumerate() {
                ResultCard {
                    key: "{idx}",
                    title: "Follow-up Answer:",
                    markdown: answer,
                }
            }
        }
    }
}
