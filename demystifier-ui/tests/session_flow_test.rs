//! Session Flow Tests
//!
//! Drives the submit and follow-up drivers against a recording client so
//! every request the UI would send is visible to the assertions.
//!
//! Run with: cargo test -p demystifier-ui --test session_flow_test

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use demystifier_types::{
    ErrorDetail, FollowUpContract, FollowUpRequest, FollowUpResponse, SimplifyResponse,
    SimplifyTextRequest,
};
use demystifier_ui::{
    ask_follow_up, submit_document, ClientError, FollowUpPhase, SelectedFile, Session,
    SimplifyApi, SubmitPhase, ValidationError,
};
use futures::executor::block_on;
use futures::FutureExt;

// ====================================================================================
// Recording Client
// ====================================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SimplifyText(SimplifyTextRequest),
    SimplifyFile {
        user_role_goal: String,
        file_name: String,
        size: usize,
    },
    FollowUp(FollowUpRequest),
}

#[derive(Default)]
struct RecordingApi {
    calls: RefCell<Vec<Call>>,
    simplify: RefCell<VecDeque<Result<SimplifyResponse, ClientError>>>,
    answers: RefCell<VecDeque<Result<FollowUpResponse, ClientError>>>,
}

impl RecordingApi {
    fn new() -> Self {
        Self::default()
    }

    fn will_simplify(self, outcome: Result<SimplifyResponse, ClientError>) -> Self {
        self.simplify.borrow_mut().push_back(outcome);
        self
    }

    fn will_answer(self, outcome: Result<FollowUpResponse, ClientError>) -> Self {
        self.answers.borrow_mut().push_back(outcome);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next_simplify(&self) -> Result<SimplifyResponse, ClientError> {
        self.simplify
            .borrow_mut()
            .pop_front()
            .expect("unexpected simplify call")
    }
}

#[async_trait(?Send)]
impl SimplifyApi for RecordingApi {
    async fn simplify_text(
        &self,
        request: &SimplifyTextRequest,
    ) -> Result<SimplifyResponse, ClientError> {
        self.calls
            .borrow_mut()
            .push(Call::SimplifyText(request.clone()));
        self.next_simplify()
    }

    async fn simplify_file(
        &self,
        user_role_goal: &str,
        file: &SelectedFile,
    ) -> Result<SimplifyResponse, ClientError> {
        self.calls.borrow_mut().push(Call::SimplifyFile {
            user_role_goal: user_role_goal.to_string(),
            file_name: file.name.clone(),
            size: file.size(),
        });
        self.next_simplify()
    }

    async fn follow_up(&self, request: &FollowUpRequest) -> Result<FollowUpResponse, ClientError> {
        self.calls.borrow_mut().push(Call::FollowUp(request.clone()));
        self.answers
            .borrow_mut()
            .pop_front()
            .expect("unexpected follow-up call")
    }
}

/// Never answers, like a request still on the wire
struct StalledApi;

#[async_trait(?Send)]
impl SimplifyApi for StalledApi {
    async fn simplify_text(&self, _: &SimplifyTextRequest) -> Result<SimplifyResponse, ClientError> {
        futures::future::pending().await
    }

    async fn simplify_file(
        &self,
        _: &str,
        _: &SelectedFile,
    ) -> Result<SimplifyResponse, ClientError> {
        futures::future::pending().await
    }

    async fn follow_up(&self, _: &FollowUpRequest) -> Result<FollowUpResponse, ClientError> {
        futures::future::pending().await
    }
}

// ====================================================================================
// Helpers
// ====================================================================================

const LEASE: &str = "The Lessee shall remit rent on the first day of each month.";

fn simplified(text: &str, doc_id: Option<&str>) -> SimplifyResponse {
    SimplifyResponse {
        simplified_document: Some(text.to_string()),
        detail: None,
        doc_id: doc_id.map(ToString::to_string),
    }
}

fn answer(text: &str) -> FollowUpResponse {
    FollowUpResponse {
        answer: Some(text.to_string()),
        detail: None,
    }
}

fn lease_file() -> SelectedFile {
    SelectedFile {
        name: "lease.pdf".to_string(),
        mime: "application/pdf".to_string(),
        bytes: vec![0x25, 0x50, 0x44, 0x46],
    }
}

fn tenant_session() -> Session {
    let mut session = Session::new();
    session.set_document_text(LEASE.to_string());
    session.set_user_role_goal("Tenant".to_string());
    session
}

fn submitted(api: &RecordingApi) -> Session {
    let mut session = tenant_session();
    block_on(submit_document(api, &mut session));
    session
}

fn ask(api: &RecordingApi, session: &mut Session, query: &str) {
    session.set_follow_up_query(query.to_string());
    block_on(ask_follow_up(api, FollowUpContract::DocId, session));
}

// ====================================================================================
// Submit Tests
// ====================================================================================

#[test]
fn test_text_submit_uses_json_endpoint_only() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("Pay rent monthly.", None)));
    let session = submitted(&api);

    assert_eq!(
        api.calls(),
        vec![Call::SimplifyText(SimplifyTextRequest {
            document_text: LEASE.to_string(),
            user_role_goal: "Tenant".to_string(),
        })]
    );
    assert_eq!(session.result_text(), Some("Pay rent monthly."));
    assert!(!session.is_loading());
}

#[test]
fn test_file_submit_uses_multipart_endpoint_only() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("Summary", Some("7"))));
    let mut session = tenant_session();
    session.select_file(lease_file()).unwrap();

    block_on(submit_document(&api, &mut session));

    assert_eq!(
        api.calls(),
        vec![Call::SimplifyFile {
            user_role_goal: "Tenant".to_string(),
            file_name: "lease.pdf".to_string(),
            size: 4,
        }]
    );
    assert!(
        !api
            .calls()
            .iter()
            .any(|call| matches!(call, Call::SimplifyText(_))),
        "Pasted text must not be sent alongside a file"
    );
    assert_eq!(session.document_id(), Some("7"));
}

#[test]
fn test_empty_role_goal_never_reaches_network() {
    let api = RecordingApi::new();
    let mut session = tenant_session();
    session.set_user_role_goal("   ".to_string());

    block_on(submit_document(&api, &mut session));

    assert!(api.calls().is_empty());
    assert_eq!(session.submit_phase(), &SubmitPhase::Idle);
    assert_eq!(
        session.notice(),
        Some(&ClientError::Validation(ValidationError::MissingRoleGoal))
    );
}

#[test]
fn test_missing_document_never_reaches_network() {
    let api = RecordingApi::new();
    let mut session = Session::new();
    session.set_user_role_goal("Freelancer".to_string());

    block_on(submit_document(&api, &mut session));

    assert!(api.calls().is_empty());
    assert_eq!(
        session.notice(),
        Some(&ClientError::Validation(ValidationError::MissingDocument))
    );
}

#[test]
fn test_success_sets_result_and_document_id() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("X", Some("42"))));
    let session = submitted(&api);

    assert_eq!(session.result_text(), Some("X"));
    assert_eq!(session.document_id(), Some("42"));
    assert!(session.notice().is_none());
}

#[test]
fn test_detail_is_shown_when_document_missing() {
    let api = RecordingApi::new().will_simplify(Ok(SimplifyResponse {
        simplified_document: None,
        detail: Some(ErrorDetail::Message("error message".to_string())),
        doc_id: None,
    }));
    let session = submitted(&api);

    assert_eq!(session.result_text(), Some("error message"));
    assert_eq!(session.document_id(), None);
}

#[test]
fn test_empty_response_shows_placeholder() {
    let api = RecordingApi::new().will_simplify(Ok(SimplifyResponse::default()));
    let session = submitted(&api);

    assert_eq!(session.result_text(), Some("No result"));
}

#[test]
fn test_network_failure_is_reported_and_loading_cleared() {
    let failure = ClientError::Network("connection refused".to_string());
    let api = RecordingApi::new().will_simplify(Err(failure.clone()));
    let session = submitted(&api);

    assert!(!session.is_loading());
    assert_eq!(
        session.submit_phase(),
        &SubmitPhase::Failed {
            error: failure.clone()
        }
    );
    assert_eq!(session.notice(), Some(&failure));
    assert_eq!(session.notice().map(ClientError::title), Some("Connection problem"));
}

#[test]
fn test_server_failure_keeps_detail() {
    let failure = ClientError::Server {
        status: 422,
        detail: Some("document_text: field required".to_string()),
    };
    let api = RecordingApi::new().will_simplify(Err(failure));
    let session = submitted(&api);

    let notice = session.notice().expect("server error should be visible");
    assert_eq!(
        notice.to_string(),
        "HTTP error: 422 (document_text: field required)"
    );
    assert_eq!(session.result_text(), None);
}

#[test]
fn test_resubmit_resets_previous_state() {
    let api = RecordingApi::new()
        .will_simplify(Ok(simplified("First pass", Some("1"))))
        .will_answer(Ok(answer("A1")))
        .will_simplify(Ok(simplified("Second pass", Some("2"))));
    let mut session = submitted(&api);
    ask(&api, &mut session, "Can I sublet?");
    assert_eq!(session.answers(), ["A1".to_string()]);

    block_on(submit_document(&api, &mut session));

    assert_eq!(session.result_text(), Some("Second pass"));
    assert_eq!(session.document_id(), Some("2"));
    assert!(session.answers().is_empty());
    assert_eq!(session.submission(), 2);
}

#[test]
fn test_dropped_submit_leaves_loading() {
    let mut session = tenant_session();

    let polled = submit_document(&StalledApi, &mut session).now_or_never();

    assert!(polled.is_none(), "request should still be pending");
    assert!(!session.is_loading());
    assert_eq!(session.submit_phase(), &SubmitPhase::Idle);
}

// ====================================================================================
// Follow-up Tests
// ====================================================================================

#[test]
fn test_follow_up_sends_query_and_doc_id() {
    let api = RecordingApi::new()
        .will_simplify(Ok(simplified("X", Some("42"))))
        .will_answer(Ok(answer("Only with written consent.")));
    let mut session = submitted(&api);

    ask(&api, &mut session, "  Can I sublet?  ");

    assert_eq!(
        api.calls().last(),
        Some(&Call::FollowUp(FollowUpRequest::DocId {
            query: "Can I sublet?".to_string(),
            doc_id: "42".to_string(),
        }))
    );
    assert_eq!(session.answers(), ["Only with written consent.".to_string()]);
    assert!(session.follow_up_query.is_empty());
    assert_eq!(session.follow_up_phase(), FollowUpPhase::Idle);
}

#[test]
fn test_context_contract_sends_pasted_text() {
    let api = RecordingApi::new()
        .will_simplify(Ok(simplified("X", None)))
        .will_answer(Ok(answer("Yes.")));
    let mut session = submitted(&api);
    session.set_follow_up_query("Is rent due monthly?".to_string());

    block_on(ask_follow_up(&api, FollowUpContract::Context, &mut session));

    assert_eq!(
        api.calls().last(),
        Some(&Call::FollowUp(FollowUpRequest::Context {
            query: "Is rent due monthly?".to_string(),
            context: LEASE.to_string(),
        }))
    );
    assert_eq!(session.answers(), ["Yes.".to_string()]);
}

#[test]
fn test_blank_query_never_reaches_network() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("X", Some("42"))));
    let mut session = submitted(&api);

    for query in ["", "   ", "\n\t"] {
        ask(&api, &mut session, query);
    }

    assert_eq!(api.calls().len(), 1, "only the simplify call was made");
    assert!(session.answers().is_empty());
    assert_eq!(
        session.notice(),
        Some(&ClientError::Validation(ValidationError::EmptyQuery))
    );
}

#[test]
fn test_follow_up_without_document_id_never_reaches_network() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("X", None)));
    let mut session = submitted(&api);

    ask(&api, &mut session, "Can I sublet?");

    assert_eq!(api.calls().len(), 1);
    assert_eq!(session.follow_up_query, "Can I sublet?");
    assert_eq!(
        session.notice(),
        Some(&ClientError::Validation(ValidationError::NoDocumentScope))
    );
}

#[test]
fn test_follow_up_before_any_submit_never_reaches_network() {
    let api = RecordingApi::new();
    let mut session = Session::new();

    ask(&api, &mut session, "What does clause 4 mean?");

    assert!(api.calls().is_empty());
}

#[test]
fn test_answers_accumulate_in_order() {
    let api = RecordingApi::new()
        .will_simplify(Ok(simplified("X", Some("42"))))
        .will_answer(Ok(answer("A1")))
        .will_answer(Ok(answer("A2")));
    let mut session = submitted(&api);

    ask(&api, &mut session, "First?");
    assert_eq!(session.answers(), ["A1".to_string()]);
    ask(&api, &mut session, "Second?");

    assert_eq!(session.answers(), ["A1".to_string(), "A2".to_string()]);
}

#[test]
fn test_failed_follow_up_keeps_query_and_answers() {
    let api = RecordingApi::new()
        .will_simplify(Ok(simplified("X", Some("42"))))
        .will_answer(Ok(answer("A1")))
        .will_answer(Err(ClientError::Server {
            status: 500,
            detail: None,
        }));
    let mut session = submitted(&api);
    ask(&api, &mut session, "First?");

    ask(&api, &mut session, "Second?");

    assert_eq!(session.answers(), ["A1".to_string()]);
    assert_eq!(session.follow_up_query, "Second?");
    assert_eq!(session.notice().map(ToString::to_string).as_deref(), Some("HTTP error: 500"));
    assert!(!session.is_asking());
    assert_eq!(session.result_text(), Some("X"));
}

#[test]
fn test_dropped_follow_up_leaves_asking() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("X", Some("42"))));
    let mut session = submitted(&api);
    session.set_follow_up_query("Can I sublet?".to_string());

    let polled = ask_follow_up(&StalledApi, FollowUpContract::DocId, &mut session).now_or_never();

    assert!(polled.is_none());
    assert!(!session.is_asking());
    assert_eq!(session.follow_up_query, "Can I sublet?");
}

#[test]
fn test_answer_for_superseded_document_is_discarded() {
    let api = RecordingApi::new().will_simplify(Ok(simplified("X", Some("42"))));
    let mut session = submitted(&api);
    session.set_follow_up_query("Can I sublet?".to_string());
    let ticket = session.begin_follow_up(FollowUpContract::DocId).unwrap();

    session.begin_submit().unwrap();
    let applied = session.finish_follow_up(ticket.submission, Ok(answer("stale")));

    assert!(!applied);
    assert!(session.answers().is_empty());
}
