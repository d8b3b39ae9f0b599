//! Controller drivers: validate, dispatch one request, apply the outcome.
//!
//! Drivers never hold a session borrow across an `.await`. The in-flight
//! phase is owned by a guard so it is always left, even when the future is
//! dropped before the response arrives.

use demystifier_types::FollowUpContract;
use dioxus::prelude::{Signal, WritableExt};
use dioxus_logger::tracing::{error, info, warn};

use crate::api::SimplifyApi;
use crate::session::{Session, SubmitPlan};

/// Somewhere a [`Session`] can be updated from async code
pub trait SessionHandle {
    /// `None` when the session no longer exists (component unmounted)
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> Option<R>;
}

impl SessionHandle for Signal<Session> {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut session = self.try_write().ok()?;
        Some(f(&mut *session))
    }
}

impl SessionHandle for &mut Session {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        Some(f(&mut **self))
    }
}

#[derive(Debug, Clone, Copy)]
enum Flight {
    Submit,
    FollowUp,
}

struct InFlight<S: SessionHandle> {
    session: S,
    submission: u64,
    flight: Flight,
    settled: bool,
}

impl<S: SessionHandle> InFlight<S> {
    fn new(session: S, submission: u64, flight: Flight) -> Self {
        Self {
            session,
            submission,
            flight,
            settled: false,
        }
    }

    fn settle<R>(mut self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.settled = true;
        self.session.update(f)
    }
}

impl<S: SessionHandle> Drop for InFlight<S> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let submission = self.submission;
        let flight = self.flight;
        let _ = self.session.update(|session| match flight {
            Flight::Submit => session.abandon_submit(submission),
            Flight::FollowUp => session.abandon_follow_up(submission),
        });
    }
}

/// Submit the current document (text or file) with the role/goal
pub async fn submit_document<A, S>(api: &A, mut session: S)
where
    A: SimplifyApi + ?Sized,
    S: SessionHandle,
{
    let ticket = match session.update(Session::begin_submit) {
        Some(Ok(ticket)) => ticket,
        Some(Err(e)) => {
            warn!("Submit rejected: {}", e);
            return;
        }
        None => return,
    };

    let guard = InFlight::new(session, ticket.submission, Flight::Submit);

    let outcome = match &ticket.plan {
        SubmitPlan::Text(request) => {
            info!(
                "Simplifying pasted text ({} chars) for '{}'",
                request.document_text.chars().count(),
                request.user_role_goal
            );
            api.simplify_text(request).await
        }
        SubmitPlan::File {
            user_role_goal,
            file,
        } => {
            info!(
                "Simplifying file '{}' ({}) for '{}'",
                file.name,
                file.size_label(),
                user_role_goal
            );
            api.simplify_file(user_role_goal, file).await
        }
    };

    match &outcome {
        Ok(response) => info!(
            "Simplify finished (doc_id: {})",
            response.document_id().unwrap_or("none")
        ),
        Err(e) => error!("Simplify failed: {}", e),
    }

    let applied = guard.settle(|session| session.finish_submit(ticket.submission, outcome));
    if applied == Some(false) {
        warn!("Dropped simplify result for superseded submission {}", ticket.submission);
    }
}

/// Ask the current follow-up question against the simplified document
pub async fn ask_follow_up<A, S>(api: &A, contract: FollowUpContract, mut session: S)
where
    A: SimplifyApi + ?Sized,
    S: SessionHandle,
{
    let ticket = match session.update(|session| session.begin_follow_up(contract)) {
        Some(Ok(ticket)) => ticket,
        Some(Err(e)) => {
            warn!("Follow-up rejected: {}", e);
            return;
        }
        None => return,
    };

    let guard = InFlight::new(session, ticket.submission, Flight::FollowUp);

    info!(
        "Asking follow-up ({} contract, {} chars)",
        contract,
        ticket.request.query().chars().count()
    );
    let outcome = api.follow_up(&ticket.request).await;
    if let Err(e) = &outcome {
        error!("Follow-up failed: {}", e);
    }

    let applied = guard.settle(|session| session.finish_follow_up(ticket.submission, outcome));
    if applied == Some(false) {
        warn!("Dropped follow-up answer for superseded submission {}", ticket.submission);
    }
}
