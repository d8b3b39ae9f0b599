//! Session state for one page load. No RSX, no signals.
//!
//! The controller owns a single [`Session`]. Views read it and report user
//! input through callbacks; network outcomes come back through the
//! `finish_*` transitions. Every transition is synchronous so it can run
//! inside a short signal write.

use demystifier_types::{
    is_accepted_file_name, FollowUpContract, FollowUpRequest, FollowUpResponse,
    SimplifyResponse, SimplifyTextRequest,
};

use crate::error::{ClientError, ValidationError};

/// A file picked for upload, read fully into memory
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn size_label(&self) -> String {
        let size = self.size();
        if size < 1024 {
            format!("{size} B")
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.size())
            .finish()
    }
}

/// What happened to a finished file read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRead {
    /// A newer pick or a clear superseded this read
    Stale,
    Selected,
    /// The picker was emptied
    Cleared,
    /// Nothing is selected afterwards; the picker should be reset
    Rejected(ValidationError),
}

/// Main flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Ready {
        text: String,
        document_id: Option<String>,
    },
    Failed {
        error: ClientError,
    },
}

/// Follow-up flow, independent of the main flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FollowUpPhase {
    #[default]
    Idle,
    Asking,
}

/// Exactly one request per submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    Text(SimplifyTextRequest),
    File {
        user_role_goal: String,
        file: SelectedFile,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub submission: u64,
    pub plan: SubmitPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpTicket {
    pub submission: u64,
    pub request: FollowUpRequest,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub document_text: String,
    pub user_role_goal: String,
    pub follow_up_query: String,
    selected_file: Option<SelectedFile>,
    /// Bumped on every pick; only the latest read may land
    file_reads: u64,
    pending_read: Option<u64>,
    submit: SubmitPhase,
    follow_up: FollowUpPhase,
    answers: Vec<String>,
    notice: Option<ClientError>,
    /// Bumped on every accepted submit; responses tagged with an older value are stale
    submission: u64,
    /// Pasted text of the current submission, kept for the context contract
    submitted_text: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn submit_phase(&self) -> &SubmitPhase {
        &self.submit
    }

    pub fn follow_up_phase(&self) -> FollowUpPhase {
        self.follow_up
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.submit, SubmitPhase::Submitting)
    }

    pub fn is_asking(&self) -> bool {
        matches!(self.follow_up, FollowUpPhase::Asking)
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_reading_file(&self) -> bool {
        self.pending_read.is_some()
    }

    /// The text area is disabled, not cleared, while a file is selected or being read
    pub fn text_input_disabled(&self) -> bool {
        self.selected_file.is_some() || self.is_reading_file()
    }

    pub fn result_text(&self) -> Option<&str> {
        match &self.submit {
            SubmitPhase::Ready { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn document_id(&self) -> Option<&str> {
        match &self.submit {
            SubmitPhase::Ready { document_id, .. } => document_id.as_deref(),
            _ => None,
        }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn notice(&self) -> Option<&ClientError> {
        self.notice.as_ref()
    }

    pub fn submission(&self) -> u64 {
        self.submission
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn set_document_text(&mut self, text: String) {
        self.document_text = text;
    }

    pub fn set_user_role_goal(&mut self, role_goal: String) {
        self.user_role_goal = role_goal;
    }

    pub fn set_follow_up_query(&mut self, query: String) {
        self.follow_up_query = query;
    }

    /// A rejected file also drops the previous selection, matching the reset picker
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), ValidationError> {
        self.pending_read = None;
        if !is_accepted_file_name(&file.name) {
            let err = ValidationError::UnsupportedFile { name: file.name };
            self.selected_file = None;
            self.notice = Some(err.clone().into());
            return Err(err);
        }
        self.selected_file = Some(file);
        Ok(())
    }

    /// Cancels any pending read as well
    pub fn clear_file(&mut self) {
        self.selected_file = None;
        self.pending_read = None;
    }

    /// The picker changed; its content arrives later through [`Session::finish_file_read`]
    pub fn begin_file_read(&mut self) -> u64 {
        self.file_reads += 1;
        self.pending_read = Some(self.file_reads);
        self.file_reads
    }

    pub fn finish_file_read(
        &mut self,
        read: u64,
        outcome: Result<Option<SelectedFile>, String>,
    ) -> FileRead {
        if self.pending_read != Some(read) {
            return FileRead::Stale;
        }

        match outcome {
            Ok(Some(file)) => match self.select_file(file) {
                Ok(()) => FileRead::Selected,
                Err(err) => FileRead::Rejected(err),
            },
            Ok(None) => {
                self.clear_file();
                FileRead::Cleared
            }
            Err(reason) => {
                self.clear_file();
                let err = ValidationError::UnreadableFile(reason);
                self.notice = Some(err.clone().into());
                FileRead::Rejected(err)
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn report(&mut self, error: ClientError) {
        self.notice = Some(error);
    }

    // ------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------

    /// Validate and enter `Submitting`. Clears the previous result,
    /// document id and answers only once the input is known to be valid.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, ValidationError> {
        let plan = match self.plan_submit() {
            Ok(plan) => plan,
            Err(err) => {
                self.notice = Some(err.clone().into());
                return Err(err);
            }
        };

        self.submission += 1;
        self.submit = SubmitPhase::Submitting;
        self.follow_up = FollowUpPhase::Idle;
        self.answers.clear();
        self.notice = None;
        self.submitted_text = match &plan {
            SubmitPlan::Text(request) => Some(request.document_text.clone()),
            SubmitPlan::File { .. } => None,
        };

        Ok(SubmitTicket {
            submission: self.submission,
            plan,
        })
    }

    fn plan_submit(&self) -> Result<SubmitPlan, ValidationError> {
        if self.is_loading() {
            return Err(ValidationError::SubmitInFlight);
        }

        let user_role_goal = self.user_role_goal.trim();
        if user_role_goal.is_empty() {
            return Err(ValidationError::MissingRoleGoal);
        }

        if self.is_reading_file() {
            return Err(ValidationError::FileReadPending);
        }

        if let Some(file) = &self.selected_file {
            return Ok(SubmitPlan::File {
                user_role_goal: user_role_goal.to_string(),
                file: file.clone(),
            });
        }

        if self.document_text.trim().is_empty() {
            return Err(ValidationError::MissingDocument);
        }

        Ok(SubmitPlan::Text(SimplifyTextRequest {
            document_text: self.document_text.clone(),
            user_role_goal: user_role_goal.to_string(),
        }))
    }

    /// Returns false when the outcome belongs to a superseded submission
    pub fn finish_submit(
        &mut self,
        submission: u64,
        outcome: Result<SimplifyResponse, ClientError>,
    ) -> bool {
        if submission != self.submission || !self.is_loading() {
            return false;
        }

        match outcome {
            Ok(response) => {
                self.submit = SubmitPhase::Ready {
                    text: response.display_text(),
                    document_id: response.document_id().map(ToString::to_string),
                };
            }
            Err(error) => {
                self.notice = Some(error.clone());
                self.submit = SubmitPhase::Failed { error };
            }
        }
        true
    }

    /// The request future went away without an outcome
    pub fn abandon_submit(&mut self, submission: u64) {
        if submission == self.submission && self.is_loading() {
            self.submit = SubmitPhase::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Follow-up
    // ------------------------------------------------------------------

    pub fn begin_follow_up(
        &mut self,
        contract: FollowUpContract,
    ) -> Result<FollowUpTicket, ValidationError> {
        let request = match self.plan_follow_up(contract) {
            Ok(request) => request,
            Err(err) => {
                self.notice = Some(err.clone().into());
                return Err(err);
            }
        };

        self.follow_up = FollowUpPhase::Asking;
        Ok(FollowUpTicket {
            submission: self.submission,
            request,
        })
    }

    fn plan_follow_up(&self, contract: FollowUpContract) -> Result<FollowUpRequest, ValidationError> {
        if self.is_asking() {
            return Err(ValidationError::FollowUpInFlight);
        }

        let query = self.follow_up_query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        let query = query.to_string();

        match contract {
            FollowUpContract::DocId => {
                let doc_id = self
                    .document_id()
                    .ok_or(ValidationError::NoDocumentScope)?
                    .to_string();
                Ok(FollowUpRequest::DocId { query, doc_id })
            }
            FollowUpContract::Context => {
                let result = self.result_text().ok_or(ValidationError::NoDocumentScope)?;
                let context = self
                    .submitted_text
                    .clone()
                    .unwrap_or_else(|| result.to_string());
                Ok(FollowUpRequest::Context { query, context })
            }
        }
    }

    /// Returns false when the answer belongs to a superseded submission
    pub fn finish_follow_up(
        &mut self,
        submission: u64,
        outcome: Result<FollowUpResponse, ClientError>,
    ) -> bool {
        if submission != self.submission || !self.is_asking() {
            return false;
        }

        self.follow_up = FollowUpPhase::Idle;
        match outcome {
            Ok(response) => {
                self.answers.push(response.display_text());
                self.follow_up_query.clear();
            }
            Err(error) => {
                self.notice = Some(error);
            }
        }
        true
    }

    pub fn abandon_follow_up(&mut self, submission: u64) {
        if submission == self.submission && self.is_asking() {
            self.follow_up = FollowUpPhase::Idle;
        }
    }
}
