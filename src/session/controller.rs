//! The one piece of real control logic in the crate: the upload-to-result
//! request/response flow and the session's state transitions.

use crate::session::state::{GREETING, SessionState, SessionStatus};
use crate::upload::UploadedFile;
use crate::webhook::{WebhookClient, WebhookError};

/// Fixed reply for the not-yet-implemented follow-up path.
pub const FOLLOW_UP_STUB: &str = "Follow-up questions are not yet implemented.";

/// What a `submit_file` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The file was sent and result messages were appended.
    Analyzed,
    /// Same filename as the last successful submission — skipped entirely:
    /// no request, no new messages.
    Duplicate,
}

/// Owns the session state and translates user actions into log mutations
/// and (for file submissions) one outbound webhook call.
pub struct SessionController {
    state: SessionState,
    client: WebhookClient,
}

impl SessionController {
    pub fn new(client: WebhookClient) -> Self {
        Self {
            state: SessionState::default(),
            client,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Whether `name` matches the last successfully submitted filename.
    pub fn already_processed(&self, name: &str) -> bool {
        self.state.last_processed_file.as_deref() == Some(name)
    }

    /// Seed the greeting message. Idempotent — a non-empty log is left alone.
    pub fn initialize(&mut self) {
        if self.state.messages.is_empty() {
            self.state.push_assistant_text(GREETING);
        }
    }

    /// Submit a file for analysis.
    ///
    /// Re-submitting the filename that last succeeded short-circuits before
    /// any network I/O. On success the log gains exactly two messages: the
    /// formatted summary and the structured lean payload. On failure the log
    /// and `last_processed_file` are untouched so the same file can be
    /// retried; the caller surfaces the error.
    pub async fn submit_file(
        &mut self,
        file: &UploadedFile,
    ) -> Result<SubmitOutcome, WebhookError> {
        if self.already_processed(&file.name) {
            return Ok(SubmitOutcome::Duplicate);
        }

        self.state.status = SessionStatus::Submitting;
        match self.client.analyze(file).await {
            Ok(result) => {
                self.state
                    .push_assistant_text(summary_message(&result.summary));
                self.state.push_assistant_json(result.lean);
                self.state.last_processed_file = Some(file.name.clone());
                self.state.status = SessionStatus::Completed;
                Ok(SubmitOutcome::Analyzed)
            }
            Err(err) => {
                self.state.status = SessionStatus::Failed;
                Err(err)
            }
        }
    }

    /// Append a user prompt and the fixed stub reply. Orthogonal to the
    /// upload cycle: allowed in any state, never touches
    /// `last_processed_file`, never calls out.
    pub fn submit_prompt(&mut self, text: &str) {
        self.state.push_user_text(text);
        self.state.push_assistant_text(FOLLOW_UP_STUB);
    }

    /// Return to `AwaitingUpload` once the outcome of a submission has been
    /// rendered. Control always loops back here; there is no terminal state.
    pub fn acknowledge_result(&mut self) {
        self.state.status = SessionStatus::AwaitingUpload;
    }
}

/// The user-facing summary line for a completed analysis.
fn summary_message(summary: &str) -> String {
    format!("✅ Analysis Complete! {summary}.")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn controller() -> SessionController {
        SessionController::new(WebhookClient::new(None))
    }

    #[test]
    fn summary_message_format() {
        insta::assert_snapshot!(
            summary_message("3 horses analyzed"),
            @"✅ Analysis Complete! 3 horses analyzed."
        );
    }

    #[test]
    fn initialize_seeds_greeting_once() {
        let mut c = controller();
        c.initialize();
        c.initialize();
        assert_eq!(c.state().messages, vec![Message::assistant(GREETING)]);
    }

    #[test]
    fn submit_prompt_appends_user_then_stub() {
        let mut c = controller();
        c.initialize();
        c.submit_prompt("How many favorites won?");

        let tail = &c.state().messages[1..];
        assert_eq!(
            tail,
            &[
                Message::user("How many favorites won?"),
                Message::assistant(FOLLOW_UP_STUB),
            ]
        );
    }

    #[test]
    fn submit_prompt_leaves_last_processed_file_alone() {
        let mut c = controller();
        c.submit_prompt("hello?");
        assert!(c.state().last_processed_file.is_none());
    }

    #[tokio::test]
    async fn unconfigured_submit_fails_and_leaves_log_untouched() {
        let mut c = controller();
        c.initialize();
        let file = crate::upload::UploadedFile {
            name: "race1.drf".into(),
            bytes: vec![0],
            mime_type: "application/octet-stream".into(),
        };

        let err = c.submit_file(&file).await.unwrap_err();
        assert!(matches!(err, WebhookError::NotConfigured));
        assert_eq!(c.state().messages.len(), 1);
        assert!(c.state().last_processed_file.is_none());
        assert_eq!(c.state().status, SessionStatus::Failed);

        c.acknowledge_result();
        assert_eq!(c.state().status, SessionStatus::AwaitingUpload);
    }
}
