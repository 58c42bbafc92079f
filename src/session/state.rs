use serde_json::Value;

use crate::message::Message;

/// Greeting seeded as the first assistant message of every session.
pub const GREETING: &str = "Hello! Please upload your DRF file to begin.";

/// Mutable state for one chat session: the append-only message log, the
/// duplicate-submission guard, and where the session sits in its
/// upload/submit cycle. One instance per process, passed explicitly —
/// never ambient.
#[derive(Debug, Default)]
pub struct SessionState {
    pub messages: Vec<Message>,
    /// Name of the most recently *successfully* submitted file. Re-selecting
    /// the same name without an intervening different file is a no-op.
    pub last_processed_file: Option<String>,
    pub status: SessionStatus,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Initial state, and the state control always returns to.
    #[default]
    AwaitingUpload,
    /// A submission's HTTP call is in flight (blocks the session).
    Submitting,
    /// The last submission produced result messages.
    Completed,
    /// The last submission failed; the same file may be retried.
    Failed,
}

impl SessionState {
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn push_assistant_text(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }

    pub fn push_assistant_json(&mut self, value: Value) {
        self.messages.push(Message::assistant_json(value));
    }
}
