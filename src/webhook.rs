//! Client for the external analysis workflow.
//!
//! The entire "analysis" happens on the other side of one multipart POST:
//! the file goes out under the form field `file`, JSON comes back. This
//! module owns that call and the interpretation of its response — nothing
//! else in the crate touches the network.

use serde_json::Value;

use crate::upload::UploadedFile;

/// Summary text used when the response lacks `data.python_summary`.
pub const NO_SUMMARY: &str = "No summary available.";

/// Lean payload used when the response lacks `data.lean`.
pub const NO_LEAN: &str = "No lean data found.";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook URL is not configured (set MAKE_WEBHOOK_URL or .paddock/config.toml)")]
    NotConfigured,
    /// The request failed before a usable response existed: connection
    /// refused, timeout, or a broken body read.
    #[error("could not reach the analysis workflow: {0}")]
    Transport(#[from] reqwest::Error),
    /// A response arrived, but with an error status. Carries the raw body so
    /// the workflow's own error message reaches the user.
    #[error("analysis workflow returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The two fields this tool understands from the workflow's response.
/// Everything else in the payload is ignored; `lean` stays opaque JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub lean: Value,
}

impl AnalysisResult {
    /// Interpret a 2xx response body.
    ///
    /// An unparseable or oddly-shaped body is not an error — each missing
    /// piece degrades to its placeholder so a misbehaving workflow still
    /// produces a readable chat message.
    pub fn from_body(body: &str) -> Self {
        let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Self {
        let data = value.get("data");
        let summary = data
            .and_then(|d| d.get("python_summary"))
            .and_then(Value::as_str)
            .unwrap_or(NO_SUMMARY)
            .to_string();
        let lean = data
            .and_then(|d| d.get("lean"))
            .cloned()
            .unwrap_or_else(|| Value::String(NO_LEAN.to_string()));
        Self { summary, lean }
    }
}

/// HTTP client for the analysis webhook.
pub struct WebhookClient {
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl WebhookClient {
    /// `endpoint` is the resolved secret URL; `None` means submission is
    /// disabled and every call fails with [`WebhookError::NotConfigured`].
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Send one file to the workflow and interpret the JSON response.
    ///
    /// One outbound call per invocation, no retries. The await blocks the
    /// session until the workflow responds or the transport gives up.
    pub async fn analyze(&self, file: &UploadedFile) -> Result<AnalysisResult, WebhookError> {
        let Some(ref endpoint) = self.endpoint else {
            return Err(WebhookError::NotConfigured);
        };

        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.http.post(endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(AnalysisResult::from_body(&body))
    }
}
