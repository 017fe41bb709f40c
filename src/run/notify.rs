//! Sentinel scanning and webhook notification.

use std::{fs, path::Path};

use serde::Serialize;
use tracing::{info, warn};

use crate::lib::errors::NotifyError;

/// Sentinel the provisioning scripts write for a good outcome.
pub const HAPPY_SENTINEL: &str = "===HAPPY";
/// Sentinel the provisioning scripts write for a bad outcome.
pub const SAD_SENTINEL: &str = "===SAD";

pub const COLOR_GOOD: &str = "good";
pub const COLOR_DANGER: &str = "danger";

pub const BOT_USERNAME: &str = "webhookbot";
pub const DEFAULT_DISPLAY_NAME: &str = "no name";
/// Optional side file holding the bot display name.
pub const NAME_FILE: &str = "name.txt";

/// One sentinel-marked log line, colored by which sentinel matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub text: String,
    pub color: &'static str,
}

/// Outbound webhook payload.
#[derive(Debug, Serialize)]
pub struct NotifyMessage<'a> {
    pub username: &'static str,
    pub text: String,
    pub attachments: &'a [Attachment],
}

/// Destination for webhook payloads, swappable in tests.
#[allow(async_fn_in_trait)]
pub trait WebhookSink {
    async fn submit(&self, url: &str, message: &NotifyMessage<'_>) -> Result<(), NotifyError>;
}

/// Real sink submitting over HTTPS.
#[derive(Debug, Default)]
pub struct HttpWebhookSink {
    client: reqwest::Client,
}

impl HttpWebhookSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WebhookSink for HttpWebhookSink {
    async fn submit(&self, url: &str, message: &NotifyMessage<'_>) -> Result<(), NotifyError> {
        let response = self
            .client
            .put(url)
            .json(message)
            .send()
            .await
            .map_err(|err| NotifyError::Request { source: err })?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected { status });
        }
        Ok(())
    }
}

/// Scan the run log for sentinel markers, in file order.
pub fn scan_attachments(log_contents: &str) -> Vec<Attachment> {
    let mut attachments = Vec::new();
    for line in log_contents.lines() {
        if let Some(position) = line.find(HAPPY_SENTINEL) {
            attachments.push(Attachment {
                text: line[position + HAPPY_SENTINEL.len()..].trim().to_string(),
                color: COLOR_GOOD,
            });
        } else if let Some(position) = line.find(SAD_SENTINEL) {
            attachments.push(Attachment {
                text: line[position + SAD_SENTINEL.len()..].trim().to_string(),
                color: COLOR_DANGER,
            });
        }
    }
    attachments
}

/// Read the bot display name from the side file, defaulting to a placeholder.
pub fn read_display_name(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents.trim().to_string(),
        Err(_) => DEFAULT_DISPLAY_NAME.to_string(),
    }
}

/// Submit the run outcome unless notification was skipped.
///
/// Returns whether a webhook call was actually issued. An empty attachment
/// list is still submitted; "nothing matched" is not an error.
pub async fn maybe_notify<S: WebhookSink>(
    sink: &S,
    skip: bool,
    url: &str,
    log_contents: &str,
    display_name: &str,
) -> Result<bool, NotifyError> {
    if skip {
        info!(target: "devup::notify", "Notification skipped by flag");
        return Ok(false);
    }

    let attachments = scan_attachments(log_contents);
    if attachments.is_empty() {
        warn!(target: "devup::notify", "No sentinel markers found in run log");
    }
    let message = NotifyMessage {
        username: BOT_USERNAME,
        text: format!("{display_name}:"),
        attachments: &attachments,
    };
    sink.submit(url, &message).await?;
    info!(
        target: "devup::notify",
        attachments = attachments.len(),
        "Submitted webhook notification"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use crate::lib::errors::NotifyError;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        submitted: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl WebhookSink for RecordingSink {
        async fn submit(
            &self,
            url: &str,
            message: &NotifyMessage<'_>,
        ) -> Result<(), NotifyError> {
            let payload = serde_json::to_value(message).expect("message serializes");
            self.submitted
                .lock()
                .expect("lock")
                .push((url.to_string(), payload));
            Ok(())
        }
    }

    #[test]
    fn sentinel_lines_become_attachments_in_file_order() {
        let log = "\
Bringing machine 'default' up with 'aws' provider...
===HAPPY instance ready
some unrelated output
===SAD boot failed
";
        let attachments = scan_attachments(log);
        assert_eq!(
            attachments,
            vec![
                Attachment {
                    text: "instance ready".into(),
                    color: COLOR_GOOD,
                },
                Attachment {
                    text: "boot failed".into(),
                    color: COLOR_DANGER,
                },
            ]
        );
    }

    #[test]
    fn log_without_sentinels_yields_no_attachments() {
        assert!(scan_attachments("nothing interesting here\n").is_empty());
    }

    #[tokio::test]
    async fn skipping_notification_issues_no_sink_calls() {
        let sink = RecordingSink::default();
        let sent = maybe_notify(&sink, true, "https://example.invalid/hook", "===HAPPY ok", "ci")
            .await
            .expect("skip should succeed");

        assert!(!sent);
        assert!(sink.submitted.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn payload_carries_username_name_line_and_attachments() {
        let sink = RecordingSink::default();
        let log = "===HAPPY instance ready\n===SAD boot failed\n";
        let sent = maybe_notify(&sink, false, "https://example.invalid/hook", log, "bench-7")
            .await
            .expect("notify should succeed");

        assert!(sent);
        let submitted = sink.submitted.lock().expect("lock");
        assert_eq!(submitted.len(), 1);
        let (url, payload) = &submitted[0];
        assert_eq!(url, "https://example.invalid/hook");
        assert_eq!(
            *payload,
            json!({
                "username": "webhookbot",
                "text": "bench-7:",
                "attachments": [
                    { "text": "instance ready", "color": "good" },
                    { "text": "boot failed", "color": "danger" },
                ]
            })
        );
    }

    #[tokio::test]
    async fn empty_attachment_list_is_still_submitted() {
        let sink = RecordingSink::default();
        let sent = maybe_notify(&sink, false, "https://example.invalid/hook", "quiet log", "ci")
            .await
            .expect("notify should succeed");

        assert!(sent);
        let submitted = sink.submitted.lock().expect("lock");
        let (_, payload) = &submitted[0];
        assert_eq!(payload["attachments"], json!([]));
    }

    #[test]
    fn display_name_defaults_when_side_file_is_absent() {
        let temp = tempfile::tempdir().expect("can create temporary directory");
        let name = read_display_name(&temp.path().join("name.txt"));
        assert_eq!(name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn display_name_is_trimmed_file_contents() {
        let temp = tempfile::tempdir().expect("can create temporary directory");
        let path = temp.path().join("name.txt");
        std::fs::write(&path, "bench-7\n").expect("can write name file");
        assert_eq!(read_display_name(&path), "bench-7");
    }
}
