use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{SyncConfig, Task};

/// Error type for the remote document store
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote responded with HTTP {0}")]
    Status(u16),
    #[error("remote unreachable: {0}")]
    Transport(String),
}

/// Client for the hosted JSON document holding the mirrored board.
/// One document per key; a fetch reads it whole, a push replaces it.
pub struct RemoteClient {
    agent: ureq::Agent,
    url: String,
    api_key: String,
    secret: String,
}

impl RemoteClient {
    pub fn new(url: &str, api_key: &str, secret: &str, timeout: Duration) -> RemoteClient {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        RemoteClient {
            agent,
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            secret: secret.to_string(),
        }
    }

    /// Build a client from config, or None when mirroring is off
    pub fn from_config(sync: &SyncConfig) -> Option<RemoteClient> {
        if !sync.mirroring_enabled() {
            return None;
        }
        Some(RemoteClient::new(
            &sync.url,
            sync.api_key.trim(),
            sync.secret.trim(),
            Duration::from_secs(sync.timeout_secs),
        ))
    }

    fn document_url(&self) -> String {
        format!("{}/{}", self.url, self.api_key)
    }

    fn update_url(&self) -> String {
        if self.secret.is_empty() {
            self.document_url()
        } else {
            format!("{}?apiKey={}", self.document_url(), self.secret)
        }
    }

    /// Read the mirrored task list. A document that does not look like
    /// tasks reads as empty rather than failing.
    pub fn fetch_document(&self) -> Result<Vec<Task>, RemoteError> {
        let response = self
            .agent
            .get(&self.document_url())
            .set("Accept", "application/json")
            .call()
            .map_err(map_ureq_error)?;
        match response.into_json::<RemotePayload>() {
            Ok(payload) => Ok(payload.into_tasks()),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Replace the mirrored task list
    pub fn put_document(&self, tasks: &[Task]) -> Result<(), RemoteError> {
        self.agent
            .put(&self.update_url())
            .send_json(Document { tasks })
            .map_err(map_ureq_error)?;
        Ok(())
    }
}

fn map_ureq_error(e: ureq::Error) -> RemoteError {
    match e {
        ureq::Error::Status(code, _) => RemoteError::Status(code),
        ureq::Error::Transport(t) => RemoteError::Transport(t.to_string()),
    }
}

/// Wire shape written on push
#[derive(Serialize)]
struct Document<'a> {
    tasks: &'a [Task],
}

/// Accepted read shapes: `{"tasks": [...]}` or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum RemotePayload {
    Document { tasks: Vec<Task> },
    Bare(Vec<Task>),
}

impl RemotePayload {
    fn into_tasks(self) -> Vec<Task> {
        match self {
            RemotePayload::Document { tasks } => tasks,
            RemotePayload::Bare(tasks) => tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task_json(id: &str) -> String {
        format!(
            r#"{{"id":"{id}","title":"t","status":"backlog","type":"task",
               "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}}"#
        )
    }

    #[test]
    fn payload_accepts_wrapped_array() {
        let json = format!(r#"{{"tasks":[{}],"updatedBy":"someone"}}"#, task_json("a"));
        let payload: RemotePayload = serde_json::from_str(&json).unwrap();
        let tasks = payload.into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "a");
    }

    #[test]
    fn payload_accepts_bare_array() {
        let json = format!("[{},{}]", task_json("a"), task_json("b"));
        let payload: RemotePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload.into_tasks().len(), 2);
    }

    #[test]
    fn malformed_payload_is_not_tasks() {
        assert!(serde_json::from_str::<RemotePayload>(r#"{"foo":1}"#).is_err());
        assert!(serde_json::from_str::<RemotePayload>(r#"[{"id":1}]"#).is_err());
    }

    #[test]
    fn document_serializes_wrapped() {
        let tasks = crate::io::local::seed_tasks();
        let value = serde_json::to_value(Document { tasks: &tasks }).unwrap();
        assert!(value["tasks"].is_array());
        assert_eq!(value["tasks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn urls_are_assembled_from_key_and_secret() {
        let client = RemoteClient::new(
            "https://example.test/v1/json/",
            "doc-key",
            "",
            Duration::from_secs(1),
        );
        assert_eq!(client.document_url(), "https://example.test/v1/json/doc-key");
        assert_eq!(client.update_url(), client.document_url());

        let client = RemoteClient::new(
            "https://example.test/v1/json",
            "doc-key",
            "write-secret",
            Duration::from_secs(1),
        );
        assert_eq!(
            client.update_url(),
            "https://example.test/v1/json/doc-key?apiKey=write-secret"
        );
    }

    #[test]
    fn unreachable_host_reports_transport() {
        // Nothing listens on the discard port; connect fails fast
        let client = RemoteClient::new(
            "http://127.0.0.1:9/v1/json",
            "doc-key",
            "",
            Duration::from_millis(300),
        );
        match client.fetch_document() {
            Err(RemoteError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|t| t.len())),
        }
    }
}
