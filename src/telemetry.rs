//! Best-effort usage telemetry.
//!
//! One event per completed run, published to a Pub/Sub topic through its
//! REST endpoint. The project id is hashed before it leaves the machine.
//! Every failure here is swallowed: telemetry never changes the outcome of
//! a run.

use crate::constants::{common, urls};
use crate::project_identity;
use crate::ui;
use base64::Engine;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct Event {
    /// Correlation id for the invocation.
    pub session: String,
    /// SHA-256 hex digest of the project id.
    pub project: String,
    pub event: String,
    pub datetime: String,
    pub version: String,
}

impl Event {
    pub fn new(session: &str, project_id: &str, event: &str) -> Self {
        Self {
            session: session.to_string(),
            project: hash_project_id(project_id),
            event: event.to_string(),
            datetime: Utc::now().to_rfc3339(),
            version: project_identity::version().to_string(),
        }
    }
}

pub fn hash_project_id(project_id: &str) -> String {
    hex::encode(Sha256::digest(project_id.as_bytes()))
}

/// Publish one event, never failing the caller.
pub fn publish(event: &Event, token: &str) {
    let delivered = publish_to(&urls::pubsub_publish(urls::PUBSUB_API_BASE), event, token);
    if !delivered && ui::is_verbose() {
        ui::info("telemetry event was not delivered (ignored)");
    }
}

/// Publish against an explicit endpoint; split out so tests can target a
/// local server. Returns whether the event was accepted.
pub(crate) fn publish_to(url: &str, event: &Event, token: &str) -> bool {
    let payload = match serde_json::to_vec(event) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let body = serde_json::json!({
        "messages": [
            { "data": base64::engine::general_purpose::STANDARD.encode(payload) }
        ]
    });

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(common::TELEMETRY_TIMEOUT_MS))
        .build()
    {
        Ok(c) => c,
        Err(_) => return false,
    };

    client
        .post(url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .map(|response| response.status().is_success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn project_id_is_hashed_not_forwarded() {
        let event = Event::new("s-1", "abc", common::EVENT_CREATE);
        assert_ne!(event.project, "abc");
        assert_eq!(event.project.len(), 64);
        assert_eq!(
            event.project,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn event_carries_session_name_and_version() {
        let event = Event::new("s-1", "abc", common::EVENT_DESTROY);
        assert_eq!(event.session, "s-1");
        assert_eq!(event.event, "sandboxctl-destroy");
        assert_eq!(event.version, project_identity::version());
        assert!(event.datetime.contains('T'));
    }

    async fn mock_endpoint(status: u16) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/projects/{}/topics/{}:publish",
                project_identity::TELEMETRY_PROJECT,
                project_identity::TELEMETRY_TOPIC
            )))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({"messages": [{}]})))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        let url = urls::pubsub_publish(&server.uri());
        (server, url)
    }

    #[tokio::test]
    async fn publish_reports_acceptance() {
        let (_server, url) = mock_endpoint(200).await;
        let delivered = tokio::task::spawn_blocking(move || {
            let event = Event::new("s-1", "abc", common::EVENT_CREATE);
            publish_to(&url, &event, "test-token")
        })
        .await
        .unwrap();
        assert!(delivered);
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed() {
        let (_server, url) = mock_endpoint(500).await;
        let delivered = tokio::task::spawn_blocking(move || {
            let event = Event::new("s-1", "abc", common::EVENT_CREATE);
            publish_to(&url, &event, "test-token")
        })
        .await
        .unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_swallowed() {
        let delivered = tokio::task::spawn_blocking(|| {
            let event = Event::new("s-1", "abc", common::EVENT_CREATE);
            publish_to("http://127.0.0.1:9/v1/topics/none:publish", &event, "t")
        })
        .await
        .unwrap();
        assert!(!delivered);
    }
}
