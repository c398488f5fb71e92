//! External URLs and URL patterns
//!
//! Centralized URLs for:
//! - Cloud Console links printed after a successful deployment
//! - The Pub/Sub REST publish endpoint used for usage telemetry
//! - Project documentation

use crate::project_identity;

/// Project documentation root
pub const DOCS: &str = "https://cloud-ops-sandbox.dev/docs";

/// Default base of the Pub/Sub REST API
pub const PUBSUB_API_BASE: &str = "https://pubsub.googleapis.com";

pub fn cloud_console(project_id: &str) -> String {
    format!(
        "https://console.cloud.google.com/home/dashboard?project={}",
        project_id
    )
}

pub fn monitoring_console(project_id: &str) -> String {
    format!(
        "https://console.cloud.google.com/monitoring?project={}",
        project_id
    )
}

pub fn kubernetes_console(project_id: &str) -> String {
    format!(
        "https://console.cloud.google.com/kubernetes/workload?project={}",
        project_id
    )
}

/// Publish endpoint for the telemetry topic, on an injectable API base so
/// tests can point it at a local server.
pub fn pubsub_publish(api_base: &str) -> String {
    format!(
        "{}/v1/projects/{}/topics/{}:publish",
        api_base.trim_end_matches('/'),
        project_identity::TELEMETRY_PROJECT,
        project_identity::TELEMETRY_TOPIC
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_url_targets_the_telemetry_topic() {
        let url = pubsub_publish(PUBSUB_API_BASE);
        assert_eq!(
            url,
            "https://pubsub.googleapis.com/v1/projects/cloud-ops-sandbox-telemetry/topics/telemetry:publish"
        );
    }

    #[test]
    fn publish_url_tolerates_trailing_slash_on_base() {
        let url = pubsub_publish("http://127.0.0.1:9/");
        assert!(url.starts_with("http://127.0.0.1:9/v1/"));
    }

    #[test]
    fn console_urls_embed_the_project() {
        assert!(monitoring_console("demo").ends_with("project=demo"));
        assert!(cloud_console("demo").contains("console.cloud.google.com"));
    }
}
