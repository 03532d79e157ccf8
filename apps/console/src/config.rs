use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Transport used for the extraction + suggestion run. Both are the same
/// logical operation; the wizard never sees which one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowTransportMode {
    Blocking,
    #[default]
    Streaming,
}

impl WorkflowTransportMode {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("blocking") => Self::Blocking,
            _ => Self::Streaming,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub workflow_transport: WorkflowTransportMode,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            workflow_transport: WorkflowTransportMode::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        load_dotenv();

        let mut config = Self::default();

        if let Some(url) = read_env("GUESTDESK_API_BASE_URL") {
            config.api_base_url = url;
        }

        config.workflow_transport =
            WorkflowTransportMode::from_env(read_env("GUESTDESK_WORKFLOW_TRANSPORT"));

        if let Some(secs) =
            read_env("GUESTDESK_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

// Wasm builds have no process environment; these are baked in at compile time.
fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "GUESTDESK_API_BASE_URL" => option_env!("GUESTDESK_API_BASE_URL"),
        "GUESTDESK_WORKFLOW_TRANSPORT" => option_env!("GUESTDESK_WORKFLOW_TRANSPORT"),
        "GUESTDESK_REQUEST_TIMEOUT_SECS" => option_env!("GUESTDESK_REQUEST_TIMEOUT_SECS"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_mode_defaults_to_streaming() {
        assert_eq!(
            WorkflowTransportMode::from_env(None),
            WorkflowTransportMode::Streaming
        );
        assert_eq!(
            WorkflowTransportMode::from_env(Some("blocking".into())),
            WorkflowTransportMode::Blocking
        );
        assert_eq!(
            WorkflowTransportMode::from_env(Some("anything".into())),
            WorkflowTransportMode::Streaming
        );
    }
}
