pub mod stream;

use std::sync::Arc;

use futures::StreamExt;
use reqwest::{header, multipart, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{
    AnonymizeRequest, AnonymizeResponse, CaseCreate, CaseRecord, CaseUpdate,
    EmailAssistantRequest, EmailAssistantResponse, Followup, FollowupCreate, FollowupUpdate,
    LoginResponse, Task, TaskCreate, TaskUpdate, User, WorkflowOutcome,
};
use crate::session;
use stream::{SseLineBuffer, WorkflowProgress};

pub type ClientResult<T> = Result<T, ClientError>;

/// Thin wrapper over the guest-relations backend. One method per
/// operation; no retries, no backoff — failures propagate to the caller.
#[derive(Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    config: Arc<AppConfig>,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.api_base_url);

        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        // The browser fetch API carries no per-request timeout knob.
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::new();

        Ok(Self {
            inner: client,
            config: Arc::new(config),
            base_url,
        })
    }

    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    // ---- auth ----

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let url = self.join_path("auth/login");
        let builder = self
            .inner
            .request(Method::POST, url)
            .form(&[("username", username), ("password", password)]);
        self.send(builder).await
    }

    pub async fn current_user(&self) -> ClientResult<User> {
        self.send(self.request(Method::GET, "auth/me")).await
    }

    // ---- documents / workflow ----

    pub async fn upload_document(&self, name: &str, bytes: Vec<u8>) -> ClientResult<Value> {
        let builder = self
            .request(Method::POST, "documents/upload")
            .multipart(file_form(name, bytes));
        self.send(builder).await
    }

    /// Blocking variant: one long request returning the combined result.
    pub async fn run_workflow(&self, name: &str, bytes: Vec<u8>) -> ClientResult<WorkflowOutcome> {
        let builder = self
            .request(Method::POST, "documents/workflow")
            .multipart(file_form(name, bytes));
        self.send(builder).await
    }

    /// Streaming variant: progress events are fed to `on_event` in arrival
    /// order; the terminal `complete` event yields the same payload as the
    /// blocking call, a terminal `error` event fails the run.
    pub async fn run_workflow_stream(
        &self,
        name: &str,
        bytes: Vec<u8>,
        mut on_event: impl FnMut(&WorkflowProgress),
    ) -> ClientResult<WorkflowOutcome> {
        let builder = self
            .request(Method::POST, "documents/workflow-stream")
            .header(header::ACCEPT, "text/event-stream")
            .multipart(file_form(name, bytes));

        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            session::clear();
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(status_error(status, &bytes));
        }

        let mut buffer = SseLineBuffer::default();
        let mut byte_stream = response.bytes_stream();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk?;
            for event in buffer.push(&chunk) {
                if let Some(terminal) = Self::check_terminal(&event)? {
                    return Ok(terminal);
                }
                on_event(&event);
            }
        }

        if let Some(event) = buffer.finish() {
            if let Some(terminal) = Self::check_terminal(&event)? {
                return Ok(terminal);
            }
            on_event(&event);
        }

        Err(ClientError::StreamTruncated)
    }

    fn check_terminal(event: &WorkflowProgress) -> ClientResult<Option<WorkflowOutcome>> {
        if event.is_error() {
            return Err(ClientError::Workflow(event.error_message()));
        }
        if event.is_complete() {
            return Ok(Some(WorkflowOutcome {
                cases: event.cases.clone().unwrap_or_default(),
                suggestions: event.suggestions.clone().unwrap_or_default(),
            }));
        }
        Ok(None)
    }

    // ---- cases ----

    pub async fn fetch_cases(&self) -> ClientResult<Vec<CaseRecord>> {
        self.send(self.request(Method::GET, "cases/")).await
    }

    pub async fn fetch_cases_with_followups(&self) -> ClientResult<Vec<CaseRecord>> {
        self.send(self.request(Method::GET, "cases/with-followups"))
            .await
    }

    pub async fn fetch_case(&self, id: i64) -> ClientResult<CaseRecord> {
        self.send(self.request(Method::GET, &format!("cases/{id}")))
            .await
    }

    pub async fn create_case(&self, case: &CaseCreate) -> ClientResult<CaseRecord> {
        self.send_json(Method::POST, "cases/", case).await
    }

    pub async fn create_cases_bulk(&self, cases: &[CaseCreate]) -> ClientResult<Vec<CaseRecord>> {
        self.send_json(Method::POST, "cases/bulk", &cases).await
    }

    pub async fn update_case(&self, id: i64, patch: &CaseUpdate) -> ClientResult<CaseRecord> {
        self.send_json(Method::PUT, &format!("cases/{id}"), patch)
            .await
    }

    pub async fn reset_daily_cases(&self) -> ClientResult<Value> {
        self.send(self.request(Method::POST, "cases/reset-daily"))
            .await
    }

    // ---- followups ----

    pub async fn create_followup(&self, followup: &FollowupCreate) -> ClientResult<Followup> {
        self.send_json(Method::POST, "followups/", followup).await
    }

    pub async fn update_followup(
        &self,
        id: i64,
        patch: &FollowupUpdate,
    ) -> ClientResult<Followup> {
        self.send_json(Method::PUT, &format!("followups/{id}"), patch)
            .await
    }

    pub async fn fetch_followups_with_case_info(&self) -> ClientResult<Vec<Followup>> {
        self.send(self.request(Method::GET, "followups/with-case-info"))
            .await
    }

    pub async fn delete_followup(&self, id: i64) -> ClientResult<Value> {
        self.send(self.request(Method::DELETE, &format!("followups/{id}")))
            .await
    }

    // ---- users ----

    pub async fn fetch_users(&self) -> ClientResult<Vec<User>> {
        self.send(self.request(Method::GET, "users/")).await
    }

    // ---- tasks ----

    pub async fn fetch_tasks(&self) -> ClientResult<Vec<Task>> {
        self.send(self.request(Method::GET, "tasks/")).await
    }

    pub async fn fetch_user_tasks(&self, user_id: i64) -> ClientResult<Vec<Task>> {
        self.send(self.request(Method::GET, &format!("tasks/user/{user_id}")))
            .await
    }

    pub async fn create_task(&self, task: &TaskCreate) -> ClientResult<Task> {
        self.send_json(Method::POST, "tasks/", task).await
    }

    pub async fn create_daily_tasks(&self, task_date: &str) -> ClientResult<Vec<Task>> {
        let builder = self
            .request(Method::POST, "tasks/daily")
            .query(&[("task_date", task_date)]);
        self.send(builder).await
    }

    pub async fn update_task(&self, id: i64, patch: &TaskUpdate) -> ClientResult<Task> {
        self.send_json(Method::PUT, &format!("tasks/{id}"), patch)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> ClientResult<Value> {
        self.send(self.request(Method::DELETE, &format!("tasks/{id}")))
            .await
    }

    // ---- services ----

    pub async fn anonymize_text(
        &self,
        text: &str,
        preserve_dates: bool,
        preserve_times: bool,
    ) -> ClientResult<AnonymizeResponse> {
        let payload = AnonymizeRequest {
            text,
            preserve_dates,
            preserve_times,
        };
        self.send_json(Method::POST, "anonymization/text", &payload)
            .await
    }

    pub async fn chat_email_assistant(
        &self,
        email_content: &str,
    ) -> ClientResult<EmailAssistantResponse> {
        let payload = EmailAssistantRequest { email_content };
        self.send_json(Method::POST, "chat/email-assistant", &payload)
            .await
    }

    // ---- plumbing ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.join_path(path);
        let mut builder = self.inner.request(method, url);

        // Durable storage is the source of truth for the token; it is
        // re-read on every request so a forced logout takes effect
        // immediately.
        if let Some(bearer) = session::stored_bearer() {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }

        builder
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        payload: &TReq,
    ) -> ClientResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        let builder = self.request(method, path).json(payload);
        self.send(builder).await
    }

    async fn send<T>(&self, builder: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();

        // 401 is a global session-invalidation signal, not a per-call
        // error: the durable session goes away before the error surfaces.
        if status == StatusCode::UNAUTHORIZED {
            session::clear();
            return Err(ClientError::Unauthorized);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn file_form(name: &str, bytes: Vec<u8>) -> multipart::Form {
    let part = multipart::Part::bytes(bytes).file_name(name.to_string());
    multipart::Form::new().part("file", part)
}

fn normalize_base_url(input: &str) -> String {
    input.trim_end_matches('/').to_string()
}

fn status_error(status: StatusCode, body: &[u8]) -> ClientError {
    // FastAPI-style error bodies carry the message under `detail`.
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    ClientError::Status { status, message }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("session expired, please sign in again")]
    Unauthorized,
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("{0}")]
    Workflow(String),
    #[error("document stream ended before a terminal event")]
    StreamTruncated,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_server_detail() {
        let err = status_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail":"title is required"}"#,
        );
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[test]
    fn status_error_falls_back_to_reason_phrase() {
        let err = status_error(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn unauthorized_is_distinguished() {
        assert!(ClientError::Unauthorized.is_unauthorized());
        assert!(!ClientError::Workflow("x".into()).is_unauthorized());
    }
}
