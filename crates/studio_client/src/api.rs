use std::time::Duration;

use client_logging::client_warn;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    ApiSetupError, HealthError, JobRequest, JobState, PollError, StatusSnapshot, SubmitError,
    TaskId, TemplateSelector,
};

const HEALTH_ENDPOINT: &str = "/health";
const FACE_SWAP_ENDPOINT: &str = "/face-swap";
const FACE_SWAP_STATUS_ENDPOINT: &str = "/face-swap-status";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub poll_interval: Duration,
    pub max_poll_time: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(2),
            max_poll_time: Duration::from_secs(300),
        }
    }
}

#[async_trait::async_trait]
pub trait SwapApi: Send + Sync {
    /// Submits a job and returns its handle. Owns the submission retry
    /// policy: timeouts are retried, nothing else is.
    async fn submit(&self, request: &JobRequest) -> Result<TaskId, SubmitError>;

    /// Queries the job status once. No retry; repeated invocation is the
    /// caller's responsibility.
    async fn poll(&self, task_id: &TaskId) -> Result<StatusSnapshot, PollError>;

    /// Probes the backend health endpoint.
    async fn health(&self) -> Result<(), HealthError>;
}

#[derive(Debug, Clone)]
pub struct HttpSwapApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpSwapApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiSetupError> {
        // The client-wide timeout is the submission abort signal: reqwest
        // cancels the in-flight request and releases its timer on every
        // exit path.
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiSetupError {
                message: err.to_string(),
            })?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn submit_once(&self, request: &JobRequest) -> Result<TaskId, SubmitAttemptError> {
        let form = build_form(request)?;
        let response = self
            .client
            .post(self.endpoint(FACE_SWAP_ENDPOINT))
            // No explicit content-type; reqwest generates the multipart
            // boundary.
            .multipart(form)
            .send()
            .await
            .map_err(map_submit_error)?;

        let status = response.status();
        if !status.is_success() {
            // Best-effort parse: a malformed error body degrades to the
            // empty body, it never fails the error path itself.
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(SubmitAttemptError::Fatal(translate_rejection(status, body)));
        }

        let body: SubmitResponse =
            response
                .json()
                .await
                .map_err(|err| {
                    SubmitAttemptError::Fatal(SubmitError::InvalidResponse {
                        message: err.to_string(),
                    })
                })?;
        Ok(TaskId::new(body.task_id))
    }
}

#[async_trait::async_trait]
impl SwapApi for HttpSwapApi {
    async fn submit(&self, request: &JobRequest) -> Result<TaskId, SubmitError> {
        let mut retries = 0u32;
        loop {
            match self.submit_once(request).await {
                Ok(task_id) => return Ok(task_id),
                Err(SubmitAttemptError::TimedOut) => {
                    if retries == self.settings.max_retries {
                        return Err(SubmitError::Timeout { retries });
                    }
                    retries += 1;
                    client_warn!(
                        "submission timed out, retry {}/{} in {:?}",
                        retries,
                        self.settings.max_retries,
                        self.settings.retry_delay
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                Err(SubmitAttemptError::Fatal(err)) => return Err(err),
            }
        }
    }

    async fn poll(&self, task_id: &TaskId) -> Result<StatusSnapshot, PollError> {
        let url = format!("{}/{}", self.endpoint(FACE_SWAP_STATUS_ENDPOINT), task_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PollError::Network {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Http {
                status: status.as_u16(),
            });
        }

        let body: StatusResponse =
            response
                .json()
                .await
                .map_err(|err| PollError::InvalidResponse {
                    message: err.to_string(),
                })?;
        Ok(body.task_status.into_snapshot())
    }

    async fn health(&self) -> Result<(), HealthError> {
        let response = self
            .client
            .get(self.endpoint(HEALTH_ENDPOINT))
            .send()
            .await
            .map_err(|err| HealthError {
                message: err.to_string(),
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HealthError {
                message: format!("health endpoint returned HTTP {}", status.as_u16()),
            })
        }
    }
}

enum SubmitAttemptError {
    TimedOut,
    Fatal(SubmitError),
}

fn build_form(request: &JobRequest) -> Result<Form, SubmitAttemptError> {
    let mut form = Form::new().part("file", image_part(&request.source)?);
    match &request.template {
        TemplateSelector::Catalog { id } => {
            form = form.text("template_id", id.clone());
        }
        TemplateSelector::Custom(payload) => {
            form = form
                .text("template_id", "custom")
                .part("template_file", image_part(payload)?);
        }
    }
    Ok(form
        .text("source_face_index", request.source_face_index.to_string())
        .text("target_face_index", request.target_face_index.to_string()))
}

fn image_part(payload: &crate::ImagePayload) -> Result<Part, SubmitAttemptError> {
    Part::bytes(payload.bytes.clone())
        .file_name(payload.file_name.clone())
        .mime_str(&payload.mime)
        .map_err(|err| {
            SubmitAttemptError::Fatal(SubmitError::InvalidResponse {
                message: format!("invalid MIME type {}: {err}", payload.mime),
            })
        })
}

fn map_submit_error(err: reqwest::Error) -> SubmitAttemptError {
    if err.is_timeout() {
        return SubmitAttemptError::TimedOut;
    }
    SubmitAttemptError::Fatal(SubmitError::Network {
        message: err.to_string(),
    })
}

fn translate_rejection(status: StatusCode, body: ErrorBody) -> SubmitError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        match body.detail {
            Some(ErrorDetail::Structured { error, .. }) if error == "queue_full" => {
                return SubmitError::QueueFull;
            }
            Some(ErrorDetail::Structured { message, .. }) => {
                return SubmitError::Rejected {
                    message: message.unwrap_or_else(|| {
                        "the service is busy, please try again later".to_string()
                    }),
                };
            }
            Some(ErrorDetail::Text(text)) => {
                return SubmitError::Rejected { message: text };
            }
            None => {}
        }
    }
    match body.detail {
        Some(ErrorDetail::Text(text)) => SubmitError::Rejected { message: text },
        _ => SubmitError::Rejected {
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown error")
            ),
        },
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    task_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    detail: Option<ErrorDetail>,
}

/// The `detail` field is heterogeneous on the wire: a plain string or a
/// structured object with an `error` discriminator.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        error: String,
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    task_status: RawTaskStatus,
}

#[derive(Debug, Deserialize)]
struct RawTaskStatus {
    status: String,
    #[serde(default)]
    progress: i64,
    #[serde(default)]
    message: String,
    result_url: Option<String>,
    template_name: Option<String>,
    error: Option<String>,
}

impl RawTaskStatus {
    fn into_snapshot(self) -> StatusSnapshot {
        let state = match self.status.as_str() {
            "completed" => JobState::Completed,
            "failed" => JobState::Failed,
            // Anything else counts as still in flight.
            _ => JobState::Processing,
        };
        StatusSnapshot {
            state,
            progress: self.progress.clamp(0, 100) as u8,
            message: self.message,
            result_url: self.result_url,
            template_name: self.template_name,
            error: self.error,
        }
    }
}
