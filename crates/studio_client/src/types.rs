use std::fmt;

use thiserror::Error;

pub type AttemptId = u64;

/// Opaque server-issued identifier correlating a submission with its polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary image payload for a multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    /// Symbolic id from the fixed template catalog.
    Catalog { id: String },
    /// User-uploaded template image, sent as `template_file`.
    Custom(ImagePayload),
}

/// Immutable value describing one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub source: ImagePayload,
    pub template: TemplateSelector,
    pub source_face_index: u32,
    pub target_face_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Processing,
    Completed,
    Failed,
}

/// One poll response. Progress is not guaranteed to be monotonic across
/// snapshots, but the state only ever moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: JobState,
    pub progress: u8,
    pub message: String,
    pub result_url: Option<String>,
    pub template_name: Option<String>,
    pub error: Option<String>,
}

/// Terminal payload of a successfully completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    pub result_url: String,
    pub template_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    HealthChecked {
        result: Result<(), HealthError>,
    },
    Submitted {
        attempt: AttemptId,
        task_id: TaskId,
    },
    Snapshot {
        attempt: AttemptId,
        snapshot: StatusSnapshot,
    },
    Finished {
        attempt: AttemptId,
        result: Result<SwapResult, JobFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to set up the HTTP client: {message}")]
pub struct ApiSetupError {
    pub message: String,
}

/// Submission failures. The `Display` text doubles as the user-facing
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Every attempt hit the request timeout; `retries` reports how many
    /// retries were exhausted.
    #[error("submission timed out after {retries} retries, please try again later")]
    Timeout { retries: u32 },
    /// The service returned 503 with the structured `queue_full` marker.
    #[error("the service is busy and its queue is full, please try again later")]
    QueueFull,
    /// The server rejected the job; its detail message is surfaced verbatim.
    #[error("{message}")]
    Rejected { message: String },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("malformed response from the service: {message}")]
    InvalidResponse { message: String },
}

/// A single status query failing is a hard failure; the poll loop does not
/// retry it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("status query failed: HTTP {status}")]
    Http { status: u16 },
    #[error("network error while polling: {message}")]
    Network { message: String },
    #[error("malformed status response: {message}")]
    InvalidResponse { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot reach the backend service: {message}")]
pub struct HealthError {
    pub message: String,
}

/// Why a job lifecycle ended in the failed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    #[error(transparent)]
    Submit(SubmitError),
    #[error(transparent)]
    StatusQuery(PollError),
    /// The service itself reported the job as failed.
    #[error("{0}")]
    Reported(String),
    /// A `completed` snapshot arrived without a usable result reference.
    #[error("the service reported completion without a result image")]
    MissingResult,
    /// Client-side bound on total polling time elapsed; distinct from the
    /// service ever reporting failure.
    #[error("processing timed out, check results later or resubmit")]
    TimedOut,
}
