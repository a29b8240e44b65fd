//! Studio client: HTTP transport for the asynchronous face-swap service.
mod api;
mod handle;
mod types;
mod watch;

pub use api::{ApiSettings, HttpSwapApi, SwapApi};
pub use handle::{ClientCommander, ClientHandle};
pub use types::{
    ApiSetupError, AttemptId, ClientEvent, HealthError, ImagePayload, JobFailure, JobRequest,
    JobState, PollError, StatusSnapshot, SubmitError, SwapResult, TaskId, TemplateSelector,
};
pub use watch::{poll_until_terminal, ChannelStatusSink, StatusSink};
