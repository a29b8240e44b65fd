#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Probe the backend `/health` endpoint once at startup.
    CheckHealth,
    /// Submit a face-swap job and watch it to a terminal state.
    SubmitJob {
        attempt: crate::AttemptId,
        request: crate::SwapRequest,
    },
}
