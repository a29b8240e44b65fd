#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Fired once at startup; triggers the backend health probe.
    Started,
    /// Outcome of the startup health probe.
    HealthReport { healthy: bool, message: String },
    /// User picked a source image (already read into memory).
    SourceSelected(crate::SelectedImage),
    /// User removed the source image.
    SourceCleared,
    /// User picked a template from the catalog.
    TemplatePicked { id: String },
    /// User uploaded a custom template image.
    CustomTemplateSelected(crate::SelectedImage),
    /// User removed the template selection.
    TemplateCleared,
    /// User adjusted which faces to swap (0-based).
    FaceIndicesChanged { source: u32, target: u32 },
    /// User clicked the process button.
    ProcessClicked,
    /// Transport accepted the submission and returned the job handle.
    SubmitAccepted {
        attempt: crate::AttemptId,
        task_id: String,
    },
    /// A poll snapshot arrived for the in-flight attempt.
    SnapshotArrived {
        attempt: crate::AttemptId,
        progress: u8,
        message: String,
    },
    /// The attempt reached its terminal completed state.
    AttemptCompleted {
        attempt: crate::AttemptId,
        result_url: String,
        template_name: Option<String>,
    },
    /// The attempt failed anywhere in the lifecycle; `message` is already
    /// user-facing.
    AttemptFailed {
        attempt: crate::AttemptId,
        message: String,
    },
    /// Clear selections and return to idle.
    ResetRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
