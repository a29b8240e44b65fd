use crate::config::{template_name, UploadError, UploadLimits};
use crate::status_log::{EntryId, EntryKind, EntryUpdate, StatusEntry, StatusLog};
use crate::view_model::{AppViewModel, StatusRowView};

pub type AttemptId = u64;

/// An image the user has picked, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Which template the job should composite against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateChoice {
    Catalog { id: String },
    Custom(SelectedImage),
}

/// Immutable payload of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub source: SelectedImage,
    pub template: TemplateChoice,
    pub source_face_index: u32,
    pub target_face_index: u32,
}

/// Lifecycle of the single in-flight attempt. `Submitting` and `Polling`
/// are the in-flight states; `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Idle,
    Submitting,
    Polling {
        task_id: String,
        progress: u8,
        message: String,
    },
    Completed {
        result_url: String,
        template_name: Option<String>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient feedback line for the last user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentAttempt {
    attempt: AttemptId,
    entry: EntryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    limits: UploadLimits,
    source: Option<SelectedImage>,
    template: Option<TemplateChoice>,
    source_face_index: u32,
    target_face_index: u32,
    phase: LifecyclePhase,
    log: StatusLog,
    attempt_seq: AttemptId,
    current: Option<CurrentAttempt>,
    backend_warning: Option<String>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: UploadLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            can_process: self.can_process(),
            in_flight: self.in_flight(),
            source_name: self.source.as_ref().map(|image| image.file_name.clone()),
            template_label: self.template.as_ref().map(template_label),
            phase: self.phase.clone(),
            backend_warning: self.backend_warning.clone(),
            notice: self.notice.clone(),
            status_rows: self.log.entries().iter().map(status_row).collect(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it, so renders coalesce.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Mutual-exclusion guard: at most one attempt runs at a time.
    pub fn in_flight(&self) -> bool {
        matches!(
            self.phase,
            LifecyclePhase::Submitting | LifecyclePhase::Polling { .. }
        )
    }

    pub fn can_process(&self) -> bool {
        self.source.is_some() && self.template.is_some() && !self.in_flight()
    }

    pub fn status_entries(&self) -> &[StatusEntry] {
        self.log.entries()
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn set_backend_warning(&mut self, warning: Option<String>) {
        self.backend_warning = warning;
        self.dirty = true;
    }

    pub(crate) fn validate_upload(&self, image: &SelectedImage) -> Result<(), UploadError> {
        self.limits.validate(image)
    }

    pub(crate) fn set_source(&mut self, image: Option<SelectedImage>) {
        self.source = image;
        self.dirty = true;
    }

    pub(crate) fn set_template(&mut self, template: Option<TemplateChoice>) {
        self.template = template;
        self.dirty = true;
    }

    pub(crate) fn set_face_indices(&mut self, source: u32, target: u32) {
        self.source_face_index = source;
        self.target_face_index = target;
        self.dirty = true;
    }

    /// Starts a new attempt: allocates its id, opens the status entry and
    /// moves the phase to `Submitting` before any I/O begins.
    pub(crate) fn begin_attempt(&mut self) -> Option<(AttemptId, SwapRequest)> {
        let (source, template) = match (&self.source, &self.template) {
            (Some(source), Some(template)) => (source.clone(), template.clone()),
            _ => return None,
        };
        self.attempt_seq += 1;
        let attempt = self.attempt_seq;
        let label = template_label(&template);
        let entry = self.log.append(
            "AI face swap",
            format!("template: {label}"),
            EntryKind::Processing,
        );
        self.current = Some(CurrentAttempt { attempt, entry });
        self.phase = LifecyclePhase::Submitting;
        self.dirty = true;
        Some((
            attempt,
            SwapRequest {
                source,
                template,
                source_face_index: self.source_face_index,
                target_face_index: self.target_face_index,
            },
        ))
    }

    pub(crate) fn apply_accepted(&mut self, attempt: AttemptId, task_id: String) {
        if !self.is_current(attempt) || self.phase != LifecyclePhase::Submitting {
            return;
        }
        let short_id: String = task_id.chars().take(8).collect();
        self.update_current_entry(EntryUpdate {
            description: Some(format!("job accepted (id: {short_id}…), processing")),
            ..EntryUpdate::default()
        });
        self.phase = LifecyclePhase::Polling {
            task_id,
            progress: 0,
            message: "preparing".to_string(),
        };
        self.dirty = true;
    }

    pub(crate) fn apply_snapshot(&mut self, attempt: AttemptId, progress: u8, message: String) {
        if !self.is_current(attempt) {
            return;
        }
        let LifecyclePhase::Polling { task_id, .. } = &self.phase else {
            return;
        };
        let task_id = task_id.clone();
        self.update_current_entry(EntryUpdate {
            description: Some(format!("{message} ({progress}%)")),
            ..EntryUpdate::default()
        });
        self.phase = LifecyclePhase::Polling {
            task_id,
            progress,
            message,
        };
        self.dirty = true;
    }

    pub(crate) fn apply_completed(
        &mut self,
        attempt: AttemptId,
        result_url: String,
        template_name: Option<String>,
    ) {
        if !self.is_current(attempt) {
            return;
        }
        let label = template_name.as_deref().unwrap_or("unknown template");
        self.update_current_entry(EntryUpdate {
            description: Some(format!("done! template: {label}")),
            kind: Some(EntryKind::Completed),
            result_url: Some(result_url.clone()),
            template_name: template_name.clone(),
        });
        self.log.trim();
        self.current = None;
        self.phase = LifecyclePhase::Completed {
            result_url,
            template_name,
        };
        self.dirty = true;
    }

    pub(crate) fn apply_failed(&mut self, attempt: AttemptId, message: String) {
        if !self.is_current(attempt) {
            return;
        }
        self.update_current_entry(EntryUpdate {
            description: Some(format!("failed: {message}")),
            kind: Some(EntryKind::Error),
            ..EntryUpdate::default()
        });
        self.log.trim();
        self.current = None;
        self.notice = Some(Notice::error(format!("face swap failed: {message}")));
        self.phase = LifecyclePhase::Failed { message };
        self.dirty = true;
    }

    /// Reinitializes the session: nothing selected, not processing. The
    /// status log survives as the audit trail.
    pub(crate) fn reset(&mut self) {
        self.source = None;
        self.template = None;
        self.source_face_index = 0;
        self.target_face_index = 0;
        self.phase = LifecyclePhase::Idle;
        self.current = None;
        self.notice = None;
        self.dirty = true;
    }

    fn is_current(&self, attempt: AttemptId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.attempt == attempt)
    }

    fn update_current_entry(&mut self, update: EntryUpdate) {
        if let Some(current) = &self.current {
            self.log.update(current.entry, update);
        }
    }
}

fn template_label(template: &TemplateChoice) -> String {
    match template {
        TemplateChoice::Catalog { id } => template_name(id).unwrap_or("unknown template").to_string(),
        TemplateChoice::Custom(_) => "custom template".to_string(),
    }
}

fn status_row(entry: &StatusEntry) -> StatusRowView {
    StatusRowView {
        id: entry.id,
        kind: entry.kind,
        title: entry.title.clone(),
        description: entry.description.clone(),
        created_at: entry.created_at,
        result_url: entry.result_url.clone(),
        template_name: entry.template_name.clone(),
    }
}
