use chrono::{DateTime, Utc};

use crate::status_log::{EntryId, EntryKind};
use crate::{LifecyclePhase, Notice};

/// Pure projection of [`crate::AppState`] for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub can_process: bool,
    pub in_flight: bool,
    pub source_name: Option<String>,
    pub template_label: Option<String>,
    pub phase: LifecyclePhase,
    pub backend_warning: Option<String>,
    pub notice: Option<Notice>,
    pub status_rows: Vec<StatusRowView>,
    pub dirty: bool,
}

/// One row of the status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRowView {
    pub id: EntryId,
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub result_url: Option<String>,
    pub template_name: Option<String>,
}
