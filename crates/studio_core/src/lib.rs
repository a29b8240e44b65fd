//! Studio core: pure state machine and view-model helpers.
mod config;
mod effect;
mod msg;
mod state;
mod status_log;
mod update;
mod view_model;

pub use config::{
    format_file_size, guess_mime, template_name, TemplateSpec, UploadError, UploadLimits,
    TEMPLATE_CATALOG,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, AttemptId, LifecyclePhase, Notice, NoticeLevel, SelectedImage, SwapRequest,
    TemplateChoice,
};
pub use status_log::{EntryId, EntryKind, EntryUpdate, StatusEntry, StatusLog, STATUS_LOG_CAPACITY};
pub use update::update;
pub use view_model::{AppViewModel, StatusRowView};
