use chrono::{DateTime, Utc};

pub type EntryId = u64;

/// The log keeps only the most recent attempts; older entries are evicted.
pub const STATUS_LOG_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Processing,
    Completed,
    Error,
}

/// One recorded job attempt in the audit panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
    pub result_url: Option<String>,
    pub template_name: Option<String>,
}

/// Partial update merged into an existing entry; `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub description: Option<String>,
    pub kind: Option<EntryKind>,
    pub result_url: Option<String>,
    pub template_name: Option<String>,
}

/// Append-mostly record of recent job attempts, bounded to
/// [`STATUS_LOG_CAPACITY`] entries in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
    next_id: EntryId,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entry in creation order and returns its id.
    pub fn append(&mut self, title: impl Into<String>, description: impl Into<String>, kind: EntryKind) -> EntryId {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(StatusEntry {
            id,
            title: title.into(),
            description: description.into(),
            kind,
            created_at: Utc::now(),
            result_url: None,
            template_name: None,
        });
        id
    }

    /// Merges `update` into the matching entry. Unknown ids are a no-op: a
    /// trim may already have evicted the entry.
    pub fn update(&mut self, id: EntryId, update: EntryUpdate) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return;
        };
        if let Some(description) = update.description {
            entry.description = description;
        }
        if let Some(kind) = update.kind {
            entry.kind = kind;
        }
        if let Some(result_url) = update.result_url {
            entry.result_url = Some(result_url);
        }
        if let Some(template_name) = update.template_name {
            entry.template_name = Some(template_name);
        }
    }

    /// Evicts the oldest entries until the retention bound holds.
    pub fn trim(&mut self) {
        while self.entries.len() > STATUS_LOG_CAPACITY {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
