//! Thread session state.
//!
//! One mutable session describes what the thread surface is showing:
//! nothing, a loading spinner, a loaded document, or an inline error. The
//! session is owned exclusively by the controller; consumers read cloned
//! snapshots.

use serde::{Deserialize, Serialize};

use crate::thread::document::ThreadDocument;

/// Maximum number of back-navigation snapshots kept.
pub const HISTORY_CAPACITY: usize = 10;

/// How the thread surface lays out a loaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Nested ancestor chain, focus, reply tree.
    #[default]
    Full,
    /// Flat chronological list.
    Linear,
}

impl ViewMode {
    /// Parses a wire tag; unknown tags are rejected, not defaulted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "full" => Some(ViewMode::Full),
            "linear" => Some(ViewMode::Linear),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            ViewMode::Full => "full",
            ViewMode::Linear => "linear",
        }
    }
}

/// Mutable thread session state.
///
/// Lifecycle: created empty at engine start, mutated only by controller
/// operations, reset to the empty baseline on a forced close - never
/// destroyed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadSession {
    pub active: bool,
    pub loading: bool,
    /// Human-readable fetch failure; empty when there is none.
    pub error: String,
    pub data: Option<ThreadDocument>,
    pub uri: Option<String>,
    pub view_mode: ViewMode,
    pub is_author_thread: bool,
    pub root_author_did: Option<String>,
    pub focus_author_did: Option<String>,
}

impl ThreadSession {
    /// The inactive baseline the session starts from and resets to.
    pub fn empty(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Default::default()
        }
    }

    /// True when a fetch failed and the error block should show.
    pub fn is_failed(&self) -> bool {
        self.active && !self.loading && !self.error.is_empty()
    }

    pub(crate) fn reset_classification(&mut self) {
        self.is_author_thread = false;
        self.root_author_did = None;
        self.focus_author_did = None;
    }
}

/// Capacity-bounded stack of session snapshots for back-navigation.
///
/// Pushing beyond capacity silently drops the oldest snapshot.
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<ThreadSession>,
}

impl HistoryStack {
    pub fn push(&mut self, snapshot: ThreadSession) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<ThreadSession> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ThreadSession] {
        &self.entries
    }
}
