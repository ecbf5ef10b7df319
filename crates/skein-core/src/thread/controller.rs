//! Thread session controller.
//!
//! Owns the session, the back-navigation history, the request sequence, and
//! the remembered scroll offset as private fields of one value. The
//! controller is synchronous: operations that need a fetch stage the state
//! transition and hand back a [`LoadTicket`]; the driver performs the fetch
//! and reports back through [`ThreadSessionController::settle`], where the
//! staleness fence decides whether the result may commit.
//!
//! Ordering guarantee: only the most recently issued load may ever commit,
//! regardless of arrival order. Cancellation is purely logical - an
//! obsolete fetch runs to completion and its settlement is discarded.

use crate::api::ApiError;
use crate::thread::classify::classify;
use crate::thread::document::ThreadDocument;
use crate::thread::patch::{patch_document, EngagementPatch};
use crate::thread::session::{HistoryStack, ThreadSession, ViewMode};

/// Fence token captured when a load is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

#[derive(Debug, Default)]
struct RequestSeq {
    current: u64,
}

impl RequestSeq {
    fn issue(&mut self) -> LoadToken {
        self.current = self.current.wrapping_add(1);
        LoadToken(self.current)
    }

    /// Fences out every outstanding token without issuing a new one.
    fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    fn is_current(&self, token: LoadToken) -> bool {
        token.0 == self.current
    }
}

/// A staged load: the fence token plus the normalized identifier to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    token: LoadToken,
    uri: String,
}

impl LoadTicket {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Options for [`ThreadSessionController::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Capture the viewport offset before navigating (driver concern).
    pub remember_scroll: bool,
    /// Snapshot the current session when navigating away from a different
    /// active thread.
    pub push_history: bool,
    /// View mode for the new session; `None` applies the configured default.
    pub view_mode: Option<ViewMode>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            remember_scroll: false,
            push_history: true,
            view_mode: None,
        }
    }
}

/// What a settlement did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Result was current and committed.
    Committed,
    /// Failure was current and recorded as the session error.
    Failed,
    /// A later load superseded this one; the result was discarded.
    Stale,
}

/// What the driver must do after a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// A history snapshot was restored verbatim; leave the viewport alone.
    Restored,
    /// Session reset to the empty baseline; restore the remembered offset.
    Reset { scroll_offset: u32 },
}

/// State machine over [`ThreadSession`].
#[derive(Debug)]
pub struct ThreadSessionController {
    session: ThreadSession,
    history: HistoryStack,
    seq: RequestSeq,
    saved_scroll: u32,
    default_view_mode: ViewMode,
}

impl ThreadSessionController {
    pub fn new(default_view_mode: ViewMode) -> Self {
        Self {
            session: ThreadSession::empty(default_view_mode),
            history: HistoryStack::default(),
            seq: RequestSeq::default(),
            saved_scroll: 0,
            default_view_mode,
        }
    }

    pub fn session(&self) -> &ThreadSession {
        &self.session
    }

    /// Read-only view of the back-navigation snapshots, oldest first.
    pub fn history(&self) -> &[ThreadSession] {
        self.history.entries()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Stores the viewport offset to restore on the next full close.
    pub fn remember_scroll(&mut self, offset: u32) {
        self.saved_scroll = offset;
    }

    /// Stages a load for `identifier`.
    ///
    /// A blank identifier is a no-op and returns `None` without touching the
    /// session. Otherwise the session flips to loading - keeping the
    /// current document only when refetching the same thread, so the
    /// surface does not flash empty - and the caller gets the ticket to
    /// settle once the fetch finishes.
    pub fn begin_load(&mut self, identifier: &str, opts: LoadOptions) -> Option<LoadTicket> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return None;
        }

        let token = self.seq.issue();
        let same_thread = self.session.uri.as_deref() == Some(normalized);

        if opts.push_history && self.session.active && !same_thread {
            self.history.push(self.session.clone());
        }

        self.session.active = true;
        self.session.loading = true;
        self.session.error.clear();
        if !same_thread {
            self.session.data = None;
            self.session.reset_classification();
        }
        self.session.uri = Some(normalized.to_string());
        self.session.view_mode = opts.view_mode.unwrap_or(self.default_view_mode);

        Some(LoadTicket {
            token,
            uri: normalized.to_string(),
        })
    }

    /// Stages a refetch of the current thread, keeping view mode and
    /// history untouched. No-op when no thread is active.
    pub fn begin_reload(&mut self) -> Option<LoadTicket> {
        if !self.session.active {
            return None;
        }
        let uri = self.session.uri.clone()?;
        self.begin_load(
            &uri,
            LoadOptions {
                remember_scroll: false,
                push_history: false,
                view_mode: Some(self.session.view_mode),
            },
        )
    }

    /// Applies a fetch result. The ticket must still be current, otherwise
    /// the result is discarded unconditionally.
    pub fn settle(
        &mut self,
        ticket: &LoadTicket,
        result: Result<ThreadDocument, ApiError>,
    ) -> Settlement {
        if !self.seq.is_current(ticket.token) {
            tracing::debug!(uri = %ticket.uri, "discarding superseded thread fetch");
            return Settlement::Stale;
        }

        match result {
            Ok(document) => {
                let meta = classify(&document);
                self.session.active = true;
                self.session.loading = false;
                self.session.error.clear();
                self.session.data = Some(document);
                self.session.uri = Some(ticket.uri.clone());
                self.session.is_author_thread = meta.is_author_thread;
                self.session.root_author_did = meta.root_author_did;
                self.session.focus_author_did = meta.focus_author_did;
                Settlement::Committed
            }
            Err(error) => {
                self.session.active = true;
                self.session.loading = false;
                self.session.data = None;
                self.session.uri = Some(ticket.uri.clone());
                self.session.error = if error.message.is_empty() {
                    "Failed to load thread.".to_string()
                } else {
                    error.message
                };
                self.session.reset_classification();
                Settlement::Failed
            }
        }
    }

    /// Closes the thread surface.
    ///
    /// Always fences out in-flight fetches. Without `force`, a non-empty
    /// history pops its most recent snapshot back into the session (no
    /// refetch, no revalidation). Forced - or with empty history - the
    /// session resets to the empty baseline, history clears entirely, and
    /// the driver is told to restore the remembered viewport offset.
    pub fn close(&mut self, force: bool) -> CloseAction {
        self.seq.invalidate();

        if !force && let Some(previous) = self.history.pop() {
            self.session = previous;
            return CloseAction::Restored;
        }

        self.history.clear();
        self.session = ThreadSession::empty(self.default_view_mode);
        CloseAction::Reset {
            scroll_offset: self.saved_scroll,
        }
    }

    /// Commits a recognized view mode tag; anything else is ignored.
    pub fn set_view_mode(&mut self, tag: &str) {
        if let Some(mode) = ViewMode::from_tag(tag) {
            self.session.view_mode = mode;
        }
    }

    /// Pushes an engagement update into the loaded document, if any.
    /// History snapshots are left untouched.
    pub fn apply_engagement(&mut self, target_uri: &str, patch: &EngagementPatch) -> bool {
        match self.session.data.as_mut() {
            Some(document) => patch_document(document, target_uri, patch),
            None => false,
        }
    }
}
