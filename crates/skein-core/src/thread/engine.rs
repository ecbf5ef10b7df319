//! Async thread engine.
//!
//! [`ThreadEngine`] is the consumer surface the rest of the client talks
//! to. It owns a [`ThreadSessionController`] behind a mutex and wires it to
//! two collaborators: a [`ThreadSource`] for remote fetches and a
//! [`ScrollHost`] for the viewport. Controller staging happens under the
//! lock; the fetch itself runs with the lock released, so any number of
//! loads can be in flight while the token fence keeps exactly the most
//! recently issued one eligible to commit.
//!
//! No component other than the engine mutates session fields; consumers
//! read cloned snapshots.

use std::sync::Mutex;

use crate::api::ThreadSource;
use crate::thread::controller::{
    CloseAction, LoadOptions, LoadTicket, Settlement, ThreadSessionController,
};
use crate::thread::document::ListEntry;
use crate::thread::patch::EngagementPatch;
use crate::thread::session::{ThreadSession, ViewMode};

/// Viewport collaborator used to remember and restore the scroll position
/// around thread navigation.
pub trait ScrollHost {
    fn scroll_offset(&self) -> u32;
    fn set_scroll_offset(&self, offset: u32);
}

/// Scroll host for headless consumers (CLI, tests without a viewport).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScroll;

impl ScrollHost for NoScroll {
    fn scroll_offset(&self) -> u32 {
        0
    }

    fn set_scroll_offset(&self, _offset: u32) {}
}

/// Stateful thread surface driver.
pub struct ThreadEngine<S, H = NoScroll> {
    controller: Mutex<ThreadSessionController>,
    source: S,
    scroll: H,
}

impl<S: ThreadSource, H: ScrollHost> ThreadEngine<S, H> {
    pub fn new(source: S, scroll: H, default_view_mode: ViewMode) -> Self {
        Self {
            controller: Mutex::new(ThreadSessionController::new(default_view_mode)),
            source,
            scroll,
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> ThreadSession {
        self.lock().session().clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock().session().view_mode
    }

    pub fn history_len(&self) -> usize {
        self.lock().history_len()
    }

    /// Snapshot of the back-navigation history, oldest first.
    pub fn history(&self) -> Vec<ThreadSession> {
        self.lock().history().to_vec()
    }

    /// Loads a thread. Blank identifiers are ignored; fetch failures land
    /// in `session.error` instead of propagating.
    pub async fn load(&self, identifier: &str, opts: LoadOptions) {
        let ticket = {
            let mut ctrl = self.lock();
            if opts.remember_scroll {
                ctrl.remember_scroll(self.scroll.scroll_offset());
            }
            ctrl.begin_load(identifier, opts)
        };
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Opens the thread a list item points at.
    ///
    /// Items without a derivable uri are ignored, as is reselecting the
    /// thread that is already open (no duplicate fetch). Opening from a
    /// cold surface remembers the scroll position; navigating on top of an
    /// open thread snapshots it into history instead.
    pub async fn select_from_list_item(&self, entry: &ListEntry) {
        let ticket = {
            let mut ctrl = self.lock();
            let Some(uri) = entry.thread_uri() else {
                return;
            };
            if ctrl.session().uri.as_deref() == Some(uri) {
                return;
            }
            let opts = LoadOptions {
                remember_scroll: !ctrl.session().active,
                push_history: ctrl.session().active,
                view_mode: None,
            };
            if opts.remember_scroll {
                ctrl.remember_scroll(self.scroll.scroll_offset());
            }
            let uri = uri.to_string();
            ctrl.begin_load(&uri, opts)
        };
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Refetches the current thread without touching history. No-op when
    /// nothing is active.
    pub async fn reload(&self) {
        let ticket = self.lock().begin_reload();
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Closes the surface: pops history if possible, otherwise resets to
    /// the baseline and restores the remembered viewport offset. In-flight
    /// fetches are fenced out either way.
    pub fn close(&self, force: bool) {
        let action = self.lock().close(force);
        if let CloseAction::Reset { scroll_offset } = action {
            self.scroll.set_scroll_offset(scroll_offset);
        }
    }

    /// Commits a recognized view mode tag; unknown tags are ignored.
    pub fn set_view_mode(&self, tag: &str) {
        self.lock().set_view_mode(tag);
    }

    /// Pushes an engagement update into the loaded document.
    pub fn apply_engagement(&self, target_uri: &str, patch: &EngagementPatch) -> bool {
        self.lock().apply_engagement(target_uri, patch)
    }

    async fn run_fetch(&self, ticket: LoadTicket) {
        let result = self.source.fetch_thread(ticket.uri()).await;
        if let Err(error) = &result {
            tracing::warn!(uri = %ticket.uri(), %error, "thread fetch failed");
        }
        let outcome = self.lock().settle(&ticket, result);
        if outcome == Settlement::Stale {
            tracing::debug!(uri = %ticket.uri(), "superseded thread fetch discarded");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThreadSessionController> {
        self.controller
            .lock()
            .expect("thread controller lock poisoned")
    }
}
