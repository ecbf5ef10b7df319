//! Thread session engine.
//!
//! This module contains:
//! - `document`: thread document wire model
//! - `classify`: single-author thread detection
//! - `unroll`: flat chronological reading order
//! - `patch`: engagement updates pushed into loaded trees
//! - `session`: session state and bounded back-navigation history
//! - `controller`: the synchronous session state machine
//! - `engine`: the async consumer surface wiring controller to collaborators

pub mod classify;
pub mod controller;
pub mod document;
pub mod engine;
pub mod patch;
pub mod session;
pub mod unroll;

pub use classify::{classify, Classification};
pub use controller::{
    CloseAction, LoadOptions, LoadTicket, Settlement, ThreadSessionController,
};
pub use document::{
    resolved_timestamp, Author, ListEntry, PostRecord, PostStats, RawListItem, RawPost,
    ThreadDocument, ThreadNode, TimelineContext, Viewer,
};
pub use engine::{NoScroll, ScrollHost, ThreadEngine};
pub use patch::{patch_document, patch_thread_node, EngagementPatch};
pub use session::{HistoryStack, ThreadSession, ViewMode, HISTORY_CAPACITY};
pub use unroll::{author_timeline, sanitize_unroll_text};
