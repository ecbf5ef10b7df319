//! Thread document wire model.
//!
//! These types mirror the JSON the thread service returns for
//! `GET /api/thread`: a focus post, its ancestor chain (outermost first,
//! focus excluded), and the reply subtree hanging off the focus. Unknown
//! fields are tolerated so the model survives service-side additions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Post author identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Author {
    /// Stable decentralized identifier (`did:plc:...`).
    pub did: String,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Engagement counters as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostStats {
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
}

/// The requesting account's relationship to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Viewer {
    /// Record uri of this account's like, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<String>,
    /// Record uri of this account's repost, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repost: Option<String>,
    pub bookmarked: bool,
}

/// Embedded record payload carried alongside a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A single post node in a thread tree.
///
/// `uri` uniquely identifies a node within one document; `replies` are the
/// node's direct children only. The reply order is whatever the service
/// sent, which is not guaranteed to be chronological.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThreadNode {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Timestamp assigned when the service indexed the post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PostRecord>,
    /// Media/quote embed, passed through untyped for the presentation layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PostStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Viewer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ThreadNode>,
}

/// Timeline context surrounding the focus post ("previously in the
/// timeline"). Carried through untouched; only the presentation layer
/// consumes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineContext {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<ThreadNode>,
}

/// Result of fetching a thread by uri.
///
/// `parents` runs outermost ancestor first and excludes the focus node.
/// When `focus` is absent the document is treated as empty by every
/// algorithm regardless of what `parents` contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThreadDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<ThreadNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ThreadNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<TimelineContext>,
}

/// A list item as handed over by feed/search/notification surfaces.
///
/// Surfaces are inconsistent about where the post uri lives: reposts and
/// notification rows carry it on a nested raw post instead of the top
/// level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawListItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawListItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<RawPost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl ListEntry {
    /// Derives the thread identifier: top-level uri first, nested raw-post
    /// uri as fallback. Empty strings count as absent.
    pub fn thread_uri(&self) -> Option<&str> {
        let top = self.uri.as_deref().filter(|u| !u.is_empty());
        top.or_else(|| {
            self.raw
                .as_ref()?
                .post
                .as_ref()?
                .uri
                .as_deref()
                .filter(|u| !u.is_empty())
        })
    }
}

impl ThreadNode {
    /// Author did, treating an empty did as absent.
    pub fn author_did(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.did.as_str())
            .filter(|did| !did.is_empty())
    }
}

/// Resolves a node's timestamp for chronological ordering.
///
/// Candidate precedence: explicit `createdAt`, then the embedded record's
/// `createdAt`, then the service's `indexedAt`. The first candidate that is
/// present is parsed; absence or an unparseable value resolves to the unix
/// epoch so such nodes sort first.
pub fn resolved_timestamp(node: &ThreadNode) -> DateTime<Utc> {
    let created = node
        .created_at
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| {
            node.record
                .as_ref()
                .and_then(|r| r.created_at.as_deref())
                .filter(|t| !t.is_empty())
        });
    let candidate = created.or_else(|| node.indexed_at.as_deref().filter(|t| !t.is_empty()));

    candidate
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}
