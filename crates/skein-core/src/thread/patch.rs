//! Engagement patching for loaded thread trees.
//!
//! Like/repost/bookmark actions elsewhere in the client update counts and
//! viewer state on posts that are already on screen; the thread view gets
//! the same update pushed into its document instead of refetching.

use crate::thread::document::{PostStats, ThreadDocument, ThreadNode, Viewer};

/// A partial engagement update targeted at one post uri.
///
/// `Some(None)` on a record-uri field clears it (un-like / un-repost);
/// absolute counts replace, deltas adjust and saturate at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngagementPatch {
    pub like_uri: Option<Option<String>>,
    pub repost_uri: Option<Option<String>>,
    pub bookmarked: Option<bool>,
    pub like_count: Option<u64>,
    pub repost_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub like_delta: Option<i64>,
    pub repost_delta: Option<i64>,
    pub reply_delta: Option<i64>,
}

impl EngagementPatch {
    /// Patch for a fresh like carrying the created record uri.
    pub fn liked(like_uri: impl Into<String>) -> Self {
        Self {
            like_uri: Some(Some(like_uri.into())),
            like_delta: Some(1),
            ..Default::default()
        }
    }

    /// Patch for removing a like.
    pub fn unliked() -> Self {
        Self {
            like_uri: Some(None),
            like_delta: Some(-1),
            ..Default::default()
        }
    }

    /// Patch for a fresh repost carrying the created record uri.
    pub fn reposted(repost_uri: impl Into<String>) -> Self {
        Self {
            repost_uri: Some(Some(repost_uri.into())),
            repost_delta: Some(1),
            ..Default::default()
        }
    }

    /// Patch for removing a repost.
    pub fn unreposted() -> Self {
        Self {
            repost_uri: Some(None),
            repost_delta: Some(-1),
            ..Default::default()
        }
    }

    fn touches_viewer(&self) -> bool {
        self.like_uri.is_some() || self.repost_uri.is_some() || self.bookmarked.is_some()
    }

    fn touches_stats(&self) -> bool {
        self.like_count.is_some()
            || self.repost_count.is_some()
            || self.reply_count.is_some()
            || self.like_delta.is_some()
            || self.repost_delta.is_some()
            || self.reply_delta.is_some()
    }
}

fn adjusted(count: u64, delta: i64) -> u64 {
    u64::try_from(i64::try_from(count).unwrap_or(i64::MAX).saturating_add(delta)).unwrap_or(0)
}

fn apply_to_node(node: &mut ThreadNode, patch: &EngagementPatch) {
    if patch.touches_viewer() {
        let viewer = node.viewer.get_or_insert_with(Viewer::default);
        if let Some(like) = &patch.like_uri {
            viewer.like = like.clone();
        }
        if let Some(repost) = &patch.repost_uri {
            viewer.repost = repost.clone();
        }
        if let Some(bookmarked) = patch.bookmarked {
            viewer.bookmarked = bookmarked;
        }
    }

    if patch.touches_stats() {
        let stats = node.stats.get_or_insert_with(PostStats::default);
        if let Some(count) = patch.like_count {
            stats.like_count = count;
        }
        if let Some(count) = patch.repost_count {
            stats.repost_count = count;
        }
        if let Some(count) = patch.reply_count {
            stats.reply_count = count;
        }
        if let Some(delta) = patch.like_delta {
            stats.like_count = adjusted(stats.like_count, delta);
        }
        if let Some(delta) = patch.repost_delta {
            stats.repost_count = adjusted(stats.repost_count, delta);
        }
        if let Some(delta) = patch.reply_delta {
            stats.reply_count = adjusted(stats.reply_count, delta);
        }
    }
}

/// Patches `node` and its whole reply subtree. Returns true if any node
/// matched the target uri.
pub fn patch_thread_node(node: &mut ThreadNode, target_uri: &str, patch: &EngagementPatch) -> bool {
    let mut changed = false;
    if node.uri == target_uri {
        apply_to_node(node, patch);
        changed = true;
    }
    for reply in &mut node.replies {
        changed |= patch_thread_node(reply, target_uri, patch);
    }
    changed
}

/// Patches every occurrence of the target uri across focus, ancestor chain,
/// and reply subtree. Returns true if anything matched.
pub fn patch_document(document: &mut ThreadDocument, target_uri: &str, patch: &EngagementPatch) -> bool {
    let mut changed = false;
    if let Some(focus) = document.focus.as_mut() {
        changed |= patch_thread_node(focus, target_uri, patch);
    }
    for parent in &mut document.parents {
        changed |= patch_thread_node(parent, target_uri, patch);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uri: &str) -> ThreadNode {
        ThreadNode {
            uri: uri.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_reaches_nested_reply() {
        let mut deep = node("at://x/deep");
        deep.stats = Some(PostStats {
            like_count: 4,
            ..Default::default()
        });
        let mut mid = node("at://x/mid");
        mid.replies = vec![deep];
        let mut doc = ThreadDocument {
            focus: Some({
                let mut focus = node("at://x/f");
                focus.replies = vec![mid];
                focus
            }),
            ..Default::default()
        };

        let changed = patch_document(&mut doc, "at://x/deep", &EngagementPatch::liked("at://x/like/1"));
        assert!(changed);

        let focus = doc.focus.unwrap();
        let deep = &focus.replies[0].replies[0];
        assert_eq!(deep.stats.unwrap().like_count, 5);
        assert_eq!(deep.viewer.as_ref().unwrap().like.as_deref(), Some("at://x/like/1"));
    }

    #[test]
    fn test_patch_matches_parents() {
        let mut doc = ThreadDocument {
            focus: Some(node("at://x/f")),
            parents: vec![node("at://x/p0"), node("at://x/p1")],
            ..Default::default()
        };
        let changed = patch_document(&mut doc, "at://x/p1", &EngagementPatch::reposted("at://x/rp/1"));
        assert!(changed);
        assert_eq!(
            doc.parents[1].viewer.as_ref().unwrap().repost.as_deref(),
            Some("at://x/rp/1")
        );
        assert!(doc.parents[0].viewer.is_none());
    }

    #[test]
    fn test_unlike_clears_uri_and_saturates_at_zero() {
        let mut target = node("at://x/f");
        target.viewer = Some(Viewer {
            like: Some("at://x/like/1".to_string()),
            ..Default::default()
        });
        let mut doc = ThreadDocument {
            focus: Some(target),
            ..Default::default()
        };

        // No stats on the node yet: the delta lands on a fresh zero counter.
        let changed = patch_document(&mut doc, "at://x/f", &EngagementPatch::unliked());
        assert!(changed);
        let focus = doc.focus.unwrap();
        assert_eq!(focus.viewer.as_ref().unwrap().like, None);
        assert_eq!(focus.stats.unwrap().like_count, 0);
    }

    #[test]
    fn test_absolute_counts_apply_before_deltas() {
        let mut doc = ThreadDocument {
            focus: Some(node("at://x/f")),
            ..Default::default()
        };
        let patch = EngagementPatch {
            reply_count: Some(10),
            reply_delta: Some(-3),
            ..Default::default()
        };
        patch_document(&mut doc, "at://x/f", &patch);
        assert_eq!(doc.focus.unwrap().stats.unwrap().reply_count, 7);
    }

    #[test]
    fn test_no_match_reports_unchanged() {
        let mut doc = ThreadDocument {
            focus: Some(node("at://x/f")),
            ..Default::default()
        };
        assert!(!patch_document(&mut doc, "at://x/other", &EngagementPatch::unliked()));
        assert!(doc.focus.unwrap().viewer.is_none());
    }
}
