//! Author-thread classification.
//!
//! Decides whether a loaded document is a single-author self-reply chain,
//! which gates the unroll reading surface. Classification is advisory: it
//! runs after every successful fetch, and any shape it cannot make sense of
//! degrades to the neutral result instead of failing navigation.

use crate::thread::document::ThreadDocument;

/// Outcome of classifying a thread document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_author_thread: bool,
    pub root_author_did: Option<String>,
    pub focus_author_did: Option<String>,
}

/// Classifies a document, first matching rule wins:
///
/// 1. No focus: neutral.
/// 2. Focus has an author and ancestors exist: the outermost ancestor's
///    author is the root; it is an author thread iff root and focus author
///    match.
/// 3. Focus has an author and no ancestors: the focus is its own root when
///    any direct reply shares its author (a self-continuation in progress).
/// 4. Focus without an author: not an author thread; the root author is
///    still reported when the outermost ancestor has one.
pub fn classify(document: &ThreadDocument) -> Classification {
    let Some(focus) = document.focus.as_ref() else {
        return Classification::default();
    };

    let focus_author = focus.author_did().map(str::to_string);
    let outermost_author = document
        .parents
        .first()
        .and_then(|parent| parent.author_did())
        .map(str::to_string);

    match focus_author {
        Some(did) if !document.parents.is_empty() => Classification {
            is_author_thread: outermost_author.as_deref() == Some(did.as_str()),
            root_author_did: outermost_author,
            focus_author_did: Some(did),
        },
        Some(did) => {
            let continues_itself = focus
                .replies
                .iter()
                .any(|reply| reply.author_did() == Some(did.as_str()));
            if continues_itself {
                Classification {
                    is_author_thread: true,
                    root_author_did: Some(did.clone()),
                    focus_author_did: Some(did),
                }
            } else {
                Classification {
                    is_author_thread: false,
                    root_author_did: None,
                    focus_author_did: Some(did),
                }
            }
        }
        None => Classification {
            is_author_thread: false,
            root_author_did: outermost_author,
            focus_author_did: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::document::{Author, ThreadNode};

    fn authored(uri: &str, did: &str) -> ThreadNode {
        ThreadNode {
            uri: uri.to_string(),
            author: Some(Author {
                did: did.to_string(),
                handle: format!("{}.example", &did[did.len().saturating_sub(1)..]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_focus_is_neutral() {
        let doc = ThreadDocument {
            focus: None,
            parents: vec![authored("at://x/1", "did:plc:a")],
            ..Default::default()
        };
        assert_eq!(classify(&doc), Classification::default());
    }

    #[test]
    fn test_same_root_author_is_author_thread() {
        let doc = ThreadDocument {
            focus: Some(authored("at://x/3", "did:plc:a")),
            parents: vec![authored("at://x/1", "did:plc:a"), authored("at://x/2", "did:plc:b")],
            ..Default::default()
        };
        let meta = classify(&doc);
        assert!(meta.is_author_thread);
        assert_eq!(meta.root_author_did.as_deref(), Some("did:plc:a"));
        assert_eq!(meta.focus_author_did.as_deref(), Some("did:plc:a"));
    }

    #[test]
    fn test_different_root_author_is_not_author_thread() {
        let doc = ThreadDocument {
            focus: Some(authored("at://x/2", "did:plc:a")),
            parents: vec![authored("at://x/1", "did:plc:b")],
            ..Default::default()
        };
        let meta = classify(&doc);
        assert!(!meta.is_author_thread);
        assert_eq!(meta.root_author_did.as_deref(), Some("did:plc:b"));
        assert_eq!(meta.focus_author_did.as_deref(), Some("did:plc:a"));
    }

    #[test]
    fn test_rootless_focus_with_self_reply_is_author_thread() {
        let mut focus = authored("at://x/1", "did:plc:a");
        focus.replies = vec![authored("at://x/2", "did:plc:a")];
        let doc = ThreadDocument {
            focus: Some(focus),
            ..Default::default()
        };
        let meta = classify(&doc);
        assert!(meta.is_author_thread);
        assert_eq!(meta.root_author_did.as_deref(), Some("did:plc:a"));
    }

    #[test]
    fn test_rootless_focus_with_foreign_replies_only() {
        let mut focus = authored("at://x/1", "did:plc:a");
        focus.replies = vec![authored("at://x/2", "did:plc:b")];
        let doc = ThreadDocument {
            focus: Some(focus),
            ..Default::default()
        };
        let meta = classify(&doc);
        assert!(!meta.is_author_thread);
        assert_eq!(meta.root_author_did, None);
        assert_eq!(meta.focus_author_did.as_deref(), Some("did:plc:a"));
    }

    #[test]
    fn test_authorless_focus_reports_root_only() {
        let doc = ThreadDocument {
            focus: Some(ThreadNode {
                uri: "at://x/2".to_string(),
                ..Default::default()
            }),
            parents: vec![authored("at://x/1", "did:plc:b")],
            ..Default::default()
        };
        let meta = classify(&doc);
        assert!(!meta.is_author_thread);
        assert_eq!(meta.root_author_did.as_deref(), Some("did:plc:b"));
        assert_eq!(meta.focus_author_did, None);
    }

    #[test]
    fn test_empty_author_did_counts_as_missing() {
        let doc = ThreadDocument {
            focus: Some(ThreadNode {
                uri: "at://x/1".to_string(),
                author: Some(Author::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classify(&doc), Classification::default());
    }
}
