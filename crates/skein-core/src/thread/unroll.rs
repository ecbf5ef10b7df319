//! Flat single-author reading order ("unroll").
//!
//! Turns an author-thread document into the chronological root-to-latest
//! sequence the unroll surface renders, and strips the `1/7`-style counter
//! noise authors put in long chains.

use std::sync::LazyLock;

use regex::Regex;

use crate::thread::document::{resolved_timestamp, ThreadDocument, ThreadNode};

/// Linearizes a document into the "one author, root to latest" order.
///
/// The thread author is the focus author, falling back to the outermost
/// ancestor's author when the focus has none. Ancestors by other authors
/// are skipped; replies by other authors are excluded and terminate their
/// branch (no descent past a foreign reply). Self-authored replies are
/// visited depth-first, siblings sorted ascending by resolved timestamp
/// with encounter order preserved on ties.
pub fn author_timeline(document: &ThreadDocument) -> Vec<&ThreadNode> {
    let Some(focus) = document.focus.as_ref() else {
        return Vec::new();
    };

    let author = focus
        .author_did()
        .or_else(|| document.parents.first().and_then(ThreadNode::author_did));

    let mut timeline: Vec<&ThreadNode> = Vec::new();
    for parent in &document.parents {
        if author.is_none() || parent.author_did() == author {
            timeline.push(parent);
        }
    }
    timeline.push(focus);

    if let Some(author) = author {
        collect_own_replies(focus, author, &mut timeline);
    }
    timeline
}

fn collect_own_replies<'a>(node: &'a ThreadNode, author: &str, out: &mut Vec<&'a ThreadNode>) {
    let mut own: Vec<&ThreadNode> = node
        .replies
        .iter()
        .filter(|reply| reply.author_did() == Some(author))
        .collect();
    // Stable sort keeps the service's order for equal timestamps.
    own.sort_by_key(|reply| resolved_timestamp(reply));

    for reply in own {
        out.push(reply);
        collect_own_replies(reply, author, out);
    }
}

static LEADING_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]?\s*)?\d+\s*/\s*\d+").expect("valid regex"));
static INLINE_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\s*/\s*\d+\b").expect("valid regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

/// Cleans a node's text for the unroll surface.
///
/// Drops a leading `1/7`-style counter line (optionally bulleted), collapses
/// runs of blank lines, and removes inline `n/m` counters.
pub fn sanitize_unroll_text(node: &ThreadNode) -> String {
    let raw = node
        .text
        .as_deref()
        .or_else(|| node.record.as_ref().and_then(|r| r.text.as_deref()))
        .unwrap_or("");
    if raw.is_empty() {
        return String::new();
    }

    let mut lines: Vec<&str> = raw.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    if lines.first().is_some_and(|first| LEADING_COUNTER.is_match(first)) {
        lines.remove(0);
    }

    let cleaned = lines.join("\n");
    let cleaned = cleaned.trim();
    let cleaned = BLANK_RUNS.replace_all(cleaned, "\n");
    INLINE_COUNTER.replace_all(&cleaned, "").into_owned()
}
