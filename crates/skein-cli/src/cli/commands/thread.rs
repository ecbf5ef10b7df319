//! Thread command handlers.

use anyhow::{bail, Context, Result};
use skein_core::api::ServiceClient;
use skein_core::config::Config;
use skein_core::thread::{
    author_timeline, sanitize_unroll_text, LoadOptions, NoScroll, ThreadEngine, ThreadNode,
    ThreadSession,
};

fn build_engine(service_override: Option<&str>, config: &Config) -> Result<ThreadEngine<ServiceClient>> {
    let client = match service_override {
        Some(base_url) => ServiceClient::new(base_url, config.service.timeout()),
        None => ServiceClient::from_config(config),
    }
    .context("create service client")?;
    Ok(ThreadEngine::new(client, NoScroll, config.thread.default_view_mode))
}

async fn load_session(engine: &ThreadEngine<ServiceClient>, uri: &str) -> Result<ThreadSession> {
    engine.load(uri, LoadOptions::default()).await;
    let session = engine.session();
    if !session.error.is_empty() {
        bail!("{}", session.error);
    }
    Ok(session)
}

pub async fn show(uri: &str, service_override: Option<&str>, config: &Config) -> Result<()> {
    let engine = build_engine(service_override, config)?;
    let session = load_session(&engine, uri).await?;
    let Some(data) = session.data else {
        bail!("Thread '{uri}' is empty or not found.");
    };

    let mut depth = 0;
    for parent in &data.parents {
        print_node(parent, depth, false);
        depth += 1;
    }
    if let Some(focus) = &data.focus {
        print_node(focus, depth, true);
        print_replies(&focus.replies, depth + 1);
    }
    Ok(())
}

pub async fn unroll(uri: &str, service_override: Option<&str>, config: &Config) -> Result<()> {
    let engine = build_engine(service_override, config)?;
    let session = load_session(&engine, uri).await?;
    if !session.is_author_thread {
        bail!("Thread '{uri}' is not a single-author chain.");
    }
    let Some(data) = session.data.as_ref() else {
        bail!("Thread '{uri}' is empty or not found.");
    };

    let timeline = author_timeline(data);
    let author = timeline
        .last()
        .and_then(|node| node.author.as_ref())
        .or_else(|| data.focus.as_ref().and_then(|focus| focus.author.as_ref()));
    if let Some(author) = author {
        let name = author.display_name.as_deref().unwrap_or(&author.handle);
        println!("{name} (@{}) · {} posts", author.handle, timeline.len());
        println!();
    }

    let mut first = true;
    for node in &timeline {
        let text = sanitize_unroll_text(node);
        if text.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        println!("{text}");
        first = false;
    }
    Ok(())
}

fn print_node(node: &ThreadNode, depth: usize, is_focus: bool) {
    let indent = "  ".repeat(depth);
    let marker = if is_focus { "> " } else { "" };
    let handle = node
        .author
        .as_ref()
        .map_or("unknown", |author| author.handle.as_str());
    let text = node
        .text
        .as_deref()
        .unwrap_or("")
        .lines()
        .next()
        .unwrap_or("");
    let counts = node.stats.map_or_else(String::new, |stats| {
        format!(
            "  [{} likes, {} reposts, {} replies]",
            stats.like_count, stats.repost_count, stats.reply_count
        )
    });
    println!("{indent}{marker}@{handle}  {text}{counts}");
}

fn print_replies(replies: &[ThreadNode], depth: usize) {
    for reply in replies {
        print_node(reply, depth, false);
        print_replies(&reply.replies, depth + 1);
    }
}
