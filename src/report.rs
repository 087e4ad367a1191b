//! Text rendering of search pages and failures.
//!
//! Everything here returns plain text meant to be read by an agent, so the
//! pagination footer is always present and uses fixed wording that can be
//! matched programmatically.

use crate::error::SearchError;
use crate::search::SearchRequest;
use crate::twitter::{RawTweet, SearchPage};
use std::fmt::Write;

pub const MAX_TEXT_CHARS: usize = 250;
pub const MAX_OUTPUT_CHARS: usize = 25_000;
pub const TRUNCATION_NOTICE: &str = "\n\n[Output truncated: exceeded 25000 characters]";
pub const END_OF_RESULTS: &str = "End of results.";
const CURSOR_PREVIEW_CHARS: usize = 10;

pub fn render(request: &SearchRequest, page: &SearchPage) -> String {
    let mut out = String::new();

    if page.tweets.is_empty() {
        out.push_str(&render_empty(request, page));
    } else {
        let _ = writeln!(
            out,
            "Search results for \"{}\" (mode: {}, {}): {} tweets\n",
            request.query,
            request.mode.as_str(),
            page_context(request),
            page.tweets.len()
        );
        for (i, tweet) in page.tweets.iter().enumerate() {
            out.push_str(&render_tweet(i + 1, tweet));
            out.push('\n');
        }
    }

    out.push_str(&render_footer(page));
    enforce_limit(out)
}

fn render_empty(request: &SearchRequest, page: &SearchPage) -> String {
    let mut out = match &request.cursor {
        None => format!(
            "No tweets found for query \"{}\" (mode: {}).\n",
            request.query,
            request.mode.as_str()
        ),
        Some(cursor) => format!(
            "No more tweets on this page for query \"{}\" (mode: {}, cursor: {}).\n",
            request.query,
            request.mode.as_str(),
            preview(cursor)
        ),
    };

    let more = if page.continuation().is_some() { "more data may be available" } else { "no further pages" };
    let _ = writeln!(
        out,
        "Note: provider reports has_next_page={} and {} next_cursor ({more}).\n",
        page.has_next_page,
        if page.next_cursor.as_deref().is_some_and(|c| !c.is_empty()) { "a" } else { "no" },
    );
    out
}

fn render_tweet(index: usize, tweet: &RawTweet) -> String {
    let author = tweet
        .author_handle()
        .map(|h| format!("@{h}"))
        .unwrap_or_else(|| "Unknown User".into());

    let mut out = String::new();
    let _ = writeln!(out, "--- Tweet {index} ---");
    let _ = writeln!(out, "Author: {author}");
    let _ = writeln!(out, "ID: {}", tweet.id);
    let _ = writeln!(out, "Text: {}", truncate_text(tweet.text.as_deref().unwrap_or(""), MAX_TEXT_CHARS));
    let _ = writeln!(out, "Created: {}", tweet.created_at.as_deref().unwrap_or("Unknown"));
    let _ = writeln!(out, "URL: {}", tweet.url.as_deref().unwrap_or("N/A"));
    let _ = writeln!(
        out,
        "Likes: {} | Retweets: {} | Replies: {} | Views: {}",
        tweet.like_count.unwrap_or(0),
        tweet.retweet_count.unwrap_or(0),
        tweet.reply_count.unwrap_or(0),
        tweet.view_count.unwrap_or(0)
    );
    out
}

/// Exactly one of a next cursor or [`END_OF_RESULTS`].
fn render_footer(page: &SearchPage) -> String {
    match page.continuation() {
        Some(cursor) => format!(
            "--- Pagination ---\nNext cursor: {cursor}\nMore results are available. Call again with this cursor to fetch the next page.\n"
        ),
        None => format!("--- Pagination ---\n{END_OF_RESULTS}\n"),
    }
}

fn page_context(request: &SearchRequest) -> String {
    match &request.cursor {
        None => "First Page".into(),
        Some(cursor) => format!("Page with cursor: {}", preview(cursor)),
    }
}

fn preview(cursor: &str) -> String {
    if cursor.chars().count() > CURSOR_PREVIEW_CHARS {
        format!("{}...", cursor.chars().take(CURSOR_PREVIEW_CHARS).collect::<String>())
    } else {
        cursor.to_string()
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn enforce_limit(mut out: String) -> String {
    if let Some((cut, _)) = out.char_indices().nth(MAX_OUTPUT_CHARS) {
        out.truncate(cut);
        out.push_str(TRUNCATION_NOTICE);
    }
    out
}

/// Turns a failed search into the text returned to the caller.
pub fn describe_error(err: &SearchError, cursor_supplied: bool) -> String {
    match err {
        SearchError::Api { status: status @ (401 | 403), .. } => format!(
            "Error: Authentication failed (HTTP {status}). The API key is likely missing or invalid; check TWITTER_API_KEY."
        ),
        SearchError::Api { status: 400, .. } => {
            let mut msg = String::from(
                "Error: Bad request (HTTP 400). The query syntax may be invalid; check operators such as from:, since: and quoted phrases.",
            );
            if cursor_supplied {
                msg.push_str(" The supplied cursor may also be invalid or expired; try again without it.");
            }
            msg
        }
        SearchError::Api { status: 404, .. } => {
            "Error: Search endpoint not found (HTTP 404). Check the API endpoint configuration (TWITTER_API_URL).".into()
        }
        SearchError::Api { status: 429, .. } => {
            "Error: Rate limit exceeded (HTTP 429). Wait a moment before searching again.".into()
        }
        SearchError::Api { status, message } => format!(
            "Error: Search API request failed (HTTP {status}): {}",
            message.as_deref().unwrap_or("Unknown API error")
        ),
        SearchError::UnexpectedShape { message } => format!(
            "Error: Unexpected response from search API: {}",
            message.as_deref().unwrap_or("response did not contain a tweets array")
        ),
        other => format!("Error: Unexpected error while searching tweets: {other}"),
    }
}
