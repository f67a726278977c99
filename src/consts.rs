//! Project-wide constants.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// JSON field the webhook puts its answer in.
pub const DEFAULT_ANSWER_FIELD: &str = "Bot Answer";

/// Shown when the webhook replies 200 but without a usable answer field.
pub const FALLBACK_ANSWER: &str = "I couldn't process that response.";

/// First assistant message of every conversation.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your AI assistant. Ask me anything about my experience and projects.";

/// Who to contact for an access code, shown on the lock screen.
pub const ACCESS_CONTACT: &str = "Reach out to the owner of this assistant for an access code.";

/// Questions offered by `/suggest`.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "What are your strongest technical skills?",
    "Tell me about your most recent project.",
    "Which project are you most proud of, and why?",
    "What kind of role are you looking for next?",
];

/// Webhook request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Pause between words of the typing effect.
pub const DEFAULT_TYPING_DELAY_MS: u64 = 50;

/// Default database path: `~/.parley/parley.db`.
/// Single DB for config and stored access codes.
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".parley").join("parley.db"))
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
