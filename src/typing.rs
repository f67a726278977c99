//! Simulated typing: answers appear a word at a time.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use rand::RngExt;

use crate::consts::DEFAULT_TYPING_DELAY_MS;

/// Pacing of the typing effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingConfig {
    /// Pause after each word.
    pub delay: Duration,
    /// Upper bound of extra random pause per word.
    pub jitter: Duration,
}

impl TypingConfig {
    /// No animation at all: the text is written in one go.
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.delay.is_zero() && self.jitter.is_zero()
    }

    fn pause(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let max = self.jitter.as_millis() as u64;
        self.delay + Duration::from_millis(rand::rng().random_range(0..=max))
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            jitter: Duration::ZERO,
        }
    }
}

/// Linear whitespace split.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Write `text` word by word, flushing after each one.
///
/// Words within a line are joined by single spaces and line breaks are
/// kept. A trailing newline is always written.
pub async fn type_out<W: Write>(out: &mut W, text: &str, config: &TypingConfig) -> io::Result<()> {
    if config.is_instant() {
        writeln!(out, "{}", text.trim_end())?;
        return out.flush();
    }

    for (n, line) in text.trim_end().lines().enumerate() {
        if n > 0 {
            writeln!(out)?;
        }
        for (i, word) in words(line).into_iter().enumerate() {
            if i > 0 {
                write!(out, " ")?;
            }
            write!(out, "{word}")?;
            out.flush()?;
            tokio::time::sleep(config.pause()).await;
        }
    }
    writeln!(out)?;
    out.flush()
}

/// [`type_out`] that gives up as soon as `stop` resolves, e.g. on Ctrl+C.
///
/// Returns `false` if the text was cut short. The line is still ended.
pub async fn type_out_until<W, F>(
    out: &mut W,
    text: &str,
    config: &TypingConfig,
    stop: F,
) -> io::Result<bool>
where
    W: Write,
    F: Future,
{
    let finished = tokio::select! {
        result = type_out(&mut *out, text, config) => {
            result?;
            true
        }
        _ = stop => false,
    };
    if !finished {
        writeln!(out)?;
        out.flush()?;
    }
    Ok(finished)
}
