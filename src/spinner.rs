//! A minimal terminal spinner shown while the webhook is thinking.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// A terminal spinner that runs in a background task.
///
/// Call [`Spinner::start`] to begin, then [`Spinner::stop`] when done.
/// Draws on stderr so piped stdout stays clean, and draws nothing at all
/// when stderr is not a terminal.
pub struct Spinner {
    handle: Option<JoinHandle<()>>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"thinking"`).
    pub fn start(message: &str) -> Self {
        Self::start_on(message, std::io::stderr().is_terminal())
    }

    fn start_on(message: &str, draw: bool) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        if !draw {
            return Self {
                handle: None,
                cancel: cancel_tx,
            };
        }

        let message = message.to_string();
        let handle = tokio::spawn(async move {
            let mut i = 0;
            loop {
                let frame = FRAMES[i % FRAMES.len()];
                // \x1b[2K clears the line, \r returns to its start
                eprint!("\x1b[2K\r{frame} {message}");
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle: Some(handle),
            cancel: cancel_tx,
        }
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        if let Some(handle) = self.handle {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_single_braille_chars() {
        assert!(!FRAMES.is_empty());
        for frame in FRAMES {
            assert_eq!(frame.chars().count(), 1);
        }
    }

    #[tokio::test]
    async fn drawing_spinner_starts_and_stops() {
        let spinner = Spinner::start_on("thinking", true);
        tokio::time::sleep(Duration::from_millis(200)).await;
        spinner.stop().await;
    }

    #[tokio::test]
    async fn silent_spinner_spawns_nothing() {
        let spinner = Spinner::start_on("thinking", false);
        assert!(spinner.handle.is_none());
        spinner.stop().await;
    }

    #[tokio::test]
    async fn spinner_immediate_stop() {
        Spinner::start("quick").stop().await;
    }
}
