//! Turns one user message into one webhook call and two transcript records.

use anyhow::{Result, bail};
use tracing::debug;

use crate::session::SessionState;
use crate::webhook::{ChatRequest, Webhook};

pub struct ChatDispatcher {
    webhook: Box<dyn Webhook>,
}

impl ChatDispatcher {
    pub fn new(webhook: Box<dyn Webhook>) -> Self {
        Self { webhook }
    }

    /// Send `text` on behalf of the session and record the exchange.
    ///
    /// Webhook failures do not error: they come back as the answer text
    /// and land in the transcript like any other reply. Only a locked
    /// session or a blank message is refused, and then nothing is recorded.
    ///
    /// The user message is recorded before the call, so a dropped future
    /// leaves it in the transcript without an answer.
    pub async fn dispatch(&self, session: &mut SessionState, text: &str) -> Result<String> {
        if !session.is_authenticated() {
            bail!("session is locked. Enter an access code first.");
        }
        if text.trim().is_empty() {
            bail!("refusing to send an empty message");
        }

        session.push_user(text);

        let request = ChatRequest {
            text: text.to_string(),
            session_id: session.session_id().to_string(),
            access_code: session.access_code().map(str::to_string),
        };

        let answer = match self.webhook.send(&request).await {
            Ok(answer) => answer,
            Err(e) => e.to_string(),
        };
        debug!(
            session_id = session.session_id(),
            chars = answer.chars().count(),
            "answer received"
        );

        session.push_assistant(answer.clone());
        Ok(answer)
    }
}
