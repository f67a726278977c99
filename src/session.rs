//! Per-session state: authentication flag, session id, access code, and the
//! chat transcript.
//!
//! Lives in memory for as long as the process runs. Nothing here is written
//! to disk.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "you"),
            Role::Assistant => write!(f, "bot"),
        }
    }
}

/// A single transcript record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}> {}", self.role, self.content)
    }
}

/// Everything one chat session knows about itself.
#[derive(Debug, Clone)]
pub struct SessionState {
    authenticated: bool,
    session_id: String,
    access_code: Option<String>,
    messages: Vec<ChatMessage>,
}

impl SessionState {
    /// A locked session with a fresh id and the greeting as its only message.
    pub fn new(greeting: &str) -> Self {
        Self {
            authenticated: false,
            session_id: new_session_id(),
            access_code: None,
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn access_code(&self) -> Option<&str> {
        self.access_code.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Mark the session as unlocked with the given code.
    pub fn authenticate(&mut self, code: &str) {
        self.authenticated = true;
        self.access_code = Some(code.to_string());
    }

    /// Drop authentication. The transcript and session id survive.
    pub fn lock(&mut self) {
        self.authenticated = false;
        self.access_code = None;
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Start a new conversation: new session id, transcript back to the greeting.
    pub fn reset(&mut self, greeting: &str) {
        self.session_id = new_session_id();
        self.messages = vec![ChatMessage::assistant(greeting)];
    }

    /// Number of messages the user has sent.
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Mask an access code for display, keeping only its last two characters.
pub fn mask_code(code: &str) -> String {
    let count = code.chars().count();
    if count <= 2 {
        return "*".repeat(count);
    }
    let tail: String = code.chars().skip(count - 2).collect();
    format!("{}{}", "*".repeat(count - 2), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_locked_with_greeting() {
        let session = SessionState::new("hi there");
        assert!(!session.is_authenticated());
        assert!(session.access_code().is_none());
        assert_eq!(session.messages(), &[ChatMessage::assistant("hi there")]);
    }

    #[test]
    fn session_id_is_a_uuid() {
        let session = SessionState::new("hi");
        assert!(Uuid::parse_str(session.session_id()).is_ok());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = SessionState::new("hi");
        let b = SessionState::new("hi");
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn authenticate_remembers_code() {
        let mut session = SessionState::new("hi");
        session.authenticate("open-sesame");
        assert!(session.is_authenticated());
        assert_eq!(session.access_code(), Some("open-sesame"));
    }

    #[test]
    fn lock_keeps_transcript_and_id() {
        let mut session = SessionState::new("hi");
        session.authenticate("code");
        session.push_user("question");
        let id = session.session_id().to_string();

        session.lock();

        assert!(!session.is_authenticated());
        assert!(session.access_code().is_none());
        assert_eq!(session.session_id(), id);
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn push_appends_in_order() {
        let mut session = SessionState::new("hi");
        session.push_user("q");
        session.push_assistant("a");
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(session.user_turns(), 1);
    }

    #[test]
    fn reset_rotates_id_and_keeps_auth() {
        let mut session = SessionState::new("hi");
        session.authenticate("code");
        session.push_user("q");
        let old_id = session.session_id().to_string();

        session.reset("welcome back");

        assert_ne!(session.session_id(), old_id);
        assert!(session.is_authenticated());
        assert_eq!(session.messages(), &[ChatMessage::assistant("welcome back")]);
    }

    #[test]
    fn message_display_uses_role_prefix() {
        assert_eq!(ChatMessage::user("hello").to_string(), "you> hello");
        assert_eq!(ChatMessage::assistant("hey").to_string(), "bot> hey");
    }

    #[test]
    fn mask_code_hides_all_but_tail() {
        assert_eq!(mask_code("secret42"), "******42");
        assert_eq!(mask_code("ab"), "**");
        assert_eq!(mask_code(""), "");
    }
}
