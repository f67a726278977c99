use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

const ARCHITECTURE: &str = r#"
  How an answer is made

    you ──▶ parley ──POST {text, sessionId, accessCode}──▶ workflow webhook
                                                             │
                                   ┌─────────────────────────┤
                                   ▼                         ▼
                             vector search            hosted language model
                         (résumé & project notes)     (writes the answer)
                                   └────────────┬────────────┘
                                                ▼
    you ◀── typed out ◀── parley ◀──{"Bot Answer": "..."}───┘

  parley only checks your access code, relays the message, and shows the
  reply. Retrieval, prompting and generation all happen behind the webhook.
  The session id lets the workflow keep track of the conversation.
"#;

pub struct AboutCommand;

#[async_trait]
impl Command for AboutCommand {
    fn name(&self) -> &str {
        "/about"
    }

    fn aliases(&self) -> &[&str] {
        &["/architecture"]
    }

    fn description(&self) -> &str {
        "explain how answers are produced"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        println!("{ARCHITECTURE}");
        CommandResult::Handled
    }
}
