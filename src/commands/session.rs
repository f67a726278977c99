use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::session::mask_code;

pub struct SessionCommand;

#[async_trait]
impl Command for SessionCommand {
    fn name(&self) -> &str {
        "/session"
    }

    fn aliases(&self) -> &[&str] {
        &["/whoami"]
    }

    fn description(&self) -> &str {
        "show session id, access code, and webhook"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        let session = info.session;
        let code = session
            .access_code()
            .map(mask_code)
            .unwrap_or_else(|| "none".to_string());
        println!("  session   {}", session.session_id());
        println!("  access    {code}");
        println!("  webhook   {}", info.webhook_host);
        println!(
            "  messages  {} ({} from you)",
            session.messages().len(),
            session.user_turns()
        );
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;

    #[tokio::test]
    async fn returns_handled() {
        assert!(matches!(
            SessionCommand.execute(&test_info()).await,
            CommandResult::Handled
        ));
    }

    #[test]
    fn metadata() {
        assert_eq!(SessionCommand.name(), "/session");
        assert_eq!(SessionCommand.aliases(), &["/whoami"]);
    }
}
