use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

/// Listed in `/help` like any other command. The registry intercepts it to
/// print its own help text.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::Handled
    }
}
