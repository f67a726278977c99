use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct LockCommand;

#[async_trait]
impl Command for LockCommand {
    fn name(&self) -> &str {
        "/lock"
    }

    fn description(&self) -> &str {
        "lock the chat until an access code is entered again"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        println!("  ✓ chat locked");
        CommandResult::StateChanged(StateChange::Lock)
    }
}
