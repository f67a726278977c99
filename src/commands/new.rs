use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct NewCommand;

#[async_trait]
impl Command for NewCommand {
    fn name(&self) -> &str {
        "/new"
    }

    fn description(&self) -> &str {
        "start a new conversation (fresh session id, cleared history)"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::StateChanged(StateChange::NewConversation)
    }
}
