use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::banner::print_transcript;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &str {
        "/history"
    }

    fn description(&self) -> &str {
        "show the conversation so far"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        print_transcript(info.session.messages());
        CommandResult::Handled
    }
}
