use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "leave the chat"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandRegistry;
    use crate::commands::tests::test_info;

    #[tokio::test]
    async fn returns_quit() {
        assert!(matches!(
            QuitCommand.execute(&test_info()).await,
            CommandResult::Quit
        ));
    }

    #[tokio::test]
    async fn bare_words_quit_too() {
        let reg = CommandRegistry::new();
        for input in ["quit", "exit", "/exit"] {
            assert!(matches!(
                reg.dispatch(input, &test_info()).await,
                CommandResult::Quit
            ));
        }
    }
}
