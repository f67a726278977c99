use std::io::{self, Write};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, Lines};

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct SuggestCommand;

#[async_trait]
impl Command for SuggestCommand {
    fn name(&self) -> &str {
        "/suggest"
    }

    fn aliases(&self) -> &[&str] {
        &["/s"]
    }

    fn description(&self) -> &str {
        "pick a suggested question to ask"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        if info.suggestions.is_empty() {
            println!("  no suggested questions configured");
            return CommandResult::Handled;
        }

        println!("  Suggested questions:\n");
        for (i, question) in info.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, question);
        }
        // the REPL owns stdin, so it reads the selection
        CommandResult::StateChanged(StateChange::Suggest)
    }
}

/// Prompt for a suggestion number and read it from the REPL's own input.
///
/// `None` on cancel, EOF or an invalid selection.
pub async fn read_choice<R>(lines: &mut Lines<R>, suggestions: &[String]) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    print!("\n  Ask which? [1-{}, enter to cancel]: ", suggestions.len());
    io::stdout().flush()?;

    let Some(input) = lines.next_line().await? else {
        println!();
        return Ok(None);
    };
    match pick(input.trim(), suggestions) {
        Ok(choice) => Ok(choice.map(str::to_string)),
        Err(msg) => {
            eprintln!("  ✗ {msg}");
            Ok(None)
        }
    }
}

/// Resolve a 1-based selection. Empty input cancels.
fn pick<'a>(input: &str, suggestions: &'a [String]) -> Result<Option<&'a str>, String> {
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= suggestions.len() => Ok(Some(suggestions[n - 1].as_str())),
        _ => Err(format!("invalid selection: {input}")),
    }
}
