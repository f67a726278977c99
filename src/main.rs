use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use parley::banner::{BannerInfo, print_banner, print_lock_screen, print_session_summary, print_transcript};
use parley::commands::{CommandRegistry, CommandResult, SessionInfo, StateChange, read_choice};
use parley::config::{Config, ConfigKey};
use parley::consts::{
    DEFAULT_ANSWER_FIELD, DEFAULT_GREETING, DEFAULT_SUGGESTIONS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TYPING_DELAY_MS, default_db_path,
};
use parley::dispatcher::ChatDispatcher;
use parley::gate::{AccessCodeStore, AccessGate, build_gate};
use parley::session::SessionState;
use parley::spinner::Spinner;
use parley::typing::{TypingConfig, type_out, type_out_until};
use parley::webhook::http::WebhookClient;

#[derive(Parser)]
#[command(
    name = "parley",
    version,
    about = "A passcode-gated chat that relays every message to a workflow webhook."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Webhook that answers messages (overrides the stored webhook_url)
    #[arg(long, env = "PARLEY_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Comma-separated list of accepted access codes
    #[arg(long, env = "PARLEY_ACCESS_CODES", hide_env_values = true)]
    access_codes: Option<String>,

    /// Access code to unlock with instead of prompting
    #[arg(long, env = "PARLEY_ACCESS_CODE", hide_env_values = true)]
    access_code: Option<String>,

    /// JSON field of the webhook response holding the answer
    #[arg(long)]
    answer_field: Option<String>,

    /// Webhook request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Pause between typed words in milliseconds
    #[arg(long, default_value_t = DEFAULT_TYPING_DELAY_MS)]
    typing_delay_ms: u64,

    /// Print answers at once instead of typing them out
    #[arg(long, default_value_t = false)]
    no_typing: bool,

    /// SQLite database for config and access codes (default: ~/.parley/parley.db)
    #[arg(short, long)]
    db: Option<String>,

    /// Log requests and responses to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Send a single message, print the answer and exit (needs --access-code)
    #[arg(short, long)]
    ask: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Read or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage stored access codes
    Codes {
        #[command(subcommand)]
        action: CodesAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a stored value
    Get { key: String },
    /// Store a value
    Set { key: String, value: String },
    /// Remove a stored value
    Unset { key: String },
    /// Print every stored value
    List,
}

#[derive(Subcommand)]
enum CodesAction {
    /// Accept a new access code
    Add {
        code: String,
        /// Who the code was handed to
        #[arg(short, long, default_value = "")]
        label: String,
    },
    /// Stop accepting an access code
    Remove { code: String },
    /// List stored access codes (digests only)
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let db = resolve_db_path(cli.db.as_deref())?;

    if let Some(command) = &cli.command {
        return match command {
            Command::Config { action } => handle_config(&db, action),
            Command::Codes { action } => handle_codes(&db, action),
        };
    }

    let config = Config::open(&db)?;
    let webhook_url = config.resolve(ConfigKey::WebhookUrl, cli.webhook_url.as_deref(), "")?;
    let answer_field = config.resolve(
        ConfigKey::AnswerField,
        cli.answer_field.as_deref(),
        DEFAULT_ANSWER_FIELD,
    )?;
    let greeting = config.resolve(ConfigKey::Greeting, None, DEFAULT_GREETING)?;

    let client = WebhookClient::new(&webhook_url, &answer_field, Duration::from_secs(cli.timeout))?;
    let webhook_host = client.host().to_string();
    let dispatcher = ChatDispatcher::new(Box::new(client));

    let gate = build_gate(cli.access_codes.as_deref(), Some(AccessCodeStore::open(&db)?));
    if gate.is_empty()? {
        bail!(
            "no access codes configured. Set PARLEY_ACCESS_CODES or run `parley codes add <code>`."
        );
    }

    let typing = if cli.no_typing || !io::stdout().is_terminal() {
        TypingConfig::instant()
    } else {
        TypingConfig {
            delay: Duration::from_millis(cli.typing_delay_ms),
            ..TypingConfig::default()
        }
    };

    let mut session = SessionState::new(&greeting);

    // Single message mode
    if let Some(text) = cli.ask.as_deref() {
        let code = cli
            .access_code
            .as_deref()
            .context("--ask needs an access code (--access-code or PARLEY_ACCESS_CODE)")?;
        gate.unlock(&mut session, code)?;
        let answer = dispatcher.dispatch(&mut session, text).await?;
        type_out(&mut io::stdout(), &answer, &TypingConfig::instant()).await?;
        return Ok(());
    }

    let db_label = if db == ":memory:" { "ephemeral" } else { &db };
    let typing_label = if typing.is_instant() {
        "off".to_string()
    } else {
        format!("{}ms/word", typing.delay.as_millis())
    };
    print_banner(&BannerInfo {
        webhook_host: &webhook_host,
        session_id: session.session_id(),
        typing: &typing_label,
        db: db_label,
    });

    let registry = CommandRegistry::new();
    let suggestions: Vec<String> = DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();

    // async stdin so Ctrl+C is caught at the prompt too
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_code = cli.access_code.clone();

    loop {
        if !session.is_authenticated() {
            if !unlock(&gate, &mut session, &mut lines, pending_code.take()).await? {
                break;
            }
            print_transcript(session.messages());
        }

        let Some(line) = prompt_line(&mut lines, "\nyou> ").await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let info = SessionInfo {
            session: &session,
            webhook_host: &webhook_host,
            suggestions: &suggestions,
        };
        let text = match registry.dispatch(input, &info).await {
            CommandResult::NotACommand => input.to_string(),
            CommandResult::Handled => continue,
            CommandResult::Quit => break,
            CommandResult::StateChanged(change) => match change {
                StateChange::NewConversation => {
                    session.reset(&greeting);
                    println!("  ✓ new conversation ({})", session.session_id());
                    print_transcript(session.messages());
                    continue;
                }
                StateChange::Lock => {
                    session.lock();
                    continue;
                }
                StateChange::Suggest => {
                    let choice = tokio::select! {
                        choice = read_choice(&mut lines, &suggestions) => choice?,
                        _ = tokio::signal::ctrl_c() => None,
                    };
                    let Some(question) = choice else {
                        continue;
                    };
                    println!("\nyou> {question}");
                    question
                }
            },
        };

        converse(&dispatcher, &mut session, &text, &typing).await?;
    }

    print_session_summary(session.user_turns());
    Ok(())
}

/// Send one message with the spinner running, then type out the answer.
/// Ctrl+C while waiting abandons the request. Ctrl+C while typing skips
/// the rest of the answer.
async fn converse(
    dispatcher: &ChatDispatcher,
    session: &mut SessionState,
    text: &str,
    typing: &TypingConfig,
) -> Result<()> {
    let spinner = Spinner::start("thinking");
    let outcome = tokio::select! {
        result = dispatcher.dispatch(session, text) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.stop().await;

    match outcome {
        Some(Ok(answer)) => {
            print!("\nbot> ");
            let mut out = io::stdout();
            if !type_out_until(&mut out, &answer, typing, tokio::signal::ctrl_c()).await? {
                println!("interrupted");
            }
        }
        Some(Err(e)) => eprintln!("\nerror: {e}"),
        None => println!("\ninterrupted"),
    }
    Ok(())
}

/// Show the lock screen until a valid code is entered.
/// Returns `false` if the user left instead.
async fn unlock(
    gate: &AccessGate,
    session: &mut SessionState,
    lines: &mut Lines<BufReader<Stdin>>,
    preset: Option<String>,
) -> Result<bool> {
    if let Some(code) = preset {
        match gate.unlock(session, &code) {
            Ok(()) => {
                println!("Access Granted! Loading chat...");
                return Ok(true);
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    print_lock_screen();
    loop {
        let Some(code) = prompt_line(lines, "\nAccess Code: ").await? else {
            return Ok(false);
        };
        if io::stdout().is_terminal() {
            // overwrite the echoed code
            println!("\x1b[1A\x1b[2KAccess Code: {}", "*".repeat(code.trim().chars().count()));
        }
        match gate.unlock(session, &code) {
            Ok(()) => {
                println!("Access Granted! Loading chat...");
                return Ok(true);
            }
            Err(e) => eprintln!("{e}"),
        }
    }
}

/// Print a prompt and read one line. `None` on EOF or Ctrl+C.
async fn prompt_line(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    tokio::select! {
        result = lines.next_line() => match result {
            Ok(Some(line)) => Ok(Some(line)),
            Ok(None) => {
                // Ctrl+D (EOF)
                println!();
                Ok(None)
            }
            Err(e) => Err(e).context("failed to read input"),
        },
        _ = tokio::signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "parley=debug" } else { "parley=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_db_path(explicit: Option<&str>) -> Result<String> {
    if let Some(path) = explicit {
        return Ok(path.to_string());
    }
    let path = default_db_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    path_to_string(path)
}

fn path_to_string(path: PathBuf) -> Result<String> {
    path.into_os_string()
        .into_string()
        .map_err(|p| anyhow::anyhow!("database path is not valid UTF-8: {}", p.to_string_lossy()))
}

fn handle_config(db: &str, action: &ConfigAction) -> Result<()> {
    let config = Config::open(db)?;
    match action {
        ConfigAction::Get { key } => {
            let key: ConfigKey = key.parse()?;
            match config.get(key)? {
                Some(value) => println!("{value}"),
                None => println!("(unset)"),
            }
        }
        ConfigAction::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            if key == ConfigKey::WebhookUrl {
                // fail now rather than on the next chat
                WebhookClient::new(value, DEFAULT_ANSWER_FIELD, Duration::from_secs(1))?;
            }
            config.set(key, value)?;
            println!("✓ {key} saved");
        }
        ConfigAction::Unset { key } => {
            let key: ConfigKey = key.parse()?;
            config.remove(key)?;
            println!("✓ {key} removed");
        }
        ConfigAction::List => {
            for key in ConfigKey::ALL {
                let value = config.get(*key)?.unwrap_or_else(|| "(unset)".to_string());
                println!("  {:<13} {value}", key.as_str());
            }
        }
    }
    Ok(())
}

fn handle_codes(db: &str, action: &CodesAction) -> Result<()> {
    let store = AccessCodeStore::open(db)?;
    match action {
        CodesAction::Add { code, label } => {
            if code.trim().is_empty() {
                bail!("access code cannot be empty");
            }
            store.add(code, label)?;
            println!("✓ access code added");
        }
        CodesAction::Remove { code } => {
            if store.remove(code)? {
                println!("✓ access code removed");
            } else {
                println!("no such access code");
            }
        }
        CodesAction::List => {
            let codes = store.list()?;
            if codes.is_empty() {
                println!("  (no stored access codes)");
            }
            for code in &codes {
                let label = if code.label.is_empty() { "-" } else { &code.label };
                println!("  {}  {}  {label}", code.short_digest(), code.created);
            }
        }
    }
    Ok(())
}
