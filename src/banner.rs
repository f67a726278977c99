//! Startup banner, lock screen, transcript and farewell display.

use crate::consts::{ACCESS_CONTACT, AUTHOR, HOMEPAGE, REPO, format_number};
use crate::session::ChatMessage;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub webhook_host: &'a str,
    pub session_id: &'a str,
    pub typing: &'a str,
    pub db: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             P A R L E Y               ║
   ║      ask away, the answer relays      ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   webhook   {}
   session   {}
   typing    {}
   db        {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.webhook_host,
        info.session_id,
        info.typing,
        info.db,
    );
}

/// Print the access prompt shown before a session is unlocked.
pub fn print_lock_screen() {
    println!("🔒 Access Required");
    println!("Please enter the access code provided to you.");
    println!("{ACCESS_CONTACT}");
}

/// Print a whole transcript, one message per block.
pub fn print_transcript(messages: &[ChatMessage]) {
    for message in messages {
        println!("\n{message}");
    }
}

/// Print the session summary (message count + farewell).
pub fn print_session_summary(user_turns: usize) {
    if user_turns > 0 {
        let noun = if user_turns == 1 { "message" } else { "messages" };
        println!("session: {} {noun} sent", format_number(user_turns as u64));
    }
    println!("goodbye.");
}
