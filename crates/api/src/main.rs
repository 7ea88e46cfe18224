//! Echo Journal - terminal client
//!
//! Type an entry and press enter to save it; the reflective questions for
//! it are printed once generated. Lines starting with `:` are commands.

use std::time::Duration;

use anyhow::Context;
use echo_app::utils::logging::init_tracing;
use echo_app::{get_entries, get_session, reload_entries, save_entry, sign_in_interactive, AppContext};
use echo_domain::{JournalError, ProviderKind, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};

const READY_TIMEOUT: Duration = Duration::from_secs(30);

const HELP: &str = "\
commands:
  :entries   list saved entries, newest first
  :signin    sign in with Google
  :session   show the current session
  :reload    re-open the entry subscription after an error
  :quit      exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so RUST_LOG and ECHO_LOG_FORMAT apply
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let config = echo_infra::config::load().context("failed to load configuration")?;
    let ctx = AppContext::new(config).context("failed to initialize application")?;
    ctx.start();

    let session = ctx.wait_until_ready(READY_TIMEOUT).await?;
    match session.state {
        SessionState::Authenticated => {
            if let Some(identity) = &session.identity {
                println!("signed in as {}", identity.user_id);
            }
        }
        _ => {
            let reason = session.error.map(|e| e.to_string()).unwrap_or_default();
            println!("not signed in: {reason}");
            println!("use :signin to sign in");
        }
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            ":quit" | ":q" => break,
            ":help" => println!("{HELP}"),
            ":entries" => print_entries(&ctx),
            ":session" => print_session(&ctx),
            ":signin" => match sign_in_interactive(&ctx, ProviderKind::Google).await {
                Ok(identity) => println!("signed in as {}", identity.user_id),
                Err(e) => println!("sign-in failed: {e}"),
            },
            ":reload" => match reload_entries(&ctx).await {
                Ok(()) => println!("entries reloaded"),
                Err(e) => println!("reload failed: {e}"),
            },
            command if command.starts_with(':') => println!("unknown command {command}\n{HELP}"),
            _ => match save_entry(&ctx, &line).await {
                Ok(prompts) => {
                    println!("saved.");
                    for (i, prompt) in prompts.iter().enumerate() {
                        println!("  {}. {prompt}", i + 1);
                    }
                }
                Err(JournalError::Api(e)) => println!("saved, but no questions this time: {e}"),
                Err(e) => println!("{e}"),
            },
        }
    }

    ctx.shutdown().await;
    Ok(())
}

fn print_entries(ctx: &AppContext) {
    if let Some(err) = ctx.sync.last_error() {
        println!("(entries may be stale: {err})");
    }
    let entries = get_entries(ctx);
    if entries.is_empty() {
        println!("no entries yet");
    }
    for entry in entries {
        let when = entry
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "pending".to_string());
        println!("[{when}] {}", entry.text.as_str());
    }
}

fn print_session(ctx: &AppContext) {
    let session = get_session(ctx);
    match &session.identity {
        Some(identity) => println!(
            "{} as {} (anonymous: {})",
            session.state, identity.user_id, identity.anonymous
        ),
        None => println!("{}", session.state),
    }
    if let Some(err) = &session.error {
        println!("last error: {err}");
    }
}
