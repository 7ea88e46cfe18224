//! Entry mirror commands

use echo_domain::{JournalEntry, Result as DomainResult};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Entries of the signed-in user, newest first.
///
/// After a subscription error this still returns the last delivered
/// snapshot. The error is available from `ctx.sync.last_error()` until
/// [`reload_entries`] succeeds.
pub fn get_entries(ctx: &AppContext) -> Vec<JournalEntry> {
    ctx.sync.mirror().into_entries()
}

/// Re-open the entry subscription after it failed.
pub async fn reload_entries(ctx: &AppContext) -> DomainResult<()> {
    execute_command("entries::reload_entries", || async { ctx.sync.reload() }).await
}
