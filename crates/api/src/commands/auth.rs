//! Session commands

use echo_domain::{Identity, ProviderKind, Result as DomainResult, Session};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// User-driven sign-in. On failure the current session is kept.
pub async fn sign_in_interactive(
    ctx: &AppContext,
    provider: ProviderKind,
) -> DomainResult<Identity> {
    execute_command("auth::sign_in_interactive", || async {
        ctx.auth.sign_in_interactive(provider).await
    })
    .await
}

pub fn get_session(ctx: &AppContext) -> Session {
    ctx.auth.session()
}
