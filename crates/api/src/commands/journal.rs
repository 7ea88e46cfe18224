//! Journal commands: saving entries and reading the workflow state

use echo_core::WorkflowState;
use echo_domain::{JournalError, PromptSet, Result as DomainResult, WorkflowError};
use tracing::info;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Save `text` as the signed-in user's entry and return the reflective
/// questions generated for it.
///
/// Whitespace-only text is ignored and returns the current prompts
/// unchanged. If persistence succeeds but generation fails, the error is
/// returned and the entry stays saved.
pub async fn save_entry(ctx: &AppContext, text: &str) -> DomainResult<PromptSet> {
    execute_command("journal::save_entry", || async {
        let identity = ctx
            .auth
            .current_identity()
            .ok_or_else(|| JournalError::from(WorkflowError::NotSignedIn))?;

        ctx.workflow.save(text, &identity).await?;

        let state = ctx.workflow.state();
        info!(
            user_id = %identity.user_id,
            prompts = state.prompts.len(),
            "entry saved"
        );
        Ok(state.prompts)
    })
    .await
}

/// Snapshot of the save workflow for display.
pub fn get_workflow_state(ctx: &AppContext) -> WorkflowState {
    ctx.workflow.state()
}
