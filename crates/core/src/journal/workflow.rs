//! Entry save workflow
//!
//! Persists an entry, then asks the generative service for reflective
//! questions about it. The two steps are not transactional: once the store
//! acknowledges the entry it stays, whatever happens to generation.
//!
//! Presentation watches [`WorkflowState`] for the pending flag, the last
//! error and the current prompts.

use std::sync::Arc;

use echo_domain::{
    EntryId, EntryText, GenerateContentRequest, Identity, NewEntry, PromptSet, StoreConfig,
    WorkflowError,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::generation::ResilientApiClient;
use crate::sync::ports::EntryStore;

/// Observable state of the save workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub pending: bool,
    pub error: Option<WorkflowError>,
    pub prompts: PromptSet,
    /// Id of the most recently persisted entry.
    pub last_saved: Option<EntryId>,
}

/// Persist-then-augment workflow. One save at a time.
pub struct EntrySaveWorkflow {
    store: Arc<dyn EntryStore>,
    api: Arc<ResilientApiClient>,
    store_config: StoreConfig,
    state: watch::Sender<WorkflowState>,
}

impl EntrySaveWorkflow {
    pub fn new(
        store: Arc<dyn EntryStore>,
        api: Arc<ResilientApiClient>,
        store_config: StoreConfig,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        Self { store, api, store_config, state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Read-only change stream of the workflow state.
    pub fn watch(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// Save `raw_text` for `identity` and generate prompts for it.
    ///
    /// Blank input is ignored without touching any state. The returned
    /// error is also published in [`WorkflowState::error`].
    ///
    /// # Errors
    /// - `SaveInProgress` if another save has not settled yet (state is left
    ///   untouched)
    /// - `Persistence` if the store rejected the entry; no generation is
    ///   attempted
    /// - `Api` if the entry was saved but generation failed
    #[instrument(skip(self, raw_text, identity), fields(user_id = %identity.user_id))]
    pub async fn save(&self, raw_text: &str, identity: &Identity) -> Result<(), WorkflowError> {
        let Some(text) = EntryText::parse(raw_text) else {
            debug!("ignoring blank entry");
            return Ok(());
        };

        let guard = self.begin()?;

        let collection = self.store_config.collection_path(&identity.user_id);
        let entry = NewEntry::new(identity.user_id.clone(), text.clone());
        let entry_id = match self.store.append(&collection, entry).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "failed to persist entry");
                let error = WorkflowError::Persistence(err.to_string());
                guard.finish(|state| state.error = Some(error.clone()));
                return Err(error);
            }
        };
        info!(entry_id = %entry_id, "entry persisted");
        self.state.send_modify(|state| state.last_saved = Some(entry_id.clone()));

        let request = GenerateContentRequest::reflection(text.as_str());
        match self.api.invoke(&request).await {
            Ok(prompts) => {
                info!(entry_id = %entry_id, count = prompts.len(), "reflective prompts generated");
                guard.finish(|state| state.prompts = PromptSet::new(prompts));
                Ok(())
            }
            Err(err) => {
                warn!(entry_id = %entry_id, error = %err, "prompt generation failed");
                let error = WorkflowError::Api(err);
                guard.finish(|state| state.error = Some(error.clone()));
                Err(error)
            }
        }
    }

    /// Atomically enter pending, clearing prompts and error.
    fn begin(&self) -> Result<PendingGuard<'_>, WorkflowError> {
        let entered = self.state.send_if_modified(|state| {
            if state.pending {
                return false;
            }
            state.pending = true;
            state.prompts = PromptSet::default();
            state.error = None;
            true
        });
        if entered {
            Ok(PendingGuard { state: &self.state, armed: true })
        } else {
            debug!("save rejected, another save is pending");
            Err(WorkflowError::SaveInProgress)
        }
    }
}

/// Leaves pending when dropped, so a cancelled save never stays stuck.
struct PendingGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
    armed: bool,
}

impl PendingGuard<'_> {
    /// Apply the final update and leave pending in one notification.
    fn finish(mut self, update: impl FnOnce(&mut WorkflowState)) {
        self.armed = false;
        self.state.send_modify(|state| {
            update(state);
            state.pending = false;
        });
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|state| state.pending = false);
        }
    }
}
