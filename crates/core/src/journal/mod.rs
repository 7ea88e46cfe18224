//! Save-and-augment workflow

pub mod workflow;

pub use workflow::{EntrySaveWorkflow, WorkflowState};
