//! The OAuth callback state machine.

pub mod orchestrator;
pub mod state;

pub use orchestrator::LinkingOrchestrator;
pub use state::{CallbackParams, LinkFailure, LinkOutcome, LinkStage, LinkedSession};
