pub mod guide;
pub mod handlers;
pub mod orchestrator;
pub mod result;
pub mod workflow;

pub use orchestrator::WorkflowOrchestrator;
pub use result::{CreatedOrderSummary, FinalizationResult, FinalizationSummary};
pub use workflow::WorkflowName;
