use std::sync::Arc;
use tourhub_workflow::WorkflowOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<WorkflowOrchestrator>,
}
