use crate::workflow::WorkflowName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One created order, as reported back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrderSummary {
    pub order_number: String,
    pub external_id: String,
    pub workflow: WorkflowName,
    pub line_item_count: usize,
    pub total: f64,
}

/// Structured recap of what finalization materialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizationSummary {
    pub tour_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub warehouse_name: String,
    pub warehouse_address: String,
    pub host_display_name: String,
    pub workflows: Vec<WorkflowName>,
    pub product_ids: Vec<String>,
    pub participant_count: usize,
    pub sales_orders: Vec<CreatedOrderSummary>,
    pub purchase_orders: Vec<CreatedOrderSummary>,
    /// Tolerated per-order submission failures, labeled with their workflow.
    /// These do not flip `success`; a workflow only lands in the error list
    /// when it produces nothing at all.
    pub failure_notes: Vec<String>,
}

/// Outcome of one finalize call.
///
/// `success` is true iff the error list is empty. Workflow-level failures are
/// collected here as strings; the orchestrator itself only fails fast for
/// session or data-loading problems, in which case `guide` and `summary` are
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizationResult {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
    pub guide: Option<String>,
    pub summary: Option<FinalizationSummary>,
}

impl FinalizationResult {
    /// Fast-fail result: no handlers ran, no guide, no status write.
    pub fn aborted(error: String) -> Self {
        Self {
            success: false,
            message: "Tour finalization aborted".to_string(),
            errors: vec![error],
            guide: None,
            summary: None,
        }
    }
}
