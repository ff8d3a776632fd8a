use serde::{Deserialize, Serialize};

/// The six named demonstration scenarios. Declaration order is the canonical
/// execution order: handlers always run in this sequence regardless of the
/// order workflows were selected in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowName {
    ReceiveToLight,
    PackToLight,
    StandardReceiving,
    BulkShipping,
    SingleItemBatch,
    MultiItemBatch,
}

impl WorkflowName {
    /// Canonical execution order
    pub const ALL: [WorkflowName; 6] = [
        WorkflowName::ReceiveToLight,
        WorkflowName::PackToLight,
        WorkflowName::StandardReceiving,
        WorkflowName::BulkShipping,
        WorkflowName::SingleItemBatch,
        WorkflowName::MultiItemBatch,
    ];

    /// Human-readable label, used in error strings and the instruction guide
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowName::ReceiveToLight => "Receive to Light",
            WorkflowName::PackToLight => "Pack to Light",
            WorkflowName::StandardReceiving => "Standard Receiving",
            WorkflowName::BulkShipping => "Bulk Shipping",
            WorkflowName::SingleItemBatch => "Single-Item Batch Picking",
            WorkflowName::MultiItemBatch => "Multi-Item Batch Picking",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            WorkflowName::ReceiveToLight => "receive_to_light",
            WorkflowName::PackToLight => "pack_to_light",
            WorkflowName::StandardReceiving => "standard_receiving",
            WorkflowName::BulkShipping => "bulk_shipping",
            WorkflowName::SingleItemBatch => "single_item_batch",
            WorkflowName::MultiItemBatch => "multi_item_batch",
        }
    }

    /// Short code embedded in order-number prefixes
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowName::ReceiveToLight => "RTL",
            WorkflowName::PackToLight => "PTL",
            WorkflowName::StandardReceiving => "RECV",
            WorkflowName::BulkShipping => "BULK",
            WorkflowName::SingleItemBatch => "SINGLE",
            WorkflowName::MultiItemBatch => "MULTI",
        }
    }

    /// Parse a selected workflow name. Accepts snake_case and kebab-case;
    /// unrecognized names yield None and are ignored by callers, not errors.
    pub fn parse(value: &str) -> Option<WorkflowName> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "receive_to_light" => Some(WorkflowName::ReceiveToLight),
            "pack_to_light" => Some(WorkflowName::PackToLight),
            "standard_receiving" => Some(WorkflowName::StandardReceiving),
            "bulk_shipping" => Some(WorkflowName::BulkShipping),
            "single_item_batch" => Some(WorkflowName::SingleItemBatch),
            "multi_item_batch" => Some(WorkflowName::MultiItemBatch),
            _ => None,
        }
    }

    /// Restrict a selection set to the canonical execution order
    pub fn canonical(selected: &[WorkflowName]) -> Vec<WorkflowName> {
        Self::ALL
            .iter()
            .copied()
            .filter(|w| selected.contains(w))
            .collect()
    }
}
