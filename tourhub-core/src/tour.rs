use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourhub_shared::{MaskedEmail, PostalAddress};
use uuid::Uuid;

/// Tour status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TourStatus {
    Draft,
    Finalized,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Draft => "DRAFT",
            TourStatus::Finalized => "FINALIZED",
        }
    }
}

/// A scheduled demonstration tour of a warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub host_id: Uuid,
    pub selected_workflows: Vec<String>,
    pub selected_product_ids: Vec<String>,
    pub status: TourStatus,
    pub scheduled_for: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    pub fn new(warehouse_id: Uuid, host_id: Uuid, scheduled_for: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            warehouse_id,
            host_id,
            selected_workflows: Vec::new(),
            selected_product_ids: Vec::new(),
            status: TourStatus::Draft,
            scheduled_for,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the Draft → Finalized transition without performing it, so the
    /// orchestrator can reject re-finalization before any handler runs.
    pub fn ensure_finalizable(&self) -> Result<(), TourError> {
        if self.status != TourStatus::Draft {
            return Err(TourError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: TourStatus::Finalized.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Transition: Draft → Finalized. The only mutation this system performs.
    pub fn finalize(&mut self) -> Result<(), TourError> {
        self.ensure_finalizable()?;
        self.status = TourStatus::Finalized;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// The person running the demonstration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub id: Uuid,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// An attendee of a tour. First/last/email may be blank for walk-ins;
/// identity resolution fills in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: MaskedEmail,
    pub company: Option<String>,
    pub title: Option<String>,
}

/// The warehouse a tour demonstrates, with its external-system identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub external_warehouse_id: String,
    pub address: PostalAddress,
}

/// Fully-resolved tour data: everything finalization needs in one place
#[derive(Debug, Clone)]
pub struct TourAggregate {
    pub tour: Tour,
    pub warehouse: Warehouse,
    pub host: Host,
    pub participants: Vec<Participant>,
}

#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
