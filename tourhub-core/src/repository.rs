use crate::tour::{Host, Participant, Tour, TourStatus, Warehouse};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for tour data access. Each call is a point lookup by
/// primary key; a missing row is an error, not an empty result.
#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn load_tour(
        &self,
        id: Uuid,
    ) -> Result<Tour, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_warehouse(
        &self,
        id: Uuid,
    ) -> Result<Warehouse, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_host(
        &self,
        id: Uuid,
    ) -> Result<Host, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_participants(
        &self,
        tour_id: Uuid,
    ) -> Result<Vec<Participant>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Persists the tour's terminal status
#[async_trait]
pub trait TourStatusWriter: Send + Sync {
    async fn set_status(
        &self,
        tour_id: Uuid,
        status: TourStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
