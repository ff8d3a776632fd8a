use async_trait::async_trait;
use sqlx::PgPool;
use tourhub_core::repository::{TourRepository, TourStatusWriter};
use tourhub_core::tour::{Host, Participant, Tour, TourError, TourStatus, Warehouse};
use tourhub_shared::{MaskedEmail, PostalAddress};
use uuid::Uuid;

pub struct StoreTourRepository {
    pool: PgPool,
}

impl StoreTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    warehouse_id: Uuid,
    host_id: Uuid,
    selected_workflows: Vec<String>,
    selected_product_ids: Vec<String>,
    status: String,
    scheduled_for: chrono::DateTime<chrono::Utc>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(sqlx::FromRow)]
struct WarehouseRow {
    id: Uuid,
    name: String,
    external_warehouse_id: String,
    street1: String,
    street2: Option<String>,
    city: String,
    state: String,
    zip: String,
    country: String,
    phone: Option<String>,
}

#[derive(sqlx::FromRow)]
struct HostRow {
    id: Uuid,
    display_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    id: Uuid,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    title: Option<String>,
}

fn parse_status(raw: &str) -> Result<TourStatus, Box<dyn std::error::Error + Send + Sync>> {
    match raw {
        "DRAFT" => Ok(TourStatus::Draft),
        "FINALIZED" => Ok(TourStatus::Finalized),
        other => Err(format!("unknown tour status in store: {}", other).into()),
    }
}

#[async_trait]
impl TourRepository for StoreTourRepository {
    async fn load_tour(
        &self,
        id: Uuid,
    ) -> Result<Tour, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, TourRow>(
            r#"
            SELECT id, warehouse_id, host_id, selected_workflows,
                   selected_product_ids, status, scheduled_for,
                   created_at, updated_at
            FROM tours
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| TourError::NotFound(format!("tour {}", id)))?;

        let now = chrono::Utc::now();
        Ok(Tour {
            id: row.id,
            warehouse_id: row.warehouse_id,
            host_id: row.host_id,
            selected_workflows: row.selected_workflows,
            selected_product_ids: row.selected_product_ids,
            status: parse_status(&row.status)?,
            scheduled_for: row.scheduled_for,
            created_at: row.created_at.unwrap_or(now),
            updated_at: row.updated_at.unwrap_or(now),
        })
    }

    async fn load_warehouse(
        &self,
        id: Uuid,
    ) -> Result<Warehouse, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, name, external_warehouse_id, street1, street2,
                   city, state, zip, country, phone
            FROM warehouses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| TourError::NotFound(format!("warehouse {}", id)))?;

        Ok(Warehouse {
            id: row.id,
            name: row.name,
            external_warehouse_id: row.external_warehouse_id,
            address: PostalAddress {
                street1: row.street1,
                street2: row.street2,
                city: row.city,
                state: row.state,
                zip: row.zip,
                country: row.country,
                phone: row.phone,
            },
        })
    }

    async fn load_host(
        &self,
        id: Uuid,
    ) -> Result<Host, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, HostRow>(
            "SELECT id, display_name, first_name, last_name FROM hosts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| TourError::NotFound(format!("host {}", id)))?;

        Ok(Host {
            id: row.id,
            display_name: row.display_name,
            first_name: row.first_name,
            last_name: row.last_name,
        })
    }

    async fn load_participants(
        &self,
        tour_id: Uuid,
    ) -> Result<Vec<Participant>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT p.id, p.first_name, p.last_name, p.email, p.company, p.title
            FROM participants p
            JOIN tour_participants tp ON tp.participant_id = p.id
            WHERE tp.tour_id = $1
            ORDER BY tp.position
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Participant {
                id: row.id,
                first_name: row.first_name.unwrap_or_default(),
                last_name: row.last_name.unwrap_or_default(),
                email: MaskedEmail::new(row.email.unwrap_or_default()),
                company: row.company,
                title: row.title,
            })
            .collect())
    }
}

#[async_trait]
impl TourStatusWriter for StoreTourRepository {
    async fn set_status(
        &self,
        tour_id: Uuid,
        status: TourStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Only draft tours may move; a concurrent finalize loses this race
        // and reports it instead of silently rewriting the row.
        let result = sqlx::query(
            "UPDATE tours SET status = $2, updated_at = NOW() WHERE id = $1 AND status = 'DRAFT'",
        )
        .bind(tour_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("tour {} not found or no longer in draft", tour_id).into());
        }

        tracing::info!(%tour_id, status = status.as_str(), "Tour status updated");
        Ok(())
    }
}
