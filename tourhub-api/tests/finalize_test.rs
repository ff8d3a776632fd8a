use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use std::sync::Arc;
use tourhub_api::{app, AppState};
use tourhub_core::identity::RosterNameSampler;
use tourhub_core::repository::{TourRepository, TourStatusWriter};
use tourhub_core::session::StaticSessionProvider;
use tourhub_core::tour::{Host, Participant, Tour, TourError, TourStatus, Warehouse};
use tourhub_orders::SandboxOrderGateway;
use tourhub_shared::PostalAddress;
use tourhub_workflow::WorkflowOrchestrator;
use tower::ServiceExt;
use uuid::Uuid;

/// In-memory repository serving one fixed tour
struct FixtureRepository {
    tour: Tour,
    warehouse: Warehouse,
    host: Host,
    fail_warehouse_lookup: bool,
}

#[async_trait]
impl TourRepository for FixtureRepository {
    async fn load_tour(&self, id: Uuid) -> Result<Tour, Box<dyn std::error::Error + Send + Sync>> {
        if id != self.tour.id {
            return Err(TourError::NotFound(format!("tour {}", id)).into());
        }
        Ok(self.tour.clone())
    }

    async fn load_warehouse(
        &self,
        _id: Uuid,
    ) -> Result<Warehouse, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_warehouse_lookup {
            return Err("warehouse store timed out".into());
        }
        Ok(self.warehouse.clone())
    }

    async fn load_host(&self, _id: Uuid) -> Result<Host, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.host.clone())
    }

    async fn load_participants(
        &self,
        _tour_id: Uuid,
    ) -> Result<Vec<Participant>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(vec![])
    }
}

struct NoopStatusWriter;

#[async_trait]
impl TourStatusWriter for NoopStatusWriter {
    async fn set_status(
        &self,
        _tour_id: Uuid,
        _status: TourStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

fn fixture_state() -> (AppState, Uuid) {
    fixture_state_with(false)
}

fn fixture_state_with(fail_warehouse_lookup: bool) -> (AppState, Uuid) {
    let warehouse_id = Uuid::new_v4();
    let host_id = Uuid::new_v4();
    let mut tour = Tour::new(warehouse_id, host_id, Utc::now());
    tour.selected_product_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    tour.selected_workflows = vec!["bulk_shipping".to_string()];
    let tour_id = tour.id;

    let repository = Arc::new(FixtureRepository {
        tour,
        warehouse: Warehouse {
            id: warehouse_id,
            name: "Garland DC".to_string(),
            external_warehouse_id: "wh-ext-1".to_string(),
            address: PostalAddress::new("2500 Commerce Pkwy", "Garland", "TX", "75041", "US"),
        },
        host: Host {
            id: host_id,
            display_name: "Sam Porter".to_string(),
            first_name: Some("Sam".to_string()),
            last_name: Some("Porter".to_string()),
        },
        fail_warehouse_lookup,
    });

    let orchestrator = WorkflowOrchestrator::new(
        repository,
        Arc::new(NoopStatusWriter),
        Arc::new(SandboxOrderGateway::new()),
        Arc::new(StaticSessionProvider::new(Some("refresh-test".to_string()))),
        Arc::new(RosterNameSampler::new()),
    )
    .with_seed(7);

    (
        AppState {
            orchestrator: Arc::new(orchestrator),
        },
        tour_id,
    )
}

#[tokio::test]
async fn test_finalize_endpoint_returns_result() {
    let (state, tour_id) = fixture_state();

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/tours/{}/finalize", tour_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"workflows": ["bulk-shipping", "teleportation"]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let result: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(result["success"], true);
    // 0 participants: bulk shipping creates exactly 10 demo sales orders
    assert_eq!(result["summary"]["sales_orders"].as_array().unwrap().len(), 10);
    assert!(result["guide"].as_str().unwrap().contains("Bulk Shipping"));
}

#[tokio::test]
async fn test_finalize_rejects_fully_unrecognized_selection() {
    let (state, tour_id) = fixture_state();

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/tours/{}/finalize", tour_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"workflows": ["teleportation"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guide_preview_endpoint() {
    let (state, tour_id) = fixture_state();

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/tours/{}/guide", tour_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("WAREHOUSE TOUR INSTRUCTION GUIDE"));
    assert!(text.contains("Demonstration: Bulk Shipping"));
}

#[tokio::test]
async fn test_guide_preview_unknown_tour_is_404() {
    let (state, _) = fixture_state();

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/tours/{}/guide", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_guide_preview_store_failure_is_500() {
    let (state, tour_id) = fixture_state_with(true);

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/tours/{}/guide", tour_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
