use crate::guide;
use crate::handlers::{self, HandlerContext};
use crate::result::{FinalizationResult, FinalizationSummary};
use crate::workflow::WorkflowName;
use chrono::Utc;
use std::sync::Arc;
use tourhub_core::identity::{IdentitySource, NameSampler};
use tourhub_core::repository::{TourRepository, TourStatusWriter};
use tourhub_core::session::SessionProvider;
use tourhub_core::tour::{TourAggregate, TourStatus};
use tourhub_core::CoreError;
use tourhub_orders::gateway::OrderGateway;
use tourhub_orders::numbering::OrderNumbering;
use tourhub_orders::quantity::QuantityPolicy;
use uuid::Uuid;

/// Drives tour finalization: resolves the tour aggregate, runs the selected
/// workflow handlers in canonical order with per-workflow failure isolation,
/// renders the instruction guide, and writes the terminal tour status.
pub struct WorkflowOrchestrator {
    repository: Arc<dyn TourRepository>,
    status_writer: Arc<dyn TourStatusWriter>,
    gateway: Arc<dyn OrderGateway>,
    sessions: Arc<dyn SessionProvider>,
    sampler: Arc<dyn NameSampler>,
    seed: Option<u64>,
}

impl WorkflowOrchestrator {
    pub fn new(
        repository: Arc<dyn TourRepository>,
        status_writer: Arc<dyn TourStatusWriter>,
        gateway: Arc<dyn OrderGateway>,
        sessions: Arc<dyn SessionProvider>,
        sampler: Arc<dyn NameSampler>,
    ) -> Self {
        Self {
            repository,
            status_writer,
            gateway,
            sessions,
            sampler,
            seed: None,
        }
    }

    /// Pin the quantity draws to a seed so a demo scenario replays exactly
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Finalize a tour: materialize each selected workflow as order batches
    /// and produce the instruction guide.
    ///
    /// Handlers run strictly sequentially in the canonical enumeration order;
    /// a handler failure is collected and the remaining handlers still run.
    /// Session and data-loading failures abort before any handler runs and
    /// skip both the guide and the status write; so does calling this on a
    /// tour that is already finalized.
    pub async fn finalize(&self, tour_id: Uuid, selected: &[WorkflowName]) -> FinalizationResult {
        let token = match self.sessions.acquire_session().await {
            Ok(token) => token,
            Err(e) => {
                let error = CoreError::SessionError(e.to_string());
                tracing::error!(%tour_id, "{}", error);
                return FinalizationResult::aborted(error.to_string());
            }
        };

        let aggregate = match self.load_aggregate(tour_id).await {
            Ok(aggregate) => aggregate,
            Err(e) => {
                let error = CoreError::DataError(e.to_string());
                tracing::error!(%tour_id, "{}", error);
                return FinalizationResult::aborted(error.to_string());
            }
        };

        // Finalization is one-way; a tour that already went through it is
        // rejected before any order is placed.
        if let Err(e) = aggregate.tour.ensure_finalizable() {
            let error = CoreError::ValidationError(e.to_string());
            tracing::warn!(%tour_id, "{}", error);
            return FinalizationResult::aborted(error.to_string());
        }

        let ordered = WorkflowName::canonical(selected);
        let now = Utc::now();
        let numbering = OrderNumbering::new(now);
        let quantities = match self.seed {
            Some(seed) => QuantityPolicy::seeded(seed),
            None => QuantityPolicy::from_entropy(),
        };
        let identities = IdentitySource::new(
            aggregate.participants.clone(),
            aggregate.host.clone(),
            self.sampler.clone(),
        );
        let ctx = HandlerContext {
            aggregate: &aggregate,
            identities: &identities,
            gateway: self.gateway.as_ref(),
            token: &token,
            numbering: &numbering,
            quantities: &quantities,
            now,
        };

        let mut errors = Vec::new();
        let mut failure_notes = Vec::new();
        let mut sales_orders = Vec::new();
        let mut purchase_orders = Vec::new();

        for workflow in &ordered {
            tracing::info!(workflow = workflow.slug(), %tour_id, "Running workflow handler");
            match handlers::run_workflow(&ctx, *workflow).await {
                Ok(outcome) => {
                    sales_orders.extend(outcome.sales_orders);
                    purchase_orders.extend(outcome.purchase_orders);
                    failure_notes.extend(
                        outcome
                            .failure_notes
                            .into_iter()
                            .map(|note| format!("{}: {}", workflow.label(), note)),
                    );
                }
                Err(e) => {
                    errors.push(format!("{} failed: {}", workflow.label(), e));
                }
            }
        }

        let guide_text = guide::render(&aggregate, &ordered, now);

        // The tour is marked finalized even when workflows failed: partial
        // demonstration data is still useful to the host.
        if let Err(e) = self
            .status_writer
            .set_status(tour_id, TourStatus::Finalized)
            .await
        {
            errors.push(format!("Tour status update failed: {}", e));
        }

        let success = errors.is_empty();
        let message = if success {
            format!(
                "Tour finalized: {} sales orders and {} purchase orders created",
                sales_orders.len(),
                purchase_orders.len()
            )
        } else {
            format!("Tour finalized with {} workflow error(s)", errors.len())
        };

        FinalizationResult {
            success,
            message,
            errors,
            guide: Some(guide_text),
            summary: Some(FinalizationSummary {
                tour_id,
                scheduled_for: aggregate.tour.scheduled_for,
                warehouse_name: aggregate.warehouse.name.clone(),
                warehouse_address: aggregate.warehouse.address.to_string(),
                host_display_name: aggregate.host.display_name.clone(),
                workflows: ordered,
                product_ids: aggregate.tour.selected_product_ids.clone(),
                participant_count: aggregate.participants.len(),
                sales_orders,
                purchase_orders,
                failure_notes,
            }),
        }
    }

    /// Render the instruction guide without finalizing, for preview.
    /// Uses the workflows stored on the tour, canonically ordered.
    pub async fn render_guide(
        &self,
        tour_id: Uuid,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let aggregate = self.load_aggregate(tour_id).await?;
        let selected: Vec<WorkflowName> = aggregate
            .tour
            .selected_workflows
            .iter()
            .filter_map(|name| WorkflowName::parse(name))
            .collect();
        let ordered = WorkflowName::canonical(&selected);

        Ok(guide::render(&aggregate, &ordered, Utc::now()))
    }

    async fn load_aggregate(
        &self,
        tour_id: Uuid,
    ) -> Result<TourAggregate, Box<dyn std::error::Error + Send + Sync>> {
        let tour = self.repository.load_tour(tour_id).await?;
        let warehouse = self.repository.load_warehouse(tour.warehouse_id).await?;
        let host = self.repository.load_host(tour.host_id).await?;
        let participants = self.repository.load_participants(tour_id).await?;

        Ok(TourAggregate {
            tour,
            warehouse,
            host,
            participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tourhub_core::identity::RosterNameSampler;
    use tourhub_core::session::SessionToken;
    use tourhub_core::tour::{Host, Participant, Tour, Warehouse};
    use tourhub_orders::gateway::CreatedOrder;
    use tourhub_orders::models::{PurchaseOrderRequest, SalesOrderRequest};
    use tourhub_shared::{MaskedEmail, PostalAddress};

    struct InMemoryTourRepository {
        aggregate: TourAggregate,
        fail_tour_lookup: bool,
    }

    #[async_trait]
    impl TourRepository for InMemoryTourRepository {
        async fn load_tour(
            &self,
            id: Uuid,
        ) -> Result<Tour, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_tour_lookup {
                return Err(format!("tour {} not found", id).into());
            }
            Ok(self.aggregate.tour.clone())
        }

        async fn load_warehouse(
            &self,
            _id: Uuid,
        ) -> Result<Warehouse, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.aggregate.warehouse.clone())
        }

        async fn load_host(
            &self,
            _id: Uuid,
        ) -> Result<Host, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.aggregate.host.clone())
        }

        async fn load_participants(
            &self,
            _tour_id: Uuid,
        ) -> Result<Vec<Participant>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.aggregate.participants.clone())
        }
    }

    #[derive(Default)]
    struct RecordingStatusWriter {
        writes: Mutex<Vec<TourStatus>>,
    }

    #[async_trait]
    impl TourStatusWriter for RecordingStatusWriter {
        async fn set_status(
            &self,
            _tour_id: Uuid,
            status: TourStatus,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.writes.lock().unwrap().push(status);
            Ok(())
        }
    }

    /// Records every submission; failure behavior is configurable per batch
    /// role so tests can exercise the partial-failure paths.
    #[derive(Default)]
    struct RecordingGateway {
        sales: Mutex<Vec<SalesOrderRequest>>,
        purchases: Mutex<Vec<PurchaseOrderRequest>>,
        fail_all_purchases: bool,
        fail_every_other_sale: bool,
        sales_calls: AtomicUsize,
    }

    #[async_trait]
    impl OrderGateway for RecordingGateway {
        async fn create_sales_order(
            &self,
            _token: &SessionToken,
            request: &SalesOrderRequest,
        ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>> {
            self.sales.lock().unwrap().push(request.clone());
            let call = self.sales_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_every_other_sale && call % 2 == 1 {
                return Err("simulated transient failure".into());
            }
            Ok(CreatedOrder {
                external_id: format!("so-{}", call + 1),
                order_number: request.order_number.clone(),
            })
        }

        async fn create_purchase_order(
            &self,
            _token: &SessionToken,
            request: &PurchaseOrderRequest,
        ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>> {
            self.purchases.lock().unwrap().push(request.clone());
            if self.fail_all_purchases {
                return Err("external system rejected the purchase order".into());
            }
            Ok(CreatedOrder {
                external_id: format!("po-{}", request.order_number),
                order_number: request.order_number.clone(),
            })
        }
    }

    struct OkSessionProvider;

    #[async_trait]
    impl SessionProvider for OkSessionProvider {
        async fn acquire_session(
            &self,
        ) -> Result<SessionToken, Box<dyn std::error::Error + Send + Sync>> {
            Ok(SessionToken {
                bearer: "session-test".to_string(),
                acquired_at: Utc::now(),
            })
        }
    }

    struct FailingSessionProvider;

    #[async_trait]
    impl SessionProvider for FailingSessionProvider {
        async fn acquire_session(
            &self,
        ) -> Result<SessionToken, Box<dyn std::error::Error + Send + Sync>> {
            Err("no refresh credential configured".into())
        }
    }

    fn participant(first: &str, last: &str) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: MaskedEmail::new(format!("{}@corp.example", first.to_lowercase())),
            company: Some("Corp".to_string()),
            title: None,
        }
    }

    fn aggregate(products: Vec<&str>, participants: Vec<Participant>) -> TourAggregate {
        let warehouse_id = Uuid::new_v4();
        let host_id = Uuid::new_v4();
        let mut tour = Tour::new(warehouse_id, host_id, Utc::now());
        tour.selected_product_ids = products.into_iter().map(String::from).collect();

        TourAggregate {
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
            participants,
        }
    }

    struct Fixture {
        orchestrator: WorkflowOrchestrator,
        gateway: Arc<RecordingGateway>,
        status_writer: Arc<RecordingStatusWriter>,
        tour_id: Uuid,
    }

    fn fixture(aggregate: TourAggregate, gateway: RecordingGateway) -> Fixture {
        let tour_id = aggregate.tour.id;
        let gateway = Arc::new(gateway);
        let status_writer = Arc::new(RecordingStatusWriter::default());
        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(InMemoryTourRepository {
                aggregate,
                fail_tour_lookup: false,
            }),
            status_writer.clone(),
            gateway.clone(),
            Arc::new(OkSessionProvider),
            Arc::new(RosterNameSampler::new()),
        )
        .with_seed(42);

        Fixture {
            orchestrator,
            gateway,
            status_writer,
            tour_id,
        }
    }

    #[tokio::test]
    async fn test_session_failure_aborts_before_handlers() {
        let aggregate = aggregate(vec!["A"], vec![]);
        let tour_id = aggregate.tour.id;
        let gateway = Arc::new(RecordingGateway::default());
        let status_writer = Arc::new(RecordingStatusWriter::default());
        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(InMemoryTourRepository {
                aggregate,
                fail_tour_lookup: false,
            }),
            status_writer.clone(),
            gateway.clone(),
            Arc::new(FailingSessionProvider),
            Arc::new(RosterNameSampler::new()),
        );

        let result = orchestrator
            .finalize(tour_id, &[WorkflowName::BulkShipping])
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Session initialization failed"));
        assert!(result.guide.is_none());
        assert!(status_writer.writes.lock().unwrap().is_empty());
        assert!(gateway.sales.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tour_aborts_without_status_write() {
        let aggregate = aggregate(vec!["A"], vec![]);
        let tour_id = aggregate.tour.id;
        let status_writer = Arc::new(RecordingStatusWriter::default());
        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(InMemoryTourRepository {
                aggregate,
                fail_tour_lookup: true,
            }),
            status_writer.clone(),
            Arc::new(RecordingGateway::default()),
            Arc::new(OkSessionProvider),
            Arc::new(RosterNameSampler::new()),
        );

        let result = orchestrator
            .finalize(tour_id, &[WorkflowName::StandardReceiving])
            .await;

        assert!(!result.success);
        assert!(result.errors[0].contains("Data loading failed"));
        assert!(result.summary.is_none());
        assert!(status_writer.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_already_finalized_tour_aborts_before_handlers() {
        let mut agg = aggregate(vec!["A", "B"], vec![]);
        agg.tour.finalize().unwrap();
        let f = fixture(agg, RecordingGateway::default());

        let result = f
            .orchestrator
            .finalize(f.tour_id, &[WorkflowName::BulkShipping])
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Invalid state transition"));
        assert!(result.summary.is_none());
        assert!(f.gateway.sales.lock().unwrap().is_empty());
        assert!(f.status_writer.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handlers_run_in_canonical_order() {
        let f = fixture(
            aggregate(vec!["A", "B", "C"], vec![participant("Lena", "Ruiz")]),
            RecordingGateway::default(),
        );

        // Selection order is deliberately scrambled.
        let result = f
            .orchestrator
            .finalize(
                f.tour_id,
                &[
                    WorkflowName::MultiItemBatch,
                    WorkflowName::BulkShipping,
                    WorkflowName::ReceiveToLight,
                ],
            )
            .await;

        assert!(result.success, "errors: {:?}", result.errors);
        let summary = result.summary.unwrap();
        assert_eq!(
            summary.workflows,
            vec![
                WorkflowName::ReceiveToLight,
                WorkflowName::BulkShipping,
                WorkflowName::MultiItemBatch,
            ]
        );

        // Submission order matches: bulk sales before multi sales.
        let sales = f.gateway.sales.lock().unwrap();
        assert!(sales.first().unwrap().order_number.starts_with("BULK-"));
        assert!(sales.last().unwrap().order_number.starts_with("MULTI-"));
    }

    #[tokio::test]
    async fn test_empty_product_selection_scoped_per_workflow() {
        let f = fixture(aggregate(vec![], vec![]), RecordingGateway::default());

        let result = f
            .orchestrator
            .finalize(
                f.tour_id,
                &[WorkflowName::StandardReceiving, WorkflowName::BulkShipping],
            )
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("Standard Receiving failed"));
        assert!(result.errors[1].contains("Bulk Shipping failed"));
        assert_eq!(result.message, "Tour finalized with 2 workflow error(s)");

        // Guide and status write still happen: handlers were allowed to run.
        assert!(result.guide.is_some());
        assert_eq!(
            *f.status_writer.writes.lock().unwrap(),
            vec![TourStatus::Finalized]
        );
    }

    #[tokio::test]
    async fn test_pack_to_light_without_participants_uses_host_identity() {
        let f = fixture(aggregate(vec!["A", "B", "C"], vec![]), RecordingGateway::default());

        let result = f
            .orchestrator
            .finalize(f.tour_id, &[WorkflowName::PackToLight])
            .await;

        assert!(result.success, "errors: {:?}", result.errors);
        let sales = f.gateway.sales.lock().unwrap();
        assert_eq!(sales.len(), 3);
        for order in sales.iter() {
            assert_eq!(order.customer.first_name, "Sam");
            assert!(order.order_number.starts_with("PTL-HOST-"));
        }
        assert_eq!(f.gateway.purchases.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_shipping_order_counts() {
        let f = fixture(
            aggregate(
                vec!["A", "B", "C"],
                vec![participant("Lena", "Ruiz"), participant("Omar", "Haddad")],
            ),
            RecordingGateway::default(),
        );

        let result = f
            .orchestrator
            .finalize(f.tour_id, &[WorkflowName::BulkShipping])
            .await;

        assert!(result.success, "errors: {:?}", result.errors);
        let sales = f.gateway.sales.lock().unwrap();
        // 2 participant orders + 10 demo orders, each a single line item
        assert_eq!(sales.len(), 12);
        for order in sales.iter() {
            assert_eq!(order.line_items.len(), 1);
        }
        assert!(f.gateway.purchases.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_receiving_and_bulk() {
        let f = fixture(aggregate(vec!["A", "B", "C"], vec![]), RecordingGateway::default());

        let result = f
            .orchestrator
            .finalize(
                f.tour_id,
                &[WorkflowName::BulkShipping, WorkflowName::StandardReceiving],
            )
            .await;

        assert!(result.success);
        assert!(result.errors.is_empty());

        let purchases = f.gateway.purchases.lock().unwrap();
        assert_eq!(purchases.len(), 1);
        let purchase = &purchases[0];
        assert!(purchase.line_items.len() <= 6);
        for line in &purchase.line_items {
            assert!(["A", "B", "C"].contains(&line.product_id.as_str()));
            assert!((5..=14).contains(&line.quantity));
        }
        assert!(purchase.order_number.contains("SAMPORTER"));

        // 10 demo orders rotating through A, B, C
        let sales = f.gateway.sales.lock().unwrap();
        assert_eq!(sales.len(), 10);
        let expected = ["A", "B", "C", "A", "B", "C", "A", "B", "C", "A"];
        for (order, expected_product) in sales.iter().zip(expected) {
            assert_eq!(order.line_items.len(), 1);
            assert_eq!(order.line_items[0].product_id, expected_product);
            assert_eq!(order.line_items[0].unit_price, 15.0);
        }
    }

    #[tokio::test]
    async fn test_purchase_batch_total_failure_fails_only_that_workflow() {
        let f = fixture(
            aggregate(vec!["A", "B"], vec![]),
            RecordingGateway {
                fail_all_purchases: true,
                ..Default::default()
            },
        );

        let result = f
            .orchestrator
            .finalize(
                f.tour_id,
                &[WorkflowName::StandardReceiving, WorkflowName::BulkShipping],
            )
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Standard Receiving failed"));

        // Bulk shipping still ran and created its demo orders.
        let summary = result.summary.unwrap();
        assert_eq!(summary.sales_orders.len(), 10);
        assert_eq!(
            *f.status_writer.writes.lock().unwrap(),
            vec![TourStatus::Finalized]
        );
    }

    #[tokio::test]
    async fn test_partial_sales_failures_are_tolerated() {
        let f = fixture(
            aggregate(vec!["A", "B", "C"], vec![]),
            RecordingGateway {
                fail_every_other_sale: true,
                ..Default::default()
            },
        );

        let result = f
            .orchestrator
            .finalize(f.tour_id, &[WorkflowName::BulkShipping])
            .await;

        // Half the demo orders failed, but the workflow itself did not.
        assert!(result.success, "errors: {:?}", result.errors);
        let summary = result.summary.unwrap();
        assert_eq!(summary.sales_orders.len(), 5);
        assert_eq!(f.gateway.sales.lock().unwrap().len(), 10);

        // Each dropped order leaves a labeled note in the summary.
        assert_eq!(summary.failure_notes.len(), 5);
        for note in &summary.failure_notes {
            assert!(note.starts_with("Bulk Shipping: sales order"));
            assert!(note.contains("simulated transient failure"));
        }
    }

    #[tokio::test]
    async fn test_totals_recomputed_on_submitted_orders() {
        let f = fixture(
            aggregate(vec!["A", "B", "C"], vec![participant("Lena", "Ruiz")]),
            RecordingGateway::default(),
        );

        let result = f
            .orchestrator
            .finalize(f.tour_id, &[WorkflowName::PackToLight])
            .await;
        assert!(result.success);

        for order in f.gateway.sales.lock().unwrap().iter() {
            let expected: f64 = order.line_items.iter().map(|l| l.subtotal()).sum();
            assert_eq!(order.subtotal, expected);
            assert_eq!(order.total_price, expected);
        }
    }

    #[tokio::test]
    async fn test_render_guide_filters_unknown_names() {
        let mut agg = aggregate(vec!["A"], vec![]);
        agg.tour.selected_workflows = vec![
            "multi_item_batch".to_string(),
            "teleportation".to_string(),
            "receive-to-light".to_string(),
        ];
        let f = fixture(agg, RecordingGateway::default());

        let text = f.orchestrator.render_guide(f.tour_id).await.unwrap();
        let receive = text.find("Demonstration: Receive to Light").unwrap();
        let multi = text.find("Demonstration: Multi-Item Batch Picking").unwrap();
        assert!(receive < multi);
        assert!(!text.contains("teleportation"));
    }
}
