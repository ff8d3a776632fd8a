use crate::result::CreatedOrderSummary;
use crate::workflow::WorkflowName;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tourhub_core::identity::{IdentityKind, IdentitySource};
use tourhub_core::session::SessionToken;
use tourhub_core::tour::TourAggregate;
use tourhub_orders::gateway::OrderGateway;
use tourhub_orders::models::{OrderLineItem, OrderModelError, PurchaseOrderRequest, SalesOrderRequest};
use tourhub_orders::numbering::OrderNumbering;
use tourhub_orders::quantity::QuantityPolicy;
use tourhub_orders::{build_purchase_order, build_sales_order};

/// Unit price on participant sales orders
const PARTICIPANT_UNIT_PRICE: f64 = 10.0;
/// Unit price on generated single-line demo orders
const DEMO_SINGLE_UNIT_PRICE: f64 = 15.0;
/// Unit price on generated multi-line demo orders
const DEMO_MULTI_UNIT_PRICE: f64 = 12.0;
/// Unit cost on purchase-order lines
const PURCHASE_UNIT_COST: f64 = 10.0;

/// Purchase orders cap at the first 6 selected products
const PURCHASE_SKU_CAP: usize = 6;
/// Participant orders draw from the first 3 selected products
const PARTICIPANT_SKU_CAP: usize = 3;

/// Demo order counts per workflow recipe
const BULK_DEMO_ORDERS: usize = 10;
const SINGLE_DEMO_ORDERS: usize = 5;
const MULTI_DEMO_ORDERS: usize = 5;
/// Host-identity orders created by pack-to-light when the tour has no participants
const HOST_FALLBACK_ORDERS: usize = 3;

/// Everything a handler needs for one finalize run. The token and numbering
/// are shared read-only across all concurrent submissions in the run.
pub(crate) struct HandlerContext<'a> {
    pub aggregate: &'a TourAggregate,
    pub identities: &'a IdentitySource,
    pub gateway: &'a dyn OrderGateway,
    pub token: &'a SessionToken,
    pub numbering: &'a OrderNumbering,
    pub quantities: &'a QuantityPolicy,
    pub now: DateTime<Utc>,
}

impl HandlerContext<'_> {
    fn product_ids(&self) -> &[String] {
        &self.aggregate.tour.selected_product_ids
    }

    fn external_warehouse_id(&self) -> &str {
        &self.aggregate.warehouse.external_warehouse_id
    }

    fn tags(&self, workflow: WorkflowName, role: &str) -> Vec<String> {
        vec![
            "tour-demo".to_string(),
            workflow.slug().to_string(),
            role.to_string(),
        ]
    }
}

/// Orders created by one handler invocation, plus tolerated per-order
/// submission failures (logged, counted, but not workflow-fatal).
#[derive(Debug, Default)]
pub(crate) struct WorkflowOutcome {
    pub sales_orders: Vec<CreatedOrderSummary>,
    pub purchase_orders: Vec<CreatedOrderSummary>,
    pub failure_notes: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("no products selected for the tour")]
    NoProductsSelected,

    #[error("purchase order batch failed entirely: {0}")]
    PurchaseBatchFailed(String),

    #[error(transparent)]
    Build(#[from] OrderModelError),
}

/// Run one workflow's order-generation recipe. SKU-dependent preconditions
/// are checked here so the orchestrator can report them per workflow.
pub(crate) async fn run_workflow(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
) -> Result<WorkflowOutcome, WorkflowError> {
    if ctx.product_ids().is_empty() {
        return Err(WorkflowError::NoProductsSelected);
    }

    match workflow {
        WorkflowName::ReceiveToLight => purchase_only(ctx, workflow).await,
        WorkflowName::PackToLight => pack_to_light(ctx).await,
        WorkflowName::StandardReceiving => purchase_only(ctx, workflow).await,
        WorkflowName::BulkShipping => {
            picking_batch(ctx, WorkflowName::BulkShipping, BULK_DEMO_ORDERS, false).await
        }
        WorkflowName::SingleItemBatch => {
            picking_batch(ctx, WorkflowName::SingleItemBatch, SINGLE_DEMO_ORDERS, false).await
        }
        WorkflowName::MultiItemBatch => {
            picking_batch(ctx, WorkflowName::MultiItemBatch, MULTI_DEMO_ORDERS, true).await
        }
    }
}

/// receive-to-light / standard-receiving: one purchase order, no sales orders
async fn purchase_only(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
) -> Result<WorkflowOutcome, WorkflowError> {
    let request = purchase_request(ctx, workflow)?;
    let (purchase_orders, failure_notes) =
        submit_purchase_batch(ctx, workflow, vec![request]).await?;

    Ok(WorkflowOutcome {
        sales_orders: Vec::new(),
        purchase_orders,
        failure_notes,
    })
}

/// pack-to-light: one sales order per participant (or three under the host's
/// identity when the tour has no participants), plus one purchase order
async fn pack_to_light(ctx: &HandlerContext<'_>) -> Result<WorkflowOutcome, WorkflowError> {
    let workflow = WorkflowName::PackToLight;

    let sales_requests = if ctx.identities.participant_count() == 0 {
        host_fallback_requests(ctx, workflow)?
    } else {
        participant_requests(ctx, workflow, false)?
    };

    let (sales_orders, mut failure_notes) = submit_sales_batch(ctx, workflow, sales_requests).await;

    let purchase = purchase_request(ctx, workflow)?;
    let (purchase_orders, purchase_notes) =
        submit_purchase_batch(ctx, workflow, vec![purchase]).await?;
    failure_notes.extend(purchase_notes);

    Ok(WorkflowOutcome {
        sales_orders,
        purchase_orders,
        failure_notes,
    })
}

/// bulk-shipping / single-item-batch / multi-item-batch: one sales order per
/// participant plus a batch of generated-identity demo orders
async fn picking_batch(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    demo_count: usize,
    multi_line: bool,
) -> Result<WorkflowOutcome, WorkflowError> {
    let mut requests = participant_requests(ctx, workflow, true)?;
    if multi_line {
        requests.extend(demo_multi_line_requests(ctx, workflow, demo_count)?);
    } else {
        requests.extend(demo_single_line_requests(ctx, workflow, demo_count)?);
    }

    let (sales_orders, failure_notes) = submit_sales_batch(ctx, workflow, requests).await;

    Ok(WorkflowOutcome {
        sales_orders,
        purchase_orders: Vec::new(),
        failure_notes,
    })
}

/// One sales order per participant. Pack-to-light orders carry the first
/// three selected products as separate lines; picking workflows keep each
/// participant order to a single line drawn from that same three-product
/// pool, rotating by participant index.
fn participant_requests(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    single_line: bool,
) -> Result<Vec<SalesOrderRequest>, WorkflowError> {
    let products = ctx.product_ids();
    let pool = &products[..products.len().min(PARTICIPANT_SKU_CAP)];
    let mut requests = Vec::with_capacity(ctx.identities.participant_count());

    for index in 0..ctx.identities.participant_count() {
        let identity = ctx.identities.resolve(IdentityKind::Participant, index);

        let line_items = if single_line {
            vec![OrderLineItem::new(
                &pool[index % pool.len()],
                1,
                PARTICIPANT_UNIT_PRICE,
                ctx.external_warehouse_id(),
            )?]
        } else {
            pool.iter()
                .map(|product_id| {
                    OrderLineItem::new(
                        product_id,
                        1,
                        PARTICIPANT_UNIT_PRICE,
                        ctx.external_warehouse_id(),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        requests.push(build_sales_order(
            ctx.numbering
                .sales_number(&format!("{}-PARTICIPANT", workflow.code())),
            &ctx.aggregate.warehouse,
            &identity,
            line_items,
            ctx.tags(workflow, "participant"),
            ctx.now,
        )?);
    }

    Ok(requests)
}

/// Three orders under the host's own identity, used by pack-to-light when
/// nobody signed up but the station still needs work to demonstrate
fn host_fallback_requests(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
) -> Result<Vec<SalesOrderRequest>, WorkflowError> {
    let products = ctx.product_ids();
    let pool = &products[..products.len().min(PARTICIPANT_SKU_CAP)];
    let identity = ctx.identities.resolve(IdentityKind::Host, 0);

    (0..HOST_FALLBACK_ORDERS)
        .map(|_| {
            let line_items = pool
                .iter()
                .map(|product_id| {
                    OrderLineItem::new(
                        product_id,
                        1,
                        PARTICIPANT_UNIT_PRICE,
                        ctx.external_warehouse_id(),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(build_sales_order(
                ctx.numbering
                    .sales_number(&format!("{}-HOST", workflow.code())),
                &ctx.aggregate.warehouse,
                &identity,
                line_items,
                ctx.tags(workflow, "host"),
                ctx.now,
            )?)
        })
        .collect()
}

/// Generated-identity demo orders, one line each, rotating through the
/// selected products by index
fn demo_single_line_requests(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    count: usize,
) -> Result<Vec<SalesOrderRequest>, WorkflowError> {
    let products = ctx.product_ids();

    (0..count)
        .map(|index| {
            let identity = ctx.identities.resolve(IdentityKind::Generated, index);
            let line_items = vec![OrderLineItem::new(
                &products[index % products.len()],
                ctx.quantities.demo_quantity(),
                DEMO_SINGLE_UNIT_PRICE,
                ctx.external_warehouse_id(),
            )?];

            Ok(build_sales_order(
                ctx.numbering
                    .sales_number(&format!("{}-DEMO", workflow.code())),
                &ctx.aggregate.warehouse,
                &identity,
                line_items,
                ctx.tags(workflow, "demo-customer"),
                ctx.now,
            )?)
        })
        .collect()
}

/// Generated-identity demo orders with 2–4 lines: a window of products
/// starting at a rotating offset, wrapping around the selection
fn demo_multi_line_requests(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    count: usize,
) -> Result<Vec<SalesOrderRequest>, WorkflowError> {
    let products = ctx.product_ids();

    (0..count)
        .map(|index| {
            let identity = ctx.identities.resolve(IdentityKind::Generated, index);
            let width = ctx.quantities.multi_line_width(products.len());
            let offset = index % products.len();

            let line_items = (0..width)
                .map(|j| {
                    OrderLineItem::new(
                        &products[(offset + j) % products.len()],
                        ctx.quantities.demo_quantity(),
                        DEMO_MULTI_UNIT_PRICE,
                        ctx.external_warehouse_id(),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(build_sales_order(
                ctx.numbering
                    .sales_number(&format!("{}-DEMO", workflow.code())),
                &ctx.aggregate.warehouse,
                &identity,
                line_items,
                ctx.tags(workflow, "demo-customer"),
                ctx.now,
            )?)
        })
        .collect()
}

/// One purchase order over the first six selected products, restocking the
/// inventory the sales orders will consume
fn purchase_request(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
) -> Result<PurchaseOrderRequest, WorkflowError> {
    let products = ctx.product_ids();
    let line_items = products
        .iter()
        .take(PURCHASE_SKU_CAP)
        .map(|product_id| {
            OrderLineItem::new(
                product_id,
                ctx.quantities.purchase_quantity(),
                PURCHASE_UNIT_COST,
                ctx.external_warehouse_id(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(build_purchase_order(
        ctx.numbering.purchase_number(
            &format!("{}-PO", workflow.code()),
            &ctx.aggregate.host.display_name,
            ctx.now,
        ),
        ctx.external_warehouse_id(),
        line_items,
        ctx.tags(workflow, "purchase"),
        ctx.now,
    )?)
}

/// Fan out a sales batch concurrently and wait for every response. Failures
/// are tolerated: they reduce the success count and surface as notes.
async fn submit_sales_batch(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    requests: Vec<SalesOrderRequest>,
) -> (Vec<CreatedOrderSummary>, Vec<String>) {
    let results = join_all(
        requests
            .iter()
            .map(|request| ctx.gateway.create_sales_order(ctx.token, request)),
    )
    .await;

    let mut created = Vec::new();
    let mut failures = Vec::new();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(order) => created.push(CreatedOrderSummary {
                order_number: request.order_number.clone(),
                external_id: order.external_id,
                workflow,
                line_item_count: request.line_items.len(),
                total: request.total_price,
            }),
            Err(e) => {
                tracing::warn!(
                    workflow = workflow.slug(),
                    order_number = %request.order_number,
                    "Sales order submission failed: {}",
                    e
                );
                failures.push(format!("sales order {}: {}", request.order_number, e));
            }
        }
    }

    (created, failures)
}

/// Fan out a purchase batch concurrently. Purchase batches are mandatory:
/// the workflow fails when every order in a non-empty batch is rejected.
async fn submit_purchase_batch(
    ctx: &HandlerContext<'_>,
    workflow: WorkflowName,
    requests: Vec<PurchaseOrderRequest>,
) -> Result<(Vec<CreatedOrderSummary>, Vec<String>), WorkflowError> {
    let results = join_all(
        requests
            .iter()
            .map(|request| ctx.gateway.create_purchase_order(ctx.token, request)),
    )
    .await;

    let mut created = Vec::new();
    let mut failures = Vec::new();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(order) => created.push(CreatedOrderSummary {
                order_number: request.order_number.clone(),
                external_id: order.external_id,
                workflow,
                line_item_count: request.line_items.len(),
                total: request.total_cost,
            }),
            Err(e) => {
                tracing::warn!(
                    workflow = workflow.slug(),
                    order_number = %request.order_number,
                    "Purchase order submission failed: {}",
                    e
                );
                failures.push(format!("purchase order {}: {}", request.order_number, e));
            }
        }
    }

    if created.is_empty() && !requests.is_empty() {
        return Err(WorkflowError::PurchaseBatchFailed(failures.join("; ")));
    }

    Ok((created, failures))
}
