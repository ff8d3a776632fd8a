use crate::models::{PurchaseOrderRequest, SalesOrderRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tourhub_core::session::SessionToken;

/// Handle returned by the external order-management system for a created order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub external_id: String,
    pub order_number: String,
}

/// Submits orders to the external order-management system.
///
/// The orchestrator treats this as a black box with possible transient
/// failures: one request/response per call, no internal retries. Retries,
/// if any, are the implementor's concern.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_sales_order(
        &self,
        token: &SessionToken,
        request: &SalesOrderRequest,
    ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>>;

    async fn create_purchase_order(
        &self,
        token: &SessionToken,
        request: &PurchaseOrderRequest,
    ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory gateway standing in for the real HTTP transport.
///
/// Accepts everything except orders tagged `simulate-failure`, which lets
/// demos exercise the partial-failure path without touching the network.
pub struct SandboxOrderGateway {
    created: AtomicU64,
}

impl SandboxOrderGateway {
    pub fn new() -> Self {
        Self {
            created: AtomicU64::new(0),
        }
    }

    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    fn accept(&self, order_number: &str, tags: &[String]) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>> {
        if tags.iter().any(|t| t == "simulate-failure") {
            return Err(format!("order {} rejected by sandbox", order_number).into());
        }

        let id = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CreatedOrder {
            external_id: format!("sandbox-order-{}", id),
            order_number: order_number.to_string(),
        })
    }
}

impl Default for SandboxOrderGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderGateway for SandboxOrderGateway {
    async fn create_sales_order(
        &self,
        _token: &SessionToken,
        request: &SalesOrderRequest,
    ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(order_number = %request.order_number, "Sandbox sales order accepted");
        self.accept(&request.order_number, &request.tags)
    }

    async fn create_purchase_order(
        &self,
        _token: &SessionToken,
        request: &PurchaseOrderRequest,
    ) -> Result<CreatedOrder, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(order_number = %request.order_number, "Sandbox purchase order accepted");
        self.accept(&request.order_number, &request.tags)
    }
}
