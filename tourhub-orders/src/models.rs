use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tourhub_core::identity::CustomerIdentity;
use tourhub_shared::PostalAddress;

/// Fulfillment status stamped on order requests and line items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    Fulfilled,
    Canceled,
}

/// A single product line on a synthetic order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub display_name: String,
    pub fulfillment_status: FulfillmentStatus,
    pub external_warehouse_id: String,
}

impl OrderLineItem {
    pub fn new(
        product_id: &str,
        quantity: u32,
        unit_price: f64,
        external_warehouse_id: &str,
    ) -> Result<Self, OrderModelError> {
        if quantity == 0 {
            return Err(OrderModelError::ZeroQuantity(product_id.to_string()));
        }
        Ok(Self {
            product_id: product_id.to_string(),
            quantity,
            unit_price,
            display_name: format!("Demo item {}", product_id),
            fulfillment_status: FulfillmentStatus::Pending,
            external_warehouse_id: external_warehouse_id.to_string(),
        })
    }

    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Name + email + postal address block on a sales order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressBlock {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: PostalAddress,
}

/// A sales order ready for submission to the external order-management system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderRequest {
    pub order_number: String,
    pub shop_name: String,
    pub fulfillment_status: FulfillmentStatus,
    pub subtotal: f64,
    pub total_price: f64,
    pub customer: CustomerIdentity,
    pub shipping_address: AddressBlock,
    pub billing_address: AddressBlock,
    pub line_items: Vec<OrderLineItem>,
    pub tags: Vec<String>,
    pub order_date: DateTime<Utc>,
    pub required_ship_date: NaiveDate,
}

/// A purchase order ready for submission to the external order-management system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderRequest {
    pub order_number: String,
    pub vendor_name: String,
    pub fulfillment_status: FulfillmentStatus,
    pub total_cost: f64,
    pub external_warehouse_id: String,
    pub line_items: Vec<OrderLineItem>,
    pub tags: Vec<String>,
    pub order_date: DateTime<Utc>,
    pub required_ship_date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderModelError {
    #[error("Line item for {0} has zero quantity")]
    ZeroQuantity(String),

    #[error("Order has no line items")]
    EmptyOrder,
}
