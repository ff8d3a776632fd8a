use crate::models::{
    AddressBlock, FulfillmentStatus, OrderLineItem, OrderModelError, PurchaseOrderRequest,
    SalesOrderRequest,
};
use chrono::{DateTime, Duration, Utc};
use tourhub_core::identity::CustomerIdentity;
use tourhub_core::tour::Warehouse;

/// Demo orders ship from and bill to the warehouse being toured.
const SHOP_NAME: &str = "Tour Demo Shop";
const VENDOR_NAME: &str = "Tour Demo Vendor";

/// Days between order date and required ship date
const SHIP_LEAD_DAYS: i64 = 7;

/// Build a fully-populated sales order request.
///
/// Totals are always recomputed from the line items, never taken from the
/// caller, so `subtotal == total_price == Σ(quantity × unit_price)` holds by
/// construction.
pub fn build_sales_order(
    order_number: String,
    warehouse: &Warehouse,
    customer: &CustomerIdentity,
    line_items: Vec<OrderLineItem>,
    tags: Vec<String>,
    now: DateTime<Utc>,
) -> Result<SalesOrderRequest, OrderModelError> {
    if line_items.is_empty() {
        return Err(OrderModelError::EmptyOrder);
    }

    let subtotal: f64 = line_items.iter().map(OrderLineItem::subtotal).sum();
    let address = AddressBlock {
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        email: customer.email.as_str().to_string(),
        address: warehouse.address.clone(),
    };

    Ok(SalesOrderRequest {
        order_number,
        shop_name: SHOP_NAME.to_string(),
        fulfillment_status: FulfillmentStatus::Pending,
        subtotal,
        total_price: subtotal,
        customer: customer.clone(),
        shipping_address: address.clone(),
        billing_address: address,
        line_items,
        tags,
        order_date: now,
        required_ship_date: (now + Duration::days(SHIP_LEAD_DAYS)).date_naive(),
    })
}

/// Build a fully-populated purchase order request. Same recomputed-totals
/// invariant as sales orders.
pub fn build_purchase_order(
    order_number: String,
    external_warehouse_id: &str,
    line_items: Vec<OrderLineItem>,
    tags: Vec<String>,
    now: DateTime<Utc>,
) -> Result<PurchaseOrderRequest, OrderModelError> {
    if line_items.is_empty() {
        return Err(OrderModelError::EmptyOrder);
    }

    let total_cost: f64 = line_items.iter().map(OrderLineItem::subtotal).sum();

    Ok(PurchaseOrderRequest {
        order_number,
        vendor_name: VENDOR_NAME.to_string(),
        fulfillment_status: FulfillmentStatus::Pending,
        total_cost,
        external_warehouse_id: external_warehouse_id.to_string(),
        line_items,
        tags,
        order_date: now,
        required_ship_date: (now + Duration::days(SHIP_LEAD_DAYS)).date_naive(),
    })
}
