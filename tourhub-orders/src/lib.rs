pub mod builder;
pub mod gateway;
pub mod models;
pub mod numbering;
pub mod quantity;

pub use builder::{build_purchase_order, build_sales_order};
pub use gateway::{CreatedOrder, OrderGateway, SandboxOrderGateway};
pub use models::{FulfillmentStatus, OrderLineItem, PurchaseOrderRequest, SalesOrderRequest};
pub use numbering::OrderNumbering;
pub use quantity::QuantityPolicy;
