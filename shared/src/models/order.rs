//! Order models

use serde::{Deserialize, Serialize};

/// Payment status of an order
///
/// `Pending` orders come from the deferred flow and are confirmed by a
/// separate payment step; the checkout flow creates orders as `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Order entity
///
/// Immutable after creation except for the `payment_status` transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub family_id: i64,
    /// Short unique token shown on invoices and at pickup
    pub token: String,
    /// One-time code that authorized this checkout (empty for deferred flow)
    pub otp_code: String,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
}

/// One line of an order; `unit_price` is captured at order time so the
/// invoice stays accurate if the item's price is edited later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    /// Submission order, used as the line order on invoices
    pub line_no: i64,
}

/// One requested line in a place-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub item_id: i64,
    pub quantity: i64,
}

/// Order line joined with its item name (admin/invoice views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLineDetail {
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Order with family context and lines (admin views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub token: String,
    pub family_code: String,
    pub area: String,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub items: Vec<OrderLineDetail>,
}

/// Flattened order document handed to the invoice-rendering collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceData {
    pub family_code: String,
    pub token: String,
    pub created_at: i64,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}
