//! Invoice collaborator seam
//!
//! The renderer (PDF, HTML, print) lives outside the core; the core's
//! obligation is to hand it a complete, self-contained document:
//! family identifier, order token, timestamp, per-line detail with
//! captured prices, and the grand total.

use shared::models::{Family, InvoiceData, InvoiceLine, Order, OrderLineDetail};

/// Rendering seam; implementations are free to produce any document type
pub trait InvoiceRenderer: Send + Sync {
    fn render(&self, invoice: &InvoiceData) -> Vec<u8>;
}

/// Flatten a committed order into the renderer contract
pub fn invoice_data(family: &Family, order: &Order, lines: &[OrderLineDetail]) -> InvoiceData {
    InvoiceData {
        family_code: family.family_code.clone(),
        token: order.token.clone(),
        created_at: order.created_at,
        lines: lines
            .iter()
            .map(|l| InvoiceLine {
                name: l.item_name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
                line_total: l.line_total,
            })
            .collect(),
        total: order.total_price,
    }
}
