//! Money arithmetic using rust_decimal for precision
//!
//! Prices cross the API and the database as `f64`; every computation
//! goes through `Decimal` and is rounded to 2 places before leaving.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// unit_price × quantity, rounded
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    let price = Decimal::from_f64(unit_price).unwrap_or_default();
    (price * Decimal::from(quantity))
        .round_dp(DECIMAL_PLACES)
        .to_f64()
        .unwrap_or(0.0)
}

/// Sum of (unit_price, quantity) pairs, rounded once at the end
pub fn order_total(lines: impl IntoIterator<Item = (f64, i64)>) -> f64 {
    let mut total = Decimal::ZERO;
    for (unit_price, quantity) in lines {
        let price = Decimal::from_f64(unit_price).unwrap_or_default();
        total += price * Decimal::from(quantity);
    }
    total.round_dp(DECIMAL_PLACES).to_f64().unwrap_or(0.0)
}
