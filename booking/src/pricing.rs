//! Order pricing.
//!
//! Pure, stateless derivations from ticket count and unit price. Nothing is
//! rounded mid-calculation; formatting for display is the only place rounding
//! happens. Zero or negative quantities are rejected upstream by the quantity
//! clamp and the step gates, not here.

/// Processing fee charged per ticket.
pub const PROCESSING_FEE_PER_TICKET: f64 = 1.50;

/// Service charge per ticket.
pub const SERVICE_CHARGE_PER_TICKET: f64 = 0.75;

/// Ticket subtotal: `quantity * unit_price`.
#[must_use]
pub fn ticket_subtotal(quantity: u32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

/// Processing fee for the order.
#[must_use]
pub fn processing_fee(quantity: u32) -> f64 {
    f64::from(quantity) * PROCESSING_FEE_PER_TICKET
}

/// Service charge for the order.
#[must_use]
pub fn service_charge(quantity: u32) -> f64 {
    f64::from(quantity) * SERVICE_CHARGE_PER_TICKET
}

/// Full order total: subtotal + processing fee + service charge.
#[must_use]
pub fn order_total(quantity: u32, unit_price: f64) -> f64 {
    ticket_subtotal(quantity, unit_price) + processing_fee(quantity) + service_charge(quantity)
}

/// Display formatting for currency amounts, applied only at render time.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}
