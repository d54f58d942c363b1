//! Render-facing projections of booking state.
//!
//! [`step_view`] maps the current step to exactly the state slice a renderer
//! needs, so display code never digs through [`BookingState`] directly.
//! While catalog data has not arrived the projection is always the loading
//! placeholder, whatever the step.

use crate::pricing;
use crate::types::{
    BookingConfirmation, BookingPayment, BookingQuantity, BookingSeating, BookingSelection,
    BookingState, BookingStep, BookingUserInfo, MAX_TICKETS_PER_ORDER, TicketTier,
};
use std::collections::HashMap;

/// Priced order breakdown for the review and payment steps.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSummary {
    /// Chosen tier display name
    pub tier_name: String,
    /// Price per ticket
    pub unit_price: f64,
    /// Number of tickets
    pub quantity: u32,
    /// Ticket subtotal
    pub subtotal: f64,
    /// Processing fee for the order
    pub processing_fee: f64,
    /// Service charge for the order
    pub service_charge: f64,
    /// Grand total
    pub total: f64,
}

/// Derive the order breakdown, or `None` before tier and quantity are set.
#[must_use]
pub fn order_summary(state: &BookingState) -> Option<OrderSummary> {
    let selection = state.selection.as_ref()?;
    let quantity = state.quantity.as_ref()?;
    let count = quantity.selected_tickets();

    Some(OrderSummary {
        tier_name: selection.tier_name.clone(),
        unit_price: selection.price,
        quantity: count,
        subtotal: pricing::ticket_subtotal(count, selection.price),
        processing_fee: pricing::processing_fee(count),
        service_charge: pricing::service_charge(count),
        total: pricing::order_total(count, selection.price),
    })
}

/// Everything the review step shows for a complete booking.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewView<'a> {
    /// Priced order breakdown
    pub summary: OrderSummary,
    /// Contact details
    pub user_info: &'a BookingUserInfo,
    /// Seat assignment, if any was made
    pub seating: Option<&'a BookingSeating>,
}

/// The state slice behind the currently shown step.
#[derive(Debug)]
pub enum StepView<'a> {
    /// Catalog data has not arrived; render a placeholder
    Loading,
    /// Tier picker with the current choice, if any
    TierPicker {
        /// Tiers on offer
        tiers: &'a [TicketTier],
        /// Currently chosen tier
        current: Option<&'a BookingSelection>,
    },
    /// Ticket count picker
    QuantityPicker {
        /// The tier being bought; absent when deep-linked past selection
        selection: Option<&'a BookingSelection>,
        /// Current count and subtotal
        quantity: Option<BookingQuantity>,
        /// Upper bound on the count
        max_tickets: u32,
    },
    /// Seat map and picker
    SeatPicker {
        /// Ticket count bounding the selection; absent when deep-linked
        quantity: Option<BookingQuantity>,
        /// Current seat assignment
        seating: Option<&'a BookingSeating>,
    },
    /// Contact details form with inline advisory errors
    DetailsForm {
        /// Current form contents
        user_info: Option<&'a BookingUserInfo>,
        /// Advisory messages keyed by field
        errors: &'a HashMap<String, String>,
    },
    /// Order review for a complete booking
    Review(ReviewView<'a>),
    /// Review reached with pieces missing (deep link); show a notice
    ReviewIncomplete,
    /// Payment form, with the confirmation once booked
    PaymentForm {
        /// Priced order breakdown, when derivable
        summary: Option<OrderSummary>,
        /// Chosen method and card fields
        payment: Option<&'a BookingPayment>,
        /// Receipt, once the booking completed
        confirmation: Option<&'a BookingConfirmation>,
    },
}

/// Project the state onto the view for its current step.
#[must_use]
pub fn step_view(state: &BookingState) -> StepView<'_> {
    let Some(details) = state.event_details.as_ref() else {
        return StepView::Loading;
    };

    match state.current_step {
        BookingStep::Selection => StepView::TierPicker {
            tiers: &details.ticket_tiers,
            current: state.selection.as_ref(),
        },
        BookingStep::Quantity => StepView::QuantityPicker {
            selection: state.selection.as_ref(),
            quantity: state.quantity,
            max_tickets: MAX_TICKETS_PER_ORDER,
        },
        BookingStep::Seating => StepView::SeatPicker {
            quantity: state.quantity,
            seating: state.seating.as_ref(),
        },
        BookingStep::Details => StepView::DetailsForm {
            user_info: state.user_info.as_ref(),
            errors: &state.errors,
        },
        BookingStep::Review => match (order_summary(state), state.user_info.as_ref()) {
            (Some(summary), Some(user_info)) => StepView::Review(ReviewView {
                summary,
                user_info,
                seating: state.seating.as_ref(),
            }),
            _ => StepView::ReviewIncomplete,
        },
        BookingStep::Payment => StepView::PaymentForm {
            summary: order_summary(state),
            payment: state.payment.as_ref(),
            confirmation: state.confirmation.as_ref(),
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, clippy::unwrap_used, clippy::panic)] // Test code

    use super::*;
    use crate::catalog;
    use crate::types::{BookingSelection, BookingUserInfo, TierAccent};

    fn loaded_state() -> BookingState {
        let mut state = BookingState::new();
        let details = catalog::get_event_detail("event-1").unwrap();
        state.event_id = Some(details.id.clone());
        state.event_details = Some(details);
        state
    }

    fn selection() -> BookingSelection {
        BookingSelection {
            tier_id: "event-1-vip".to_string(),
            tier_name: "VIP Immersion Suite".to_string(),
            price: 150.0,
            accent: Some(TierAccent::Pink),
        }
    }

    fn user_info() -> BookingUserInfo {
        BookingUserInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5551234567".to_string(),
            marketing_consent: false,
        }
    }

    #[test]
    fn missing_details_always_render_loading() {
        let mut state = BookingState::new();
        state.current_step = BookingStep::Review;
        assert!(matches!(step_view(&state), StepView::Loading));
    }

    #[test]
    fn selection_step_shows_tier_picker() {
        let state = loaded_state();
        match step_view(&state) {
            StepView::TierPicker { tiers, current } => {
                assert_eq!(tiers.len(), 4);
                assert!(current.is_none());
            }
            other => panic!("expected TierPicker, got {other:?}"),
        }
    }

    #[test]
    fn order_summary_breaks_down_fees() {
        let mut state = loaded_state();
        state.selection = Some(selection());
        state.quantity = Some(BookingQuantity::new(3, 150.0));

        let summary = order_summary(&state).unwrap();
        assert_eq!(summary.subtotal, 450.0);
        assert_eq!(summary.processing_fee, 4.5);
        assert_eq!(summary.service_charge, 2.25);
        assert_eq!(summary.total, 456.75);
    }

    #[test]
    fn review_is_incomplete_without_details_filled() {
        let mut state = loaded_state();
        state.current_step = BookingStep::Review;
        assert!(matches!(step_view(&state), StepView::ReviewIncomplete));

        state.selection = Some(selection());
        state.quantity = Some(BookingQuantity::new(2, 150.0));
        assert!(matches!(step_view(&state), StepView::ReviewIncomplete));

        state.user_info = Some(user_info());
        match step_view(&state) {
            StepView::Review(review) => {
                assert_eq!(review.summary.quantity, 2);
                assert_eq!(review.user_info.first_name, "Jane");
            }
            other => panic!("expected Review, got {other:?}"),
        }
    }

    #[test]
    fn payment_view_carries_confirmation() {
        let mut state = loaded_state();
        state.current_step = BookingStep::Payment;

        match step_view(&state) {
            StepView::PaymentForm {
                summary,
                payment,
                confirmation,
            } => {
                assert!(summary.is_none());
                assert!(payment.is_none());
                assert!(confirmation.is_none());
            }
            other => panic!("expected PaymentForm, got {other:?}"),
        }
    }
}
