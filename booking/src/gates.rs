//! Forward-navigation gates.
//!
//! A gate decides whether the wizard may leave the current step in the
//! forward direction. Gates never block backward navigation and never block
//! jumps; a jump lands wherever it is told to, by design of the deep-link
//! contract.

use crate::types::{BookingState, BookingStep, BookingUserInfo};

/// Whether forward navigation out of `step` is allowed given `state`.
///
/// Seating and review always pass: seat choice is optional and review has
/// nothing to validate. The payment gate only checks that a method was
/// chosen; card-field content and format validity are advisory and never
/// consulted here.
#[must_use]
pub fn can_proceed(state: &BookingState, step: BookingStep) -> bool {
    match step {
        BookingStep::Selection => state.selection.is_some(),
        BookingStep::Quantity => state.quantity.is_some_and(|q| q.selected_tickets() > 0),
        BookingStep::Seating | BookingStep::Review => true,
        BookingStep::Details => state
            .user_info
            .as_ref()
            .is_some_and(BookingUserInfo::is_complete),
        BookingStep::Payment => state.payment.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BookingPayment, BookingQuantity, BookingSelection, CardDetails, PaymentMethod, TierAccent,
    };

    fn selection() -> BookingSelection {
        BookingSelection {
            tier_id: "vip".to_string(),
            tier_name: "VIP Experience".to_string(),
            price: 150.0,
            accent: Some(TierAccent::Purple),
        }
    }

    fn complete_info() -> BookingUserInfo {
        BookingUserInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5551234567".to_string(),
            marketing_consent: false,
        }
    }

    #[test]
    fn selection_gate_requires_a_tier() {
        let mut state = BookingState::new();
        assert!(!can_proceed(&state, BookingStep::Selection));

        state.selection = Some(selection());
        assert!(can_proceed(&state, BookingStep::Selection));
    }

    #[test]
    fn quantity_gate_requires_positive_count() {
        let mut state = BookingState::new();
        assert!(!can_proceed(&state, BookingStep::Quantity));

        state.quantity = Some(BookingQuantity::new(2, 150.0));
        assert!(can_proceed(&state, BookingStep::Quantity));
    }

    #[test]
    fn seating_and_review_are_always_open() {
        let state = BookingState::new();
        assert!(can_proceed(&state, BookingStep::Seating));
        assert!(can_proceed(&state, BookingStep::Review));
    }

    #[test]
    fn details_gate_checks_completeness_not_format() {
        let mut state = BookingState::new();
        assert!(!can_proceed(&state, BookingStep::Details));

        // Malformed but non-empty fields pass the gate.
        state.user_info = Some(BookingUserInfo {
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            email: "not-an-email".to_string(),
            phone: "1".to_string(),
            marketing_consent: false,
        });
        assert!(can_proceed(&state, BookingStep::Details));

        state.user_info = Some(BookingUserInfo {
            phone: "   ".to_string(),
            ..complete_info()
        });
        assert!(!can_proceed(&state, BookingStep::Details));
    }

    #[test]
    fn payment_gate_requires_a_method() {
        let mut state = BookingState::new();
        assert!(!can_proceed(&state, BookingStep::Payment));

        // Method presence is enough; card fields stay advisory.
        state.payment = Some(BookingPayment::new(
            PaymentMethod::Card,
            Some(CardDetails::default()),
        ));
        assert!(can_proceed(&state, BookingStep::Payment));

        for method in [
            PaymentMethod::Paypal,
            PaymentMethod::ApplePay,
            PaymentMethod::GooglePay,
        ] {
            state.payment = Some(BookingPayment::new(method, None));
            assert!(can_proceed(&state, BookingStep::Payment));
        }
    }

    #[test]
    fn gates_ignore_advisory_errors() {
        let mut state = BookingState::new();
        state.user_info = Some(complete_info());
        state
            .errors
            .insert("email".to_string(), "Please enter a valid email address".to_string());
        assert!(can_proceed(&state, BookingStep::Details));
    }
}
