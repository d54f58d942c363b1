//! Reducer logic for the booking wizard.
//!
//! Every mutation of [`BookingState`] flows through [`BookingReducer`]:
//! setters overwrite their slice, navigation requests are guarded and
//! paced, and the mock terminal action records a confirmation. Navigation
//! requests that fail a guard are silent no-ops, which is what makes a
//! double click during a transition yield exactly one step change.

use crate::gates::can_proceed;
use crate::types::{
    BookingConfirmation, BookingPayment, BookingQuantity, BookingSeating, BookingSelection,
    BookingState, BookingStep, BookingUserInfo, EventDetail, Key, TransitionDirection,
};
use crate::validation::validate_user_info;
use stagepass_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::time::Duration;
use uuid::Uuid;

/// Exit/entry pacing for step transitions.
///
/// Purely cosmetic: the exit interval runs before the step changes, the
/// entry interval before the transition flag clears. Correctness never
/// depends on the values; headless tests run with both at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Delay before the step actually changes
    pub exit: Duration,
    /// Delay after the step change before the transition settles
    pub entry: Duration,
}

impl TransitionTiming {
    /// Production pacing: 150 ms out, 150 ms in.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            exit: Duration::from_millis(150),
            entry: Duration::from_millis(150),
        }
    }

    /// Zero pacing for headless runs and tests.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            exit: Duration::ZERO,
            entry: Duration::ZERO,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// Environment dependencies for the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for confirmation timestamps
    pub clock: std::sync::Arc<dyn Clock>,
    /// Transition pacing
    pub timing: TransitionTiming,
}

impl BookingEnvironment {
    /// Creates an environment with standard transition pacing.
    #[must_use]
    pub fn new(clock: std::sync::Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timing: TransitionTiming::standard(),
        }
    }

    /// Creates an environment with explicit pacing.
    #[must_use]
    pub fn with_timing(clock: std::sync::Arc<dyn Clock>, timing: TransitionTiming) -> Self {
        Self { clock, timing }
    }
}

/// Actions understood by the booking wizard.
///
/// Setters overwrite their slice of state unconditionally; navigation
/// variants are guarded. `AdvanceStep`, `RetreatStep`, and
/// `TransitionSettled` are scheduled internally by the navigation handlers
/// and are not meant to be sent from outside.
#[derive(Clone, Debug, PartialEq)]
pub enum BookingAction {
    /// Attach catalog data for the event being booked
    SetEventDetails(EventDetail),
    /// Record the chosen ticket tier
    SetSelection(BookingSelection),
    /// Record the ticket count and subtotal
    SetQuantity(BookingQuantity),
    /// Record the seat assignment
    SetSeating(BookingSeating),
    /// Record contact details and refresh advisory field errors
    SetUserInfo(BookingUserInfo),
    /// Record the payment method
    SetPayment(BookingPayment),
    /// Toggle the global busy flag
    SetLoading(bool),
    /// Attach an advisory error message to a field
    SetError {
        /// Field the message belongs to
        field: String,
        /// Message to display inline
        message: String,
    },
    /// Remove the advisory error for one field
    ClearError(String),
    /// Remove all advisory errors
    ClearErrors,
    /// Discard the attempt and return to a fresh state
    Reset,

    /// Ask to move one step forward (gated, paced)
    NextRequested,
    /// Ask to move one step back (paced, never gated)
    PreviousRequested,
    /// Keyboard navigation, identical guards to the buttons
    KeyPressed(Key),
    /// Land directly on a step, bypassing gates (deep-link restoration)
    JumpTo(BookingStep),
    /// Internal: perform the forward step change mid-transition
    AdvanceStep,
    /// Internal: perform the backward step change mid-transition
    RetreatStep,
    /// Internal: clear the transition flag once pacing completes
    TransitionSettled,

    /// Mock terminal action, records a confirmation on the payment step
    CompleteBooking,
}

/// Reducer for the booking wizard
#[derive(Clone, Debug)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether a forward navigation request may start right now.
    pub(crate) fn forward_allowed(state: &BookingState) -> bool {
        state.accepts_navigation()
            && can_proceed(state, state.current_step)
            && state.current_step.next().is_some()
    }

    /// Whether a backward navigation request may start right now.
    ///
    /// Gates are never consulted going backward.
    pub(crate) fn backward_allowed(state: &BookingState) -> bool {
        state.accepts_navigation() && state.current_step.previous().is_some()
    }

    /// Whether the mock terminal action is acceptable right now.
    fn completion_allowed(state: &BookingState) -> bool {
        state.current_step == BookingStep::Payment
            && state.payment.is_some()
            && state.accepts_navigation()
            && state.confirmation.is_none()
    }
}

impl Default for BookingReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action keeps the flow legible
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Setters ==========
            BookingAction::SetEventDetails(details) => {
                state.event_id = Some(details.id.clone());
                state.event_details = Some(details);
                SmallVec::new()
            }

            BookingAction::SetSelection(selection) => {
                state.selection = Some(selection);
                SmallVec::new()
            }

            BookingAction::SetQuantity(quantity) => {
                state.quantity = Some(quantity);
                SmallVec::new()
            }

            BookingAction::SetSeating(seating) => {
                state.seating = Some(seating);
                SmallVec::new()
            }

            BookingAction::SetUserInfo(info) => {
                state.errors = validate_user_info(&info);
                state.user_info = Some(info);
                SmallVec::new()
            }

            BookingAction::SetPayment(payment) => {
                state.payment = Some(payment);
                SmallVec::new()
            }

            BookingAction::SetLoading(loading) => {
                state.is_loading = loading;
                SmallVec::new()
            }

            BookingAction::SetError { field, message } => {
                state.errors.insert(field, message);
                SmallVec::new()
            }

            BookingAction::ClearError(field) => {
                state.errors.remove(&field);
                SmallVec::new()
            }

            BookingAction::ClearErrors => {
                state.errors.clear();
                SmallVec::new()
            }

            BookingAction::Reset => {
                *state = BookingState::new();
                SmallVec::new()
            }

            // ========== Navigation ==========
            BookingAction::NextRequested => {
                if !Self::forward_allowed(state) {
                    return SmallVec::new();
                }

                state.transition = Some(TransitionDirection::Forward);
                smallvec![Effect::delay(env.timing.exit, BookingAction::AdvanceStep)]
            }

            BookingAction::PreviousRequested => {
                if !Self::backward_allowed(state) {
                    return SmallVec::new();
                }

                state.transition = Some(TransitionDirection::Backward);
                smallvec![Effect::delay(env.timing.exit, BookingAction::RetreatStep)]
            }

            BookingAction::KeyPressed(Key::ArrowRight) => {
                self.reduce(state, BookingAction::NextRequested, env)
            }

            BookingAction::KeyPressed(Key::ArrowLeft) => {
                self.reduce(state, BookingAction::PreviousRequested, env)
            }

            BookingAction::JumpTo(step) => {
                // Deep-link restoration lands wherever it is told to.
                state.current_step = step;
                SmallVec::new()
            }

            BookingAction::AdvanceStep => {
                if let Some(next) = state.current_step.next() {
                    state.current_step = next;
                }
                smallvec![Effect::delay(
                    env.timing.entry,
                    BookingAction::TransitionSettled
                )]
            }

            BookingAction::RetreatStep => {
                if let Some(previous) = state.current_step.previous() {
                    state.current_step = previous;
                }
                smallvec![Effect::delay(
                    env.timing.entry,
                    BookingAction::TransitionSettled
                )]
            }

            BookingAction::TransitionSettled => {
                state.transition = None;
                SmallVec::new()
            }

            // ========== Completion ==========
            BookingAction::CompleteBooking => {
                if !Self::completion_allowed(state) {
                    return SmallVec::new();
                }

                state.confirmation = Some(BookingConfirmation {
                    confirmation_id: Uuid::new_v4(),
                    completed_at: env.clock.now(),
                });
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::types::{CardDetails, PaymentMethod, TierAccent};
    use stagepass_testing::{ReducerTest, assertions, test_clock};
    use std::sync::Arc;

    use stagepass_core::environment::Clock as _;

    fn headless_env() -> BookingEnvironment {
        BookingEnvironment::with_timing(Arc::new(test_clock()), TransitionTiming::headless())
    }

    fn selection() -> BookingSelection {
        BookingSelection {
            tier_id: "vip".to_string(),
            tier_name: "VIP Experience".to_string(),
            price: 150.0,
            accent: Some(TierAccent::Purple),
        }
    }

    fn state_on(step: BookingStep) -> BookingState {
        let mut state = BookingState::new();
        state.current_step = step;
        state
    }

    fn payment_ready_state() -> BookingState {
        let mut state = state_on(BookingStep::Payment);
        state.selection = Some(selection());
        state.quantity = Some(BookingQuantity::new(3, 150.0));
        state.payment = Some(BookingPayment::new(PaymentMethod::Card, None));
        state
    }

    #[test]
    fn next_blocked_without_selection() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::NextRequested)
            .then_state(|state| {
                assert_eq!(state.current_step, BookingStep::Selection);
                assert!(state.transition.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn next_starts_forward_transition() {
        let mut state = BookingState::new();
        state.selection = Some(selection());

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::NextRequested)
            .then_state(|state| {
                // The step itself does not change until AdvanceStep lands.
                assert_eq!(state.current_step, BookingStep::Selection);
                assert_eq!(state.transition, Some(TransitionDirection::Forward));
            })
            .then_effects(|effects| {
                let delayed = assertions::single_delayed_action(effects);
                assert_eq!(delayed, BookingAction::AdvanceStep);
            })
            .run();
    }

    #[test]
    fn advance_step_moves_and_schedules_settle() {
        let mut state = BookingState::new();
        state.selection = Some(selection());
        state.transition = Some(TransitionDirection::Forward);

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::AdvanceStep)
            .then_state(|state| {
                assert_eq!(state.current_step, BookingStep::Quantity);
                // Still transitioning until TransitionSettled clears it.
                assert!(state.is_transitioning());
            })
            .then_effects(|effects| {
                let delayed = assertions::single_delayed_action(effects);
                assert_eq!(delayed, BookingAction::TransitionSettled);
            })
            .run();
    }

    #[test]
    fn transition_settled_clears_flag() {
        let mut state = state_on(BookingStep::Quantity);
        state.transition = Some(TransitionDirection::Forward);

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::TransitionSettled)
            .then_state(|state| assert!(!state.is_transitioning()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn next_ignored_while_transitioning() {
        let mut state = BookingState::new();
        state.selection = Some(selection());
        state.transition = Some(TransitionDirection::Forward);

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::NextRequested)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn next_ignored_while_loading() {
        let mut state = BookingState::new();
        state.selection = Some(selection());
        state.is_loading = true;

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::NextRequested)
            .then_state(|state| assert!(state.transition.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn next_on_last_step_is_noop() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(payment_ready_state())
            .when_action(BookingAction::NextRequested)
            .then_state(|state| {
                assert_eq!(state.current_step, BookingStep::Payment);
                assert!(state.transition.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn previous_on_first_step_is_noop() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::PreviousRequested)
            .then_state(|state| assert!(state.transition.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn previous_skips_gates() {
        // On Details with nothing filled in: forward is gated, backward is not.
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state_on(BookingStep::Details))
            .when_action(BookingAction::PreviousRequested)
            .then_state(|state| {
                assert_eq!(state.transition, Some(TransitionDirection::Backward));
            })
            .then_effects(|effects| {
                let delayed = assertions::single_delayed_action(effects);
                assert_eq!(delayed, BookingAction::RetreatStep);
            })
            .run();
    }

    #[test]
    fn arrow_keys_match_buttons() {
        let mut state = BookingState::new();
        state.selection = Some(selection());

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::KeyPressed(Key::ArrowRight))
            .then_state(|state| {
                assert_eq!(state.transition, Some(TransitionDirection::Forward));
            })
            .run();

        // ArrowRight hits the same gate as the Next button.
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::KeyPressed(Key::ArrowRight))
            .then_state(|state| assert!(state.transition.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn jump_to_bypasses_gates() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::JumpTo(BookingStep::Payment))
            .then_state(|state| {
                assert_eq!(state.current_step, BookingStep::Payment);
                assert!(state.transition.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn set_user_info_refreshes_errors() {
        let mut state = BookingState::new();
        state
            .errors
            .insert("email".to_string(), "stale".to_string());

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::SetUserInfo(BookingUserInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "5551234567".to_string(),
                marketing_consent: true,
            }))
            .then_state(|state| {
                assert!(state.errors.is_empty());
                assert!(state.user_info.as_ref().is_some_and(|i| i.marketing_consent));
            })
            .run();

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::SetUserInfo(BookingUserInfo {
                first_name: "J".to_string(),
                last_name: "Doe".to_string(),
                email: "nope".to_string(),
                phone: "5551234567".to_string(),
                marketing_consent: false,
            }))
            .then_state(|state| {
                assert!(state.errors.contains_key("first_name"));
                assert!(state.errors.contains_key("email"));
                assert!(!state.errors.contains_key("phone"));
            })
            .run();
    }

    #[test]
    fn set_payment_overwrites_and_drops_stale_card_details() {
        let mut state = payment_ready_state();
        state.payment = Some(BookingPayment::new(
            PaymentMethod::Card,
            Some(CardDetails {
                number: "4242 4242 4242 4242".to_string(),
                expiry: "12/30".to_string(),
                cvv: "123".to_string(),
                name: "Jane Doe".to_string(),
            }),
        ));

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::SetPayment(BookingPayment::new(
                PaymentMethod::ApplePay,
                None,
            )))
            .then_state(|state| {
                let payment = state.payment.as_ref().unwrap();
                assert_eq!(payment.method, PaymentMethod::ApplePay);
                assert!(payment.card_details.is_none());
            })
            .run();
    }

    #[test]
    fn complete_booking_records_confirmation() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(payment_ready_state())
            .when_action(BookingAction::CompleteBooking)
            .then_state(|state| {
                let confirmation = state.confirmation.as_ref().unwrap();
                assert_eq!(confirmation.completed_at, test_clock().now());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn complete_booking_rejected_off_payment_step() {
        let mut state = payment_ready_state();
        state.current_step = BookingStep::Review;

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::CompleteBooking)
            .then_state(|state| assert!(state.confirmation.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn complete_booking_rejected_mid_transition() {
        let mut state = payment_ready_state();
        state.transition = Some(TransitionDirection::Forward);

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(state)
            .when_action(BookingAction::CompleteBooking)
            .then_state(|state| assert!(state.confirmation.is_none()))
            .run();
    }

    #[test]
    fn reset_restores_initial_state() {
        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(payment_ready_state())
            .when_action(BookingAction::Reset)
            .then_state(|state| {
                assert_eq!(*state, BookingState::new());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn set_event_details_records_event_id() {
        let details = crate::catalog::get_event_detail("event-1").unwrap();
        let id = details.id.clone();

        ReducerTest::new(BookingReducer::new())
            .with_env(headless_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::SetEventDetails(details))
            .then_state(move |state| {
                assert_eq!(state.event_id.as_deref(), Some(id.as_str()));
                assert!(state.event_details.is_some());
            })
            .run();
    }
}
