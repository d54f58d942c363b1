//! Wizard controller: the imperative shell around the booking store.
//!
//! One [`Wizard`] per booking attempt. It owns the [`Store`], loads the
//! event from the catalog at mount, applies deep-link restoration, and
//! exposes the operations a frontend drives: navigation that resolves once
//! the transition settles, setters for each step, and the mock terminal
//! action.

use crate::catalog;
use crate::reducer::{BookingAction, BookingEnvironment, BookingReducer};
use crate::seatmap::{self, SeatZone};
use crate::types::{
    BookingConfirmation, BookingPayment, BookingQuantity, BookingSeating, BookingSelection,
    BookingState, BookingStep, BookingUserInfo, Key, TicketTier,
};
use stagepass_runtime::{Store, StoreError};
use std::time::Duration;

/// Upper bound on waiting for a transition to settle.
///
/// Generous next to the 300 ms a standard transition takes; hitting it
/// means the runtime lost the settle action, not that the user is slow.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(5);

type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

/// Controller for one booking attempt.
pub struct Wizard {
    store: BookingStore,
}

impl Wizard {
    /// Mount the wizard for an event.
    ///
    /// Loads catalog data for `event_id`; unknown ids are not an error, the
    /// wizard simply stays on the loading placeholder. A deep-link token, if
    /// given and valid, lands the wizard directly on that step; invalid
    /// tokens are ignored and the wizard starts on selection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the mount actions, which
    /// only happens during shutdown.
    pub async fn mount(
        event_id: &str,
        deep_link: Option<&str>,
        environment: BookingEnvironment,
    ) -> Result<Self, StoreError> {
        let store = Store::new(BookingState::new(), BookingReducer::new(), environment);

        match catalog::get_event_detail(event_id) {
            Some(details) => {
                store.send(BookingAction::SetEventDetails(details)).await?;
            }
            None => {
                tracing::warn!(event_id, "unknown event id, staying on loading placeholder");
            }
        }

        if let Some(token) = deep_link {
            match token.parse::<BookingStep>() {
                Ok(step) => {
                    tracing::debug!(%step, "restoring deep-linked step");
                    store.send(BookingAction::JumpTo(step)).await?;
                }
                Err(error) => {
                    tracing::debug!(%error, "ignoring invalid deep-link token");
                }
            }
        }

        Ok(Self { store })
    }

    /// Request a forward step and wait for the transition to settle.
    ///
    /// Requests the gate refuses (or that arrive while busy, or on the last
    /// step) are silent no-ops; the returned step is simply unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the settle action never arrives.
    pub async fn next(&self) -> Result<BookingStep, StoreError> {
        let will_move = self.store.state(BookingReducer::forward_allowed).await;
        self.navigate(BookingAction::NextRequested, will_move).await
    }

    /// Request a backward step and wait for the transition to settle.
    ///
    /// Never gated; a no-op only on the first step or while busy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the settle action never arrives.
    pub async fn previous(&self) -> Result<BookingStep, StoreError> {
        let will_move = self.store.state(BookingReducer::backward_allowed).await;
        self.navigate(BookingAction::PreviousRequested, will_move)
            .await
    }

    /// Keyboard navigation, with the same guards as the buttons.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the settle action never arrives.
    pub async fn press_key(&self, key: Key) -> Result<BookingStep, StoreError> {
        let will_move = match key {
            Key::ArrowRight => self.store.state(BookingReducer::forward_allowed).await,
            Key::ArrowLeft => self.store.state(BookingReducer::backward_allowed).await,
        };
        self.navigate(BookingAction::KeyPressed(key), will_move)
            .await
    }

    async fn navigate(
        &self,
        action: BookingAction,
        will_move: bool,
    ) -> Result<BookingStep, StoreError> {
        if will_move {
            self.store
                .send_and_wait_for(
                    action,
                    |a| matches!(a, BookingAction::TransitionSettled),
                    NAVIGATION_TIMEOUT,
                )
                .await?;
        } else {
            self.store.send(action).await?;
        }
        Ok(self.current_step().await)
    }

    /// Land directly on a step, bypassing gates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn jump_to(&self, step: BookingStep) -> Result<(), StoreError> {
        self.store.send(BookingAction::JumpTo(step)).await?;
        Ok(())
    }

    /// Choose a ticket tier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn select_tier(&self, tier: &TicketTier) -> Result<(), StoreError> {
        self.store
            .send(BookingAction::SetSelection(BookingSelection::from_tier(
                tier,
            )))
            .await?;
        Ok(())
    }

    /// Choose a ticket count; the subtotal is derived from the chosen tier.
    ///
    /// Out-of-range requests clamp to `[1, MAX_TICKETS_PER_ORDER]`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn set_quantity(&self, requested: i64) -> Result<(), StoreError> {
        let unit_price = self
            .store
            .state(|s| s.selection.as_ref().map_or(0.0, |sel| sel.price))
            .await;
        self.store
            .send(BookingAction::SetQuantity(BookingQuantity::new(
                requested, unit_price,
            )))
            .await?;
        Ok(())
    }

    /// Record a seat assignment, usually from [`SeatPicker::confirm`].
    ///
    /// [`SeatPicker::confirm`]: crate::seatmap::SeatPicker::confirm
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn set_seating(&self, seating: BookingSeating) -> Result<(), StoreError> {
        self.store.send(BookingAction::SetSeating(seating)).await?;
        Ok(())
    }

    /// Record contact details; advisory field errors refresh as a side
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn set_user_info(&self, info: BookingUserInfo) -> Result<(), StoreError> {
        self.store.send(BookingAction::SetUserInfo(info)).await?;
        Ok(())
    }

    /// Record the payment method.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn set_payment(&self, payment: BookingPayment) -> Result<(), StoreError> {
        self.store.send(BookingAction::SetPayment(payment)).await?;
        Ok(())
    }

    /// Mock terminal action.
    ///
    /// Returns the confirmation when accepted, `None` when refused (wrong
    /// step, no payment method, or mid-transition).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn complete_booking(&self) -> Result<Option<BookingConfirmation>, StoreError> {
        self.store.send(BookingAction::CompleteBooking).await?;
        Ok(self.store.state(|s| s.confirmation.clone()).await)
    }

    /// Discard the attempt and return to a fresh state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store.send(BookingAction::Reset).await?;
        Ok(())
    }

    /// The step currently shown.
    pub async fn current_step(&self) -> BookingStep {
        self.store.state(|s| s.current_step).await
    }

    /// Clone of the full state, for projection via
    /// [`step_view`](crate::view::step_view).
    pub async fn snapshot(&self) -> BookingState {
        self.store.state(Clone::clone).await
    }

    /// Seat map for the mounted event, once catalog data has arrived.
    pub async fn seat_map(&self) -> Option<Vec<SeatZone>> {
        let (event_id, capacity) = self
            .store
            .state(|s| {
                (
                    s.event_id.clone(),
                    s.event_details.as_ref().map(|d| d.venue_details.capacity),
                )
            })
            .await;
        Some(seatmap::seat_map_for_event(&event_id?, capacity?))
    }

    /// Shut the store down, waiting for in-flight transition delays.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects outlive the
    /// timeout.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
