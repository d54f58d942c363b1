//! Concert-ticket booking wizard built on the StagePass architecture.
//!
//! A six-step linear wizard (selection, quantity, seating, details, review,
//! payment) modeled as a reducer-driven state machine:
//!
//! - Pure domain logic (`reducer`, `gates`, `pricing`, `validation`)
//! - Synthetic collaborators (`catalog`, `seatmap`)
//! - Render projections (`view`)
//! - The imperative shell (`wizard`) owning a `Store` per booking attempt
//!
//! # Quick Start
//!
//! ```no_run
//! use stagepass_booking::{BookingEnvironment, Wizard};
//! use stagepass_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = BookingEnvironment::new(Arc::new(SystemClock));
//! let wizard = Wizard::mount("event-1", None, env).await?;
//!
//! // Pick the first tier and move on
//! let tiers = wizard
//!     .snapshot()
//!     .await
//!     .event_details
//!     .map(|d| d.ticket_tiers)
//!     .unwrap_or_default();
//! wizard.select_tier(&tiers[0]).await?;
//! wizard.next().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod gates;
pub mod pricing;
pub mod reducer;
pub mod seatmap;
pub mod types;
pub mod validation;
pub mod view;
pub mod wizard;

// Re-export commonly used types
pub use reducer::{BookingAction, BookingEnvironment, BookingReducer, TransitionTiming};
pub use types::{
    BookingConfirmation, BookingPayment, BookingQuantity, BookingSeating, BookingSelection,
    BookingState, BookingStep, BookingUserInfo, CardDetails, EventDetail, Key,
    MAX_TICKETS_PER_ORDER, PaymentMethod, TicketTier, TransitionDirection,
};
pub use view::{OrderSummary, StepView, step_view};
pub use wizard::Wizard;
