//! Domain types for the booking wizard.
//!
//! The aggregate root is [`BookingState`]: one live instance per booking
//! attempt, owned by the wizard for the duration of the attempt and mutated
//! exclusively through [`BookingAction`](crate::reducer::BookingAction)s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of tickets a single order may contain.
pub const MAX_TICKETS_PER_ORDER: u32 = 8;

/// One stage of the linear booking wizard.
///
/// The declaration order is the wizard progression; there is no branching
/// or skipping except via an explicit jump (deep-link restoration).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    /// Pick a ticket tier
    Selection,
    /// Choose how many tickets
    Quantity,
    /// Optional seat selection (skippable, general admission)
    Seating,
    /// Personal details for ticket delivery
    Details,
    /// Review the order
    Review,
    /// Mock payment
    Payment,
}

impl BookingStep {
    /// The fixed wizard progression, first to last.
    pub const SEQUENCE: [BookingStep; 6] = [
        BookingStep::Selection,
        BookingStep::Quantity,
        BookingStep::Seating,
        BookingStep::Details,
        BookingStep::Review,
        BookingStep::Payment,
    ];

    /// Position of this step within [`Self::SEQUENCE`].
    #[must_use]
    pub fn index(self) -> usize {
        // SEQUENCE contains every variant, so the lookup always succeeds.
        Self::SEQUENCE
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// The following step, or `None` when already on the last step.
    #[must_use]
    pub fn next(self) -> Option<BookingStep> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` when already on the first step.
    #[must_use]
    pub fn previous(self) -> Option<BookingStep> {
        self.index().checked_sub(1).map(|i| Self::SEQUENCE[i])
    }

    /// The lowercase token used by the deep-link contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStep::Selection => "selection",
            BookingStep::Quantity => "quantity",
            BookingStep::Seating => "seating",
            BookingStep::Details => "details",
            BookingStep::Review => "review",
            BookingStep::Payment => "payment",
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a deep-link token names no known step.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking step token: {0}")]
pub struct UnknownStepToken(pub String);

impl FromStr for BookingStep {
    type Err = UnknownStepToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selection" => Ok(BookingStep::Selection),
            "quantity" => Ok(BookingStep::Quantity),
            "seating" => Ok(BookingStep::Seating),
            "details" => Ok(BookingStep::Details),
            "review" => Ok(BookingStep::Review),
            "payment" => Ok(BookingStep::Payment),
            other => Err(UnknownStepToken(other.to_string())),
        }
    }
}

/// Direction of an in-flight step transition (drives the slide animation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionDirection {
    /// Moving to a later step
    Forward,
    /// Moving to an earlier step
    Backward,
}

/// Keyboard shortcuts understood by the wizard controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Advance to the next step (same guards as the Next control)
    ArrowRight,
    /// Return to the previous step
    ArrowLeft,
}

/// Visual grouping tag for a ticket tier. No semantic effect on pricing or
/// gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierAccent {
    #[allow(missing_docs)]
    Pink,
    #[allow(missing_docs)]
    Blue,
    #[allow(missing_docs)]
    Green,
    #[allow(missing_docs)]
    Purple,
    #[allow(missing_docs)]
    Amber,
}

/// Remaining/total availability for a ticket tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAvailability {
    /// Tickets still available in this tier
    pub remaining: u32,
    /// Total tickets the tier started with
    pub total: u32,
}

/// A named ticket category with its own price and benefit list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketTier {
    /// Tier identifier, unique within an event
    pub id: String,
    /// Display name
    pub name: String,
    /// Short marketing description
    pub description: String,
    /// Price per ticket
    pub price: f64,
    /// What the tier includes
    pub benefits: Vec<String>,
    /// Remaining/total counts
    pub availability: TierAvailability,
    /// Visual grouping tag
    pub accent: Option<TierAccent>,
}

/// Venue information attached to an event detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueDetails {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Venue capacity
    pub capacity: u32,
    /// Amenity list
    pub amenities: Vec<String>,
}

/// A highlighted feature of the event experience.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventHighlight {
    /// Highlight identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Longer description
    pub description: String,
}

/// Full event information supplied by the catalog collaborator.
///
/// The booking core reads this but never mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    /// Event identifier
    pub id: String,
    /// Event title
    pub title: String,
    /// Headline artist
    pub artist: String,
    /// Venue name
    pub venue: String,
    /// City
    pub city: String,
    /// Event date
    pub date: DateTime<Utc>,
    /// Base ticket price the tiers are derived from
    pub price: f64,
    /// Event description
    pub description: String,
    /// Available ticket tiers
    pub ticket_tiers: Vec<TicketTier>,
    /// Venue information
    pub venue_details: VenueDetails,
    /// Experience highlights
    pub highlights: Vec<EventHighlight>,
    /// Related events for cross-promotion
    pub related_event_ids: Vec<String>,
}

/// The ticket tier chosen in the selection step.
///
/// Overwritten wholesale on re-selection, never merged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingSelection {
    /// Chosen tier id
    pub tier_id: String,
    /// Chosen tier display name
    pub tier_name: String,
    /// Price per ticket at selection time
    pub price: f64,
    /// Visual grouping tag carried through for rendering
    pub accent: Option<TierAccent>,
}

impl BookingSelection {
    /// Build a selection from a catalog tier.
    #[must_use]
    pub fn from_tier(tier: &TicketTier) -> Self {
        Self {
            tier_id: tier.id.clone(),
            tier_name: tier.name.clone(),
            price: tier.price,
            accent: tier.accent,
        }
    }
}

/// Ticket count plus the derived ticket subtotal.
///
/// The two fields are computed together by [`BookingQuantity::new`] and are
/// not independently assignable, so they can never disagree. The requested
/// count is clamped to `[1, MAX_TICKETS_PER_ORDER]` here, at the step level;
/// the store applies whatever it is given.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingQuantity {
    selected_tickets: u32,
    total_amount: f64,
}

impl BookingQuantity {
    /// Build a quantity from a requested ticket count and unit price.
    ///
    /// Zero or negative requests clamp to 1; requests above
    /// [`MAX_TICKETS_PER_ORDER`] clamp to the cap. `total_amount` is the
    /// ticket subtotal only; fees are computed downstream.
    #[must_use]
    pub fn new(requested: i64, unit_price: f64) -> Self {
        let selected_tickets =
            u32::try_from(requested.clamp(1, i64::from(MAX_TICKETS_PER_ORDER))).unwrap_or(1);
        Self {
            selected_tickets,
            total_amount: f64::from(selected_tickets) * unit_price,
        }
    }

    /// Number of tickets in the order.
    #[must_use]
    pub const fn selected_tickets(&self) -> u32 {
        self.selected_tickets
    }

    /// Ticket subtotal (`selected_tickets * unit price`), excluding fees.
    #[must_use]
    pub const fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

/// Seats chosen in the seating step.
///
/// An empty `seat_ids` is valid and denotes general admission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSeating {
    /// Selected seat identifiers
    pub seat_ids: Vec<String>,
    /// Section name, when seats were picked from a zone
    pub section: Option<String>,
    /// Row label, when applicable
    pub row: Option<String>,
}

impl BookingSeating {
    /// General admission: no specific seat assignment.
    #[must_use]
    pub fn general_admission() -> Self {
        Self {
            seat_ids: Vec::new(),
            section: Some("General Admission".to_string()),
            row: None,
        }
    }

    /// Whether this booking has no assigned seats.
    #[must_use]
    pub fn is_general_admission(&self) -> bool {
        self.seat_ids.is_empty()
    }
}

/// Contact details collected in the details step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUserInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Opt-in for marketing updates
    pub marketing_consent: bool,
}

impl BookingUserInfo {
    /// All four identity fields are non-empty after trimming.
    ///
    /// This is the only check the details gate performs; format validation
    /// is advisory and display-only.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}

/// Supported payment methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Credit or debit card
    Card,
    /// PayPal
    Paypal,
    /// Apple Pay
    ApplePay,
    /// Google Pay
    GooglePay,
}

impl PaymentMethod {
    /// The kebab-case token used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::ApplePay => "apple-pay",
            PaymentMethod::GooglePay => "google-pay",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card fields collected when paying by card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Card number (display-formatted, groups of four)
    pub number: String,
    /// Expiry in MM/YY form
    pub expiry: String,
    /// Card verification value
    pub cvv: String,
    /// Cardholder name
    pub name: String,
}

/// Payment method plus card details when the method is card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingPayment {
    /// Chosen method
    pub method: PaymentMethod,
    /// Card fields; present only when `method == Card`
    pub card_details: Option<CardDetails>,
}

impl BookingPayment {
    /// Build a payment, dropping card details for non-card methods.
    ///
    /// Switching away from card clears previously entered card fields.
    #[must_use]
    pub fn new(method: PaymentMethod, card_details: Option<CardDetails>) -> Self {
        let card_details = match method {
            PaymentMethod::Card => card_details,
            _ => None,
        };
        Self {
            method,
            card_details,
        }
    }
}

/// Synchronous acknowledgment of the mock terminal action.
///
/// No gateway exists; completing a booking only records this receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Generated confirmation code
    pub confirmation_id: Uuid,
    /// When the booking was completed
    pub completed_at: DateTime<Utc>,
}

/// Aggregate root for one in-progress booking attempt.
///
/// Created fresh when the wizard mounts for an event, mutated only through
/// reducer actions, and discarded on reset or unmount. Exactly one live
/// instance exists per booking attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingState {
    /// The step currently shown
    pub current_step: BookingStep,
    /// Id of the event being booked
    pub event_id: Option<String>,
    /// Catalog data for the event; `None` renders a loading placeholder
    pub event_details: Option<EventDetail>,
    /// Chosen ticket tier
    pub selection: Option<BookingSelection>,
    /// Ticket count and subtotal
    pub quantity: Option<BookingQuantity>,
    /// Seat assignment (empty = general admission)
    pub seating: Option<BookingSeating>,
    /// Contact details
    pub user_info: Option<BookingUserInfo>,
    /// Payment method and card fields
    pub payment: Option<BookingPayment>,
    /// Global busy flag set around simulated async work
    pub is_loading: bool,
    /// Direction of an in-flight step transition, `None` when settled
    pub transition: Option<TransitionDirection>,
    /// Advisory field errors for inline display; never consulted by gates
    pub errors: HashMap<String, String>,
    /// Receipt of the mock terminal action, once completed
    pub confirmation: Option<BookingConfirmation>,
}

impl BookingState {
    /// Fresh state: everything unset, positioned on the first step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_step: BookingStep::Selection,
            event_id: None,
            event_details: None,
            selection: None,
            quantity: None,
            seating: None,
            user_info: None,
            payment: None,
            is_loading: false,
            transition: None,
            errors: HashMap::new(),
            confirmation: None,
        }
    }

    /// Whether a transition animation is currently in flight.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the wizard may accept a navigation request right now.
    ///
    /// Requests arriving while loading or mid-transition are silently
    /// dropped, which is what serializes transitions.
    #[must_use]
    pub const fn accepts_navigation(&self) -> bool {
        !self.is_loading && !self.is_transitioning()
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_sequence_is_total_order() {
        for (i, step) in BookingStep::SEQUENCE.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn next_then_previous_returns_to_origin() {
        for step in BookingStep::SEQUENCE {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step));
            }
        }
    }

    #[test]
    fn sequence_boundaries() {
        assert_eq!(BookingStep::Payment.next(), None);
        assert_eq!(BookingStep::Selection.previous(), None);
        assert_eq!(BookingStep::Selection.next(), Some(BookingStep::Quantity));
        assert_eq!(BookingStep::Payment.previous(), Some(BookingStep::Review));
    }

    #[test]
    fn step_tokens_round_trip() {
        for step in BookingStep::SEQUENCE {
            assert_eq!(step.as_str().parse::<BookingStep>(), Ok(step));
        }
        assert!("checkout".parse::<BookingStep>().is_err());
        assert!("Payment".parse::<BookingStep>().is_err()); // tokens are lowercase
    }

    #[test]
    fn quantity_clamps_at_step_level() {
        let q = BookingQuantity::new(0, 100.0);
        assert_eq!(q.selected_tickets(), 1);
        assert_eq!(q.total_amount(), 100.0);

        let q = BookingQuantity::new(-3, 100.0);
        assert_eq!(q.selected_tickets(), 1);

        let q = BookingQuantity::new(20, 50.0);
        assert_eq!(q.selected_tickets(), MAX_TICKETS_PER_ORDER);
        assert_eq!(q.total_amount(), 400.0);
    }

    #[test]
    fn quantity_fields_stay_consistent() {
        let q = BookingQuantity::new(3, 150.0);
        assert_eq!(q.selected_tickets(), 3);
        assert_eq!(q.total_amount(), 450.0);
    }

    #[test]
    fn payment_drops_card_details_for_other_methods() {
        let card = CardDetails {
            number: "4242 4242 4242 4242".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
            name: "Jane Doe".to_string(),
        };

        let payment = BookingPayment::new(PaymentMethod::Card, Some(card.clone()));
        assert!(payment.card_details.is_some());

        let payment = BookingPayment::new(PaymentMethod::Paypal, Some(card));
        assert!(payment.card_details.is_none());
    }

    #[test]
    fn user_info_completeness_ignores_format() {
        let info = BookingUserInfo {
            first_name: "J".to_string(), // too short for advisory validation
            last_name: "D".to_string(),
            email: "not-an-email".to_string(),
            phone: "1".to_string(),
            marketing_consent: false,
        };
        // Completeness only cares about emptiness after trim.
        assert!(info.is_complete());

        let info = BookingUserInfo {
            first_name: "   ".to_string(),
            ..info
        };
        assert!(!info.is_complete());
    }

    #[test]
    fn general_admission_has_no_seats() {
        let seating = BookingSeating::general_admission();
        assert!(seating.is_general_admission());
        assert_eq!(seating.section.as_deref(), Some("General Admission"));
    }

    #[test]
    fn payment_method_tokens() {
        assert_eq!(PaymentMethod::ApplePay.as_str(), "apple-pay");
        assert_eq!(PaymentMethod::GooglePay.as_str(), "google-pay");
        assert_eq!(PaymentMethod::Card.as_str(), "card");
        assert_eq!(PaymentMethod::Paypal.as_str(), "paypal");
    }
}
