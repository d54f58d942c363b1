//! Seat map generation and seat picking.
//!
//! The map is synthetic, like the catalog: four zones carved out of the
//! venue capacity with per-zone price bands, rows of twenty, and roughly a
//! third of seats already taken. [`SeatPicker`] holds an in-progress seat
//! choice and enforces the one rule the seating step has: never pick more
//! seats than tickets.

use crate::types::BookingSeating;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Seats per row in every zone.
const ROW_WIDTH: u32 = 20;

/// Fraction of seats marked unavailable at generation time.
const UNAVAILABLE_RATIO: f64 = 0.3;

/// Whether a seat can still be picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatStatus {
    /// Free to select
    Available,
    /// Already taken, not selectable
    Unavailable,
}

/// A single seat in a zone.
#[derive(Clone, Debug, PartialEq)]
pub struct Seat {
    /// Identifier, unique across the map (`zone-row-number`)
    pub id: String,
    /// Row label (A, B, .., Z, AA, ..)
    pub row: String,
    /// Seat number within the row
    pub number: u32,
    /// Zone display name
    pub section: String,
    /// Availability
    pub status: SeatStatus,
    /// Seat price within the zone band
    pub price: f64,
}

/// A priced section of the venue.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatZone {
    /// Zone identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Bottom of the zone price band
    pub min_price: f64,
    /// Top of the zone price band
    pub max_price: f64,
    /// Generated seats
    pub seats: Vec<Seat>,
}

impl SeatZone {
    /// Number of seats still selectable in this zone.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .count()
    }
}

struct ZoneBlueprint {
    id: &'static str,
    name: &'static str,
    capacity_ratio: f64,
    min_price: f64,
    max_price: f64,
}

const ZONE_BLUEPRINTS: [ZoneBlueprint; 4] = [
    ZoneBlueprint {
        id: "vip",
        name: "VIP Pods",
        capacity_ratio: 0.1,
        min_price: 150.0,
        max_price: 250.0,
    },
    ZoneBlueprint {
        id: "premium",
        name: "Premium Front",
        capacity_ratio: 0.2,
        min_price: 100.0,
        max_price: 150.0,
    },
    ZoneBlueprint {
        id: "general",
        name: "General Admission",
        capacity_ratio: 0.5,
        min_price: 50.0,
        max_price: 100.0,
    },
    ZoneBlueprint {
        id: "balcony",
        name: "Balcony View",
        capacity_ratio: 0.2,
        min_price: 75.0,
        max_price: 125.0,
    },
];

/// Spreadsheet-style row label: 1 -> A, 26 -> Z, 27 -> AA.
fn row_label(row: u32) -> String {
    let mut label = Vec::new();
    let mut n = row;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    label.iter().rev().collect()
}

/// Generate the full zone layout for a venue.
///
/// Deterministic for a given `(venue_capacity, seed)` pair; callers derive
/// the seed from the event id so a revisit shows the same map.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn generate_seat_map(venue_capacity: u32, seed: u64) -> Vec<SeatZone> {
    let mut rng = StdRng::seed_from_u64(seed);

    ZONE_BLUEPRINTS
        .iter()
        .map(|blueprint| {
            let seat_count = (f64::from(venue_capacity) * blueprint.capacity_ratio) as u32;
            let mut seats = Vec::with_capacity(seat_count as usize);

            for index in 0..seat_count {
                let row = index / ROW_WIDTH + 1;
                let number = index % ROW_WIDTH + 1;
                let status = if rng.gen_bool(UNAVAILABLE_RATIO) {
                    SeatStatus::Unavailable
                } else {
                    SeatStatus::Available
                };

                seats.push(Seat {
                    id: format!("{}-{row}-{number}", blueprint.id),
                    row: row_label(row),
                    number,
                    section: blueprint.name.to_string(),
                    status,
                    price: rng.gen_range(blueprint.min_price..blueprint.max_price).round(),
                });
            }

            SeatZone {
                id: blueprint.id.to_string(),
                name: blueprint.name.to_string(),
                min_price: blueprint.min_price,
                max_price: blueprint.max_price,
                seats,
            }
        })
        .collect()
}

/// Generate the layout for an event, seeded from its id.
///
/// Revisiting the seating step for the same event shows the same map.
#[must_use]
pub fn seat_map_for_event(event_id: &str, venue_capacity: u32) -> Vec<SeatZone> {
    let seed = event_id
        .bytes()
        .zip(1u64..)
        .fold(0u64, |acc, (b, i)| acc.wrapping_add(u64::from(b) * i));
    generate_seat_map(venue_capacity, seed)
}

/// In-progress seat choice, capped at the ticket count.
///
/// Toggling a selected seat deselects it; toggling past the cap or onto an
/// unavailable seat is refused. Confirming an empty choice yields general
/// admission.
#[derive(Clone, Debug)]
pub struct SeatPicker {
    max_seats: u32,
    selected: Vec<Seat>,
}

impl SeatPicker {
    /// Create a picker allowing at most `max_seats` selections.
    #[must_use]
    pub const fn new(max_seats: u32) -> Self {
        Self {
            max_seats,
            selected: Vec::new(),
        }
    }

    /// Toggle a seat in or out of the selection.
    ///
    /// Returns `true` when the selection changed.
    pub fn toggle(&mut self, seat: &Seat) -> bool {
        if let Some(position) = self.selected.iter().position(|s| s.id == seat.id) {
            self.selected.remove(position);
            return true;
        }

        if seat.status == SeatStatus::Unavailable {
            return false;
        }

        if self.selected.len() >= self.max_seats as usize {
            return false;
        }

        self.selected.push(seat.clone());
        true
    }

    /// Ids of the currently selected seats, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().map(|s| s.id.clone()).collect()
    }

    /// Whether a seat id is currently selected.
    #[must_use]
    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.selected.iter().any(|s| s.id == seat_id)
    }

    /// Number of seats currently selected.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Combined price of the selected seats.
    #[must_use]
    pub fn selected_total(&self) -> f64 {
        self.selected.iter().map(|s| s.price).sum()
    }

    /// Turn the selection into the seating slice of booking state.
    ///
    /// Section is taken from the picked seats; the row is recorded only when
    /// every seat shares one.
    #[must_use]
    pub fn confirm(&self) -> BookingSeating {
        if self.selected.is_empty() {
            return BookingSeating::general_admission();
        }

        let rows: HashSet<&str> = self.selected.iter().map(|s| s.row.as_str()).collect();
        let row = if rows.len() == 1 {
            self.selected.first().map(|s| s.row.clone())
        } else {
            None
        };

        BookingSeating {
            seat_ids: self.selected_ids(),
            section: self.selected.first().map(|s| s.section.clone()),
            row,
        }
    }
}
