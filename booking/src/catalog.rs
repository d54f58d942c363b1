//! Synthetic event catalog.
//!
//! In-memory stand-in for an events API. Every detail is derived
//! deterministically from the event id, so repeated lookups agree and tests
//! can rely on stable fixtures. Ids follow the `event-N` scheme for
//! `1 ..= EVENT_COUNT`; anything else resolves to `None`.

use crate::types::{
    EventDetail, EventHighlight, TicketTier, TierAccent, TierAvailability, VenueDetails,
};
use chrono::{DateTime, Days, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of events the catalog serves.
pub const EVENT_COUNT: usize = 24;

/// Tickets every event starts with, before tier splits.
const TOTAL_TICKETS: u32 = 1000;

const ARTISTS: [&str; 16] = [
    "The Weeknd",
    "Dua Lipa",
    "David Guetta",
    "Zedd",
    "Marshmello",
    "Calvin Harris",
    "Skrillex",
    "Deadmau5",
    "Tiësto",
    "Diplo",
    "A Great Big World",
    "Arctic Monkeys",
    "Gorillaz",
    "Post Malone",
    "Billie Eilish",
    "The 1975",
];

const VENUES: [&str; 10] = [
    "Madison Square Garden",
    "Crypto.com Arena",
    "United Center",
    "American Airlines Center",
    "FedEx Forum",
    "Toyota Center",
    "Wells Fargo Center",
    "Pepsi Center",
    "Barclays Center",
    "Smoothie King Center",
];

const CITIES: [(&str, &str); 10] = [
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Dallas", "TX"),
    ("Houston", "TX"),
    ("Denver", "CO"),
    ("Phoenix", "AZ"),
    ("Miami", "FL"),
    ("Boston", "MA"),
    ("Seattle", "WA"),
];

const AMENITIES: [&str; 6] = [
    "Immersive holo-stage with 360 degree visuals",
    "Quantum acoustic array with adaptive audio",
    "Biometric express entry portals",
    "Molecular gastronomy food labs",
    "Augmented reality navigation beacons",
    "Neon marketplace and merch drones",
];

const HIGHLIGHT_TEMPLATES: [(&str, &str); 4] = [
    (
        "Quantum Sound Lab",
        "A 64-speaker spatial audio rig tracks every movement for a fully immersive wave field experience.",
    ),
    (
        "Holographic Runway",
        "Laser-sculpted visuals react to beats in real-time, creating a floating runway beneath the artist.",
    ),
    (
        "Neon Drone Show",
        "Autonomous drones paint choreographed constellations synced to the performance drops.",
    ),
    (
        "Pulse Lounge",
        "Lounges with biometric lighting mirror your heartbeat for a hyper-personal ambient zone.",
    ),
];

struct TierBlueprint {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    multiplier: f64,
    capacity_ratio: f64,
    benefits: &'static [&'static str],
    accent: TierAccent,
}

const TIER_BLUEPRINTS: [TierBlueprint; 4] = [
    TierBlueprint {
        key: "vip",
        name: "VIP Immersion Suite",
        description: "Private skyline pods, backstage access, and molecular dining experience.",
        multiplier: 2.7,
        capacity_ratio: 0.12,
        benefits: &[
            "Backstage quantum meet & greet",
            "Complimentary molecular tasting menu",
            "Dedicated holographic concierge",
            "Private skyline viewing pod",
        ],
        accent: TierAccent::Pink,
    },
    TierBlueprint {
        key: "early-bird",
        name: "Quantum Early Bird",
        description: "Limited release entry with priority floor access.",
        multiplier: 0.8,
        capacity_ratio: 0.28,
        benefits: &[
            "Priority floor placement",
            "Exclusive merch drop access",
            "Pulse-line expedited entry",
        ],
        accent: TierAccent::Green,
    },
    TierBlueprint {
        key: "ga",
        name: "General Admission Pulse",
        description: "Full access to the immersive arena and neon marketplace.",
        multiplier: 1.05,
        capacity_ratio: 0.45,
        benefits: &[
            "Immersive arena access",
            "Adaptive LED wristband",
            "Neon marketplace credits",
        ],
        accent: TierAccent::Blue,
    },
    TierBlueprint {
        key: "afterglow",
        name: "Afterglow Lounge",
        description: "Post-show micro sets with ambient projections and curated cocktails.",
        multiplier: 1.45,
        capacity_ratio: 0.15,
        benefits: &[
            "Post-show lounge access",
            "Curated cocktail program",
            "Ambient micro sets",
        ],
        accent: TierAccent::Purple,
    },
];

/// All ids the catalog will resolve, in order.
pub fn event_ids() -> impl Iterator<Item = String> {
    (1..=EVENT_COUNT).map(|n| format!("event-{n}"))
}

/// Parse `event-N` into a zero-based index, rejecting out-of-range ids.
fn event_index(event_id: &str) -> Option<usize> {
    let n: usize = event_id.strip_prefix("event-")?.parse().ok()?;
    if (1..=EVENT_COUNT).contains(&n) {
        Some(n - 1)
    } else {
        None
    }
}

/// Position-weighted character sum, the seed for all per-event randomness.
fn seed_for(event_id: &str) -> u64 {
    event_id
        .bytes()
        .zip(1u64..)
        .fold(0u64, |acc, (b, i)| acc.wrapping_add(u64::from(b) * i))
}

/// Fixed calendar anchor so generated dates do not drift between calls.
fn base_date() -> DateTime<Utc> {
    // 2026-01-01T00:00:00Z
    DateTime::from_timestamp(1_767_225_600, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn build_tiers(event_id: &str, base_price: f64, available: u32) -> Vec<TicketTier> {
    let availability_ratio = f64::from(available) / f64::from(TOTAL_TICKETS);

    TIER_BLUEPRINTS
        .iter()
        .enumerate()
        .map(|(index, blueprint)| {
            let total = (f64::from(TOTAL_TICKETS) * blueprint.capacity_ratio)
                .round()
                .max(20.0);
            // Later tiers sell through faster, floored so nothing looks empty.
            let decay = (1.0 - index as f64 * 0.15).max(0.45);
            let remaining = (total * availability_ratio * decay)
                .round()
                .max(8.0)
                .min(total);

            TicketTier {
                id: format!("{event_id}-{}", blueprint.key),
                name: blueprint.name.to_string(),
                description: blueprint.description.to_string(),
                price: (base_price * blueprint.multiplier).round().max(25.0),
                benefits: blueprint.benefits.iter().map(ToString::to_string).collect(),
                availability: TierAvailability {
                    remaining: remaining as u32,
                    total: total as u32,
                },
                accent: Some(blueprint.accent),
            }
        })
        .collect()
}

fn build_venue_details(index: usize, city: &str, state: &str, rng: &mut StdRng) -> VenueDetails {
    let address_number: u32 = rng.gen_range(100..=999);
    let capacity: u32 = rng.gen_range(8000..=24_000);
    let start = index % AMENITIES.len();
    let amenities = (0..4)
        .map(|offset| AMENITIES[(start + offset) % AMENITIES.len()].to_string())
        .collect();

    VenueDetails {
        address: format!("{address_number} Pulse Avenue"),
        city: city.to_string(),
        state: state.to_string(),
        capacity,
        amenities,
    }
}

fn build_highlights(event_id: &str, artist: &str) -> Vec<EventHighlight> {
    HIGHLIGHT_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, (title, description))| EventHighlight {
            id: format!("{event_id}-highlight-{index}"),
            title: (*title).to_string(),
            description: description.replace("the artist", artist),
        })
        .collect()
}

fn related_event_ids(index: usize) -> Vec<String> {
    (1..=6)
        .map(|offset| format!("event-{}", (index + offset) % EVENT_COUNT + 1))
        .collect()
}

/// Resolve an event id to its full detail, or `None` for unknown ids.
#[must_use]
pub fn get_event_detail(event_id: &str) -> Option<EventDetail> {
    let index = event_index(event_id)?;
    let mut rng = StdRng::seed_from_u64(seed_for(event_id));

    let artist = ARTISTS[rng.gen_range(0..ARTISTS.len())];
    let venue = VENUES[rng.gen_range(0..VENUES.len())];
    let (city, state) = CITIES[rng.gen_range(0..CITIES.len())];
    let price = f64::from(rng.gen_range(25_u32..=224));
    let days_out: u64 = rng.gen_range(1..=180);
    let available: u32 = rng.gen_range(50..=549);

    Some(EventDetail {
        id: event_id.to_string(),
        title: format!("{artist} Live Concert"),
        artist: artist.to_string(),
        venue: venue.to_string(),
        city: city.to_string(),
        date: base_date()
            .checked_add_days(Days::new(days_out))
            .unwrap_or_else(base_date),
        price,
        description: format!(
            "Experience an unforgettable night with {artist} performing live. \
             This is a once-in-a-lifetime opportunity to see one of the biggest \
             artists in the industry perform their greatest hits and newest tracks."
        ),
        ticket_tiers: build_tiers(event_id, price, available),
        venue_details: build_venue_details(index, city, state, &mut rng),
        highlights: build_highlights(event_id, artist),
        related_event_ids: related_event_ids(index),
    })
}
