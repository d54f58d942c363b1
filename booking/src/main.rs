//! CLI walkthrough of the booking wizard.
//!
//! Drives a full booking attempt end to end: mount, tier selection,
//! quantity, seats, contact details, review, and the mock payment.

use stagepass_booking::seatmap::{SeatPicker, SeatStatus};
use stagepass_booking::view::{StepView, step_view};
use stagepass_booking::{
    BookingEnvironment, BookingPayment, BookingUserInfo, CardDetails, PaymentMethod, Wizard,
    pricing,
};
use stagepass_core::environment::SystemClock;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== StagePass Booking Demo ===\n");

    let env = BookingEnvironment::new(Arc::new(SystemClock));
    let wizard = Wizard::mount("event-1", None, env).await?;

    let state = wizard.snapshot().await;
    let details = state
        .event_details
        .clone()
        .ok_or("catalog returned no event")?;
    println!("Booking: {}", details.title);
    println!(
        "Venue:   {} ({}, {})\n",
        details.venue, details.venue_details.city, details.venue_details.state
    );

    // Step 1: pick a tier
    println!("Available tiers:");
    for tier in &details.ticket_tiers {
        println!(
            "  {} - {} ({} of {} left)",
            pricing::format_currency(tier.price),
            tier.name,
            tier.availability.remaining,
            tier.availability.total
        );
    }
    let tier = details.ticket_tiers.first().ok_or("event has no tiers")?;
    println!("\nSelecting '{}'...", tier.name);
    wizard.select_tier(tier).await?;
    wizard.next().await?;

    // Step 2: quantity
    println!("Taking 3 tickets...");
    wizard.set_quantity(3).await?;
    wizard.next().await?;

    // Step 3: seats
    let zones = wizard.seat_map().await.ok_or("no seat map")?;
    let premium = zones.iter().find(|z| z.id == "premium").ok_or("no zone")?;
    let mut picker = SeatPicker::new(3);
    for seat in premium
        .seats
        .iter()
        .filter(|s| s.status == SeatStatus::Available)
        .take(3)
    {
        picker.toggle(seat);
    }
    println!(
        "Picked {} seats in {} for {}",
        picker.selected_count(),
        premium.name,
        pricing::format_currency(picker.selected_total())
    );
    wizard.set_seating(picker.confirm()).await?;
    wizard.next().await?;

    // Step 4: contact details
    wizard
        .set_user_info(BookingUserInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            marketing_consent: true,
        })
        .await?;
    wizard.next().await?;

    // Step 5: review
    let state = wizard.snapshot().await;
    if let StepView::Review(review) = step_view(&state) {
        println!("\nOrder review:");
        println!(
            "  {} x {}",
            review.summary.quantity,
            review.summary.tier_name
        );
        println!(
            "  Subtotal:       {}",
            pricing::format_currency(review.summary.subtotal)
        );
        println!(
            "  Processing fee: {}",
            pricing::format_currency(review.summary.processing_fee)
        );
        println!(
            "  Service charge: {}",
            pricing::format_currency(review.summary.service_charge)
        );
        println!(
            "  Total:          {}",
            pricing::format_currency(review.summary.total)
        );
    }
    wizard.next().await?;

    // Step 6: payment
    wizard
        .set_payment(BookingPayment::new(
            PaymentMethod::Card,
            Some(CardDetails {
                number: "4242 4242 4242 4242".to_string(),
                expiry: "12/30".to_string(),
                cvv: "123".to_string(),
                name: "Jane Doe".to_string(),
            }),
        ))
        .await?;

    match wizard.complete_booking().await? {
        Some(confirmation) => {
            println!("\nBooking confirmed!");
            println!("  Confirmation: {}", confirmation.confirmation_id);
            println!("  Completed at: {}", confirmation.completed_at);
        }
        None => println!("\nBooking was not accepted"),
    }

    wizard.shutdown(Duration::from_secs(5)).await?;
    println!("\n=== Demo Complete ===");
    Ok(())
}
