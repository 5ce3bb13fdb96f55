//! Booking commands - book a seat and list my bookings.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::Context;
use crate::feedback;

/// Arguments for the book command.
#[derive(Args, Debug)]
pub struct BookArgs {
    /// ID of the event to book
    pub event_id: String,
}

/// Arguments for the bookings command.
#[derive(Args, Debug)]
pub struct BookingsArgs {}

/// Book a seat at an event.
pub async fn book(args: BookArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    match client.bookings().create(&args.event_id).await {
        Ok(booking) => {
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&booking)?);
            } else {
                println!(
                    "{} Congratulations! Your booking has been confirmed successfully.",
                    Style::new().green().apply_to("✓")
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, event_id = %args.event_id, "Booking failed");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Booking failed"))
        }
    }
}

/// List the current user's bookings.
pub async fn list(_args: BookingsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    let bookings = match client.bookings().mine().await {
        Ok(bookings) => bookings,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load bookings");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Failed to load bookings"));
        }
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&bookings)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    if bookings.is_empty() {
        println!("{}", dim.apply_to("No bookings yet"));
        return Ok(());
    }

    println!("{}", style("My Bookings").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!();
    for booking in &bookings {
        match &booking.event {
            Some(event) => println!(
                "  {}  {} at {} · {}",
                style(&event.title).bold(),
                event.day(),
                event.time,
                event.location
            ),
            // Event was deleted after booking
            None => println!("  {}", dim.apply_to(format!("(event unavailable) {}", booking.id))),
        }
    }
    println!();
    Ok(())
}
