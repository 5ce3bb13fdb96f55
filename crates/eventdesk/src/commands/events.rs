//! Events command - browse events and manage them as an admin.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Subcommand};
use console::{Style, style};
use eventdesk_client::{Event, EventInput};

use super::Context;
use crate::feedback;

/// Arguments for the events command.
#[derive(Args, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// List all events
    List,

    /// Show one event
    Show {
        /// Event ID
        id: String,
    },

    /// Create an event (admin)
    Create(EventFields),

    /// Update an event (admin)
    Update {
        /// Event ID
        id: String,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event (admin)
    Delete {
        /// Event ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Editable event fields. On update, only the given ones change.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Event title
    #[arg(long)]
    pub title: Option<String>,

    /// Longer description
    #[arg(long)]
    pub description: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Start time (e.g. 18:30)
    #[arg(long)]
    pub time: Option<String>,

    /// Venue
    #[arg(long)]
    pub location: Option<String>,

    /// Number of seats
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Image file, embedded as a data URL
    #[arg(long, conflicts_with = "image_url")]
    pub image: Option<PathBuf>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl EventFields {
    /// Overlay the given fields onto `input`.
    fn apply(self, input: &mut EventInput) -> Result<()> {
        if let Some(title) = self.title {
            input.title = title;
        }
        if let Some(description) = self.description {
            input.description = description;
        }
        if let Some(date) = self.date {
            input.date = date;
        }
        if let Some(time) = self.time {
            input.time = time;
        }
        if let Some(location) = self.location {
            input.location = location;
        }
        if let Some(capacity) = self.capacity {
            input.capacity = Some(capacity);
        }
        if let Some(path) = self.image {
            input.image_url = Some(image_data_url(&path)?);
        } else if let Some(url) = self.image_url {
            input.image_url = Some(url);
        }
        Ok(())
    }
}

/// Run the events command.
pub async fn run(args: EventsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        EventsCommand::List => cmd_list(ctx).await,
        EventsCommand::Show { id } => cmd_show(&id, ctx).await,
        EventsCommand::Create(fields) => cmd_create(fields, ctx).await,
        EventsCommand::Update { id, fields } => cmd_update(&id, fields, ctx).await,
        EventsCommand::Delete { id, yes } => cmd_delete(&id, yes, ctx).await,
    }
}

async fn cmd_list(ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    let events = match client.events().list().await {
        Ok(events) => events,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to list events");
            anyhow::bail!("{}", feedback::list_events_failure(&e));
        }
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    if events.is_empty() {
        println!("{}", dim.apply_to("No events available at the moment."));
        return Ok(());
    }

    println!("{}", style("Upcoming Events").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    for event in &events {
        println!();
        println!("  {}  {}", style(&event.title).bold(), dim.apply_to(&event.id));
        println!("  {} at {} · {}", event.day(), event.time, event.location);
        println!("  {}", dim.apply_to(seats_line(event)));
    }
    println!();
    Ok(())
}

async fn cmd_show(id: &str, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    let event = match client.events().get(id).await {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(error = %e, id, "Failed to load event");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Failed to load event"));
        }
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style(&event.title).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!();
    println!("  {} {}", dim.apply_to("Date:    "), event.day());
    println!("  {} {}", dim.apply_to("Time:    "), event.time);
    println!("  {} {}", dim.apply_to("Location:"), event.location);
    println!("  {} {}", dim.apply_to("Seats:   "), seats_line(&event));
    if let Some(image) = &event.image_url
        && !image.starts_with("data:")
    {
        println!("  {} {}", dim.apply_to("Image:   "), image);
    }
    if !event.description.is_empty() {
        println!();
        println!("  {}", event.description);
    }
    println!();
    println!(
        "  {}",
        dim.apply_to(format!("Book a seat with: eventdesk book {}", event.id))
    );
    println!();
    Ok(())
}

async fn cmd_create(fields: EventFields, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    let mut input = EventInput::default();
    fields.apply(&mut input)?;

    match client.events().create(input).await {
        Ok(event) => {
            print_saved(&event, "Event created successfully", ctx)?;
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to create event");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Failed to save event"))
        }
    }
}

async fn cmd_update(id: &str, fields: EventFields, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;

    // Updates replace the whole record; start from what the server has
    let result = match client.events().get(id).await {
        Ok(current) => {
            let mut input = current.to_input();
            fields.apply(&mut input)?;
            client.events().update(id, input).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(event) => {
            print_saved(&event, "Event updated successfully", ctx)?;
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, id, "Failed to update event");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Failed to save event"))
        }
    }
}

async fn cmd_delete(id: &str, yes: bool, ctx: &Context) -> Result<()> {
    let client = ctx.authenticated_client()?;
    let dim = Style::new().dim();

    if !yes {
        eprint!("Delete event {}? [y/N] ", id);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", dim.apply_to("Aborted."));
            return Ok(());
        }
    }

    match client.events().delete(id).await {
        Ok(()) => {
            if ctx.json_output {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!(
                    "{} Event deleted successfully",
                    Style::new().green().apply_to("✓")
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, id, "Failed to delete event");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Failed to delete event"))
        }
    }
}

fn print_saved(event: &Event, message: &str, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(event)?);
    } else {
        println!("{} {}", Style::new().green().apply_to("✓"), message);
        println!(
            "  {}",
            Style::new().dim().apply_to(format!("{} ({})", event.title, event.id))
        );
    }
    Ok(())
}

fn seats_line(event: &Event) -> String {
    match (event.capacity, event.seats_left()) {
        (Some(capacity), Some(left)) => format!("{left} of {capacity} seats left"),
        _ => format!("{} attending", event.attendee_count()),
    }
}

/// Read an image file into a `data:` URL.
fn image_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!(
        "data:{};base64,{}",
        image_mime(path),
        STANDARD.encode(bytes)
    ))
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
