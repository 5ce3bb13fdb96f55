//! Config command - manage backend contexts in client.yaml.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use eventdesk_config::Context as ClientContext;
use serde::Serialize;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved backend and all contexts
    Show,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// Backend API URL (e.g., http://localhost:5000/api)
        #[arg(long)]
        server: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::SetContext {
            name,
            server,
            timeout,
        } => cmd_set_context(&name, server, timeout),
        ConfigCommand::DeleteContext { name } => cmd_delete_context(&name),
    }
}

/// Resolved configuration for JSON output.
#[derive(Debug, Serialize)]
struct ShowOutput {
    server: String,
    source: String,
    timeout_secs: u64,
    current_context: Option<String>,
    contexts: Vec<ClientContext>,
    config_file: Option<String>,
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let config = eventdesk_config::load_client_config()?;
    let resolved = ctx.resolve_server()?;
    let path = eventdesk_config::client_config_path();

    if ctx.json_output {
        let output = ShowOutput {
            server: resolved.url,
            source: resolved.source.to_string(),
            timeout_secs: resolved.timeout_secs,
            current_context: config.current_context.clone(),
            contexts: config.contexts.clone(),
            config_file: path.map(|p| p.display().to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("EventDesk Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!();
    println!("  {} {}", dim.apply_to("Server: "), resolved.url);
    println!("  {} {}", dim.apply_to("Source: "), resolved.source);
    println!("  {} {}s", dim.apply_to("Timeout:"), resolved.timeout_secs);
    if let Some(path) = &path {
        println!("  {} {}", dim.apply_to("File:   "), path.display());
    }
    println!();

    if config.contexts.is_empty() {
        println!("{}", dim.apply_to("No contexts configured. Add one with:"));
        println!("  eventdesk config set-context local --server http://localhost:5000/api");
        return Ok(());
    }

    let width = config
        .contexts
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let current = config.current_context.as_deref();

    println!("   {:<width$}  {}", "NAME", "SERVER");
    for context in &config.contexts {
        let marker = if current == Some(context.name.as_str()) {
            Style::new().green().apply_to("*")
        } else {
            dim.apply_to(" ")
        };
        println!(" {} {:<width$}  {}", marker, context.name, context.server);
    }
    println!();

    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = eventdesk_config::load_client_config()?;

    config.use_context(name)?;
    eventdesk_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);

    Ok(())
}

fn cmd_set_context(name: &str, server: Option<String>, timeout: Option<u64>) -> Result<()> {
    let mut config = eventdesk_config::load_client_config()?;

    if let Some(existing) = config.get_context_mut(name) {
        if let Some(url) = server {
            existing.server = url;
        }
        existing.timeout = timeout.or(existing.timeout);
        println!("Context \"{}\" modified.", name);
    } else {
        let Some(server) = server else {
            anyhow::bail!("--server is required when creating a new context");
        };
        let context = match timeout {
            Some(t) => ClientContext::new(name, server).with_timeout(t),
            None => ClientContext::new(name, server),
        };
        config.set_context(context);
        println!("Context \"{}\" created.", name);

        if config.current_context.is_none() && config.contexts.len() == 1 {
            config.current_context = Some(name.to_string());
            println!("Context \"{}\" set as current context.", name);
        }
    }

    eventdesk_config::save_client_config(&config)?;
    Ok(())
}

fn cmd_delete_context(name: &str) -> Result<()> {
    let mut config = eventdesk_config::load_client_config()?;

    if config.remove_context(name).is_none() {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    eventdesk_config::save_client_config(&config)?;

    println!("Context \"{}\" deleted.", name);
    if config.current_context.is_none() {
        println!("Note: No current context. Use 'eventdesk config use-context <name>' to set one.");
    }
    Ok(())
}
