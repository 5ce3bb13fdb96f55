//! Auth command - register, log in and out.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use eventdesk_client::{Credentials, Registration, User};
use serde::Serialize;

use super::Context;
use crate::feedback;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and remember the session
    Login {
        /// Email address
        #[arg(long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Status,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Register {
            name,
            email,
            password,
        } => cmd_register(name, email, password, ctx).await,
        AuthCommand::Login { email, password } => cmd_login(email, password, ctx).await,
        AuthCommand::Logout => cmd_logout(ctx),
        AuthCommand::Status => cmd_status(ctx),
    }
}

fn read_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

async fn cmd_register(
    name: String,
    email: String,
    password: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let client = ctx.client()?;
    let registration = Registration {
        name,
        email,
        password: read_password(password)?,
    };

    match client.auth().register(&registration).await {
        Ok(created) => {
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&created)?);
            } else {
                println!("{} Registered! Now login.", Style::new().green().apply_to("✓"));
            }
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Registration failed");
            anyhow::bail!("{}", feedback::server_message_or(&e, "Registration error"))
        }
    }
}

async fn cmd_login(email: String, password: Option<String>, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let credentials = Credentials::new(email, read_password(password)?);

    let login = match client.auth().login(&credentials).await {
        Ok(login) => login,
        Err(e) => {
            tracing::debug!(error = %e, "Login failed");
            anyhow::bail!("{}", feedback::login_failure(&e));
        }
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&login.user)?);
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    println!(
        "{} Logged in as {} ({})",
        green.apply_to("✓"),
        style(&login.user.name).bold(),
        login.user.email
    );
    // Landing hint only; the server decides what each role may do
    if login.user.is_admin() {
        println!(
            "{}",
            dim.apply_to("Manage events with 'eventdesk events create|update|delete'.")
        );
    } else {
        println!("{}", dim.apply_to("Browse events with 'eventdesk events list'."));
    }
    Ok(())
}

fn cmd_logout(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let was_logged_in = session.is_authenticated();
    session.logout()?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "logged_out": was_logged_in }));
    } else if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

/// Session status for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    authenticated: bool,
    user: Option<User>,
    server: String,
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let server = ctx.resolve_server()?;
    let state = session.state();

    if ctx.json_output {
        let output = StatusOutput {
            authenticated: state.authenticated,
            user: state.user,
            server: server.url,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("EventDesk Session").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    if state.authenticated {
        println!(
            "  {} {}",
            dim.apply_to("Status:"),
            Style::new().green().apply_to("● logged in")
        );
        match &state.user {
            Some(user) => {
                println!("  {} {} <{}>", dim.apply_to("User:  "), user.name, user.email);
                println!("  {} {}", dim.apply_to("Role:  "), user.role);
            }
            None => println!("  {} (profile not stored)", dim.apply_to("User:  ")),
        }
    } else {
        println!(
            "  {} {}",
            dim.apply_to("Status:"),
            Style::new().red().apply_to("● not logged in")
        );
    }
    println!("  {} {}", dim.apply_to("Server:"), server.url);
    if ctx.verbose {
        println!("  {} {}", dim.apply_to("Source:"), server.source);
    }
    println!();
    Ok(())
}
