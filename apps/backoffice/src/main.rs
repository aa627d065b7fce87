//! # Titan Back Office CLI
//!
//! A thin command line front end over the back office commands. Every
//! command prints its result as pretty JSON on stdout; logs go to stderr.
//!
//! ## Usage
//! ```bash
//! backoffice login --token "$TOKEN" --admin-id admin-1 --role owner
//! backoffice stores list
//! backoffice stores select s1
//! backoffice fetch finance
//! backoffice update discounts '{"allowStacking": true}'
//! backoffice cards activate card-2
//! backoffice sanitize gps 95 --axis latitude
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load config: defaults → backoffice.toml → BACKOFFICE_* env
//! 3. Build AppState (reqwest backend, persisted session)
//! 4. Run the command, print JSON

use std::path::PathBuf;

use anyhow::Context;
use backoffice::commands::{finance, sanitize, session, settings, stores};
use backoffice::state::AppState;
use backoffice_client::ClientConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "backoffice", version, about = "Titan back office settings")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "BACKOFFICE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a session obtained from the identity provider
    Login {
        #[arg(long, env = "BACKOFFICE_TOKEN")]
        token: String,
        #[arg(long)]
        admin_id: String,
        /// owner, admin, manager or staff
        #[arg(long, default_value = "owner")]
        role: String,
        /// full, readOnly or restricted
        #[arg(long, default_value = "full")]
        access_mode: String,
    },

    /// Clear the session and every local setting
    Logout,

    /// Show the current session
    Whoami,

    /// Ask the auth gate whether a route may be shown
    CheckRoute { route: String },

    /// Manage stores
    #[command(subcommand)]
    Stores(StoresCommand),

    /// Fetch one settings domain
    Fetch { domain: String },

    /// Post a full settings tree for one domain
    Update {
        domain: String,
        /// Settings as JSON
        settings: String,
    },

    /// Fetch every settings domain
    FetchAll,

    /// Manage saved payment cards
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Save one admin tools section
    AdminSection {
        /// security, backups, maintenance or auditLog
        section: String,
        /// Section data as JSON
        #[arg(default_value = "null")]
        data: String,
        /// update, reset or trigger
        #[arg(long)]
        action: Option<String>,
    },

    /// Normalize a form value
    Sanitize {
        /// numeric, gps, tax-rate, phone, zip or ip
        kind: String,
        value: String,
        /// latitude or longitude (gps only)
        #[arg(long)]
        axis: Option<String>,
    },
}

#[derive(Subcommand)]
enum StoresCommand {
    /// List the admin's stores
    List,
    /// Select the store store-scoped settings refer to
    Select { store_id: String },
    /// Create a store
    Create {
        name: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete the selected store's settings
    Delete,
}

#[derive(Subcommand)]
enum CardsCommand {
    /// Make a saved card the active one
    Activate { card_id: String },
    /// Remove a saved card
    Remove { card_id: String },
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_json(raw: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON: {}", raw))
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login {
            token,
            admin_id,
            role,
            access_mode,
        } => print(&session::login(state, &token, &admin_id, &role, &access_mode)?),
        Command::Logout => {
            session::logout(state)?;
            print(&json!({ "signedIn": false }))
        }
        Command::Whoami => print(&session::current_session(state)),
        Command::CheckRoute { route } => print(&session::check_route(state, &route)),
        Command::Stores(cmd) => match cmd {
            StoresCommand::List => print(&stores::list_stores(state).await?),
            StoresCommand::Select { store_id } => {
                stores::select_store(state, &store_id)?;
                print(&json!({ "selectedStoreId": store_id }))
            }
            StoresCommand::Create { name, address } => {
                print(&stores::create_store(state, &name, address).await?)
            }
            StoresCommand::Delete => {
                stores::delete_store_settings(state).await?;
                print(&json!({ "deleted": true }))
            }
        },
        Command::Fetch { domain } => print(&settings::fetch_settings(state, &domain).await?),
        Command::Update { domain, settings: raw } => {
            let value = parse_json(&raw)?;
            print(&settings::update_settings(state, &domain, value).await?)
        }
        Command::FetchAll => print(&settings::fetch_all_settings(state).await?),
        Command::Cards(cmd) => match cmd {
            CardsCommand::Activate { card_id } => {
                print(&finance::set_active_card(state, &card_id).await?)
            }
            CardsCommand::Remove { card_id } => print(&finance::remove_card(state, &card_id).await?),
        },
        Command::AdminSection {
            section,
            data,
            action,
        } => {
            let data = parse_json(&data)?;
            print(&settings::update_admin_section(state, &section, data, action.as_deref()).await?)
        }
        Command::Sanitize { kind, value, axis } => {
            print(&json!({ "value": sanitize::sanitize_input(&kind, &value, axis.as_deref())? }))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backoffice::init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config).context("failed to load back office config")?;
    let state = AppState::from_config(config).context("failed to start back office")?;

    run(&state, cli.command).await
}
