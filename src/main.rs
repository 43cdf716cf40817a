//! Flock CLI - Lightweight church community client
//!
//! A terminal client for the Flock platform: sign in, browse groups,
//! and join group audio/video calls.

mod api;
mod auth;
mod call;
mod config;
mod models;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::call::CallMode;
use crate::models::{GoogleProfile, RegisterData};

#[derive(Parser)]
#[command(name = "flock-cli")]
#[command(about = "Lightweight CLI client for the Flock church community platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Register a new member account
    Register {
        email: String,

        #[arg(short, long)]
        password: String,

        /// Full name shown to other members
        #[arg(short = 'n', long)]
        full_name: String,

        #[arg(long)]
        phone: Option<String>,

        /// male or female
        #[arg(long)]
        gender: Option<String>,

        /// Departments to join (repeatable)
        #[arg(long)]
        department: Vec<String>,
    },

    /// Sign in with a Google identity token
    Google {
        /// Google ID token from the OAuth flow
        id_token: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(long)]
        photo: Option<String>,

        #[arg(long)]
        google_id: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show current authentication status
    Status,

    /// Show current user info
    Whoami,

    /// List your chat groups
    Groups,

    /// List the members of a group
    Members {
        /// Group ID (from `groups` output)
        group_id: u64,
    },

    /// List your prayer requests
    Prayers,

    /// Show your giving history
    Giving,

    /// Join a group call
    Call {
        /// Group ID (from `groups` output)
        group_id: u64,

        /// Audio-only call (video is the default)
        #[arg(long)]
        audio: bool,

        /// Group name shown on the call screen
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Login { email, password } => {
            auth::login(email, password).await?;
        }
        Commands::Register {
            email,
            password,
            full_name,
            phone,
            gender,
            department,
        } => {
            auth::register(RegisterData {
                email,
                password,
                full_name,
                phone_number: phone,
                gender,
                departments: department,
            })
            .await?;
        }
        Commands::Google {
            id_token,
            email,
            first_name,
            last_name,
            photo,
            google_id,
        } => {
            auth::google(
                id_token,
                GoogleProfile {
                    email,
                    first_name,
                    last_name,
                    photo,
                    google_id,
                },
            )
            .await?;
        }
        Commands::Logout => {
            tracing::info!("Logging out...");
            auth::logout().await?;
        }
        Commands::Status => {
            auth::status().await?;
        }
        Commands::Whoami => {
            api::whoami().await?;
        }
        Commands::Groups => {
            tracing::info!("Fetching groups...");
            api::list_groups().await?;
        }
        Commands::Members { group_id } => {
            api::list_members(group_id).await?;
        }
        Commands::Prayers => {
            api::list_my_prayers().await?;
        }
        Commands::Giving => {
            api::giving_history().await?;
        }
        Commands::Call {
            group_id,
            audio,
            name,
        } => {
            let mode = if audio { CallMode::Audio } else { CallMode::Video };
            tui::run_call(group_id, name, mode).await?;
        }
    }

    Ok(())
}
