use crate::api::{Id, OfferStatus, UserType};
use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing_subscriber::EnvFilter;

/// Default bind address of the stub server
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\.\-]+:\d{1,5}$").unwrap());

/// Validate the format of the TCP address provided by the user
///
/// Returns its input if the address is in the format <host>:<port>
pub fn validate_address(address: &str) -> Result<String, String> {
    if ADDRESS.is_match(address) {
        Ok(address.to_string())
    } else {
        Err(format!(
            "invalid address '{}', should be <host>:<port>",
            address
        ))
    }
}

fn parse_user_type(value: &str) -> Result<UserType, String> {
    value.parse()
}

/// Install the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Terminal client for the NoWaste food donation platform
#[derive(Parser, Debug)]
#[command(name = "client", version)]
pub struct ClientArgs {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the REST API (overrides config)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Session storage file (overrides config)
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Report failed reads instead of showing sample data
    #[arg(long)]
    pub no_fallback: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl ClientArgs {
    /// Command line flags are the last configuration layer
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(storage) = &self.storage {
            config.storage_path = Some(storage.clone());
        }
        if self.no_fallback {
            config.mock_fallback = false;
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long, value_parser = parse_user_type, default_value = "restaurant")]
        user_type: UserType,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup(SignupArgs),
    /// Forget the session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Figures and recent activity
    Dashboard,
    /// Scheduled and completed pickups
    Pickups {
        /// Only list completed pickups
        #[arg(long)]
        completed: bool,
    },
    /// Cancel a scheduled pickup
    CancelPickup { id: Id },
    /// The restaurant's listings
    Listings,
    /// Add a food item
    CreateListing(OfferArgs),
    /// Publish an offer for charities
    PublishOffer(OfferArgs),
    /// Change a listing
    UpdateListing {
        id: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        expiry_date: Option<String>,
        #[arg(long, value_enum)]
        status: Option<ListingStatus>,
    },
    /// Remove a listing
    DeleteListing { id: Id },
    /// Offers open to charities
    Offers,
    /// Claim an offer
    Claim { id: Id },
    /// Show or edit the account
    Account {
        #[command(subcommand)]
        action: Option<AccountAction>,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct SignupArgs {
    #[arg(long, value_parser = parse_user_type, default_value = "restaurant")]
    pub user_type: UserType,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, PartialEq)]
pub struct OfferArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub quantity: String,
    #[arg(long)]
    pub unit: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub expiry_date: String,
    #[arg(long, default_value = "")]
    pub available_date: String,
    #[arg(long, default_value = "")]
    pub available_time: String,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum ListingStatus {
    Open,
    Claimed,
    Completed,
}

impl From<ListingStatus> for OfferStatus {
    fn from(status: ListingStatus) -> Self {
        match status {
            ListingStatus::Open => OfferStatus::Open,
            ListingStatus::Claimed => OfferStatus::Claimed,
            ListingStatus::Completed => OfferStatus::Completed,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AccountAction {
    Show,
    /// Change profile fields, leaving the others as they are
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

/// Serves canned API answers for trying the client without a backend
#[derive(Parser, Debug)]
#[command(name = "stub-server", version)]
pub struct StubArgs {
    /// Address to listen on
    #[arg(short, long, default_value = DEFAULT_ADDRESS, value_parser = validate_address)]
    pub address: String,

    /// Path prefix of the API
    #[arg(long, default_value = "/api")]
    pub prefix: String,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
