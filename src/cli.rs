//! Command-line surface of the `ems` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::equipment::EquipmentStatus;
use crate::config::{self, ClientConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "ems", version, about = "Equipment management system client")]
pub struct Cli {
    /// Backend base URL, including the `/api/v1` prefix
    #[arg(long, global = true, env = "EMS_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the persisted session, theme and logs
    #[arg(long, global = true, env = "EMS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "EMS_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolve configuration from flags, which already fall back to the environment
    pub fn config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_lookup(|key| match key {
            config::ENV_API_URL => self.api_url.clone(),
            config::ENV_DATA_DIR => self
                .data_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            config::ENV_TIMEOUT_SECS => self.timeout.map(|secs| secs.to_string()),
            _ => None,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Forget the local session
    Logout,
    /// Fetch the current user's profile
    Me,
    /// Exchange the session token for a fresh one
    Refresh,
    /// Dashboard overview figures
    Dashboard,
    /// List equipment
    Equipment(EquipmentArgs),
    /// Look up equipment by QR code
    Qr { code: String },
    /// Repair orders assigned to me
    Repairs,
    /// Spare parts below their safety stock
    Alerts,
    /// Search the knowledge base
    Knowledge { keyword: String },
    /// Resolve a route through the navigation guard
    Navigate(NavigateArgs),
    /// Show or change the colour theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Classify a viewport width
    Device { width: u32 },
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Defaults to the current OS user
    #[arg(short, long)]
    pub username: Option<String>,

    /// Prompted for when absent
    #[arg(long, env = "EMS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = parse_equipment_status)]
    pub status: Option<EquipmentStatus>,
}

#[derive(Debug, Args)]
pub struct NavigateArgs {
    pub path: String,

    /// Open the login page even with an active session
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

fn parse_equipment_status(raw: &str) -> Result<EquipmentStatus, String> {
    EquipmentStatus::parse(raw)
        .ok_or_else(|| format!("expected one of running, stopped, maintenance, scrapped; got '{raw}'"))
}
