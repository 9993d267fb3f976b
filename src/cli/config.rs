use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::locale::language::Language;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "autousata-forms",
    version,
    about = "Password reset, login and mock checkout flows for the Autousata marketplace"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: autousata.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Marketplace API base URL
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// API backend: http or mock
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Local store file (tokens, bids, payments, language)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Display language: en or ar
    #[arg(long, global = true)]
    pub language: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Log in and print where the app would navigate
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Record a winning bid for an auction
    Bid {
        #[arg(long)]
        auction: String,

        #[arg(long)]
        amount: i64,
    },

    /// Pay for a won auction with the mock checkout
    Pay {
        #[arg(long)]
        auction: String,

        /// Bid used when none is recorded for the auction
        #[arg(long, default_value_t = 0)]
        default_bid: i64,

        #[arg(long)]
        holder: String,

        #[arg(long)]
        number: String,

        /// MM/YY
        #[arg(long)]
        expiry: String,

        #[arg(long)]
        cvc: String,
    },

    /// Show whether an auction has been paid
    PaymentStatus {
        #[arg(long)]
        auction: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `autousata.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            backend: default_backend(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocaleConfig {
    pub language: Option<String>,
}

// Serde default helpers
fn default_timeout_ms() -> u64 { DEFAULT_TIMEOUT_MS }
fn default_backend() -> String { "http".to_string() }
fn default_store_path() -> String { "autousata-store.json".to_string() }
fn default_trace_path() -> String { "submission_trace.jsonl".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("autousata.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Settings (CLI > config file > defaults)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Http,
    Mock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub backend: Backend,
    pub store_path: String,
    pub trace_path: String,
    /// None means "whatever the store remembers"
    pub language: Option<Language>,
    pub verbose: u8,
}

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> Result<Settings, String> {
    let backend_name = cli.backend.as_deref().unwrap_or(&config.api.backend);
    let backend = match backend_name {
        "http" => Backend::Http,
        "mock" => Backend::Mock,
        other => return Err(format!("Unknown backend: {}. Use 'http' or 'mock'.", other)),
    };

    let language = match cli.language.as_deref().or(config.locale.language.as_deref()) {
        Some(code) => Some(code.parse::<Language>().map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(Settings {
        base_url: cli
            .api_base_url
            .clone()
            .or_else(|| config.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        timeout_ms: config.api.timeout_ms,
        backend,
        store_path: cli
            .store
            .clone()
            .unwrap_or_else(|| config.storage.path.clone()),
        trace_path: config.trace.path.clone(),
        language,
        verbose: cli.verbose,
    })
}
