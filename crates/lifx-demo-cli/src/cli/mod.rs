/*
[INPUT]:  Command-line arguments and LIFX_DEMO_* environment variables
[OUTPUT]: Parsed command tree for the lifx-demo binary
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding commands or flags
*/

pub mod commands;
pub mod prompt;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lifx_demo_adapter::LogExportSource;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "lifx-demo", version, about = "Client for the LIFX MCP demo backend")]
pub struct Cli {
    /// YAML file with backend_url, demo_key, state_dir and log_level
    #[arg(long = "config", value_name = "PATH", env = "LIFX_DEMO_CONFIG", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long, value_name = "URL", env = "LIFX_DEMO_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,
    #[arg(long, value_name = "KEY", env = "LIFX_DEMO_KEY", hide_env_values = true, global = true)]
    pub demo_key: Option<String>,
    /// Directory holding local.json and session.json
    #[arg(long, value_name = "DIR", env = "LIFX_DEMO_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            demo_key: self.demo_key.clone(),
            state_dir: self.state_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe the backend's /health endpoint
    Health,
    /// Inspect or reset the demo session
    #[command(subcommand)]
    Session(SessionCommand),
    /// Show or change the backend URL and demo key
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage the LIFX and Claude API keys
    #[command(subcommand)]
    Keys(KeysCommand),
    /// Send a request to a backend endpoint with session headers
    Request(RequestArgs),
    /// Fetch and export server logs
    #[command(subcommand)]
    Logs(LogsCommand),
    /// Pretty-print raw JSON log output from a file or stdin
    FormatRaw(FormatRawArgs),
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Print the session id and usage counters
    Show,
    /// Start a new session locally
    Reset,
    /// Clear the session on the server, wipe local state and start over
    ForceReset,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    /// Persist a backend URL (and optionally a demo key)
    Set {
        #[arg(long, value_name = "URL")]
        url: String,
        #[arg(long = "key", value_name = "KEY")]
        demo_key: Option<String>,
    },
    /// Forget the persisted backend URL and demo key
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    Show,
    /// Store API keys; prompts for both when neither flag is given
    Set {
        #[arg(long, value_name = "KEY")]
        lifx: Option<String>,
        #[arg(long, value_name = "KEY")]
        claude: Option<String>,
    },
    Clear,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Path on the backend, e.g. /api/claude
    pub endpoint: String,
    #[arg(long, short = 'X', default_value = "POST")]
    pub method: String,
    /// JSON request body
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: Option<String>,
    /// Ask the server to drop the previous session first
    #[arg(long)]
    pub reset_session: bool,
}

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    Fetch(LogsFetchArgs),
    /// Print the backend's log endpoint description
    Info,
}

#[derive(Args, Debug)]
pub struct LogsFetchArgs {
    #[arg(long, value_enum, default_value_t = SourceArg::All)]
    pub source: SourceArg,
    /// Entries per source (backend defaults to 25, MCP to 20)
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub level: Option<String>,
    /// Only entries after this timestamp
    #[arg(long)]
    pub since: Option<String>,
    /// Also copy the export to the system clipboard
    #[arg(long)]
    pub copy: bool,
    /// Print the highlighted HTML fragments instead of plain text
    #[arg(long, conflicts_with = "json")]
    pub html: bool,
    /// Print the combined entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FormatRawArgs {
    /// Read from this file instead of stdin
    pub file: Option<PathBuf>,
    /// Keep the HTML markup
    #[arg(long)]
    pub html: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArg {
    All,
    Backend,
    Mcp,
}

impl From<SourceArg> for LogExportSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::All => LogExportSource::All,
            SourceArg::Backend => LogExportSource::Backend,
            SourceArg::Mcp => LogExportSource::Mcp,
        }
    }
}
