use crate::config::SettingsOverrides;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-relay")]
#[command(about = "Serves the lead form and relays submissions to a webhook")]
pub struct RelayArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Webhook that receives submitted leads
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Accept submissions without forwarding them anywhere
    #[arg(long)]
    pub demo_mode: bool,

    /// IP address to bind, e.g. 127.0.0.1
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding index.html and the form assets
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Timeout for the outbound webhook call
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl RelayArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            webhook_url: self.webhook_url.clone(),
            demo_mode: self.demo_mode,
            host: self.host.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
            request_timeout_secs: self.request_timeout_secs,
            json_logs: self.json_logs,
        }
    }
}
