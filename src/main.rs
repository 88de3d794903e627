use clap::Parser;
use lead_relay::config::toml_config::TomlConfig;
use lead_relay::utils::error::ErrorSeverity;
use lead_relay::utils::logger;
use lead_relay::{server, LeadError, LeadRelay, RelayArgs, Settings, WebhookClient};
use std::sync::Arc;

fn exit_code(e: &LeadError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: LeadError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = RelayArgs::parse();

    // 載入 TOML 配置
    let file = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = args.verbose || file.as_ref().is_some_and(TomlConfig::verbose);
    let json_logs = args.json_logs || file.as_ref().is_some_and(TomlConfig::json_logs);

    // 初始化日誌
    logger::init_logger(verbose, json_logs);

    tracing::info!("🏠 Starting lead-relay");
    if verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let settings = match Settings::resolve(file, args.overrides()) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };
    let addr = match settings.bind_addr() {
        Ok(addr) => addr,
        Err(e) => fail(e),
    };

    if settings.webhook.target.is_demo() {
        tracing::warn!("⚠️ Demo mode: submissions are accepted but not forwarded");
    } else {
        tracing::info!("📮 Forwarding submissions to {}", settings.webhook.target);
    }
    tracing::info!("📁 Serving static files from {}", settings.static_dir);

    let client = match WebhookClient::from_config(&settings) {
        Ok(client) => client,
        Err(e) => fail(e),
    };
    let relay = Arc::new(LeadRelay::new(Arc::new(client)));

    server::start_server(
        relay,
        &settings.static_dir,
        settings.webhook.request_timeout,
        addr,
    )
    .await?;

    Ok(())
}
