use clap::Parser;
use lead_relay::core::submission::SubmissionOutcome;
use lead_relay::utils::logger;
use lead_relay::{FieldId, MemoryForm, SubmissionPipeline, WebhookClient, WebhookSettings};

/// Fills the lead form from flags and submits it, the way the browser form would.
#[derive(Parser)]
#[command(name = "submit_lead")]
#[command(about = "Submit a lead to a webhook or to a running lead-relay")]
struct Args {
    /// Webhook URL, or the relay's /api/submit endpoint
    #[arg(long, env = "WEBHOOK_URL")]
    target: Option<String>,

    /// Skip the network and report a demo success
    #[arg(long)]
    demo_mode: bool,

    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[arg(long, default_value = "")]
    full_name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    property_type: String,

    #[arg(long, default_value = "")]
    budget: String,

    #[arg(long, default_value = "")]
    location: String,

    #[arg(long, default_value = "")]
    message: String,

    #[arg(long)]
    newsletter: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let settings = match WebhookSettings::resolve(
        args.target.as_deref(),
        args.demo_mode,
        Some(args.timeout_secs),
    ) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    let client = WebhookClient::from_config(&settings)?;

    let mut form = MemoryForm::new();
    for (field, value) in [
        (FieldId::FullName, &args.full_name),
        (FieldId::Email, &args.email),
        (FieldId::Phone, &args.phone),
        (FieldId::PropertyType, &args.property_type),
        (FieldId::Budget, &args.budget),
        (FieldId::Location, &args.location),
    ] {
        form.set_value(field, value);
    }
    form.set_message(&args.message);
    form.set_newsletter(args.newsletter);

    let mut pipeline = SubmissionPipeline::new(client, form);
    let outcome = pipeline.submit().await;

    if let Some((message, kind)) = pipeline.view().status() {
        println!("{:?}: {}", kind, message);
    }

    let exit_code = match outcome {
        SubmissionOutcome::Succeeded { .. } => 0,
        SubmissionOutcome::Rejected(report) => {
            for (field, message) in report.errors() {
                eprintln!("  {}: {}", field, message);
            }
            1
        }
        SubmissionOutcome::Failed { reason } => {
            tracing::debug!("Failure reason: {}", reason);
            2
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
