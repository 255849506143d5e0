//! Codiny Server
//!
//! AI code review, refactoring and team invitations for the Codiny dashboard.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use codiny::analysis::AnalysisService;
use codiny::config::{Args, Config, LogFormat};
use codiny::http::{self, AppState};
use codiny::llm::ApiClient;
use codiny::mail::{InvitationService, MailTransport, SmtpMailer};
use codiny::metrics::Metrics;
use codiny::service::ResultService;
use codiny::VERSION;

fn init_tracing(config: &Config) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config: Config = args.into();
    init_tracing(&config);

    info!("Codiny Server v{}", VERSION);

    let metrics = Metrics::new();

    let completion = config.completion()?;
    info!(url = %completion.base_url, model = %completion.model, "Completion service");
    let client = Arc::new(ApiClient::new(&completion)?);
    let analysis = AnalysisService::new(client, metrics.clone());

    let mail = config.mail();
    let transport = SmtpMailer::from_config(&mail)?
        .map(|mailer| Arc::new(mailer) as Arc<dyn MailTransport>);
    if transport.is_none() {
        warn!("EMAIL_USER/EMAIL_PASSWORD not set; invitation emails are disabled");
    }
    let invitations = InvitationService::new(transport, mail.app_url, metrics.clone());

    let results = Arc::new(
        ResultService::new(&config.data_dir)
            .await
            .with_context(|| format!("opening result store in {:?}", config.data_dir))?,
    );

    let state = AppState {
        analysis,
        invitations,
        results,
        metrics,
    };

    http::start_server(&config, state).await?;
    Ok(())
}
