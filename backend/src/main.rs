//! Civic reporting entry point: registers a citizen, files a report and
//! walks it through a status change against the in-memory store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use civic_backend::domain::{CorruptionReportDraft, ReportStatus, ReportingService, UserDraft};
use civic_backend::outbound::memory::InMemoryUserRepository;
use civic_backend::settings::CivicSettings;

/// `civic-backend` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "civic-backend",
    about = "Register a citizen, file a corruption report and move it through its lifecycle",
    version
)]
struct CliArgs {
    /// Username to register.
    #[arg(long, default_value = "johndoe")]
    username: String,
    /// Email address to register.
    #[arg(long, default_value = "john.doe@example.com")]
    email: String,
    /// Report headline.
    #[arg(long, default_value = "Bribery Case")]
    title: String,
    /// Report body.
    #[arg(long, default_value = "Official demanded payment for a building permit.")]
    description: String,
    /// How many days ago the incident happened.
    #[arg(long, default_value_t = 1)]
    days_ago: i64,
    /// Status to move the report to after filing.
    #[arg(long, default_value = "UnderInvestigation")]
    status: ReportStatus,
}

fn init_tracing(json: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = result {
        warn!(error = %error, "tracing init failed");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = CivicSettings::load_from_iter([OsString::from("civic-backend")])
        .wrap_err("load CIVIC_* settings")?;
    init_tracing(settings.log_json);

    let transitions = settings
        .transitions()
        .wrap_err("resolve CIVIC_STATUS_TRANSITIONS")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;

    let service = ReportingService::with_transitions(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(DefaultClock),
        transitions,
    );
    runtime.block_on(walkthrough(&service, args))
}

/// Incident time `days_ago` days before `now`.
fn incident_time(now: DateTime<Utc>, days_ago: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(days_ago)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| eyre!("--days-ago {days_ago} is out of range"))
}

async fn walkthrough(
    service: &ReportingService<InMemoryUserRepository>,
    args: CliArgs,
) -> Result<()> {
    let user = service
        .register_user(UserDraft::new(args.username, args.email, "$argon2id$placeholder"))
        .await?;
    let occurred_on = incident_time(Utc::now(), args.days_ago)?;
    let filed = service
        .submit_report(CorruptionReportDraft {
            title: args.title,
            description: args.description,
            reporter_id: user.id(),
            occurred_on,
        })
        .await?;
    let moved = service.change_report_status(filed.id(), args.status).await?;
    info!(report_id = %moved.id(), status = %moved.status(), "walkthrough complete");

    let stored = service
        .find_user(user.id())
        .await?
        .ok_or_else(|| eyre!("user {} vanished from the store", user.id()))?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &stored.to_record())?;
    writeln!(stdout)?;
    Ok(())
}
