// # adsync - CSV to ad account importer
//
// Thin integration layer: all loading and reconciliation logic lives in
// adsync-core, all HTTP in adsync-provider-adwords.
//
// The binary is responsible for:
// 1. Parsing flags and environment variables into a SyncConfig
// 2. Loading the CSV and printing what was found
// 3. Asking for confirmation (unless --yes)
// 4. Registering directories and running the engine
// 5. Printing the report and mapping failures to exit codes
//
// ## Environment
//
// - `ADSYNC_ACCESS_TOKEN`: OAuth access token (adwords directory)
// - `ADSYNC_DEVELOPER_TOKEN`: API developer token (adwords directory)
// - `ADSYNC_API_BASE`: API base URL override
// - `ADSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export ADSYNC_ACCESS_TOKEN=...
// export ADSYNC_DEVELOPER_TOKEN=...
//
// adsync --csv keywords.csv --account 123-456-7891 --delimiter ';'
// ```

mod cli;
mod prompt;

use adsync_core::{
    DirectoryRegistry, Error, SyncConfig, SyncEngine, SyncEvent, SyncPlan, SyncReport,
};
use clap::Parser;
use cli::Cli;
use prompt::Confirmation;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Import finished, or declined at the prompt
/// - 1: Invalid arguments, configuration, CSV content or confirmation
/// - 2: Remote or runtime failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdsyncExitCode {
    /// Normal exit
    Success = 0,
    /// Rejected input
    InvalidInput = 1,
    /// Failure while talking to the account
    RuntimeError = 2,
}

impl From<AdsyncExitCode> for ExitCode {
    fn from(code: AdsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl AdsyncExitCode {
    fn for_error(error: &Error) -> Self {
        if error.is_validation() {
            AdsyncExitCode::InvalidInput
        } else {
            AdsyncExitCode::RuntimeError
        }
    }
}

/// Entities that already existed, counted from engine events
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ExistingTally {
    campaigns: usize,
    ad_groups: usize,
    keywords: usize,
}

impl ExistingTally {
    fn record(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::CampaignFound { .. } => self.campaigns += 1,
            SyncEvent::AdGroupFound { .. } => self.ad_groups += 1,
            SyncEvent::KeywordFound { .. } => self.keywords += 1,
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    let started = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                AdsyncExitCode::InvalidInput.into()
            } else {
                AdsyncExitCode::Success.into()
            };
        }
    };

    // Initialize tracing
    let log_level = match Level::from_str(&cli.log_level) {
        Ok(level) => level,
        Err(_) => {
            eprintln!(
                "ADSYNC_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                cli.log_level
            );
            return AdsyncExitCode::InvalidInput.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AdsyncExitCode::RuntimeError.into();
    }

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return AdsyncExitCode::for_error(&e).into();
        }
    };

    let plan = match SyncPlan::load(&config.input) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            return AdsyncExitCode::for_error(&e).into();
        }
    };

    println!("CSV file is OK.");
    println!("Campaigns found : {}", plan.campaigns.len());
    println!("Ads groups found : {}", plan.ad_groups.len());
    println!("Keywords found : {}", plan.keywords.len());

    if !cli.yes {
        match prompt::ask_confirmation() {
            Ok(Confirmation::Proceed) => {}
            Ok(Confirmation::Decline) => return AdsyncExitCode::Success.into(),
            Ok(Confirmation::Invalid) => {
                eprintln!("Bad user input, exit.");
                return AdsyncExitCode::InvalidInput.into();
            }
            Err(e) => {
                eprintln!("{}", e);
                return AdsyncExitCode::InvalidInput.into();
            }
        }
    }

    // Every remote call is awaited in turn; one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AdsyncExitCode::RuntimeError.into();
        }
    };

    let (report, existing) = match rt.block_on(run_import(config, &plan)) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Import failed: {}", e);
            eprintln!("{}", e);
            return AdsyncExitCode::for_error(&e).into();
        }
    };

    print_report(&report);
    info!(
        "Already present: {} campaign(s), {} ad group(s), {} keyword(s)",
        existing.campaigns, existing.ad_groups, existing.keywords
    );
    println!("Finished in {:.2} seconds", started.elapsed().as_secs_f64());

    AdsyncExitCode::Success.into()
}

/// Build the directory registry with every compiled-in directory
fn build_registry() -> DirectoryRegistry {
    let registry = DirectoryRegistry::with_builtin();

    #[cfg(feature = "adwords")]
    adsync_provider_adwords::register(&registry);

    registry
}

/// Create the directory, run the engine and tally its events
async fn run_import(
    config: SyncConfig,
    plan: &SyncPlan,
) -> adsync_core::Result<(SyncReport, ExistingTally)> {
    let registry = build_registry();
    let directory = registry.create_directory(&config.directory)?;
    info!(
        "Importing into {} directory [{} listing]",
        directory.directory_name(),
        match config.engine.listing {
            adsync_core::ListingStrategy::Refetch => "refetch",
            adsync_core::ListingStrategy::Cached => "cached",
        }
    );

    let (engine, events) = SyncEngine::new(directory, config.engine)?;
    let tally = tokio::spawn(tally_events(events));

    let result = engine.run(plan).await;

    // Closing the sender ends the event stream
    drop(engine);
    let existing = tally
        .await
        .map_err(|e| Error::Other(format!("event task failed: {}", e)))?;

    Ok((result?, existing))
}

async fn tally_events(events: mpsc::Receiver<SyncEvent>) -> ExistingTally {
    let mut tally = ExistingTally::default();
    let mut stream = ReceiverStream::new(events);
    while let Some(event) = stream.next().await {
        tally.record(&event);
    }
    tally
}

fn print_report(report: &SyncReport) {
    println!(
        "Campaigns created : {} on {} found",
        report.campaigns.created, report.campaigns.found
    );
    println!(
        "Ads groups created : {} on {} found",
        report.ad_groups.created, report.ad_groups.found
    );
    println!(
        "Keywords created : {} on {} found",
        report.keywords.created, report.keywords.found
    );
}
