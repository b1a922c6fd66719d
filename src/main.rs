use clap::error::ErrorKind;
use clap::Parser;
use diff_sap::app::{self, Outcome};
use diff_sap::utils::logger;
use diff_sap::{CliConfig, DiffSapError};

// One child process at a time; a single thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.verbose);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match app::run(config.into()).await {
        Ok(Outcome::Planned(plan)) => serde_json::to_string_pretty(&plan)
            .map(|json| println!("{}", json))
            .map_err(DiffSapError::from),
        Ok(Outcome::Completed(report)) => {
            if report.all_succeeded() {
                tracing::info!("✅ Done");
            } else {
                tracing::warn!("Finished, but some steps reported failures");
            }
            Ok(())
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ diff-sap failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}
