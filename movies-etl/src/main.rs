use std::process::ExitCode;

use tracing::{error, info};

use movies_etl::{logging, Dependencies, EtlConfig, EtlError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = match EtlConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Movies ETL failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: EtlConfig) -> Result<(), EtlError> {
    info!(
        entities = ?config.entities,
        cutoff = %config.cutoff,
        interval = ?config.run_interval,
        "Starting movies ETL"
    );

    let cutoff = config.cutoff;
    let interval = config.run_interval;
    let deps = Dependencies::new(config).await?;

    let result = deps.orchestrator.run(cutoff, interval).await;
    deps.source.close().await;

    result?;
    info!("Movies ETL finished");
    Ok(())
}
