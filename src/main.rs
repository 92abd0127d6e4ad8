use hotel_occupancy::{Config, HotelError, OccupancyReport, db};
use mimalloc::MiMalloc;
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = Config::load();
    let loglevel = cfg
        .as_ref()
        .map(|c| c.loglevel.clone())
        .unwrap_or_else(|_| "info".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let result = match cfg {
        Ok(cfg) => run(&cfg).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(stage = e.stage(), error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: &Config) -> Result<(), HotelError> {
    info!(
        database_url = %cfg.redacted_database_url(),
        loglevel = %cfg.loglevel,
        reseed = cfg.reseed,
        report_format = ?cfg.report_format
    );

    let storage = db::connect(cfg).await?;
    storage.ensure_schema(cfg.reseed).await?;

    let report = OccupancyReport::collect(&storage).await?;
    storage.close().await;

    let rendered = report.render(cfg.report_format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
