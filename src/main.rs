use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use hostpoll::config::{AppConfig, RosterFile};
use hostpoll::sink::JsonLinesSink;
use hostpoll::snmp::Snmp2Transport;
use hostpoll::{build_fleet, scheduler};

#[derive(Parser, Debug)]
#[command(name = "hostpoll", about = "SNMP опрос CPU, памяти, дисков и процессов по списку устройств")]
struct Cli {
    /// YAML с настройками; без него берутся значения по умолчанию
    #[arg(short, long)]
    config: Option<String>,

    /// Файл со списком устройств
    #[arg(short, long)]
    roster: Option<String>,

    /// Период опроса в секундах
    #[arg(short, long)]
    interval: Option<u64>,

    /// Один цикл, дождаться всех устройств и выйти
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config);

    // общий пул и для устройств, и для обходов
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.get_worker_threads())
        .enable_all()
        .build()?;

    runtime.block_on(run(cli, config))
}

fn init_logging(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.settings.log_level.0));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let roster_path = cli.roster.unwrap_or_else(|| config.get_roster_path());
    let period = cli
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.get_interval());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        roster = %roster_path,
        interval_secs = period.as_secs(),
        workers = config.get_worker_threads(),
        "Запуск опроса"
    );

    let fleet = Arc::new(build_fleet(
        &config,
        Arc::new(Snmp2Transport),
        Arc::new(RosterFile::new(roster_path)),
        Arc::new(JsonLinesSink),
    ));

    if cli.once {
        fleet.run_poll_cycle().join().await;
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Не удалось подписаться на Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    scheduler::run_interval(fleet, period, shutdown).await;

    Ok(())
}
