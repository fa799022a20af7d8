use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use interface::{
    config::load_config,
    history::JsonFileHistory,
    input::{run_input, HELP},
    log::init_log,
    ui::ConsoleUi,
};
use log::LevelFilter;
use ocppsim_client::v16::{
    ChargePoint, ChargingMode, SessionHistory, TokioTimerManager, TokioWsClient,
};
use tokio::{io::BufReader, task::JoinSet};
use tokio_util::sync::CancellationToken;

mod interface;

#[derive(Parser)]
#[command(author, version, about = "OCPP 1.6J charge point simulator", long_about = None)]
#[command(name = "ocppsim")]
struct Cli {
    /// Charge point ids to simulate; defaults to the id in the configuration
    ids: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the central system URL
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Charge in fast mode
    #[arg(long)]
    fast: bool,

    /// Reconnect this many milliseconds after the connection drops
    #[arg(long)]
    reconnect_ms: Option<u64>,

    /// Directory for the per charge point session history files
    #[arg(long, default_value = ".")]
    history_dir: PathBuf,

    /// Log a telemetry line every N ticks
    #[arg(long, default_value_t = 5)]
    metrics_every: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_log(cli.log_level);

    let mut config = match &cli.config {
        Some(path) => load_config(path, true)?,
        None => load_config(&PathBuf::from("config.json"), false)?,
    };
    if let Some(url) = cli.url {
        config.endpoint_url = url;
    }
    if cli.fast {
        config.mode = ChargingMode::Fast;
    }
    if cli.reconnect_ms.is_some() {
        config.reconnect_delay_ms = cli.reconnect_ms;
    }
    let ids = if cli.ids.is_empty() {
        vec![config.charge_point_id.clone()]
    } else {
        cli.ids
    };

    let stop_token = CancellationToken::new();
    let mut charge_points = JoinSet::new();
    let mut routes = Vec::with_capacity(ids.len());
    for id in ids {
        let cp_config = config.for_charge_point(&id);
        if cp_config.url().is_none() {
            anyhow::bail!("no usable endpoint for {:?} from {:?}", id, config.endpoint_url);
        }
        let history = JsonFileHistory::open(cli.history_dir.join(format!("sessions-{}.json", id)))?;
        log::info!(
            "charge point {} -> {}, history in {}",
            id,
            cp_config.url().unwrap_or_default(),
            history.path().display()
        );
        let (input_tx, input_rx) = flume::unbounded();
        routes.push((id.clone(), input_tx));
        let cp = ChargePoint::new(
            TokioWsClient::new(),
            TokioTimerManager::new(),
            ConsoleUi::new(id, cli.metrics_every),
            history,
            cp_config,
            stop_token.clone(),
            input_rx,
        );
        charge_points.spawn(cp.run());
    }

    println!("{}", HELP);
    tokio::spawn(run_input(
        BufReader::new(tokio::io::stdin()),
        routes,
        stop_token.clone(),
    ));

    let ctrl_c_token = stop_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("received Ctrl+C, shutting down");
        }
        ctrl_c_token.cancel();
    });

    while let Some(res) = charge_points.join_next().await {
        match res {
            Ok(cp) => log::info!("{} sessions on record", cp.history().read_all().len()),
            Err(e) => log::error!("charge point task failed: {}", e),
        }
    }
    Ok(())
}
