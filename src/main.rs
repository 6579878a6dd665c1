use anyhow::{Context, Result};

use price_forecast::config::Config;
use price_forecast::data::load_raw_rows;
use price_forecast::input::{parse_cli_command, usage, CliCommand};
use price_forecast::Forecaster;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_cli_command(&args)?;
    if command == CliCommand::Help {
        println!("{}", usage());
        return Ok(());
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!(
        csv_path = %config.data.csv_path.display(),
        c = config.model.c,
        gamma = config.model.gamma,
        epsilon = config.model.epsilon,
        "Starting price-forecast"
    );

    let raw = load_raw_rows(&config.data.csv_path)
        .with_context(|| format!("failed to load {}", config.data.csv_path.display()))?;
    let forecaster = Forecaster::initialize(&raw, config.model.training())
        .context("failed to initialise forecaster")?
        .with_max_horizon_days(config.forecast.max_horizon_days);

    match command {
        CliCommand::Info => {
            let series = forecaster.series();
            let holdout = forecaster.holdout();
            println!(
                "rows: {}\nfirst date: {}\nlast date: {}\ntrain rows: {}\nholdout: {}",
                series.len(),
                fmt_opt(series.first_date()),
                fmt_opt(series.last_date()),
                forecaster.model().train_rows(),
                serde_json::to_string(&holdout)?,
            );
        }
        CliCommand::Query { mode, date } => {
            let reply = forecaster.run_query(mode, &date);
            if !reply.is_ok() {
                eprintln!("{}", reply.message());
                std::process::exit(2);
            }
            println!("{}", reply.message());
        }
        CliCommand::Help => {}
    }

    tracing::info!("Done");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .logging
            .level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn fmt_opt(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
