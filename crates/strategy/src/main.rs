use agora_strategy::DemoConfig;
use log::{info, warn};

fn print_help() {
    eprintln!(
        r#"Agora Simulator - discrete-time agent-based market simulation

USAGE:
    agora-sim [OPTIONS]

OPTIONS:
    --config <PATH>     Load the demo setup from a JSON file
    --print-config      Print the built-in demo setup as JSON and exit
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run the built-in demo
    agora-sim

    # Start from the built-in setup and edit it
    agora-sim --print-config > demo.json
    agora-sim --config demo.json
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--print-config" => {
                println!("{}", serde_json::to_string_pretty(&DemoConfig::builtin()?)?);
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            DemoConfig::from_file(&path)?
        }
        None => {
            info!("Using built-in demo configuration");
            DemoConfig::builtin()?
        }
    };
    info!(
        "Window: {} .. {} ({:?})",
        config.simulation.start, config.simulation.end, config.simulation.granularity
    );
    info!("Assets: {}", config.simulation.assets.len());

    let mut sim = config.build()?;
    let summary = sim.run()?;
    info!("Finished: {} ticks, {} trades", summary.ticks, summary.trades);

    let tickers: Vec<String> = sim.exchange().tickers().map(|t| t.to_string()).collect();
    for ticker in &tickers {
        let bars = sim.price_bars(ticker)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => info!(
                "{}: open {} close {} over {} bars",
                ticker,
                first.open,
                last.close,
                bars.len()
            ),
            _ => warn!("{}: no trades", ticker),
        }
    }

    let names: Vec<String> = sim.agents().map(|a| a.name().to_string()).collect();
    for name in &names {
        let account = sim.account(name)?;
        let history = sim.portfolio_history(name)?;
        let total = history.last().map(|p| p.total).unwrap_or_else(|| account.cash());
        println!(
            "{:<16} cash {:>14} total {:>14} (started with {})",
            name,
            account.cash().round_dp(2),
            total.round_dp(2),
            account.initial_cash()
        );
    }

    Ok(())
}
