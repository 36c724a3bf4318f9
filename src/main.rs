use anyhow::{Context, Result};
use cg_fall_scan::strategy::describe_strategies;
use cg_fall_scan::{BotConfig, TurnDriver};
use clap::Parser;
use std::io;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cg_fall_scan")]
#[command(about = "Fall Challenge 2023 bot, reads the referee on stdin and answers on stdout")]
struct Cli {
    /// Decision strategy
    #[arg(long, default_value = "layered")]
    strategy: String,
    /// Log every input line (stderr)
    #[arg(long)]
    echo_input: bool,
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
    /// List the strategies and exit
    #[arg(long)]
    list_strategies: bool,
}

/**
 * Score points by scanning valuable fish faster than your opponent.
 **/
fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_strategies {
        for (id, description) in describe_strategies() {
            println!("{id:<10} {description}");
        }
        return Ok(());
    }

    let config = BotConfig {
        strategy: cli.strategy,
        echo_input: cli.echo_input,
        log_level: cli.log_level,
    };

    // stdout belongs to the referee
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("cannot install the logger")?;

    let strategy = config.build_strategy()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut driver = TurnDriver::new(stdin.lock(), stdout.lock(), strategy, config.echo_input);
    let summary = driver.run().context("match aborted")?;
    info!("{:?}", summary);
    Ok(())
}
