// Auction bidding bot entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the auction results)
// 2. Load config
// 3. Load the role tables
// 4. Build the decision engine
// 5. Run the candidate stream and print each outcome
// 6. Print the final team and optionally write the JSON report

use bidbot_cli::config;
use bidbot_cli::session::{self, SessionReport};
use bidbot_core::DecisionEngine;
use bidbot_data::PlayerTables;

use anyhow::Context;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("bidbot starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: budget={:.2} Cr, foreign limit={}, {} candidates",
        config.engine.auction.total_budget,
        config.engine.auction.foreign_limit,
        config.session.candidates.len()
    );

    // 3. Load the role tables
    let tables = PlayerTables::load(&config.data).context("failed to load player tables")?;
    info!("Loaded {} players", tables.len());

    // 4. Build the decision engine
    let mut engine = DecisionEngine::from_config(&tables, &config.engine);

    // 5. Run the candidate stream
    let mut bids = ChaCha8Rng::seed_from_u64(config.session.bid_seed);
    let outcomes = session::run_auction(&mut engine, &config.session.candidates, &mut bids)
        .context("auction session aborted")?;
    for outcome in &outcomes {
        println!("{}", outcome.describe());
    }

    // 6. Final team and report
    let report = SessionReport::new(&engine, outcomes);
    println!("Final team: [{}]", report.team_line());
    println!("Remaining budget: {:.2} Cr", report.remaining_budget);

    if let Some(path) = &config.session.report_path {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    info!("bidbot finished");
    Ok(())
}

/// Initialize tracing to log to a file, keeping stdout for results.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("bidbot.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("bidbot=info,bidbot_cli=info,bidbot_core=info,bidbot_data=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
