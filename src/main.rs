use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tribelands::{Engine, Scenario, SnapshotWriter};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tribe society simulation runner")]
struct Cli {
    /// Path to a scenario YAML file (built-in defaults when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick count (uses the scenario's run length when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables writing)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshot output
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load_from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    if let Some(seed) = cli.seed {
        scenario.random_seed = seed;
    }
    if let Some(interval) = cli.snapshot_interval {
        scenario.snapshot.every_ticks = interval;
    }
    if let Some(dir) = &cli.snapshot_dir {
        scenario.snapshot.output_dir = dir.display().to_string();
    }

    let level = scenario
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ticks = cli.ticks.unwrap_or(scenario.ticks);
    let writer = SnapshotWriter::new(&scenario.snapshot.output_dir, scenario.snapshot.every_ticks);
    let mut engine = Engine::from_scenario(&scenario);

    info!(
        scenario = %scenario.name,
        seed = scenario.random_seed,
        width = scenario.map.width,
        height = scenario.map.height,
        tribes = scenario.tribes.count,
        ticks,
        "starting run"
    );

    for _ in 0..ticks {
        let summary = engine.tick();
        if let Some(path) = writer.maybe_write(&summary.metrics)? {
            info!(tick = summary.tick, path = %path.display(), "snapshot written");
        }
    }

    let final_metrics = engine.metrics();
    info!(
        tribes = final_metrics.tribe_count,
        total_population = final_metrics.total_population,
        avg_health = final_metrics.avg_health,
        season = final_metrics.season.name(),
        "run complete"
    );
    println!(
        "Scenario '{}' completed after {} ticks: {} tribes remain, total population {:.1}",
        scenario.name, ticks, final_metrics.tribe_count, final_metrics.total_population
    );

    Ok(())
}
