//! Treasure hunt binary.
//!
//! Wires configuration, the interactive prompts, grid generation, and the
//! hunt coordinator together, narrates the run on stdout, and prints the
//! winner once every adventurer has finished. Structured logs go to
//! stderr so narration stays readable.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing, stderr)
//! 2. Load configuration from `hunt-config.yaml` (defaults if absent)
//! 3. Prompt for the grid size `N` and the cohort size `T`
//! 4. Generate the grid, seeded when a seed is configured
//! 5. Run the hunt with a narrating event sink
//! 6. Print the summary

mod error;
mod narration;
mod prompt;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use hunt_core::{Coordinator, HuntConfig};
use hunt_world::GridStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::narration::NarrationSink;
use crate::prompt::{AGENT_COUNT_PROMPT, GRID_SIZE_PROMPT};

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "hunt-config.yaml";

/// Application entry point for the treasure hunt.
///
/// # Errors
///
/// Returns an error if configuration, input, grid generation, or the hunt
/// itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("hunt-engine starting");

    let config = load_config()?;
    info!(
        default_grid_size = config.grid.size,
        seed = ?config.grid.seed,
        default_agents = config.agents.initial_count,
        checkpoint_interval = config.checkpoint.interval,
        low_score_threshold = config.checkpoint.low_score_threshold,
        "Configuration loaded"
    );

    run(&config).await?;

    info!("hunt-engine shutdown complete");
    Ok(())
}

/// Prompt, build the grid, run the hunt, and print the outcome.
async fn run(config: &HuntConfig) -> Result<(), EngineError> {
    let (size, agents) = {
        let mut input = std::io::stdin().lock();
        let mut output = std::io::stdout().lock();
        let size =
            prompt::read_positive(&mut input, &mut output, GRID_SIZE_PROMPT, config.grid.size)?;
        let agents = prompt::read_positive(
            &mut input,
            &mut output,
            AGENT_COUNT_PROMPT,
            config.agents.initial_count,
        )?;
        writeln!(output)?;
        (size, agents)
    };

    let mut rng = match config.grid.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let grid = GridStore::generate(size, &config.grid.cells, &mut rng)?;
    info!(
        grid_size = size,
        treasures = grid.treasure_count(),
        agents,
        "Grid generated"
    );

    println!("> Simulation:");
    let result = Coordinator::new(config, Arc::new(grid))
        .with_sink(Arc::new(NarrationSink))
        .run_cohort(agents)
        .await?;

    println!();
    for line in narration::summary(&result) {
        println!("{line}");
    }

    info!(
        run_id = %result.run_id,
        winner = ?result.winner,
        best_score = result.best_score,
        treasures_collected = result.treasures_collected(),
        agents = result.agents.len(),
        "Hunt finished"
    );
    Ok(())
}

/// Load configuration from `hunt-config.yaml`, or defaults if it is absent.
///
/// The seed override from the environment applies either way.
fn load_config() -> Result<HuntConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(HuntConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        let mut config = HuntConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}
