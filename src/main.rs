//! Nation Sim - headless runner
//!
//! Generates a world, runs it for a number of ticks and prints a yearly
//! summary. The final snapshot can be dumped as JSON for inspection.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nation_sim::events::{EventCatalog, EventSystem};
use nation_sim::simulation::TickReport;
use nation_sim::{Result, SimConfig, Simulation};

/// Headless nation simulation
#[derive(Parser, Debug)]
#[command(name = "nation-sim")]
#[command(about = "Run a deterministic nation simulation and print yearly summaries")]
struct Args {
    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of nations (overrides the config file)
    #[arg(long)]
    nations: Option<usize>,

    /// Ticks (months) to simulate
    #[arg(long, default_value_t = 120)]
    ticks: u64,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML event catalog replacing the built-in one
    #[arg(long)]
    events: Option<PathBuf>,

    /// Ticks per real-time unit when driving the clock
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Write the final snapshot as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log filter, e.g. "nation_sim=debug"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nation_sim=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(count) = args.nations {
        config.world.nation_count = count;
    }

    let mut sim = Simulation::from_config(config)?;
    if let Some(path) = &args.events {
        sim.world_mut().events = EventSystem::new(EventCatalog::load_from_toml(path)?);
    }
    sim.set_speed(args.speed)?;

    let stats = sim.world().statistics();
    println!("=== NATION SIM ===");
    println!(
        "Seed {} | {} nations | player: {}",
        sim.world().config.world.seed,
        stats.nation_count,
        stats.player_nation.as_deref().unwrap_or("none")
    );
    println!();

    let start = Instant::now();
    let mut totals = RunTotals::default();

    sim.start();
    while sim.tick() < args.ticks {
        let remaining = args.ticks - sim.tick();
        let reports = if (remaining as f64) >= sim.speed() {
            sim.advance_real_time(1.0)?
        } else {
            vec![sim.step()?]
        };
        for report in &reports {
            totals.add(report);
        }
        if reports.iter().any(|r| (r.tick + 1) % 12 == 0) {
            print_year(&sim);
        }
    }

    let elapsed = start.elapsed();
    let stats = sim.world().statistics();
    println!();
    println!("Simulated {} ticks in {:.2}ms", args.ticks, elapsed.as_secs_f64() * 1000.0);
    println!(
        "{} intents applied, {} rejected, {} events, {} elections",
        totals.applied, totals.rejected, totals.events, totals.elections
    );
    println!(
        "Final: {} | population {} | GDP {:.2e} | wars {} | alliances {} | trade deals {}",
        stats.date,
        stats.total_population,
        stats.total_gdp,
        stats.active_wars,
        stats.active_alliances,
        stats.trade_deals
    );

    let snapshot = sim.snapshot();
    println!("\n--- Power Ranking ---");
    for (rank, (id, power)) in snapshot.power_ranking().iter().enumerate() {
        if let Some(nation) = snapshot.nation(*id) {
            println!(
                "{:>2}. {:<14} {:>10.1}  GDP/capita {:>8.1}",
                rank + 1,
                nation.name,
                power,
                nation.economy.gdp_per_capita(nation.population.size)
            );
        }
    }

    if let Some(player) = sim.world().player() {
        println!("\n--- {} ---", player.name);
        for entry in sim.world().log.for_nation(player.id) {
            println!("[{}] {}", entry.tick, entry.message);
        }
    }

    println!("\n--- Recent Log ---");
    for entry in snapshot.recent_log.iter().rev().take(10) {
        println!("[{}] {}", entry.tick, entry.message);
    }

    if let Some(path) = &args.output {
        std::fs::write(path, snapshot.to_json())?;
        println!("\nSnapshot written to {}", path.display());
    }

    Ok(())
}

#[derive(Default)]
struct RunTotals {
    applied: usize,
    rejected: usize,
    events: usize,
    elections: usize,
}

impl RunTotals {
    fn add(&mut self, report: &TickReport) {
        self.applied += report.intents_applied;
        self.rejected += report.intents_rejected;
        self.events += report.events_fired();
        self.elections += report.elections.len();
    }
}

fn print_year(sim: &Simulation) {
    let stats = sim.world().statistics();
    println!(
        "{} | pop {:>11} | GDP {:>9.2e} | wars {} | alliances {} | trade {}",
        stats.date,
        stats.total_population,
        stats.total_gdp,
        stats.active_wars,
        stats.active_alliances,
        stats.trade_deals
    );
}
