// src/main.rs
//
// Thin research harness around the damsim library.
// All of the environment logic lives in the lib crate; this binary
// rolls out scripted release schedules and summarises the per-episode
// returns for both objectives.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use damsim::{Config, DamEnv, EventSink, FileSink, NoopSink, OnlineStats};

/// Command-line arguments for the damsim binary.
#[derive(Parser, Debug)]
#[command(name = "damsim")]
struct Cli {
    /// Number of episodes to run.
    #[arg(long, default_value_t = 10)]
    episodes: u64,

    /// Base seed. Episode k resets with seed + k.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Fixed release volume requested every step
    /// (ignored with --random-policy).
    #[arg(long, default_value_t = 3)]
    release: i64,

    /// Request a uniformly random release in [0, capacity] each step
    /// instead of the fixed one.
    #[arg(long)]
    random_policy: bool,

    /// Reservoir capacity (also the max single-step release).
    #[arg(long)]
    capacity: Option<i64>,

    /// Per-step water demand.
    #[arg(long)]
    water_demand: Option<f64>,

    /// Per-step power demand.
    #[arg(long)]
    power_demand: Option<f64>,

    /// Mean of the stochastic inflow.
    #[arg(long)]
    inflow_mean: Option<f64>,

    /// Standard deviation of the stochastic inflow.
    #[arg(long)]
    inflow_std: Option<f64>,

    /// Fixed initial storage level used on every reset.
    #[arg(long)]
    initial_level: Option<i64>,

    /// Disable the action-violation penalty.
    #[arg(long)]
    no_penalize: bool,

    /// Optional JSONL path for per-step telemetry.
    #[arg(long)]
    log_jsonl: Option<String>,

    /// Suppress per-episode lines; only print the final summary.
    #[arg(long)]
    quiet: bool,
}

/// Build the telemetry sink as a trait object so we can choose between
/// FileSink and NoopSink at runtime.
fn build_sink(log_jsonl: Option<&str>) -> Box<dyn EventSink> {
    if let Some(path) = log_jsonl {
        match FileSink::create(path) {
            Ok(s) => Box::new(s),
            Err(err) => {
                eprintln!(
                    "Failed to create log file ({path}), \
                     falling back to NoopSink: {err}"
                );
                Box::new(NoopSink)
            }
        }
    } else {
        Box::new(NoopSink)
    }
}

/// Build Config from defaults, then apply CLI + env research overrides.
///
/// This keeps src/config.rs as the single source of truth, while
/// letting sweep scripts vary the inflow climate via environment
/// variables.
fn build_config_from_env_and_args(cli: &Cli) -> Config {
    let mut cfg = Config::default();

    // ---------- CLI overrides ----------

    if let Some(capacity) = cli.capacity {
        cfg.capacity = capacity;
    }
    if let Some(demand) = cli.water_demand {
        cfg.water_demand = demand;
    }
    if let Some(demand) = cli.power_demand {
        cfg.power_demand = demand;
    }
    if let Some(mean) = cli.inflow_mean {
        cfg.inflow_mean = mean;
    }
    if let Some(std) = cli.inflow_std {
        cfg.inflow_std = std;
    }
    cfg.initial_level = cli.initial_level;
    cfg.penalize = !cli.no_penalize;
    cfg.seed = Some(cli.seed);

    // ---------- Env overrides (research knobs) ----------

    if let Ok(raw) = std::env::var("DAMSIM_INFLOW_MEAN") {
        if let Ok(v) = raw.parse::<f64>() {
            cfg.inflow_mean = v;
        }
    }

    if let Ok(raw) = std::env::var("DAMSIM_INFLOW_STD") {
        if let Ok(v) = raw.parse::<f64>() {
            cfg.inflow_std = v;
        }
    }

    cfg
}

fn main() {
    // 0) Parse CLI args.
    let cli = Cli::parse();

    // 1) Build config with CLI + env overrides.
    let cfg = build_config_from_env_and_args(&cli);

    // 2) Build the engine; a bad configuration is a hard error.
    let mut env = match DamEnv::new(cfg.clone()) {
        Ok(env) => env,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    // 3) Build telemetry sink from CLI.
    let mut sink = build_sink(cli.log_jsonl.as_deref());

    // The release schedule gets its own RNG stream so it never
    // interferes with the engine-owned inflow/initial-level stream.
    let mut schedule_rng = ChaCha8Rng::seed_from_u64(cli.seed ^ 0x5eed_5eed);

    let mut water_stats = OnlineStats::default();
    let mut power_stats = OnlineStats::default();

    // 4) Roll out the episodes.
    for episode in 0..cli.episodes {
        let (initial, _info) = env.reset(Some(cli.seed + episode));
        sink.log_reset(episode, initial);

        let mut water_return = 0.0;
        let mut power_return = 0.0;
        let mut step = 0u64;

        loop {
            step += 1;

            let action = if cli.random_policy {
                schedule_rng.gen_range(0..=cfg.capacity)
            } else {
                cli.release
            };

            let result = env.step(action);
            sink.log_step(episode, step, action, &result);

            water_return += result.reward.water_deficit;
            power_return += result.reward.power_deficit;

            if result.done {
                break;
            }
        }

        water_stats.add(water_return);
        power_stats.add(power_return);

        if !cli.quiet {
            println!(
                "episode {episode:4}  start {initial:4}  steps {step:3}  \
                 water {water_return:9.2}  power {power_return:9.2}"
            );
        }
    }

    // 5) Final summary over all episodes.
    println!();
    println!("SUMMARY");
    println!("  episodes:     {}", water_stats.n());
    println!(
        "  water return: mean {:9.2}  std {:8.2}  min {:9.2}  max {:9.2}",
        water_stats.mean(),
        water_stats.stddev_sample(),
        water_stats.min(),
        water_stats.max(),
    );
    println!(
        "  power return: mean {:9.2}  std {:8.2}  min {:9.2}  max {:9.2}",
        power_stats.mean(),
        power_stats.stddev_sample(),
        power_stats.min(),
        power_stats.max(),
    );
}
