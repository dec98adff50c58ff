use clap::Parser;

use armtrack_core::tracker::{StepOutcome, Tracker};

mod config;

#[derive(Parser)]
#[command(version, propagate_version = true)]
#[command(about = "Armtrack chain simulator", long_about = None)]
struct Args {
    /// Joint lengths of the chain, base to tip.
    lengths: Vec<f64>,
    /// Seed for target regeneration.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    interval: u64,
    /// Number of ticks to simulate, 0 for unbounded.
    #[arg(long, default_value_t = 0)]
    ticks: u64,
    /// Emit JSON state snapshots.
    #[arg(long)]
    snapshot: bool,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bin_name = env!("CARGO_BIN_NAME");

    let mut config = config::SimConfig {
        lengths: args.lengths,
        seed: args.seed,
        interval: args.interval,
        ticks: args.ticks,
        snapshot: args.snapshot,
        global: armtrack_core::GlobalConfig::default(),
    };

    config.global.bin_name = bin_name.to_string();
    config.global.daemon = args.daemon;

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    run(&config).await
}

/// Default chain, base to tip. Matches the classic three-link demo rig.
const DEFAULT_LENGTHS: [f64; 3] = [10.0, 7.5, 5.0];

/// Ticks between snapshot records.
const SNAPSHOT_STRIDE: u64 = 60;

async fn run(config: &config::SimConfig) -> anyhow::Result<()> {
    let lengths = if config.lengths.is_empty() {
        DEFAULT_LENGTHS.to_vec()
    } else {
        config.lengths.clone()
    };

    let mut tracker = match config.seed {
        Some(seed) => Tracker::with_seed(&lengths, seed),
        None => Tracker::new(&lengths),
    };

    // A collinear start pose is singular and has no fallback to move on.
    let pose = vec![-std::f64::consts::FRAC_PI_4; lengths.len()];
    tracker.chain_mut().set_angles(&pose);

    log::info!(
        "Starting {} (core {})",
        config.global.bin_name,
        armtrack_core::consts::VERSION
    );
    log::info!(
        "Tracking with {} joints, reach {:.2}",
        tracker.chain().len(),
        tracker.chain().reach()
    );

    let mut interval = tokio::time::interval(std::time::Duration::from_millis(config.interval));

    let mut tick = 0u64;
    loop {
        interval.tick().await;

        match tracker.step() {
            StepOutcome::Converged => {
                let target = tracker.target_position();
                log::info!(
                    "Target reached, next target X {:>+5.2} Y {:>+5.2}",
                    target.x,
                    target.y
                );
            }
            StepOutcome::Tracking => {
                let tip = tracker.tip_position();
                log::trace!("Tip X {:>+5.2} Y {:>+5.2}", tip.x, tip.y);
            }
            // The solver already reports the singularity itself.
            StepOutcome::Singular => {}
        }

        if config.snapshot && tick % SNAPSHOT_STRIDE == 0 {
            log::debug!("{}", serde_json::to_string(&tracker.snapshot())?);
        }

        tick += 1;
        if config.ticks > 0 && tick >= config.ticks {
            break;
        }
    }

    log::info!(
        "Simulated {} ticks, {} singular",
        tick,
        tracker.singular_ticks()
    );

    Ok(())
}
