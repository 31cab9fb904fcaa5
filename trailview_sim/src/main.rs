//! TrailView Replay CLI
//!
//! Replays a recorded GPS path with its obstacle log, headless.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use trailview_core::ReplayConfig;
use trailview_env::{FrameClock, TokioClock};
use trailview_sim::{ReplayExport, ReplayRunner, RerunLogger, RunResult, SimClock, SimConfig, SimError};

/// TrailView headless replay
#[derive(Parser, Debug)]
#[command(name = "trailview-sim")]
#[command(about = "Replay a recorded GPS path and reveal nearby obstacles", long_about = None)]
struct Args {
    /// Path log (Latitude,Longitude,Heading)
    #[arg(short, long)]
    path: PathBuf,

    /// Obstacle log (Latitude,Longitude,Heading,Distance)
    #[arg(short, long)]
    obstacles: Option<PathBuf>,

    /// JSON file overriding replay settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Degrees to local units
    #[arg(long)]
    scale: Option<f64>,

    /// Segment progress per second
    #[arg(long)]
    speed: Option<f64>,

    /// Obstacle reveal distance
    #[arg(long)]
    threshold: Option<f64>,

    /// Frames per second
    #[arg(long, default_value = "60")]
    tick_rate: u32,

    /// Stop after this many frames
    #[arg(long, default_value = "1000000")]
    max_frames: u64,

    /// Pace frames on the wall clock
    #[arg(long)]
    realtime: bool,

    /// Export frames to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Stream to a Rerun viewer (needs the `visualization` feature)
    #[arg(long)]
    visualize: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,
}

fn replay_config(args: &Args) -> Result<ReplayConfig, SimError> {
    let mut config = match &args.config {
        Some(file) => ReplayConfig::from_json_file(file)?,
        None => ReplayConfig::default(),
    };
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(threshold) = args.threshold {
        config.proximity_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: &Args) -> Result<RunResult, SimError> {
    let sim = SimConfig {
        tick_rate_hz: args.tick_rate,
        max_frames: args.max_frames,
        realtime: args.realtime,
        ..Default::default()
    };
    let runner = ReplayRunner::new(replay_config(args)?, sim);

    let clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(TokioClock::new())
    } else {
        Box::new(SimClock::new())
    };
    let viz = if args.visualize {
        RerunLogger::new("trailview")
    } else {
        RerunLogger::disabled()
    };

    let mut export = args
        .export
        .as_ref()
        .map(|_| ReplayExport::new(&args.path.display().to_string(), args.tick_rate));

    let result = runner
        .run_files(&args.path, args.obstacles.as_deref(), clock.as_ref(), export.as_mut(), &viz)
        .await?;

    if let (Some(file), Some(export)) = (&args.export, &export) {
        export.write_to_file(file)?;
        info!("Exported {} frames to {}", export.frames.len(), file.display());
    }

    Ok(result)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    if !args.json {
        info!("TrailView Replay v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let result = match run(&args).await {
        Ok(result) => result,
        Err(e) => {
            error!("Replay failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "{} waypoints, {} frames, {:.2}s",
        result.summary.waypoint_count, result.frames, result.time_secs
    );
    info!(
        "Revealed {}/{} obstacles {:?}",
        result.summary.revealed.len(),
        result.summary.obstacle_count,
        result.summary.revealed
    );
    let skipped = result.path_report.skipped() + result.obstacle_report.skipped();
    if skipped > 0 {
        info!("Skipped {} malformed rows", skipped);
    }
    if !result.finished {
        error!("Stopped at the frame cap before the end of the path");
        std::process::exit(1);
    }
}
