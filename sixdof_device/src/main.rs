//! Demo runner: loads the two configuration layers, constructs a device, and
//! drives it through `init` → `selfCheck` → a sample relative pose move so
//! the kinematics, safety gating, and telemetry paths all see real traffic.
//!
//! This binary always wires the in-memory simulation proxies
//! ([`sixdof_device::simulation`]) — the concrete network transport for the
//! motion controller and encoder service is outside this core's scope; a
//! real deployment supplies its own `MotionProxy`/`EncoderProxy`
//! implementations to [`SixDofDevice::new`].

use clap::Parser;
use sixdof_common::config::{ConfigLoader, SdofConfig, SystemConfig};
use sixdof_common::pose::Pose;
use sixdof_common::proxy::{EncoderProxy, MotionProxy};
use sixdof_device::device::SixDofDevice;
use sixdof_device::simulation::{SimEncoderProxy, SimMotionProxy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sixdof_device")]
#[command(about = "Stewart-platform device core demo runner")]
struct Args {
    /// Path to the process-wide system-config TOML file. Defaults are used
    /// if omitted.
    #[arg(short = 'c', long)]
    system_config: Option<PathBuf>,

    /// Path to the per-device `sdofConfig` JSON file.
    #[arg(short, long)]
    sdof_config: PathBuf,

    /// Enable verbose (DEBUG) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(args.verbose);

    if let Err(e) = run(args) {
        error!("sixdof_device startup failed: {e}");
        std::process::exit(1);
    }
}

/// Installs a `tracing_subscriber::fmt` subscriber filtered by `RUST_LOG`,
/// falling back to `info`/`debug` when the variable is unset.
fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let system_config = match &args.system_config {
        Some(path) => SystemConfig::load_from_toml_file(path)?,
        None => SystemConfig::default(),
    };
    system_config.validate()?;

    let sdof_json = std::fs::read_to_string(&args.sdof_config)?;
    let sdof_config: SdofConfig = serde_json::from_str(&sdof_json)?;

    info!(simulation_mode = system_config.simulation_mode, "constructing device");
    let device = SixDofDevice::new(
        sdof_config,
        system_config,
        Box::new(|| Ok(Arc::new(SimMotionProxy::new()) as Arc<dyn MotionProxy>)),
        Box::new(|| Ok(Arc::new(SimEncoderProxy::new()) as Arc<dyn EncoderProxy>)),
        Some(Arc::new(SimMotionProxy::new())),
        Some(Arc::new(SimEncoderProxy::new())),
    );

    device.init()?;
    device.self_check()?;
    info!(state = ?device.state(), "device ON, issuing a sample relative pose move");
    device.move_pose_relative(Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0))?;
    info!(state = ?device.state(), pose = ?device.six_freedom_pose(), "sample move complete");

    device.shutdown();
    Ok(())
}
