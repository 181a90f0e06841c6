//! Shared device-construction fixtures for the scenario tests,
//! built entirely from the public crate API.

use sixdof_common::config::{PlatformGeometry, SdofConfig, SystemConfig};
use sixdof_common::proxy::{EncoderProxy, MotionProxy};
use sixdof_device::device::SixDofDevice;
use sixdof_device::simulation::{FlakyMotionProxy, SimEncoderProxy, SimMotionProxy};
use std::sync::Arc;
use std::time::Duration;

/// Scenario-1 geometry: `r1=110, r2=193, hh=408, a1=40, a2=14, ll=421.4857`.
pub fn scenario_geometry() -> PlatformGeometry {
    PlatformGeometry {
        r1: 110.0,
        r2: 193.0,
        hh: 408.0,
        a1: 40.0,
        a2: 14.0,
        h: 0.0,
        h3: 0.0,
        ll: 421.4857,
        min_leg_length: 0.0,
        max_leg_length: f64::MAX,
    }
}

pub fn scenario_sdof_config() -> SdofConfig {
    SdofConfig {
        geometry: scenario_geometry(),
        motor_step_angle: 1.8,
        motor_gear_ratio: 1.0,
        motor_subdivision: 12800,
        driver_power_port: 3,
        driver_power_controller: None,
        brake_power_port: 4,
        brake_power_controller: None,
        encoder_channels: [0, 1, 2, 3, 4, 5],
        motion_controller_name: None,
        encoder_name: None,
        device_name: None,
        device_id: None,
    }
}

/// A device in simulation mode, already brought to `ON` via `init`/`selfCheck`.
pub fn simulation_device() -> SixDofDevice {
    let system_config = SystemConfig { simulation_mode: true, ..SystemConfig::default() };
    let device = SixDofDevice::new(
        scenario_sdof_config(),
        system_config,
        Box::new(|| Ok(Arc::new(SimMotionProxy::new()) as Arc<dyn MotionProxy>)),
        Box::new(|| Ok(Arc::new(SimEncoderProxy::new()) as Arc<dyn EncoderProxy>)),
        Some(Arc::new(SimMotionProxy::new())),
        Some(Arc::new(SimEncoderProxy::new())),
    );
    device.init().unwrap();
    device.self_check().unwrap();
    device
}

/// A non-simulation device wired to concrete simulation-proxy handles, with
/// the handles returned alongside so a test can inject conditions (limit
/// switches, ping failures) the `dyn` trait surface can't express.
pub fn networked_device_with_handles() -> (SixDofDevice, Arc<SimMotionProxy>, Arc<SimEncoderProxy>) {
    let system_config = SystemConfig { simulation_mode: false, ..SystemConfig::default() };
    let motion = Arc::new(SimMotionProxy::new());
    let encoder = Arc::new(SimEncoderProxy::new());
    let device = SixDofDevice::new(
        scenario_sdof_config(),
        system_config,
        Box::new(|| Ok(Arc::new(SimMotionProxy::new()) as Arc<dyn MotionProxy>)),
        Box::new(|| Ok(Arc::new(SimEncoderProxy::new()) as Arc<dyn EncoderProxy>)),
        Some(motion.clone() as Arc<dyn MotionProxy>),
        Some(encoder.clone() as Arc<dyn EncoderProxy>),
    );
    device.init().unwrap();
    device.self_check().unwrap();
    (device, motion, encoder)
}

/// A simulation-mode device wired to a concrete [`SimMotionProxy`] handle so
/// a test can confirm the hardware surface was never touched.
pub fn simulation_device_with_handle() -> (SixDofDevice, Arc<SimMotionProxy>) {
    let system_config = SystemConfig { simulation_mode: true, ..SystemConfig::default() };
    let motion = Arc::new(SimMotionProxy::new());
    let device = SixDofDevice::new(
        scenario_sdof_config(),
        system_config,
        Box::new(|| Ok(Arc::new(SimMotionProxy::new()) as Arc<dyn MotionProxy>)),
        Box::new(|| Ok(Arc::new(SimEncoderProxy::new()) as Arc<dyn EncoderProxy>)),
        Some(motion.clone() as Arc<dyn MotionProxy>),
        Some(Arc::new(SimEncoderProxy::new())),
    );
    device.init().unwrap();
    device.self_check().unwrap();
    (device, motion)
}

/// A non-simulation device wired to a [`FlakyMotionProxy`] so a test can
/// induce a ping failure and drive the monitor deterministically
/// via `run_monitor_tick()` instead of sleeping for the real cadence.
pub fn networked_device_with_flaky_motion() -> (SixDofDevice, Arc<FlakyMotionProxy>) {
    let system_config = SystemConfig {
        simulation_mode: false,
        proxy_reconnect_interval_sec: 0,
        ..SystemConfig::default()
    };
    let motion = Arc::new(FlakyMotionProxy::new());
    let encoder = Arc::new(SimEncoderProxy::new());
    let motion_for_factory = motion.clone();
    let device = SixDofDevice::new(
        scenario_sdof_config(),
        system_config,
        Box::new(move || Ok(motion_for_factory.clone() as Arc<dyn MotionProxy>)),
        Box::new(|| Ok(Arc::new(SimEncoderProxy::new()) as Arc<dyn EncoderProxy>)),
        Some(motion.clone() as Arc<dyn MotionProxy>),
        Some(encoder.clone() as Arc<dyn EncoderProxy>),
    );
    device.init().unwrap();
    device.self_check().unwrap();
    (device, motion)
}

/// A short sleep long enough for `#[test]`s to distinguish "before" and
/// "after" a monitor cycle without depending on the real background thread.
pub fn settle() {
    std::thread::sleep(Duration::from_millis(10));
}
