//! The composed device: construction, shared mutable state, and the small
//! pieces of command dispatch that don't belong to a single component.
//!
//! The command-layer methods themselves live in [`crate::motion`] and
//! [`crate::pvt`]; the telemetry/attribute methods live in
//! [`crate::telemetry`] — both are additional `impl SixDofDevice` blocks in
//! their own files, splitting the device's behaviour across command,
//! safety, and telemetry concerns instead of one monolithic impl.

use crate::kinematics::KinematicsEngine;
use crate::proxy_supervisor::ProxySupervisor;
use crate::safety::brake::BrakeController;
use crate::safety::gating::{check_gate, Command};
use sixdof_common::config::{SdofConfig, SystemConfig};
use sixdof_common::error::DeviceError;
use sixdof_common::pose::Pose;
use sixdof_common::proxy::{EncoderProxy, MotionProxy};
use sixdof_common::state::{DeviceState, LatchedFault};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{error, info, warn};

/// Capacity of the `sixLogs` time-stamped event ring.
const LOG_RING_CAPACITY: usize = 256;

/// One entry in the `sixLogs` telemetry ring.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub message: String,
}

/// All device-local mutable state not already owned by the proxy
/// supervisor.
pub(crate) struct DeviceInner {
    pub state: DeviceState,
    pub current_leg_lengths: [f64; 6],
    pub axis_pos: [f64; 6],
    pub six_freedom_pose: Pose,
    pub sdof_state: [bool; 6],
    pub latched_fault: LatchedFault,
    pub alarm_state: String,
    pub logs: VecDeque<LogEntry>,
    pub result_value: u8,
    pub driver_power_on: bool,
    pub locked_by: Option<String>,
    pub user_config: std::collections::HashMap<String, String>,
}

/// The Stewart-platform device core (C1-C5 composed).
pub struct SixDofDevice {
    pub(crate) sdof_config: SdofConfig,
    #[allow(dead_code)]
    pub(crate) system_config: SystemConfig,
    pub(crate) kinematics: KinematicsEngine,
    pub(crate) proxies: Arc<ProxySupervisor>,
    pub(crate) brake: BrakeController,
    pub(crate) inner: Mutex<DeviceInner>,
}

impl SixDofDevice {
    /// Construct the device. Leg lengths are filled with the geometry's
    /// nominal `ll`; the monitor thread is started unless
    /// `system_config.simulation_mode` is set.
    pub fn new(
        sdof_config: SdofConfig,
        system_config: SystemConfig,
        motion_factory: Box<
            dyn Fn() -> Result<Arc<dyn MotionProxy>, sixdof_common::error::ProxyError>
                + Send
                + Sync,
        >,
        encoder_factory: Box<
            dyn Fn() -> Result<Arc<dyn EncoderProxy>, sixdof_common::error::ProxyError>
                + Send
                + Sync,
        >,
        initial_motion: Option<Arc<dyn MotionProxy>>,
        initial_encoder: Option<Arc<dyn EncoderProxy>>,
    ) -> Self {
        let kinematics = KinematicsEngine::new(sdof_config.geometry);
        let nominal = sdof_config.geometry.ll;

        let proxies = ProxySupervisor::new(
            motion_factory,
            encoder_factory,
            initial_motion,
            initial_encoder,
            system_config.simulation_mode,
            std::time::Duration::from_secs(system_config.proxy_reconnect_interval_sec),
        );
        proxies.start();

        let inner = DeviceInner {
            state: DeviceState::Unknown,
            current_leg_lengths: [nominal; 6],
            axis_pos: [nominal; 6],
            six_freedom_pose: Pose::ZERO,
            sdof_state: [false; 6],
            latched_fault: LatchedFault::clear(),
            alarm_state: String::new(),
            logs: VecDeque::with_capacity(LOG_RING_CAPACITY),
            result_value: 0,
            driver_power_on: false,
            locked_by: None,
            user_config: std::collections::HashMap::new(),
        };

        Self {
            sdof_config,
            system_config,
            kinematics,
            proxies,
            brake: BrakeController::new(),
            inner: Mutex::new(inner),
        }
    }

    /// Device shutdown.
    pub fn shutdown(&self) {
        if let Some(motion) = self.proxies.motion() {
            self.brake.engage(motion.as_ref(), self.sdof_config.brake_power_port);
        }
        self.log("device shutdown: brake engaged");
        self.proxies.stop();
    }

    pub fn state(&self) -> DeviceState {
        self.inner.lock().unwrap().state
    }

    pub(crate) fn set_state(&self, state: DeviceState) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != state {
            info!(from = %inner.state, to = %state, "device state transition");
        }
        inner.state = state;
    }

    pub fn simulation_mode(&self) -> bool {
        self.system_config.simulation_mode
    }

    pub(crate) fn log(&self, message: impl Into<String>) {
        let message = message.into();
        let mut inner = self.inner.lock().unwrap();
        if inner.logs.len() == LOG_RING_CAPACITY {
            inner.logs.pop_front();
        }
        inner.logs.push_back(LogEntry { timestamp: SystemTime::now(), message });
    }

    /// Gate a command against the current state, logging a rejection.
    pub(crate) fn admit(&self, command: Command) -> Result<(), DeviceError> {
        let state = self.state();
        match check_gate(command, state) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(command = command.name(), %state, "command rejected by gate");
                self.log(format!("rejected {}: {}", command.name(), e));
                self.set_result(1);
                Err(e)
            }
        }
    }

    pub(crate) fn set_result(&self, value: u8) {
        self.inner.lock().unwrap().result_value = value;
    }

    pub fn result_value(&self) -> u8 {
        self.inner.lock().unwrap().result_value
    }

    /// `connectionHealthy` attribute.
    pub fn connection_healthy(&self) -> bool {
        self.proxies.connection_healthy()
    }

    /// `motionRestorePending` attribute.
    pub fn motion_restore_pending(&self) -> bool {
        self.proxies.motion_restore_pending()
    }

    /// Drive one proxy-monitor iteration without waiting for the background
    /// thread's cadence.
    pub fn run_monitor_tick(&self) {
        self.proxies.tick()
    }

    /// `init`. Takes the device from its
    /// post-construction `UNKNOWN` state (or out of `FAULT`) to `OFF`,
    /// ready for `selfCheck`.
    pub fn init(&self) -> Result<(), DeviceError> {
        self.admit(Command::Init)?;
        self.set_state(DeviceState::Off);
        self.log("init: device initialized, awaiting selfCheck");
        self.set_result(0);
        Ok(())
    }

    /// `selfCheck`. Confirms the motion proxy is
    /// reachable (or simulation mode is active) and brings the device `ON`.
    pub fn self_check(&self) -> Result<(), DeviceError> {
        self.admit(Command::SelfCheck)?;
        if !self.simulation_mode() && self.proxies.motion().is_none() {
            self.set_result(1);
            return Err(DeviceError::ProxyError(
                "selfCheck failed: motion proxy unavailable".into(),
            ));
        }
        self.set_state(DeviceState::On);
        self.log("selfCheck: passed, device ON");
        self.set_result(0);
        Ok(())
    }

    /// `devLock(clientId)`. Reserves exclusive command access for one
    /// client; a second client's lock attempt is rejected until
    /// `devUnlock` (or the same client re-locking, which is idempotent).
    pub fn dev_lock(&self, client_id: impl Into<String>) -> Result<(), DeviceError> {
        self.admit(Command::DevLock)?;
        let client_id = client_id.into();
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = &inner.locked_by {
            if existing != &client_id {
                let msg = format!("device already locked by {existing}");
                drop(inner);
                self.set_result(1);
                return Err(DeviceError::InvalidArgument(msg));
            }
        }
        inner.locked_by = Some(client_id);
        drop(inner);
        self.set_result(0);
        Ok(())
    }

    /// `devUnlock(clientId)`. No-op if the caller doesn't hold the lock.
    pub fn dev_unlock(&self, client_id: &str) -> Result<(), DeviceError> {
        self.admit(Command::DevUnlock)?;
        let mut inner = self.inner.lock().unwrap();
        if inner.locked_by.as_deref() == Some(client_id) {
            inner.locked_by = None;
        }
        drop(inner);
        self.set_result(0);
        Ok(())
    }

    /// `devLockVerify(clientId)`: true if unlocked, or locked by
    /// `client_id`.
    pub fn dev_lock_verify(&self, client_id: &str) -> Result<bool, DeviceError> {
        self.admit(Command::DevLockVerify)?;
        let inner = self.inner.lock().unwrap();
        let ok = match &inner.locked_by {
            None => true,
            Some(owner) => owner == client_id,
        };
        self.set_result(0);
        Ok(ok)
    }

    /// `devLockQuery`: the current lock holder, if any.
    pub fn dev_lock_query(&self) -> Result<Option<String>, DeviceError> {
        self.admit(Command::DevLockQuery)?;
        let result = self.inner.lock().unwrap().locked_by.clone();
        self.set_result(0);
        Ok(result)
    }

    /// `devUserConfig(key, value)`: get or set an opaque client-defined
    /// key/value pair alongside the device. Passing `None` reads the
    /// current value; passing `Some` sets it and returns the prior value.
    pub fn dev_user_config(
        &self,
        key: &str,
        value: Option<String>,
    ) -> Result<Option<String>, DeviceError> {
        self.admit(Command::DevUserConfig)?;
        let mut inner = self.inner.lock().unwrap();
        let result = match value {
            Some(v) => inner.user_config.insert(key.to_string(), v),
            None => inner.user_config.get(key).cloned(),
        };
        drop(inner);
        self.set_result(0);
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn new_device_starts_with_nominal_leg_lengths() {
        let device = simulation_device();
        assert_eq!(device.inner.lock().unwrap().current_leg_lengths, [421.4857; 6]);
        assert_eq!(device.inner.lock().unwrap().axis_pos, [421.4857; 6]);
    }

    #[test]
    fn admit_rejects_and_logs_on_gate_failure() {
        let device = simulation_device();
        device.set_state(DeviceState::Off);
        let err = device.admit(Command::MovePoseAbsolute);
        assert!(err.is_err());
        assert_eq!(device.result_value(), 1);
        assert!(device.inner.lock().unwrap().logs.iter().any(|l| l.message.contains("rejected")));
    }

    #[test]
    fn shutdown_engages_brake_and_stops_supervisor() {
        let device = networked_device();
        device.brake.release(device.proxies.motion().unwrap().as_ref(), 4);
        assert!(!device.brake.is_engaged());
        device.shutdown();
        assert!(device.brake.is_engaged());
    }

    #[test]
    fn init_then_self_check_brings_device_on_from_unknown() {
        let device = networked_device();
        device.set_state(DeviceState::Unknown);
        device.init().unwrap();
        assert_eq!(device.state(), DeviceState::Off);
        device.self_check().unwrap();
        assert_eq!(device.state(), DeviceState::On);
    }

    #[test]
    fn self_check_blocked_while_on() {
        let device = networked_device();
        let err = device.self_check();
        assert!(matches!(err, Err(DeviceError::StateViolation { .. })));
    }

    #[test]
    fn dev_lock_rejects_a_second_distinct_client() {
        let device = simulation_device();
        device.set_state(DeviceState::Off);
        device.dev_lock("alice").unwrap();
        let err = device.dev_lock("bob");
        assert!(matches!(err, Err(DeviceError::InvalidArgument(_))));
        assert!(device.dev_lock("alice").is_ok());
    }

    #[test]
    fn dev_lock_verify_and_query_reflect_current_holder() {
        let device = simulation_device();
        device.set_state(DeviceState::Off);
        assert!(device.dev_lock_verify("alice").unwrap());
        device.dev_lock("alice").unwrap();
        assert_eq!(device.dev_lock_query().unwrap(), Some("alice".to_string()));
        assert!(!device.dev_lock_verify("bob").unwrap());
        device.dev_unlock("alice").unwrap();
        assert_eq!(device.dev_lock_query().unwrap(), None);
        assert!(device.dev_lock_verify("bob").unwrap());
    }

    #[test]
    fn dev_user_config_set_then_get_round_trips() {
        let device = simulation_device();
        assert_eq!(device.dev_user_config("profile", None).unwrap(), None);
        let prev = device.dev_user_config("profile", Some("default".into())).unwrap();
        assert_eq!(prev, None);
        assert_eq!(device.dev_user_config("profile", None).unwrap(), Some("default".to_string()));
    }
}
