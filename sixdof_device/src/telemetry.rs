//! Attribute / telemetry layer (C5).
//!
//! `periodic_hook` runs on every attribute-read dispatch (there is no
//! dedicated telemetry thread); `refresh_encoders` backs the `readEncoder`
//! attribute specifically. The remaining functions are plain getters over
//! [`crate::device::DeviceInner`].

use crate::device::{LogEntry, SixDofDevice};
use crate::safety::fault::detect_limit_trigger;
use sixdof_common::pose::Pose;
use sixdof_common::state::DeviceState;

impl SixDofDevice {
    /// One periodic-hook pass. Steps run in order; step 4 (state
    /// mirroring) only applies if nothing earlier produced a state-changing
    /// effect this pass.
    pub fn periodic_hook(&self) {
        let mut acted = false;

        // Step 1. `connection_healthy()` is defined as `!motion_restore_pending`
        // among other things, so gating this on the aggregate health flag
        // would never fire; the pending flag alone is the actual trigger.
        if self.proxies.motion_restore_pending() {
            acted = true;
            self.run_restore();
        }

        // Step 2.
        let health_lost = !self.proxies.connection_healthy() && !self.proxies.motion_restore_pending();
        if health_lost && self.state() == DeviceState::On {
            acted = true;
            if let Some(motion) = self.proxies.motion() {
                if !self.brake.is_engaged() {
                    self.brake.engage(motion.as_ref(), self.sdof_config.brake_power_port);
                }
            }
            self.inner.lock().unwrap().alarm_state = "Network connection lost".to_string();
            self.set_state(DeviceState::Fault);
            self.log("connection health lost while ON, transitioned to FAULT");
        }

        // Step 3.
        if self.state() == DeviceState::Moving {
            if let Some(motion) = self.proxies.motion() {
                let mut el_reads = [0i8; 6];
                for (axis, slot) in el_reads.iter_mut().enumerate() {
                    if let Ok(v) = motion.read_el(axis as u8) {
                        *slot = v;
                    }
                }
                if let Some((axis, state)) = detect_limit_trigger(&el_reads) {
                    acted = true;
                    let alarm = {
                        let mut inner = self.inner.lock().unwrap();
                        inner.latched_fault.latch(axis, state);
                        let alarm = inner.latched_fault.alarm_text();
                        inner.alarm_state = alarm.clone();
                        alarm
                    };
                    self.brake.engage(motion.as_ref(), self.sdof_config.brake_power_port);
                    for a in 0..6u8 {
                        let _ = motion.stop_move(a);
                    }
                    self.set_state(DeviceState::Fault);
                    self.log(format!("latched fault: {alarm}"));
                }
            }
        }

        // Step 4.
        if !acted {
            if let Some(motion) = self.proxies.motion() {
                if let Ok(reported) = motion.state() {
                    let mapped = match reported.as_str() {
                        "MOVING" => DeviceState::Moving,
                        "FAULT" => DeviceState::Fault,
                        _ => DeviceState::On,
                    };
                    self.set_state(mapped);
                }
            }
        }
    }

    /// Post-reconnect restore actions, run from the request path.
    fn run_restore(&self) {
        let Some(motion) = self.proxies.motion() else {
            if self.proxies.record_restore_failure() {
                self.log("restore retry budget exhausted: motion proxy missing");
            }
            return;
        };

        let mut ok = true;
        if self.sdof_config.has_driver_power_port() {
            if let Err(e) = motion.write_io(self.sdof_config.driver_power_port, 1) {
                self.log(format!("restore: enable driver power failed: {e}"));
                ok = false;
            }
        }
        if ok && !self.brake.release(motion.as_ref(), self.sdof_config.brake_power_port) {
            ok = false;
        }
        if ok {
            match self.proxies.encoder() {
                Some(encoder) => {
                    for (axis, &channel) in self.sdof_config.encoder_channels.iter().enumerate() {
                        match encoder.read_encoder(channel) {
                            Ok(mm) => {
                                if let Err(e) = motion.set_encoder_position(axis as u8, mm) {
                                    self.log(format!(
                                        "restore: setEncoderPosition axis {axis} failed: {e}"
                                    ));
                                }
                            }
                            Err(e) => {
                                self.log(format!("restore: readEncoder channel {channel} failed: {e}"))
                            }
                        }
                    }
                }
                None => ok = false,
            }
        }

        if ok {
            self.proxies.record_restore_success();
            self.log("post-reconnect restore completed");
        } else if self.proxies.record_restore_failure() {
            self.log("restore retry budget exhausted, giving up");
        }
    }

    /// `readEncoder()` attribute. Per-axis failure
    /// retains the last-known value.
    pub fn refresh_encoders(&self) {
        let Some(encoder) = self.proxies.encoder() else { return };
        for (axis, &channel) in self.sdof_config.encoder_channels.iter().enumerate() {
            match encoder.read_encoder(channel) {
                Ok(mm) => {
                    let mut inner = self.inner.lock().unwrap();
                    inner.axis_pos[axis] = mm;
                    inner.current_leg_lengths[axis] = mm;
                }
                Err(e) => self.log(format!("readEncoder channel {channel} failed: {e}")),
            }
        }
    }

    pub fn axis_pos(&self) -> [f64; 6] {
        self.inner.lock().unwrap().axis_pos
    }

    pub fn dire_pos(&self) -> [f64; 6] {
        self.inner.lock().unwrap().current_leg_lengths
    }

    pub fn six_freedom_pose(&self) -> Pose {
        self.inner.lock().unwrap().six_freedom_pose
    }

    /// `limOrgState[6]`: `{0=origin, 1=EL+, -1=EL-, 2=not at origin}`. A busy
    /// axis (per `sdofState`) always reads as "not at origin" without a
    /// fresh `readEL` round-trip.
    pub fn lim_org_state(&self) -> [i8; 6] {
        let busy = self.inner.lock().unwrap().sdof_state;
        let mut out = [0i8; 6];
        let motion = self.proxies.motion();
        for axis in 0..6usize {
            if busy[axis] {
                out[axis] = 2;
            } else if let Some(motion) = &motion {
                if let Ok(raw) = motion.read_el(axis as u8) {
                    out[axis] = raw;
                }
            }
        }
        out
    }

    pub fn sdof_state(&self) -> [bool; 6] {
        self.inner.lock().unwrap().sdof_state
    }

    pub fn alarm_state(&self) -> String {
        self.inner.lock().unwrap().alarm_state.clone()
    }

    pub fn six_logs(&self) -> Vec<LogEntry> {
        self.inner.lock().unwrap().logs.iter().cloned().collect()
    }

    pub fn driver_power_status(&self) -> bool {
        self.inner.lock().unwrap().driver_power_on
    }

    pub fn brake_status(&self) -> bool {
        self.brake.is_engaged()
    }

    pub fn open_brake_state(&self) -> bool {
        !self.brake.is_engaged()
    }
}
