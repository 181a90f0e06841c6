//! Motion command layer (C4): pose moves, single-axis moves, stop,
//! move-zero, and reset. PVT trajectories live in [`crate::pvt`].

use crate::device::SixDofDevice;
use crate::kinematics::deltas_and_pulses;
use crate::safety::gating::Command;
use sixdof_common::error::DeviceError;
use sixdof_common::pose::{validate_pose, Pose};
use sixdof_common::state::{DeviceState, LatchedFault};
use std::f64::consts::PI;

impl SixDofDevice {
    /// `movePoseRelative`.
    pub fn move_pose_relative(&self, delta: Pose) -> Result<(), DeviceError> {
        self.admit(Command::MovePoseRelative)?;
        let current_pose = self.inner.lock().unwrap().six_freedom_pose;
        let target = current_pose.add(delta);
        self.execute_pose_move(target)
    }

    /// `movePoseAbsolute`.
    ///
    /// Rotations are multiplied by `180/π` before validation/IK — the
    /// documented angle-unit asymmetry is preserved verbatim.
    /// The controller call remains `moveRelative` with the computed delta
    /// pulses, per the reference behaviour.
    pub fn move_pose_absolute(&self, input: Pose) -> Result<(), DeviceError> {
        self.admit(Command::MovePoseAbsolute)?;
        let target = input.scale_rotations(180.0 / PI);
        self.execute_pose_move(target)
    }

    fn execute_pose_move(&self, target: Pose) -> Result<(), DeviceError> {
        if !validate_pose(target) {
            let msg = format!(
                "pose ({:.4},{:.4},{:.4},{:.4},{:.4},{:.4}) exceeds POS_LIMIT/ROT_LIMIT",
                target.x, target.y, target.z, target.rx, target.ry, target.rz
            );
            self.set_result(1);
            self.log(format!("pose move rejected: {msg}"));
            return Err(DeviceError::OutOfRange(msg));
        }

        let current_legs = self.inner.lock().unwrap().current_leg_lengths;
        let target_legs = self.kinematics.ik(target).inspect_err(|e| {
            self.set_result(1);
            self.log(format!("IK failed: {e}"));
        })?;
        let pulses_per_mm = self.sdof_config.pulses_per_mm();
        let (_, pulses) = deltas_and_pulses(target_legs, current_legs, pulses_per_mm);

        if !self.simulation_mode() {
            let Some(motion) = self.proxies.motion() else {
                self.set_result(1);
                return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
            };
            self.brake.release(motion.as_ref(), self.sdof_config.brake_power_port);
            for (axis, &p) in pulses.iter().enumerate() {
                if let Err(e) = motion.move_relative(axis as u8, p) {
                    self.log(format!("moveRelative axis {axis} failed: {e}"));
                }
            }
        }

        {
            let mut inner = self.inner.lock().unwrap();
            inner.current_leg_lengths = target_legs;
            inner.six_freedom_pose = target;
            inner.sdof_state = [true; 6];
            inner.state = DeviceState::Moving;
        }
        self.set_result(0);
        Ok(())
    }

    /// `singleMoveRelative([axis, distance])` — bypasses IK; the device
    /// forwards `distance` unchanged, the caller owns the mm→pulse
    /// conversion for this path.
    pub fn single_move_relative(&self, axis: u8, distance: f64) -> Result<(), DeviceError> {
        self.admit(Command::SingleMoveRelative)?;
        self.single_axis_move(axis, distance, true)
    }

    /// `singleMoveAbsolute([axis, position])`.
    pub fn single_move_absolute(&self, axis: u8, position: f64) -> Result<(), DeviceError> {
        self.admit(Command::SingleMoveAbsolute)?;
        self.single_axis_move(axis, position, false)
    }

    fn single_axis_move(&self, axis: u8, value: f64, relative: bool) -> Result<(), DeviceError> {
        if axis >= 6 {
            self.set_result(1);
            return Err(DeviceError::InvalidArgument(format!("axis {axis} out of 0..6")));
        }

        if !self.simulation_mode() {
            let Some(motion) = self.proxies.motion() else {
                self.set_result(1);
                return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
            };
            self.brake.release(motion.as_ref(), self.sdof_config.brake_power_port);
            let pulses = value.round() as i64;
            let result =
                if relative { motion.move_relative(axis, pulses) } else { motion.move_absolute(axis, pulses) };
            if let Err(e) = result {
                self.set_result(1);
                return Err(DeviceError::ProxyError(e.to_string()));
            }
        }

        let mut inner = self.inner.lock().unwrap();
        inner.sdof_state[axis as usize] = true;
        inner.state = DeviceState::Moving;
        drop(inner);
        self.set_result(0);
        Ok(())
    }

    /// `stop`. Best-effort on every axis; never engages the brake.
    pub fn stop(&self) -> Result<(), DeviceError> {
        self.admit(Command::Stop)?;
        if let Some(motion) = self.proxies.motion() {
            for axis in 0..6u8 {
                if let Err(e) = motion.stop_move(axis) {
                    self.log(format!("stopMove axis {axis} failed: {e}"));
                }
            }
        }
        let mut inner = self.inner.lock().unwrap();
        inner.sdof_state = [false; 6];
        if !inner.latched_fault.latched {
            inner.state = DeviceState::On;
        }
        drop(inner);
        self.set_result(0);
        Ok(())
    }

    /// `sixMoveZero`. Rejects outright if a limit fault is latched.
    pub fn six_move_zero(&self) -> Result<(), DeviceError> {
        self.admit(Command::SixMoveZero)?;
        if self.inner.lock().unwrap().latched_fault.latched {
            self.set_result(1);
            return Err(DeviceError::LimitFaultLatched(
                "sixMoveZero blocked: limit fault latched".into(),
            ));
        }
        if !self.simulation_mode() {
            if let Some(motion) = self.proxies.motion() {
                for axis in 0..6u8 {
                    if let Err(e) = motion.move_zero(axis) {
                        self.log(format!("moveZero axis {axis} failed: {e}"));
                    }
                }
            }
        }
        self.set_result(0);
        Ok(())
    }

    /// `reset`: engages the brake defensively first, resets
    /// every axis, then clears the latched fault triple.
    pub fn reset(&self) -> Result<(), DeviceError> {
        self.admit(Command::Reset)?;
        if let Some(motion) = self.proxies.motion() {
            self.brake.engage(motion.as_ref(), self.sdof_config.brake_power_port);
            for axis in 0..6u8 {
                if let Err(e) = motion.reset(axis) {
                    self.log(format!("reset axis {axis} failed: {e}"));
                }
            }
        }
        let mut inner = self.inner.lock().unwrap();
        inner.latched_fault = LatchedFault::clear();
        inner.alarm_state.clear();
        inner.state = DeviceState::On;
        drop(inner);
        self.set_result(0);
        self.log("reset: latched fault cleared");
        Ok(())
    }

    /// `singleReset(axis)` — also clears the latched fault triple if it was
    /// set.
    pub fn single_reset(&self, axis: u8) -> Result<(), DeviceError> {
        self.admit(Command::SingleReset)?;
        if axis >= 6 {
            self.set_result(1);
            return Err(DeviceError::InvalidArgument(format!("axis {axis} out of 0..6")));
        }
        if let Some(motion) = self.proxies.motion() {
            if let Err(e) = motion.reset(axis) {
                self.log(format!("reset axis {axis} failed: {e}"));
            }
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.latched_fault.latched {
            inner.latched_fault = LatchedFault::clear();
            inner.alarm_state.clear();
            inner.state = DeviceState::On;
        }
        drop(inner);
        self.set_result(0);
        Ok(())
    }

    /// `releaseBrake` / `openBrake`.
    pub fn release_brake(&self) -> Result<(), DeviceError> {
        self.admit(Command::OpenBrake)?;
        let Some(motion) = self.proxies.motion() else {
            self.set_result(1);
            return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
        };
        if self.brake.release(motion.as_ref(), self.sdof_config.brake_power_port) {
            self.set_result(0);
            Ok(())
        } else {
            self.set_result(1);
            Err(DeviceError::PowerControlError("brake release failed".into()))
        }
    }

    /// `moveAxisSet([axis, startSpeed, maxSpeed, accTime, decTime,
    /// stopSpeed])`.
    #[allow(clippy::too_many_arguments)]
    pub fn move_axis_set(
        &self,
        axis: u8,
        start_speed: f64,
        max_speed: f64,
        acc_time: f64,
        dec_time: f64,
        stop_speed: f64,
    ) -> Result<(), DeviceError> {
        self.admit(Command::MoveAxisSet)?;
        if axis >= 6 {
            self.set_result(1);
            return Err(DeviceError::InvalidArgument(format!("axis {axis} out of 0..6")));
        }
        if !self.simulation_mode() {
            let Some(motion) = self.proxies.motion() else {
                self.set_result(1);
                return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
            };
            motion
                .set_move_parameter(axis, start_speed, max_speed, acc_time, dec_time, stop_speed)
                .map_err(|e| {
                    self.set_result(1);
                    DeviceError::from(e)
                })?;
        }
        self.set_result(0);
        Ok(())
    }

    /// `structAxisSet([axis, stepAngle, gearRatio, subdivision])`.
    pub fn struct_axis_set(
        &self,
        axis: u8,
        step_angle: f64,
        gear_ratio: f64,
        subdivision: u32,
    ) -> Result<(), DeviceError> {
        self.admit(Command::StructAxisSet)?;
        if axis >= 6 {
            self.set_result(1);
            return Err(DeviceError::InvalidArgument(format!("axis {axis} out of 0..6")));
        }
        if !self.simulation_mode() {
            let Some(motion) = self.proxies.motion() else {
                self.set_result(1);
                return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
            };
            motion.set_struct_parameter(axis, step_angle, gear_ratio, subdivision).map_err(|e| {
                self.set_result(1);
                DeviceError::from(e)
            })?;
        }
        self.set_result(0);
        Ok(())
    }

    /// `disableDriverPower`.
    pub fn disable_driver_power(&self) -> Result<(), DeviceError> {
        self.admit(Command::DisableDriverPower)?;
        let Some(motion) = self.proxies.motion() else {
            self.set_result(1);
            return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
        };
        self.brake.engage(motion.as_ref(), self.sdof_config.brake_power_port);
        if self.sdof_config.has_driver_power_port() {
            if let Err(e) = motion.write_io(self.sdof_config.driver_power_port, 0) {
                self.set_result(1);
                return Err(DeviceError::PowerControlError(e.to_string()));
            }
        }
        self.inner.lock().unwrap().driver_power_on = false;
        self.set_result(0);
        Ok(())
    }
}
