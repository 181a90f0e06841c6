//! In-memory simulation proxy pair.
//!
//! Used both for genuine simulation-mode operation (never touches
//! hardware, echoes commanded values back) and as the deterministic test
//! harness double for the rest of this crate. Every call succeeds; nothing
//! here performs I/O.

use sixdof_common::error::ProxyError;
use sixdof_common::proxy::{EncoderProxy, MotionProxy};
use std::sync::Mutex;
use std::time::Duration;

/// Simulated motion-controller proxy.
///
/// Tracks per-axis logical position (as if pulses accumulated 1:1) and an
/// independently settable limit-switch override so tests can inject a
/// latched-fault trigger without a real controller.
pub struct SimMotionProxy {
    position_pulses: Mutex<[i64; 6]>,
    encoder_mm: Mutex<[f64; 6]>,
    el_override: Mutex<[i8; 6]>,
    io_writes: Mutex<Vec<(i32, u8)>>,
    move_relative_calls: Mutex<Vec<(u8, i64)>>,
}

impl Default for SimMotionProxy {
    fn default() -> Self {
        Self {
            position_pulses: Mutex::new([0; 6]),
            encoder_mm: Mutex::new([0.0; 6]),
            el_override: Mutex::new([0; 6]),
            io_writes: Mutex::new(Vec::new()),
            move_relative_calls: Mutex::new(Vec::new()),
        }
    }
}

impl SimMotionProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: simulate a physical limit switch firing on `axis`.
    pub fn set_limit_switch(&self, axis: usize, value: i8) {
        self.el_override.lock().unwrap()[axis] = value;
    }

    pub fn io_writes(&self) -> Vec<(i32, u8)> {
        self.io_writes.lock().unwrap().clone()
    }

    pub fn position_pulses(&self) -> [i64; 6] {
        *self.position_pulses.lock().unwrap()
    }

    /// Test hook: every `(axis, pulses)` pair passed to `move_relative`, in call order.
    pub fn move_relative_calls(&self) -> Vec<(u8, i64)> {
        self.move_relative_calls.lock().unwrap().clone()
    }
}

impl MotionProxy for SimMotionProxy {
    fn ping(&self, _timeout: Duration) -> Result<(), ProxyError> {
        Ok(())
    }

    fn state(&self) -> Result<String, ProxyError> {
        Ok("ON".to_string())
    }

    fn move_relative(&self, axis: u8, pulses: i64) -> Result<(), ProxyError> {
        self.position_pulses.lock().unwrap()[axis as usize] += pulses;
        self.move_relative_calls.lock().unwrap().push((axis, pulses));
        Ok(())
    }

    fn move_absolute(&self, axis: u8, pulses: i64) -> Result<(), ProxyError> {
        self.position_pulses.lock().unwrap()[axis as usize] = pulses;
        Ok(())
    }

    fn stop_move(&self, _axis: u8) -> Result<(), ProxyError> {
        Ok(())
    }

    fn reset(&self, axis: u8) -> Result<(), ProxyError> {
        self.el_override.lock().unwrap()[axis as usize] = 0;
        Ok(())
    }

    fn move_zero(&self, axis: u8) -> Result<(), ProxyError> {
        self.position_pulses.lock().unwrap()[axis as usize] = 0;
        Ok(())
    }

    fn read_el(&self, axis: u8) -> Result<i8, ProxyError> {
        Ok(self.el_override.lock().unwrap()[axis as usize])
    }

    fn read_encoder(&self, channel: u8) -> Result<f64, ProxyError> {
        Ok(self.encoder_mm.lock().unwrap()[channel as usize])
    }

    fn set_encoder_position(&self, axis: u8, mm: f64) -> Result<(), ProxyError> {
        self.encoder_mm.lock().unwrap()[axis as usize] = mm;
        Ok(())
    }

    fn set_struct_parameter(
        &self,
        _axis: u8,
        _step_angle: f64,
        _gear_ratio: f64,
        _subdivision: u32,
    ) -> Result<(), ProxyError> {
        Ok(())
    }

    fn set_move_parameter(
        &self,
        _axis: u8,
        _start_speed: f64,
        _max_speed: f64,
        _acc_time: f64,
        _dec_time: f64,
        _stop_speed: f64,
    ) -> Result<(), ProxyError> {
        Ok(())
    }

    fn write_io(&self, port: i32, logical_value: u8) -> Result<(), ProxyError> {
        self.io_writes.lock().unwrap().push((port, logical_value));
        Ok(())
    }

    fn set_pvts(&self, _json: &str) -> Result<(), ProxyError> {
        Ok(())
    }

    fn move_pvts(&self, _axes_json: &str) -> Result<(), ProxyError> {
        Ok(())
    }
}

/// A motion proxy that wraps [`SimMotionProxy`] but can be toggled to fail
/// every call, for driving the proxy-supervisor's drop/rebuild path from outside the crate.
pub struct FlakyMotionProxy {
    inner: SimMotionProxy,
    failing: std::sync::atomic::AtomicBool,
}

impl Default for FlakyMotionProxy {
    fn default() -> Self {
        Self { inner: SimMotionProxy::new(), failing: std::sync::atomic::AtomicBool::new(false) }
    }
}

impl FlakyMotionProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::Relaxed);
    }

    fn is_failing(&self) -> bool {
        self.failing.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl MotionProxy for FlakyMotionProxy {
    fn ping(&self, timeout: Duration) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::Timeout(timeout));
        }
        self.inner.ping(timeout)
    }

    fn state(&self) -> Result<String, ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.state()
    }

    fn move_relative(&self, axis: u8, pulses: i64) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.move_relative(axis, pulses)
    }

    fn move_absolute(&self, axis: u8, pulses: i64) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.move_absolute(axis, pulses)
    }

    fn stop_move(&self, axis: u8) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.stop_move(axis)
    }

    fn reset(&self, axis: u8) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.reset(axis)
    }

    fn move_zero(&self, axis: u8) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.move_zero(axis)
    }

    fn read_el(&self, axis: u8) -> Result<i8, ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.read_el(axis)
    }

    fn read_encoder(&self, channel: u8) -> Result<f64, ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.read_encoder(channel)
    }

    fn set_encoder_position(&self, axis: u8, mm: f64) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.set_encoder_position(axis, mm)
    }

    fn set_struct_parameter(
        &self,
        axis: u8,
        step_angle: f64,
        gear_ratio: f64,
        subdivision: u32,
    ) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.set_struct_parameter(axis, step_angle, gear_ratio, subdivision)
    }

    fn set_move_parameter(
        &self,
        axis: u8,
        start_speed: f64,
        max_speed: f64,
        acc_time: f64,
        dec_time: f64,
        stop_speed: f64,
    ) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.set_move_parameter(axis, start_speed, max_speed, acc_time, dec_time, stop_speed)
    }

    fn write_io(&self, port: i32, logical_value: u8) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.write_io(port, logical_value)
    }

    fn set_pvts(&self, json: &str) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.set_pvts(json)
    }

    fn move_pvts(&self, axes_json: &str) -> Result<(), ProxyError> {
        if self.is_failing() {
            return Err(ProxyError::NotConnected);
        }
        self.inner.move_pvts(axes_json)
    }
}

/// Simulated encoder-acquisition proxy.
pub struct SimEncoderProxy {
    channels_mm: Mutex<[f64; 6]>,
}

impl Default for SimEncoderProxy {
    fn default() -> Self {
        Self { channels_mm: Mutex::new([0.0; 6]) }
    }
}

impl SimEncoderProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_channel(&self, channel: usize, mm: f64) {
        self.channels_mm.lock().unwrap()[channel] = mm;
    }
}

impl EncoderProxy for SimEncoderProxy {
    fn ping(&self, _timeout: Duration) -> Result<(), ProxyError> {
        Ok(())
    }

    fn read_encoder(&self, channel: u8) -> Result<f64, ProxyError> {
        Ok(self.channels_mm.lock().unwrap()[channel as usize])
    }
}
