//! Downstream RPC capability traits.
//!
//! The core depends on a uniform `{ping, command_inout, read_attribute}`
//! capability set plus the named commands below; any concrete transport
//! that honours this contract is acceptable. The traits are object-safe so the device can hold
//! `Arc<dyn MotionProxy>` / `Arc<dyn EncoderProxy>` handles behind a mutex
//!.
//!
//! Timeouts are passed explicitly rather than baked into the trait: the
//! monitor uses [`crate::consts::PROXY_PING_TIMEOUT_MS`] for `ping` and
//! [`crate::consts::PROXY_CONNECT_TIMEOUT_MS`] is the budget a concrete
//! `connect`/rebuild implementation is expected to honour internally.

use crate::error::ProxyError;
use std::time::Duration;

/// Capability set exposed by the low-level motion controller.
///
/// Axes are addressed `0..6`. Pulses are signed; millimetre quantities are
/// signed reals.
pub trait MotionProxy: Send + Sync {
    /// Liveness check with an explicit timeout budget.
    fn ping(&self, timeout: Duration) -> Result<(), ProxyError>;

    /// The controller-reported core state, mirrored into the device state
    /// by the periodic hook when nothing else fires.
    fn state(&self) -> Result<String, ProxyError>;

    fn move_relative(&self, axis: u8, pulses: i64) -> Result<(), ProxyError>;
    fn move_absolute(&self, axis: u8, pulses: i64) -> Result<(), ProxyError>;
    fn stop_move(&self, axis: u8) -> Result<(), ProxyError>;
    fn reset(&self, axis: u8) -> Result<(), ProxyError>;
    fn move_zero(&self, axis: u8) -> Result<(), ProxyError>;

    /// Reads the hardware limit-switch state for one axis: `{-1, 0, 1}`.
    fn read_el(&self, axis: u8) -> Result<i8, ProxyError>;

    fn read_encoder(&self, channel: u8) -> Result<f64, ProxyError>;
    fn set_encoder_position(&self, axis: u8, mm: f64) -> Result<(), ProxyError>;

    fn set_struct_parameter(
        &self,
        axis: u8,
        step_angle: f64,
        gear_ratio: f64,
        subdivision: u32,
    ) -> Result<(), ProxyError>;

    #[allow(clippy::too_many_arguments)]
    fn set_move_parameter(
        &self,
        axis: u8,
        start_speed: f64,
        max_speed: f64,
        acc_time: f64,
        dec_time: f64,
        stop_speed: f64,
    ) -> Result<(), ProxyError>;

    /// Active-low at the physical layer; the device always writes the
    /// *logical* value (1 = on, 0 = off) — the motion-controller layer
    /// performs the inversion.
    fn write_io(&self, port: i32, logical_value: u8) -> Result<(), ProxyError>;

    fn set_pvts(&self, json: &str) -> Result<(), ProxyError>;
    fn move_pvts(&self, axes_json: &str) -> Result<(), ProxyError>;
}

/// Capability set exposed by the absolute encoder acquisition service.
pub trait EncoderProxy: Send + Sync {
    fn ping(&self, timeout: Duration) -> Result<(), ProxyError>;
    fn read_encoder(&self, channel: u8) -> Result<f64, ProxyError>;
}
