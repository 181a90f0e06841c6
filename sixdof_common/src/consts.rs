//! System-wide constants for the Stewart-platform core.
//!
//! Single source of truth for all numeric limits and defaults. Imported by
//! both `sixdof_common` and `sixdof_device` — no duplication permitted.

/// Number of stepper axes / legs on the platform.
pub const AXIS_COUNT: usize = 6;

/// Maximum absolute translation along any of x/y/z [mm].
pub const POS_LIMIT: f64 = 17.0;

/// Maximum absolute rotation about any of rx/ry/rz [deg].
pub const ROT_LIMIT: f64 = 4.0;

/// Decimal places leg-length quantities are rounded to before use or storage.
pub const LEG_LENGTH_DECIMALS: i32 = 4;

/// Default leg-length-delta-to-pulses conversion factor [pulses/mm].
///
/// Derived from `motor_step_angle`, `motor_subdivision` and `motor_gear_ratio`
/// at device construction; this is the value produced by the documented
/// defaults (1.8°, 12800, 1.0) and is used only when those defaults hold.
pub const DEFAULT_PULSES_PER_MM: f64 = 29_793.103;

/// Default motor step angle [deg].
pub const DEFAULT_MOTOR_STEP_ANGLE: f64 = 1.8;

/// Default motor gear ratio.
pub const DEFAULT_MOTOR_GEAR_RATIO: f64 = 1.0;

/// Default motor driver subdivision (microstepping).
pub const DEFAULT_MOTOR_SUBDIVISION: u32 = 12800;

/// Sentinel meaning "no digital-output port configured".
pub const PORT_ABSENT: i32 = -1;

/// Proxy ping timeout [ms] used by the monitor's health check.
pub const PROXY_PING_TIMEOUT_MS: u64 = 300;

/// Proxy connect timeout [ms] used when (re)building a dropped proxy.
pub const PROXY_CONNECT_TIMEOUT_MS: u64 = 500;

/// Monitor loop cadence [ms].
pub const MONITOR_CYCLE_MS: u64 = 500;

/// Default cooldown between reconnect attempts [s] (overridable via system config).
pub const DEFAULT_PROXY_RECONNECT_INTERVAL_SEC: u64 = 10;

/// Maximum number of restore-action retries before giving up.
pub const MAX_RESTORE_RETRIES: u8 = 3;

static_assertions::const_assert!(AXIS_COUNT == 6);
static_assertions::const_assert!(POS_LIMIT > 0.0);
static_assertions::const_assert!(ROT_LIMIT > 0.0);
static_assertions::const_assert!(MAX_RESTORE_RETRIES > 0);
