//! Device lifecycle state and the latched limit-fault triple.

use serde::{Deserialize, Serialize};

/// The instrument-standard device lifecycle state.
///
/// `Moving` is gated as a subtype of `On` — every gate-matrix row that
/// allows `On` also allows `Moving` (see [`crate::state::DeviceState::is_on_like`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceState {
    Unknown = 0,
    Off = 1,
    On = 2,
    Moving = 3,
    Fault = 4,
}

impl DeviceState {
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unknown),
            1 => Some(Self::Off),
            2 => Some(Self::On),
            3 => Some(Self::Moving),
            4 => Some(Self::Fault),
            _ => None,
        }
    }

    /// True for `On` and `Moving` — the gate matrix's "ON" column covers both.
    pub const fn is_on_like(self) -> bool {
        matches!(self, Self::On | Self::Moving)
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "UNKNOWN",
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Moving => "MOVING",
            Self::Fault => "FAULT",
        };
        f.write_str(s)
    }
}

/// Hardware limit-switch reading for a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i8)]
pub enum LimitState {
    /// Physical positive limit switch (`EL+`) triggered.
    Positive = 1,
    /// At the origin / home position.
    AtOrigin = 0,
    /// Physical negative limit switch (`EL-`) triggered.
    Negative = -1,
    /// Neither at origin nor at a limit.
    NotAtOrigin = 2,
}

impl LimitState {
    /// Map the raw `readEL` return value (`{-1, 0, 1}`) to a limit state.
    ///
    /// `readEL` never itself returns `NotAtOrigin` (2) — that value is
    /// reserved for `limOrgState` reporting when the axis is simply mid-travel.
    pub const fn from_el(raw: i8) -> Self {
        match raw {
            1 => Self::Positive,
            -1 => Self::Negative,
            _ => Self::AtOrigin,
        }
    }

    pub const fn is_triggered(self) -> bool {
        matches!(self, Self::Positive | Self::Negative)
    }

    /// Human-readable tag used in the latched-fault alarm text.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Positive => "EL+",
            Self::Negative => "EL-",
            Self::AtOrigin => "ORIGIN",
            Self::NotAtOrigin => "NOT_AT_ORIGIN",
        }
    }
}

/// The latched limit-fault triple: held together so the three fields
/// are always set, read, and cleared as one unit at the call sites that
/// matter, even though the individual fields are plain atomics at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatchedFault {
    pub latched: bool,
    /// Offending axis index, `0..6`, or `-1` if not latched.
    pub axis: i8,
    pub el_state: LimitStateSigned,
}

/// `+1` / `-1` / `0` form of [`LimitState`] as stored in the latched triple.
pub type LimitStateSigned = i8;

impl LatchedFault {
    pub const fn clear() -> Self {
        Self { latched: false, axis: -1, el_state: 0 }
    }

    /// Latch a fault for the given axis and limit direction.
    ///
    /// No-op if already latched — the first trigger wins.
    pub fn latch(&mut self, axis: u8, el_state: LimitState) {
        if self.latched {
            return;
        }
        self.latched = true;
        self.axis = axis as i8;
        self.el_state = match el_state {
            LimitState::Positive => 1,
            LimitState::Negative => -1,
            _ => 0,
        };
    }

    /// Build the documented alarm text for a freshly-latched fault.
    pub fn alarm_text(&self) -> String {
        let dir = match self.el_state {
            1 => "EL+",
            -1 => "EL-",
            _ => "?",
        };
        format!("Limit switch triggered: axis {} ({})", self.axis, dir)
    }
}
