//! Per-command gating matrix.
//!
//! A static table maps each command to a four-tuple `(allow_UNKNOWN,
//! allow_OFF, allow_ON_or_MOVING, allow_FAULT)`. `Moving` gates exactly like
//! `On` (`DeviceState::is_on_like`).

use sixdof_common::error::DeviceError;
use sixdof_common::state::DeviceState;

/// Every command the device exposes at its upstream boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    DevLockVerify,
    DevLockQuery,
    DevUserConfig,
    DevLock,
    DevUnlock,
    SelfCheck,
    Init,
    MoveAxisSet,
    StructAxisSet,
    ReleaseBrake,
    DisableDriverPower,
    MovePoseAbsolute,
    MovePoseRelative,
    SingleMoveAbsolute,
    SingleMoveRelative,
    MovePvt,
    OpenBrake,
    Reset,
    SixMoveZero,
    SingleReset,
    Stop,
    ReadEncoder,
    ReadOrg,
    ReadEl,
    ReadAxis,
    ExportAxis,
}

impl Command {
    /// The four-tuple gate for this command: `(UNKNOWN, OFF, ON/MOVING, FAULT)`.
    const fn gate(self) -> (bool, bool, bool, bool) {
        use Command::*;
        match self {
            DevLockVerify | DevLockQuery | DevUserConfig => (true, true, true, true),
            DevLock | DevUnlock | SelfCheck | Init => (true, true, false, true),
            MoveAxisSet | StructAxisSet | ReleaseBrake | DisableDriverPower => {
                (false, true, true, true)
            }
            MovePoseAbsolute | MovePoseRelative | SingleMoveAbsolute | SingleMoveRelative
            | MovePvt | OpenBrake => (false, false, true, false),
            Reset | SixMoveZero | SingleReset | Stop | ReadEncoder | ReadOrg | ReadEl
            | ReadAxis | ExportAxis => (false, true, true, true),
        }
    }

    /// Command name as it appears in error text.
    pub const fn name(self) -> &'static str {
        use Command::*;
        match self {
            DevLockVerify => "devLockVerify",
            DevLockQuery => "devLockQuery",
            DevUserConfig => "devUserConfig",
            DevLock => "devLock",
            DevUnlock => "devUnlock",
            SelfCheck => "selfCheck",
            Init => "init",
            MoveAxisSet => "moveAxisSet",
            StructAxisSet => "structAxisSet",
            ReleaseBrake => "releaseBrake",
            DisableDriverPower => "disableDriverPower",
            MovePoseAbsolute => "movePoseAbsolute",
            MovePoseRelative => "movePoseRelative",
            SingleMoveAbsolute => "singleMoveAbsolute",
            SingleMoveRelative => "singleMoveRelative",
            MovePvt => "movePvt",
            OpenBrake => "openBrake",
            Reset => "reset",
            SixMoveZero => "sixMoveZero",
            SingleReset => "singleReset",
            Stop => "stop",
            ReadEncoder => "readEncoder",
            ReadOrg => "readOrg",
            ReadEl => "readEL",
            ReadAxis => "readtAxis",
            ExportAxis => "exportAxis",
        }
    }

    fn allows(self, state: DeviceState) -> bool {
        let (unk, off, on, fault) = self.gate();
        match state {
            DeviceState::Unknown => unk,
            DeviceState::Off => off,
            DeviceState::On | DeviceState::Moving => on,
            DeviceState::Fault => fault,
        }
    }
}

/// Check whether `command` is admitted in `state`.
///
/// Returns a typed `StateViolation` error with no side effect when the gate
/// denies the command; admission is always observed before any hardware
/// effect.
pub fn check_gate(command: Command, state: DeviceState) -> Result<(), DeviceError> {
    if command.allows(state) {
        Ok(())
    } else {
        Err(DeviceError::StateViolation {
            command: command.name().to_string(),
            state: state.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_commands_allowed_in_every_state() {
        for state in [
            DeviceState::Unknown,
            DeviceState::Off,
            DeviceState::On,
            DeviceState::Moving,
            DeviceState::Fault,
        ] {
            assert!(check_gate(Command::DevLockVerify, state).is_ok());
            assert!(check_gate(Command::DevUserConfig, state).is_ok());
        }
    }

    #[test]
    fn motion_commands_only_allowed_on() {
        assert!(check_gate(Command::MovePoseAbsolute, DeviceState::On).is_ok());
        assert!(check_gate(Command::MovePoseRelative, DeviceState::Moving).is_ok());
        for state in [DeviceState::Unknown, DeviceState::Off, DeviceState::Fault] {
            assert!(check_gate(Command::MovePoseAbsolute, state).is_err());
        }
    }

    #[test]
    fn state_violation_message_names_command_and_state() {
        let err = check_gate(Command::MovePoseAbsolute, DeviceState::Off).unwrap_err();
        assert_eq!(
            err.to_string(),
            "API_StateViolation: State violation: movePoseAbsolute blocked: OFF"
        );
    }

    #[test]
    fn init_and_self_check_blocked_while_on() {
        assert!(check_gate(Command::Init, DeviceState::On).is_err());
        assert!(check_gate(Command::SelfCheck, DeviceState::Moving).is_err());
        assert!(check_gate(Command::Init, DeviceState::Off).is_ok());
    }

    #[test]
    fn reset_family_blocked_only_in_unknown() {
        for cmd in [Command::Reset, Command::SixMoveZero, Command::Stop, Command::SingleReset] {
            assert!(check_gate(cmd, DeviceState::Unknown).is_err());
            assert!(check_gate(cmd, DeviceState::Off).is_ok());
            assert!(check_gate(cmd, DeviceState::On).is_ok());
            assert!(check_gate(cmd, DeviceState::Fault).is_ok());
        }
    }

    #[test]
    fn moving_gates_identically_to_on() {
        for cmd in [Command::MovePoseRelative, Command::MoveAxisSet, Command::Stop] {
            assert_eq!(
                check_gate(cmd, DeviceState::On).is_ok(),
                check_gate(cmd, DeviceState::Moving).is_ok()
            );
        }
    }
}
