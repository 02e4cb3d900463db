// SPDX-License-Identifier: GPL-3.0-only

//! The shift / caps-lock state machine.
//!
//! Four states, driven only by named signals:
//!
//! | From           | Signal                | To             |
//! |----------------|-----------------------|----------------|
//! | `NoShift`      | `ShiftPressed`        | `Shift`        |
//! | `NoShift`      | `AutoCapsActivated`   | `LatchedShift` |
//! | `Shift`        | `ShiftCancelled`      | `NoShift`      |
//! | `Shift`        | `ShiftReleased`       | `LatchedShift` |
//! | `LatchedShift` | `ShiftCancelled`      | `NoShift`      |
//! | `LatchedShift` | `ShiftReleased`       | `CapsLock`     |
//! | `CapsLock`     | `ShiftReleased`       | `NoShift`      |
//!
//! Any other signal leaves the state unchanged. Entering a state applies its
//! case exactly once: lower case for `NoShift`, upper case for the others.
//!
//! The machine has a two-phase lifecycle. [`ShiftStateMachine::new`] builds it
//! without side effects; [`ShiftStateMachine::start`] enters the initial state
//! and reports its case. Signals delivered before `start` are ignored.

use serde::{Deserialize, Serialize};

/// A shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftState {
    /// Lower case.
    #[default]
    NoShift,
    /// Shift is held down.
    Shift,
    /// Upper case for the next key.
    LatchedShift,
    /// Upper case until shift is released again.
    CapsLock,
}

/// A signal driving the shift state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSignal {
    /// The shift key went down.
    ShiftPressed,
    /// The shift key was released.
    ShiftReleased,
    /// Shift was cancelled by another key.
    ShiftCancelled,
    /// Auto-capitalization asked for an upper case letter.
    AutoCapsActivated,
}

/// The case keys should be drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterCase {
    Lower,
    Upper,
}

impl ShiftState {
    /// The case applied on entering this state.
    pub fn entry_case(self) -> LetterCase {
        match self {
            ShiftState::NoShift => LetterCase::Lower,
            ShiftState::Shift | ShiftState::LatchedShift | ShiftState::CapsLock => LetterCase::Upper,
        }
    }
}

/// Computes the state reached from `current` on `signal`.
///
/// Returns `None` when the signal has no transition from `current`.
pub fn transition(current: ShiftState, signal: ShiftSignal) -> Option<ShiftState> {
    use ShiftSignal::*;
    use ShiftState::*;

    match (current, signal) {
        (NoShift, ShiftPressed) => Some(Shift),
        (NoShift, AutoCapsActivated) => Some(LatchedShift),
        (Shift, ShiftCancelled) => Some(NoShift),
        (Shift, ShiftReleased) => Some(LatchedShift),
        (LatchedShift, ShiftCancelled) => Some(NoShift),
        (LatchedShift, ShiftReleased) => Some(CapsLock),
        (CapsLock, ShiftReleased) => Some(NoShift),
        _ => None,
    }
}

/// A state change reported by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entered {
    /// The state that was entered.
    pub state: ShiftState,
    /// The case to apply.
    pub case: LetterCase,
}

impl Entered {
    fn new(state: ShiftState) -> Self {
        Self {
            state,
            case: state.entry_case(),
        }
    }
}

/// Runs the shift state machine for the lifetime of a keyboard session.
#[derive(Debug, Clone, Default)]
pub struct ShiftStateMachine {
    current: Option<ShiftState>,
}

impl ShiftStateMachine {
    /// Builds a machine that has not entered any state yet.
    #[must_use]
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Enters the initial state.
    ///
    /// Returns the entry to apply, or `None` if the machine was already started.
    pub fn start(&mut self) -> Option<Entered> {
        if self.current.is_some() {
            return None;
        }

        let initial = ShiftState::default();
        self.current = Some(initial);
        tracing::info!("Shift state machine started in {:?}", initial);
        Some(Entered::new(initial))
    }

    /// Returns `true` once [`ShiftStateMachine::start`] has run.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the current state, or `None` before the machine is started.
    pub fn state(&self) -> Option<ShiftState> {
        self.current
    }

    /// Returns `true` if the machine is currently in `state`.
    pub fn is_in(&self, state: ShiftState) -> bool {
        self.current == Some(state)
    }

    /// Delivers `signal`.
    ///
    /// Returns the entered state, or `None` if the machine is not running or
    /// the signal has no transition from the current state.
    pub fn handle(&mut self, signal: ShiftSignal) -> Option<Entered> {
        let Some(current) = self.current else {
            tracing::debug!("Ignoring {:?}: shift state machine not started", signal);
            return None;
        };

        let next = transition(current, signal)?;
        tracing::debug!("Shift state {:?} -> {:?} on {:?}", current, next, signal);
        self.current = Some(next);
        Some(Entered::new(next))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> ShiftStateMachine {
        let mut machine = ShiftStateMachine::new();
        machine.start();
        machine
    }

    // ========================================================================
    // Transition table
    // ========================================================================

    #[test]
    fn test_transition_table() {
        use ShiftSignal::*;
        use ShiftState::*;

        let table = [
            (NoShift, ShiftPressed, LatchedShift, false),
            (NoShift, ShiftPressed, Shift, true),
            (NoShift, AutoCapsActivated, LatchedShift, true),
            (Shift, ShiftCancelled, NoShift, true),
            (Shift, ShiftReleased, LatchedShift, true),
            (LatchedShift, ShiftCancelled, NoShift, true),
            (LatchedShift, ShiftReleased, CapsLock, true),
            (CapsLock, ShiftReleased, NoShift, true),
        ];

        for (from, signal, to, expected) in table {
            assert_eq!(
                transition(from, signal) == Some(to),
                expected,
                "{:?} --{:?}--> {:?}",
                from,
                signal,
                to
            );
        }
    }

    #[test]
    fn test_signals_without_transition_are_ignored() {
        use ShiftSignal::*;
        use ShiftState::*;

        assert_eq!(transition(NoShift, ShiftReleased), None);
        assert_eq!(transition(NoShift, ShiftCancelled), None);
        assert_eq!(transition(Shift, ShiftPressed), None);
        assert_eq!(transition(LatchedShift, AutoCapsActivated), None);
        assert_eq!(transition(CapsLock, ShiftCancelled), None);
        assert_eq!(transition(CapsLock, ShiftPressed), None);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn test_start_enters_no_shift_once() {
        let mut machine = ShiftStateMachine::new();
        assert!(!machine.is_running());
        assert_eq!(machine.state(), None);

        let entered = machine.start().expect("first start should enter a state");
        assert_eq!(entered.state, ShiftState::NoShift);
        assert_eq!(entered.case, LetterCase::Lower);

        assert!(machine.start().is_none(), "Second start must not re-apply entry");
        assert!(machine.is_in(ShiftState::NoShift));
    }

    #[test]
    fn test_signals_before_start_are_ignored() {
        let mut machine = ShiftStateMachine::new();
        assert!(machine.handle(ShiftSignal::ShiftPressed).is_none());
        assert_eq!(machine.state(), None);
    }

    // ========================================================================
    // Sequences
    // ========================================================================

    /// [pressed, released, released] walks Shift, LatchedShift, CapsLock.
    #[test]
    fn test_shift_to_caps_lock_sequence() {
        let mut machine = started();

        let states: Vec<ShiftState> = [
            ShiftSignal::ShiftPressed,
            ShiftSignal::ShiftReleased,
            ShiftSignal::ShiftReleased,
        ]
        .into_iter()
        .filter_map(|signal| machine.handle(signal).map(|e| e.state))
        .collect();

        assert_eq!(
            states,
            vec![ShiftState::Shift, ShiftState::LatchedShift, ShiftState::CapsLock]
        );

        let entered = machine.handle(ShiftSignal::ShiftReleased).unwrap();
        assert_eq!(entered.state, ShiftState::NoShift);
        assert_eq!(entered.case, LetterCase::Lower);
    }

    #[test]
    fn test_cancel_returns_to_no_shift() {
        let mut machine = started();
        machine.handle(ShiftSignal::ShiftPressed);
        let entered = machine.handle(ShiftSignal::ShiftCancelled).unwrap();
        assert_eq!(entered.state, ShiftState::NoShift);

        machine.handle(ShiftSignal::ShiftPressed);
        machine.handle(ShiftSignal::ShiftReleased);
        assert!(machine.is_in(ShiftState::LatchedShift));
        let entered = machine.handle(ShiftSignal::ShiftCancelled).unwrap();
        assert_eq!(entered.state, ShiftState::NoShift);
    }

    #[test]
    fn test_auto_caps_latches() {
        let mut machine = started();
        let entered = machine.handle(ShiftSignal::AutoCapsActivated).unwrap();
        assert_eq!(entered.state, ShiftState::LatchedShift);
        assert_eq!(entered.case, LetterCase::Upper);
    }

    #[test]
    fn test_entry_cases() {
        assert_eq!(ShiftState::NoShift.entry_case(), LetterCase::Lower);
        assert_eq!(ShiftState::Shift.entry_case(), LetterCase::Upper);
        assert_eq!(ShiftState::LatchedShift.entry_case(), LetterCase::Upper);
        assert_eq!(ShiftState::CapsLock.entry_case(), LetterCase::Upper);
    }
}
