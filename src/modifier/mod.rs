// SPDX-License-Identifier: GPL-3.0-only

//! Shift and caps-lock state for the keyboard.
//!
//! # Modules
//!
//! - **machine**: The four-state shift machine and its pure transition function.
//! - **updater**: Binds the machine to a layout and drives it from key events.
//!
//! # Example
//!
//! ```rust
//! use cosboard_glass::modifier::{ShiftSignal, ShiftState, ShiftStateMachine};
//!
//! let mut machine = ShiftStateMachine::new();
//! machine.start();
//!
//! machine.handle(ShiftSignal::ShiftPressed);
//! machine.handle(ShiftSignal::ShiftReleased);
//! assert_eq!(machine.state(), Some(ShiftState::LatchedShift));
//!
//! machine.handle(ShiftSignal::ShiftReleased);
//! assert_eq!(machine.state(), Some(ShiftState::CapsLock));
//! ```

pub mod machine;
pub mod updater;

pub use machine::{transition, Entered, LetterCase, ShiftSignal, ShiftState, ShiftStateMachine};
pub use updater::{KeyChangeReason, ShiftTracker};
