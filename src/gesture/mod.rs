// SPDX-License-Identifier: GPL-3.0-only

//! Pointer gesture interpretation.
//!
//! # Modules
//!
//! - **interpreter**: Turns press/move/release into key, candidate and gesture events.
//! - **active_keys**: The ordered, duplicate-free set of keys currently down.
//! - **timer**: Single-shot timers polled with an explicit clock.

pub mod active_keys;
pub mod interpreter;
pub mod timer;

pub use active_keys::ActiveKeys;
pub use interpreter::{classify_gesture, DispatchContext, Gesture, GestureInterpreter};
pub use timer::SingleShotTimer;
