// SPDX-License-Identifier: GPL-3.0-only

//! Centralized input core settings and constants.

/// Window after a press in which swipe and dismiss gestures are recognized, in milliseconds.
pub const GESTURE_WINDOW_MS: u64 = 250;

/// Long press detection threshold in milliseconds.
///
/// A key with extended keys that stays entered for this long reveals its
/// extended panel.
pub const LONG_PRESS_THRESHOLD_MS: u64 = 300;

/// Horizontal travel, as a fraction of the active key area width, that makes a swipe.
pub const SWIPE_RATIO: f32 = 0.33;

/// Vertical tolerance, as a fraction of the active key area height, for a swipe.
pub const SWIPE_TOLERANCE_RATIO: f32 = 0.33;

/// Downward travel, as a fraction of the active key area height, that dismisses the keyboard.
pub const DISMISS_RATIO: f32 = 0.50;

/// Number of processed pointer events per FPS measurement sample.
pub const FPS_SAMPLE_SIZE: u32 = 120;

/// Default log directive installed by the replay tool.
pub const DEFAULT_LOG_DIRECTIVE: &str = "cosboard_glass=info";
