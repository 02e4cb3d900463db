// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the input core.
//!
//! None of these errors is fatal. Dispatch entry points log them and report
//! the event as not consumed so the host can pass it elsewhere; setup entry
//! points return them and leave state unchanged.

use std::fmt;

use crate::layout::Panel;
use crate::surface::SurfaceRole;

/// Result type for input core operations.
pub type GlassResult<T> = Result<T, GlassError>;

/// Errors that can occur in the input core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlassError {
    /// A required surface is missing or has no viewport.
    InvalidSurface {
        /// Which surface was being set up or used.
        role: SurfaceRole,
    },

    /// A change was reported for a panel the modifier driver does not handle.
    UnsupportedPanel {
        /// The reported panel.
        panel: Panel,
    },

    /// A pointer event arrived while no layout is tracked.
    NoActiveLayout,
}

impl fmt::Display for GlassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlassError::InvalidSurface { role } => {
                write!(f, "No usable {} surface: a viewport is required", role)
            }
            GlassError::UnsupportedPanel { panel } => write!(
                f,
                "Can only handle the center panel at the moment, got: {}",
                panel
            ),
            GlassError::NoActiveLayout => write!(f, "No layout is tracked, event not consumed"),
        }
    }
}

impl std::error::Error for GlassError {}

// ============================================================================
// Tests
// ============================================================================
