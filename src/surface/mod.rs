// SPDX-License-Identifier: GPL-3.0-only

//! Surfaces that deliver pointer events, and coordinate translation between them.
//!
//! The input core never owns pixel buffers. It only needs to know, for each
//! surface, which viewport its pointer events arrive on and where its origin
//! sits in screen coordinates, so that a position reported by one surface can
//! be expressed in another's space.
//!
//! Two surfaces take part in a session:
//!
//! - the **primary** surface showing the keyboard, and
//! - the optional **extended** surface showing the long-press popup.
//!
//! # Modules
//!
//! - **translate**: Surface-to-surface and offset translation, and the per-panel
//!   choice between them.

pub mod translate;

pub use translate::{translate, translate_by_offset, SurfaceSet};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point;

/// Identifies the viewport a surface receives pointer events on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportId(pub u64);

/// Which of the two surfaces a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceRole {
    /// The keyboard surface.
    Primary,
    /// The long-press popup surface.
    Extended,
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceRole::Primary => f.write_str("primary"),
            SurfaceRole::Extended => f.write_str("extended"),
        }
    }
}

/// A surface provided by the host.
pub trait Surface: fmt::Debug {
    /// The viewport pointer events arrive on, or `None` if the surface has none yet.
    fn viewport(&self) -> Option<ViewportId>;

    /// Position of this surface's origin in screen coordinates.
    fn screen_origin(&self) -> Point;

    /// Maps `point`, expressed in `source`'s coordinates, into this surface's coordinates.
    fn translate_event_position(&self, point: Point, source: &dyn Surface) -> Point {
        translate(point, source.screen_origin(), self.screen_origin())
    }

    /// Routes all pointer events to this surface until released.
    fn grab_pointer(&mut self) {}

    /// Releases a pointer grab taken with [`Surface::grab_pointer`].
    fn release_pointer(&mut self) {}
}

/// A surface at a fixed screen position.
///
/// Suitable for hosts whose surfaces do not move during a session, and for
/// tests and replays.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSurface {
    viewport: Option<ViewportId>,
    origin: Point,
    grabbed: bool,
}

impl FixedSurface {
    /// Creates a surface receiving events on `viewport`, with its origin at `origin`.
    pub fn new(viewport: ViewportId, origin: Point) -> Self {
        Self {
            viewport: Some(viewport),
            origin,
            grabbed: false,
        }
    }

    /// Creates a surface that has no viewport yet.
    pub fn detached(origin: Point) -> Self {
        Self {
            viewport: None,
            origin,
            grabbed: false,
        }
    }

    /// Moves the surface's origin.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Returns `true` while the surface holds a pointer grab.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl Surface for FixedSurface {
    fn viewport(&self) -> Option<ViewportId> {
        self.viewport
    }

    fn screen_origin(&self) -> Point {
        self.origin
    }

    fn grab_pointer(&mut self) {
        self.grabbed = true;
    }

    fn release_pointer(&mut self) {
        self.grabbed = false;
    }
}

// ============================================================================
// Tests
// ============================================================================
