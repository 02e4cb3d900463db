// SPDX-License-Identifier: GPL-3.0-only

//! Coordinate translation between surfaces and panels.
//!
//! Pointer positions arrive in the coordinates of the surface that received
//! them. Before hit-testing, each position is mapped into the space of the
//! layout's active panel:
//!
//! - The **extended** panel is an overlay anchored beside the key that revealed
//!   it, so positions are mapped by subtracting the layout's
//!   `extended_panel_offset` ([`translate_by_offset`]).
//! - Every other panel lives on the primary surface, so positions are mapped
//!   from the event surface into the primary surface ([`translate`]).

use crate::error::{GlassError, GlassResult};
use crate::geometry::Point;
use crate::layout::{Layout, Panel};
use crate::surface::{Surface, SurfaceRole, ViewportId};

/// Maps `point` from a space whose origin is `source_origin` into a space whose
/// origin is `target_origin`. Both origins are in screen coordinates.
#[must_use]
pub fn translate(point: Point, source_origin: Point, target_origin: Point) -> Point {
    point + source_origin - target_origin
}

/// Maps `point` into a panel positioned at `panel_offset`.
#[must_use]
pub fn translate_by_offset(point: Point, panel_offset: Point) -> Point {
    point - panel_offset
}

/// The primary and extended surfaces of a session.
#[derive(Debug, Default)]
pub struct SurfaceSet {
    primary: Option<Box<dyn Surface>>,
    extended: Option<Box<dyn Surface>>,
}

impl SurfaceSet {
    /// Creates an empty surface set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `surface` in `role`.
    ///
    /// # Errors
    ///
    /// Returns [`GlassError::InvalidSurface`] if the surface has no viewport.
    /// The previous surface in that role is kept.
    pub fn set(&mut self, role: SurfaceRole, surface: Box<dyn Surface>) -> GlassResult<()> {
        if surface.viewport().is_none() {
            return Err(GlassError::InvalidSurface { role });
        }

        match role {
            SurfaceRole::Primary => self.primary = Some(surface),
            SurfaceRole::Extended => self.extended = Some(surface),
        }
        Ok(())
    }

    /// Returns the surface in `role`, if set.
    pub fn get(&self, role: SurfaceRole) -> Option<&dyn Surface> {
        match role {
            SurfaceRole::Primary => self.primary.as_deref(),
            SurfaceRole::Extended => self.extended.as_deref(),
        }
    }

    /// Returns the surface in `role` mutably, if set.
    pub fn get_mut(&mut self, role: SurfaceRole) -> Option<&mut (dyn Surface + 'static)> {
        match role {
            SurfaceRole::Primary => self.primary.as_deref_mut(),
            SurfaceRole::Extended => self.extended.as_deref_mut(),
        }
    }

    /// Returns `true` once a primary surface is installed.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Attributes an event viewport to a surface.
    ///
    /// Events on the extended surface's viewport belong to the extended
    /// surface; all others belong to the primary surface. Returns `None` when
    /// no primary surface is installed.
    pub fn role_for(&self, viewport: ViewportId) -> Option<SurfaceRole> {
        let on_extended = self
            .extended
            .as_ref()
            .is_some_and(|surface| surface.viewport() == Some(viewport));

        if on_extended {
            Some(SurfaceRole::Extended)
        } else if self.primary.is_some() {
            Some(SurfaceRole::Primary)
        } else {
            None
        }
    }

    /// Maps `point`, received on the `source` surface, into the space of
    /// `layout`'s active panel.
    pub fn to_layout_space(&self, point: Point, source: SurfaceRole, layout: &Layout) -> Point {
        if layout.active_panel == Panel::Extended {
            return translate_by_offset(point, layout.extended_panel_offset);
        }

        match (self.primary.as_deref(), self.get(source)) {
            (Some(target), Some(source)) => target.translate_event_position(point, source),
            _ => point,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
