// SPDX-License-Identifier: GPL-3.0-only

//! Raw pointer events consumed by the input core and semantic events it emits.
//!
//! Hosts deliver [`PointerEvent`]s to the router. The gesture interpreter
//! turns them into [`GlassEvent`]s, collected in a [`Dispatch`] and fanned out
//! to listeners in causal order.

use serde::Serialize;
use std::time::Instant;

use crate::geometry::Point;
use crate::layout::{Key, LayoutId, Panel, WordCandidate};
use crate::modifier::{LetterCase, ShiftSignal};
use crate::surface::ViewportId;

// ============================================================================
// Pointer Events
// ============================================================================

/// The kind of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Pointer went down.
    Press,
    /// Pointer moved.
    Move,
    /// Pointer went up.
    Release,
}

/// A raw pointer event as delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Position in the coordinates of the surface owning `viewport`.
    pub position: Point,
    /// The viewport that received the event.
    pub viewport: ViewportId,
    /// When the event happened.
    pub timestamp: Instant,
}

impl PointerEvent {
    /// Creates a new pointer event.
    pub fn new(kind: PointerKind, position: Point, viewport: ViewportId, timestamp: Instant) -> Self {
        Self {
            kind,
            position,
            viewport,
            timestamp,
        }
    }

    /// Creates a press event.
    pub fn press(position: Point, viewport: ViewportId, timestamp: Instant) -> Self {
        Self::new(PointerKind::Press, position, viewport, timestamp)
    }

    /// Creates a move event.
    pub fn motion(position: Point, viewport: ViewportId, timestamp: Instant) -> Self {
        Self::new(PointerKind::Move, position, viewport, timestamp)
    }

    /// Creates a release event.
    pub fn release(position: Point, viewport: ViewportId, timestamp: Instant) -> Self {
        Self::new(PointerKind::Release, position, viewport, timestamp)
    }
}

// ============================================================================
// Semantic Events
// ============================================================================

/// Semantic events emitted by the input core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GlassEvent {
    /// A key went down under the pointer.
    KeyPressed { key: Key, layout: LayoutId },
    /// A pressed key was released.
    KeyReleased { key: Key, layout: LayoutId },
    /// The pointer dragged onto a key.
    KeyEntered { key: Key, layout: LayoutId },
    /// The pointer left a key, or the key was abandoned by a gesture or long press.
    KeyExited { key: Key, layout: LayoutId },
    /// A key with extended keys was held past the long press threshold.
    KeyLongPressed { key: Key, layout: LayoutId },
    /// A press landed in a panel.
    KeyAreaPressed { panel: Panel, layout: LayoutId },
    /// A release landed in a panel.
    KeyAreaReleased { panel: Panel, layout: LayoutId },
    /// A word candidate went down under the pointer.
    WordCandidatePressed {
        candidate: WordCandidate,
        layout: LayoutId,
    },
    /// The candidate pressed earlier was released.
    WordCandidateReleased {
        candidate: WordCandidate,
        layout: LayoutId,
    },
    /// Swipe to the right: show the panel on the left.
    SwitchLeft { layout: LayoutId },
    /// Swipe to the left: show the panel on the right.
    SwitchRight { layout: LayoutId },
    /// Downward swipe: dismiss the keyboard.
    KeyboardClosed,
    /// Shift key went down.
    ShiftPressed,
    /// Shift key was released.
    ShiftReleased,
    /// A latched shift was cancelled.
    ShiftCancelled,
    /// Auto-capitalization requested an upper case letter.
    AutoCapsActivated,
    /// The layout should be drawn in a different case.
    LayoutCaseChanged { case: LetterCase },
}

impl From<ShiftSignal> for GlassEvent {
    fn from(signal: ShiftSignal) -> Self {
        match signal {
            ShiftSignal::ShiftPressed => GlassEvent::ShiftPressed,
            ShiftSignal::ShiftReleased => GlassEvent::ShiftReleased,
            ShiftSignal::ShiftCancelled => GlassEvent::ShiftCancelled,
            ShiftSignal::AutoCapsActivated => GlassEvent::AutoCapsActivated,
        }
    }
}

/// The outcome of dispatching one pointer event or timer fire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    /// Whether the input core handled the event.
    pub consumed: bool,
    /// Events to deliver, in causal order.
    pub events: Vec<GlassEvent>,
}

impl Dispatch {
    /// A dispatch that handled nothing and emits nothing.
    pub fn ignored() -> Self {
        Self::default()
    }

    /// A consumed dispatch that emits nothing.
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            events: Vec::new(),
        }
    }

    /// Appends an event.
    pub fn push(&mut self, event: GlassEvent) {
        self.events.push(event);
    }
}

// ============================================================================
// Tests
// ============================================================================
