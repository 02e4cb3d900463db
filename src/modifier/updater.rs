// SPDX-License-Identifier: GPL-3.0-only

//! Drives the shift state machine from key events.
//!
//! The tracker is bound to one layout. Key events from that layout's center
//! panel are turned into shift signals:
//!
//! - shift key pressed → `ShiftPressed`
//! - shift key released → `ShiftReleased`
//! - any other key released → `ShiftCancelled`, but only while the machine is
//!   in `LatchedShift`, so a latched shift survives everything except the next
//!   typed key.
//!
//! Every raised signal is reported as an event, followed by the case change
//! of the state it entered (if any).

use crate::error::{GlassError, GlassResult};
use crate::event::GlassEvent;
use crate::layout::{Key, LayoutId, Panel};
use crate::modifier::machine::{ShiftSignal, ShiftState, ShiftStateMachine};

/// Why the active keys of a layout changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChangeReason {
    /// The shift key went down.
    ShiftPressed,
    /// The shift key was released.
    ShiftReleased,
    /// Some other key was released.
    KeyReleased,
}

impl KeyChangeReason {
    /// Classifies a semantic event, if it changes the shift state at all.
    pub fn for_event(event: &GlassEvent) -> Option<(LayoutId, &Key, KeyChangeReason)> {
        match event {
            GlassEvent::KeyPressed { key, layout } if key.is_shift() => {
                Some((*layout, key, KeyChangeReason::ShiftPressed))
            }
            GlassEvent::KeyReleased { key, layout } if key.is_shift() => {
                Some((*layout, key, KeyChangeReason::ShiftReleased))
            }
            GlassEvent::KeyReleased { key, layout } => {
                Some((*layout, key, KeyChangeReason::KeyReleased))
            }
            _ => None,
        }
    }
}

/// Binds the shift state machine to a layout.
#[derive(Debug, Clone, Default)]
pub struct ShiftTracker {
    layout: Option<LayoutId>,
    machine: ShiftStateMachine,
}

impl ShiftTracker {
    /// Creates a tracker with a machine that is not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the tracker to `layout`.
    pub fn set_layout(&mut self, layout: LayoutId) {
        self.layout = Some(layout);
    }

    /// Returns the bound layout.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    /// Returns the current shift state, or `None` before [`ShiftTracker::start`].
    pub fn state(&self) -> Option<ShiftState> {
        self.machine.state()
    }

    /// Starts the machine, returning the initial case change.
    pub fn start(&mut self) -> Vec<GlassEvent> {
        self.machine
            .start()
            .map(|entered| GlassEvent::LayoutCaseChanged { case: entered.case })
            .into_iter()
            .collect()
    }

    /// Handles a change of `layout`'s active keys on `panel`.
    ///
    /// Changes reported for other layouts are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GlassError::UnsupportedPanel`] for any panel other than the
    /// center panel. The state is left unchanged.
    pub fn on_active_keys_changed(
        &mut self,
        layout: LayoutId,
        panel: Panel,
        reason: KeyChangeReason,
    ) -> GlassResult<Vec<GlassEvent>> {
        if self.layout != Some(layout) {
            return Ok(Vec::new());
        }

        if panel != Panel::Center {
            let err = GlassError::UnsupportedPanel { panel };
            tracing::warn!("{}", err);
            return Err(err);
        }

        let signal = match reason {
            KeyChangeReason::ShiftPressed => Some(ShiftSignal::ShiftPressed),
            KeyChangeReason::ShiftReleased => Some(ShiftSignal::ShiftReleased),
            KeyChangeReason::KeyReleased => self
                .machine
                .is_in(ShiftState::LatchedShift)
                .then_some(ShiftSignal::ShiftCancelled),
        };

        Ok(signal.map(|signal| self.raise(signal)).unwrap_or_default())
    }

    /// Raises `signal` directly.
    ///
    /// Returns the signal event followed by the case change it caused, if any.
    pub fn raise(&mut self, signal: ShiftSignal) -> Vec<GlassEvent> {
        let mut events = vec![GlassEvent::from(signal)];

        if let Some(entered) = self.machine.handle(signal) {
            events.push(GlassEvent::LayoutCaseChanged { case: entered.case });
        }

        events
    }
}

// ============================================================================
// Tests
// ============================================================================
