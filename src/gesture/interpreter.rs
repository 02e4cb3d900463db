// SPDX-License-Identifier: GPL-3.0-only

//! The per-session gesture interpreter.
//!
//! A session runs from pointer-down to pointer-up:
//!
//! ```text
//! Idle --press--> Pressed --move--> Dragging --release--> Idle
//!                    \                 |
//!                     +----swipe-------+--> GestureTriggered --release--> Idle
//! ```
//!
//! Within the gesture window after a press, a mostly horizontal drag of more
//! than a third of the active panel's width switches panels, and a mostly
//! vertical downward drag of more than half its height closes the keyboard.
//! Once either fires the session is spent: active keys are exited and no
//! further key is hit-tested until the next press.
//!
//! Otherwise the interpreter tracks which keys the pointer is on, emitting
//! enter/exit as it drags across keys, and releases the key under the pointer
//! on pointer-up if (and only if) it is one of the active keys. Active keys
//! the pointer is no longer on are exited, so every session ends with no key
//! down. Keys with extended keys arm a long-press timer; when it fires, the
//! active keys are exited and the most recent one is reported as long-pressed
//! instead of released.

use std::time::Instant;

use crate::config::GlassConfig;
use crate::event::{Dispatch, GlassEvent, PointerKind};
use crate::geometry::{hit_key, hit_word_candidate, AcceptPolicy, Point, Rect};
use crate::gesture::active_keys::ActiveKeys;
use crate::gesture::timer::SingleShotTimer;
use crate::layout::{Key, Layout, LayoutId, Panel, WordCandidate};
use crate::surface::{SurfaceRole, SurfaceSet};

// ============================================================================
// Gesture Classification
// ============================================================================

/// A gesture recognized during the gesture window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Dragged right: show the panel on the left.
    SwitchLeft,
    /// Dragged left: show the panel on the right.
    SwitchRight,
    /// Dragged down: close the keyboard.
    CloseKeyboard,
}

/// Classifies the drag from `press` to `pos` against the active panel `rect`.
///
/// All three points must be in the same panel space.
pub fn classify_gesture(press: Point, pos: Point, rect: Rect, config: &GlassConfig) -> Option<Gesture> {
    let horizontal = rect.width * config.swipe_ratio;
    let vertical = rect.height * config.swipe_tolerance_ratio;
    let dismiss = rect.height * config.dismiss_ratio;

    if pos.y > press.y - vertical && pos.y < press.y + vertical {
        if pos.x < press.x - horizontal {
            return Some(Gesture::SwitchRight);
        }
        if pos.x > press.x + horizontal {
            return Some(Gesture::SwitchLeft);
        }
    } else if pos.x > press.x - horizontal && pos.x < press.x + horizontal && pos.y > press.y + dismiss {
        return Some(Gesture::CloseKeyboard);
    }

    None
}

// ============================================================================
// Dispatch Context
// ============================================================================

/// Everything the interpreter reads while handling one event.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Tracked layouts, in dispatch order.
    pub layouts: &'a [Layout],
    /// The session's surfaces.
    pub surfaces: &'a SurfaceSet,
    /// The surface that received the event.
    pub source: SurfaceRole,
}

impl DispatchContext<'_> {
    fn to_layout_space(&self, point: Point, layout: &Layout) -> Point {
        self.surfaces.to_layout_space(point, self.source, layout)
    }
}

// ============================================================================
// Interpreter
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct Session {
    press_pos: Option<Point>,
    press_time: Option<Instant>,
    last_pos: Point,
    gesture_triggered: bool,
}

impl Session {
    fn pressed(position: Point, now: Instant) -> Self {
        Self {
            press_pos: Some(position),
            press_time: Some(now),
            last_pos: position,
            gesture_triggered: false,
        }
    }
}

/// Turns pointer events into key, candidate and gesture events.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GlassConfig,
    session: Session,
    active_keys: ActiveKeys,
    active_candidate: Option<WordCandidate>,
    long_press_timer: SingleShotTimer,
    long_press_layout: Option<LayoutId>,
}

impl GestureInterpreter {
    /// Creates an idle interpreter.
    pub fn new(config: GlassConfig) -> Self {
        let long_press_timer = SingleShotTimer::new(config.long_press());
        Self {
            config,
            session: Session::default(),
            active_keys: ActiveKeys::new(),
            active_candidate: None,
            long_press_timer,
            long_press_layout: None,
        }
    }

    /// Returns the keys currently down.
    pub fn active_keys(&self) -> &ActiveKeys {
        &self.active_keys
    }

    /// Returns `true` between a press and its release.
    pub fn is_pressed(&self) -> bool {
        self.session.press_pos.is_some()
    }

    /// Returns `true` once a swipe or dismiss fired in the current session.
    pub fn is_gesture_triggered(&self) -> bool {
        self.session.gesture_triggered
    }

    /// Returns the layout a pending long press is attributed to.
    pub fn long_press_layout(&self) -> Option<LayoutId> {
        self.long_press_layout
    }

    /// Returns when the long-press timer will fire, if armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.long_press_timer.deadline()
    }

    /// Cancels a pending long press. Does nothing if none is pending.
    pub fn cancel_long_press(&mut self) {
        self.long_press_timer.stop();
    }

    // ========================================================================
    // Pointer Events
    // ========================================================================

    /// Handles pointer-down at `position`.
    pub fn press(&mut self, ctx: &DispatchContext<'_>, position: Point, now: Instant) -> Dispatch {
        self.session = Session::pressed(position, now);
        self.active_candidate = None;

        let mut dispatch = Dispatch::ignored();

        for layout in ctx.layouts {
            let pos = ctx.to_layout_space(position, layout);
            let area = layout.active_key_area();

            let key = hit_key(
                &area.keys,
                area.rect,
                pos,
                Some(self.active_keys.as_slice()),
                AcceptPolicy::RejectIfInFilter,
            )
            .cloned();

            let key_hit = key.is_some();

            if let Some(key) = key {
                tracing::debug!("Key pressed: {} on {}", key, layout.id);
                if key.has_extended_keys {
                    self.arm_long_press(layout.id, now);
                }
                self.active_keys.insert(key.clone());
                dispatch.push(GlassEvent::KeyPressed {
                    key,
                    layout: layout.id,
                });
                dispatch.consumed = true;
            } else if let Some(candidate) =
                hit_word_candidate(&layout.word_ribbon.candidates, layout.word_ribbon.rect, pos)
            {
                self.active_candidate = Some(candidate.clone());
                dispatch.push(GlassEvent::WordCandidatePressed {
                    candidate: candidate.clone(),
                    layout: layout.id,
                });
                dispatch.consumed = true;
            }

            if push_key_area_event(&mut dispatch, PointerKind::Press, layout, pos, key_hit) {
                break;
            }
        }

        dispatch
    }

    /// Handles pointer motion to `position`.
    pub fn motion(&mut self, ctx: &DispatchContext<'_>, position: Point, now: Instant) -> Dispatch {
        let (Some(press_raw), Some(press_time)) = (self.session.press_pos, self.session.press_time)
        else {
            return Dispatch::ignored();
        };

        if self.session.gesture_triggered {
            return Dispatch::ignored();
        }

        let last_raw = self.session.last_pos;
        self.session.last_pos = position;

        let within_window = now.saturating_duration_since(press_time) < self.config.gesture_window();

        for layout in ctx.layouts {
            let pos = ctx.to_layout_space(position, layout);
            let last = ctx.to_layout_space(last_raw, layout);
            let press = ctx.to_layout_space(press_raw, layout);
            let rect = layout.active_key_area_geometry();

            if within_window {
                if let Some(gesture) = classify_gesture(press, pos, rect, &self.config) {
                    tracing::debug!(
                        "{:?} recognized on {}: press {:?} -> {:?} in {:?}",
                        gesture,
                        layout.id,
                        press,
                        pos,
                        rect
                    );
                    return self.trigger(gesture, layout.id);
                }
            }

            let last_key = hit_key(
                self.active_keys.as_slice(),
                rect,
                last,
                None,
                AcceptPolicy::RejectIfInFilter,
            )
            .cloned();
            let key = hit_key(
                &layout.active_key_area().keys,
                rect,
                pos,
                None,
                AcceptPolicy::RejectIfInFilter,
            )
            .cloned();

            if last_key != key {
                return self.cross_keys(last_key, key, layout.id, now);
            }
        }

        Dispatch::ignored()
    }

    /// Handles pointer-up at `position`.
    pub fn release(&mut self, ctx: &DispatchContext<'_>, position: Point) -> Dispatch {
        self.long_press_timer.stop();
        self.long_press_layout = None;

        let session = std::mem::take(&mut self.session);
        let active_candidate = self.active_candidate.take();

        if session.press_pos.is_none() {
            return Dispatch::ignored();
        }

        if session.gesture_triggered {
            tracing::debug!("Release consumed by the triggered gesture");
            return Dispatch::consumed();
        }

        let mut dispatch = Dispatch::ignored();

        for layout in ctx.layouts {
            let pos = ctx.to_layout_space(position, layout);
            let area = layout.active_key_area();

            let key = hit_key(
                &area.keys,
                area.rect,
                pos,
                Some(self.active_keys.as_slice()),
                AcceptPolicy::AcceptIfInFilter,
            )
            .cloned();

            let key_hit = key.is_some();

            if let Some(key) = key {
                tracing::debug!("Key released: {} on {}", key, layout.id);
                self.active_keys.remove(&key);
                dispatch.push(GlassEvent::KeyReleased {
                    key,
                    layout: layout.id,
                });
                dispatch.consumed = true;
            } else if let Some(candidate) =
                hit_word_candidate(&layout.word_ribbon.candidates, layout.word_ribbon.rect, pos)
            {
                if active_candidate.as_ref() == Some(candidate) {
                    dispatch.push(GlassEvent::WordCandidateReleased {
                        candidate: candidate.clone(),
                        layout: layout.id,
                    });
                    dispatch.consumed = true;
                }
            }

            if push_key_area_event(&mut dispatch, PointerKind::Release, layout, pos, key_hit) {
                break;
            }
        }

        // Keys still down were left without a move event; the session ends here.
        for key in self.active_keys.take_all() {
            let owner = ctx
                .layouts
                .iter()
                .find(|layout| layout.active_key_area().keys.contains(&key))
                .or_else(|| ctx.layouts.first());

            if let Some(layout) = owner {
                tracing::debug!("Key exited on release: {} on {}", key, layout.id);
                dispatch.push(GlassEvent::KeyExited {
                    key,
                    layout: layout.id,
                });
                dispatch.consumed = true;
            }
        }

        dispatch
    }

    // ========================================================================
    // Long Press
    // ========================================================================

    /// Fires the long-press timer if it is due at `now`.
    pub fn poll(&mut self, layouts: &[Layout], now: Instant) -> Dispatch {
        if !self.long_press_timer.fire_if_due(now) {
            return Dispatch::ignored();
        }
        self.fire_long_press(layouts)
    }

    /// Handles a long-press timer fire.
    ///
    /// Does nothing if a gesture triggered, no key is active, the long press
    /// has no layout, or that layout is showing its extended panel (a long
    /// press inside the popup never opens another popup).
    pub fn fire_long_press(&mut self, layouts: &[Layout]) -> Dispatch {
        if self.session.gesture_triggered || self.active_keys.is_empty() {
            return Dispatch::ignored();
        }

        let Some(layout) = self
            .long_press_layout
            .and_then(|id| layouts.iter().find(|layout| layout.id == id))
        else {
            return Dispatch::ignored();
        };

        if layout.active_panel == Panel::Extended {
            return Dispatch::ignored();
        }

        let keys = self.active_keys.take_all();
        let mut dispatch = Dispatch::consumed();

        for key in &keys {
            dispatch.push(GlassEvent::KeyExited {
                key: key.clone(),
                layout: layout.id,
            });
        }

        if let Some(key) = keys.last() {
            tracing::debug!("Key long pressed: {} on {}", key, layout.id);
            dispatch.push(GlassEvent::KeyLongPressed {
                key: key.clone(),
                layout: layout.id,
            });
        }

        dispatch
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn arm_long_press(&mut self, layout: LayoutId, now: Instant) {
        self.long_press_timer.start(now);
        self.long_press_layout = Some(layout);
    }

    fn trigger(&mut self, gesture: Gesture, layout: LayoutId) -> Dispatch {
        self.session.gesture_triggered = true;
        self.long_press_timer.stop();
        self.long_press_layout = None;

        let mut dispatch = Dispatch::consumed();
        dispatch.push(match gesture {
            Gesture::SwitchLeft => GlassEvent::SwitchLeft { layout },
            Gesture::SwitchRight => GlassEvent::SwitchRight { layout },
            Gesture::CloseKeyboard => GlassEvent::KeyboardClosed,
        });

        for key in self.active_keys.take_all() {
            dispatch.push(GlassEvent::KeyExited { key, layout });
        }

        dispatch
    }

    fn cross_keys(
        &mut self,
        exited: Option<Key>,
        entered: Option<Key>,
        layout: LayoutId,
        now: Instant,
    ) -> Dispatch {
        let mut dispatch = Dispatch::consumed();

        if let Some(key) = exited {
            self.active_keys.remove(&key);
            self.long_press_timer.stop();
            dispatch.push(GlassEvent::KeyExited { key, layout });
        }

        if let Some(key) = entered {
            if self.active_keys.insert(key.clone()) {
                if key.has_extended_keys {
                    self.arm_long_press(layout, now);
                }
                dispatch.push(GlassEvent::KeyEntered { key, layout });
            }
        }

        dispatch
    }
}

/// Reports which panel a press or release landed in.
///
/// Returns `true` if a panel of `layout` contains `pos`, which ends dispatch
/// for the event. A key hit outside every panel geometry is attributed to the
/// active panel.
fn push_key_area_event(
    dispatch: &mut Dispatch,
    kind: PointerKind,
    layout: &Layout,
    pos: Point,
    key_hit: bool,
) -> bool {
    let (panel, ends_dispatch) = match layout.panel_at(pos) {
        Some(panel) => (panel, true),
        None if key_hit => (layout.active_panel, false),
        None => return false,
    };

    let event = match kind {
        PointerKind::Press => GlassEvent::KeyAreaPressed {
            panel,
            layout: layout.id,
        },
        PointerKind::Release => GlassEvent::KeyAreaReleased {
            panel,
            layout: layout.id,
        },
        PointerKind::Move => return false,
    };

    dispatch.push(event);
    if ends_dispatch {
        dispatch.consumed = true;
    }
    ends_dispatch
}

// ============================================================================
// Tests
// ============================================================================
