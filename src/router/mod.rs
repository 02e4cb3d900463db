// SPDX-License-Identifier: GPL-3.0-only

//! The input core façade.
//!
//! [`Glass`] receives raw pointer events from the host surfaces, runs them
//! through the gesture interpreter against every tracked layout, and fans the
//! resulting semantic events out to listeners. Key events also drive the
//! shift state machine; the signals and case changes it produces are
//! delivered right after the key event that caused them.
//!
//! # Modules
//!
//! - **listener**: The listener trait, closure listeners and the channel listener.
//! - **instrumentation**: Observers run after every pointer event, including the FPS meter.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use cosboard_glass::geometry::{Point, Rect, Size};
//! use cosboard_glass::layout::{Key, KeyAction, KeyArea, Layout, LayoutId};
//! use cosboard_glass::surface::{FixedSurface, ViewportId};
//! use cosboard_glass::{Glass, GlassConfig, GlassEvent, PointerEvent};
//!
//! let mut glass = Glass::new(GlassConfig::default());
//! glass
//!     .set_surface(Box::new(FixedSurface::new(ViewportId(1), Point::ZERO)))
//!     .unwrap();
//!
//! let a = Key::new(Point::ZERO, Size::new(20.0, 20.0), KeyAction::Insert("a".into()), "a");
//! glass.add_layout(Layout::new(
//!     LayoutId(1),
//!     KeyArea::new(Rect::new(0.0, 0.0, 200.0, 100.0), vec![a]),
//! ));
//!
//! let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let sink = events.clone();
//! glass.add_listener(move |event: &GlassEvent| sink.borrow_mut().push(event.clone()));
//!
//! let now = Instant::now();
//! assert!(glass.handle_pointer_event(&PointerEvent::press(Point::new(10.0, 10.0), ViewportId(1), now)));
//! assert!(glass.handle_pointer_event(&PointerEvent::release(Point::new(10.0, 10.0), ViewportId(1), now)));
//! assert!(matches!(events.borrow()[0], GlassEvent::KeyPressed { .. }));
//! ```

pub mod instrumentation;
pub mod listener;

pub use instrumentation::{EventObserver, FpsMeter};
pub use listener::{ChannelListener, GlassListener};

use std::fmt;
use std::time::Instant;

use crate::config::GlassConfig;
use crate::error::{GlassError, GlassResult};
use crate::event::{GlassEvent, PointerEvent, PointerKind};
use crate::gesture::{ActiveKeys, DispatchContext, GestureInterpreter};
use crate::layout::{Layout, LayoutId};
use crate::modifier::{KeyChangeReason, ShiftSignal, ShiftState, ShiftTracker};
use crate::surface::{Surface, SurfaceRole, SurfaceSet};

/// The input core.
pub struct Glass {
    config: GlassConfig,
    surfaces: SurfaceSet,
    layouts: Vec<Layout>,
    interpreter: GestureInterpreter,
    shift: ShiftTracker,
    listeners: Vec<Box<dyn GlassListener>>,
    observers: Vec<Box<dyn EventObserver>>,
    pointer_grab: Option<SurfaceRole>,
}

impl fmt::Debug for Glass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glass")
            .field("config", &self.config)
            .field("surfaces", &self.surfaces)
            .field("layouts", &self.layouts.len())
            .field("interpreter", &self.interpreter)
            .field("shift", &self.shift)
            .field("listeners", &self.listeners.len())
            .field("observers", &self.observers.len())
            .field("pointer_grab", &self.pointer_grab)
            .finish()
    }
}

impl Default for Glass {
    fn default() -> Self {
        Self::new(GlassConfig::default())
    }
}

impl Glass {
    /// Creates an input core with no surfaces and no layouts.
    ///
    /// The shift state machine is not started; call [`Glass::start`] once
    /// listeners are attached.
    pub fn new(config: GlassConfig) -> Self {
        let mut observers: Vec<Box<dyn EventObserver>> = Vec::new();
        if config.measure_fps {
            observers.push(Box::new(FpsMeter::new(config.fps_sample_size)));
        }

        Self {
            interpreter: GestureInterpreter::new(config.clone()),
            config,
            surfaces: SurfaceSet::new(),
            layouts: Vec::new(),
            shift: ShiftTracker::new(),
            listeners: Vec::new(),
            observers,
            pointer_grab: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    /// Starts the shift state machine, delivering its initial case change.
    pub fn start(&mut self) {
        let events = self.shift.start();
        self.emit_all(&events);
    }

    // ========================================================================
    // Surfaces
    // ========================================================================

    /// Installs the primary surface.
    ///
    /// Replacing the primary surface forgets every tracked layout.
    ///
    /// # Errors
    ///
    /// Returns [`GlassError::InvalidSurface`] if the surface has no viewport;
    /// nothing changes in that case.
    pub fn set_surface(&mut self, surface: Box<dyn Surface>) -> GlassResult<()> {
        self.install_surface(SurfaceRole::Primary, surface)?;
        self.layouts.clear();
        Ok(())
    }

    /// Installs the extended (popup) surface.
    ///
    /// # Errors
    ///
    /// Returns [`GlassError::InvalidSurface`] if the surface has no viewport.
    pub fn set_extended_surface(&mut self, surface: Box<dyn Surface>) -> GlassResult<()> {
        self.install_surface(SurfaceRole::Extended, surface)
    }

    fn install_surface(&mut self, role: SurfaceRole, surface: Box<dyn Surface>) -> GlassResult<()> {
        if surface.viewport().is_none() {
            let err = GlassError::InvalidSurface { role };
            tracing::error!("{}", err);
            return Err(err);
        }

        if self.pointer_grab == Some(role) {
            self.release_pointer();
        }

        self.surfaces.set(role, surface)?;
        tracing::debug!("Installed {} surface", role);
        Ok(())
    }

    /// Returns the installed surfaces.
    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    /// Returns `true` while a surface holds the pointer grab.
    pub fn is_pointer_grabbed(&self) -> bool {
        self.pointer_grab.is_some()
    }

    // ========================================================================
    // Layouts
    // ========================================================================

    /// Starts tracking `layout`, replacing a tracked layout with the same id.
    ///
    /// The first layout added drives the shift state machine unless another
    /// layout was bound with [`Glass::bind_shift_layout`].
    pub fn add_layout(&mut self, layout: Layout) {
        if self.shift.layout().is_none() {
            self.shift.set_layout(layout.id);
        }

        match self.layouts.iter_mut().find(|tracked| tracked.id == layout.id) {
            Some(tracked) => *tracked = layout,
            None => self.layouts.push(layout),
        }
    }

    /// Stops tracking the layout `id`.
    pub fn remove_layout(&mut self, id: LayoutId) -> Option<Layout> {
        let index = self.layouts.iter().position(|layout| layout.id == id)?;
        Some(self.layouts.remove(index))
    }

    /// Stops tracking every layout.
    pub fn clear_layouts(&mut self) {
        self.layouts.clear();
    }

    /// Returns the tracked layouts in dispatch order.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Returns the tracked layout `id`.
    pub fn layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.iter().find(|layout| layout.id == id)
    }

    /// Returns a tracked layout for updating, e.g. to switch its active panel.
    pub fn layout_mut(&mut self, id: LayoutId) -> Option<&mut Layout> {
        self.layouts.iter_mut().find(|layout| layout.id == id)
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Attaches a listener. Listeners are called in the order they were added.
    pub fn add_listener(&mut self, listener: impl GlassListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Attaches an observer called after every pointer event.
    pub fn add_observer(&mut self, observer: impl EventObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Processes one pointer event.
    ///
    /// A long press due at or before the event's timestamp fires first.
    /// Returns `true` if the event was consumed; `false` tells the host to
    /// pass it on.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        let consumed = self.dispatch_pointer_event(event);

        for observer in &mut self.observers {
            observer.on_pointer_event(event, consumed);
        }

        consumed
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> bool {
        if self.layouts.is_empty() {
            tracing::debug!("{}", GlassError::NoActiveLayout);
            return false;
        }

        let Some(source) = self.surfaces.role_for(event.viewport) else {
            tracing::debug!(
                "{}: event on viewport {:?} not consumed",
                GlassError::InvalidSurface {
                    role: SurfaceRole::Primary
                },
                event.viewport
            );
            return false;
        };

        self.poll_timers(event.timestamp);

        let ctx = DispatchContext {
            layouts: &self.layouts,
            surfaces: &self.surfaces,
            source,
        };

        let dispatch = match event.kind {
            PointerKind::Press => self.interpreter.press(&ctx, event.position, event.timestamp),
            PointerKind::Move => self.interpreter.motion(&ctx, event.position, event.timestamp),
            PointerKind::Release => self.interpreter.release(&ctx, event.position),
        };

        match event.kind {
            PointerKind::Press if dispatch.consumed => self.grab_pointer(source),
            PointerKind::Release => self.release_pointer(),
            _ => {}
        }

        self.deliver(&dispatch.events);
        dispatch.consumed
    }

    /// Fires a long press that is due at `now`.
    ///
    /// Returns `true` if a long press fired.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let dispatch = self.interpreter.poll(&self.layouts, now);

        if dispatch.consumed {
            // The popup surface needs the pointer next.
            self.release_pointer();
        }

        self.deliver(&dispatch.events);
        dispatch.consumed
    }

    /// Returns when [`Glass::poll_timers`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.interpreter.next_deadline()
    }

    /// Returns the keys currently down.
    pub fn active_keys(&self) -> &ActiveKeys {
        self.interpreter.active_keys()
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Returns the shift state, or `None` before [`Glass::start`].
    pub fn shift_state(&self) -> Option<ShiftState> {
        self.shift.state()
    }

    /// Makes key events of layout `id` drive the shift state machine.
    pub fn bind_shift_layout(&mut self, id: LayoutId) {
        self.shift.set_layout(id);
    }

    /// Requests an upper case letter for the next key, e.g. at sentence start.
    pub fn activate_auto_caps(&mut self) {
        self.signal_shift(ShiftSignal::AutoCapsActivated);
    }

    /// Raises a shift signal directly.
    pub fn signal_shift(&mut self, signal: ShiftSignal) {
        let events = self.shift.raise(signal);
        self.emit_all(&events);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn grab_pointer(&mut self, role: SurfaceRole) {
        if self.pointer_grab.is_some() {
            return;
        }
        if let Some(surface) = self.surfaces.get_mut(role) {
            surface.grab_pointer();
            self.pointer_grab = Some(role);
        }
    }

    fn release_pointer(&mut self) {
        if let Some(role) = self.pointer_grab.take() {
            if let Some(surface) = self.surfaces.get_mut(role) {
                surface.release_pointer();
            }
        }
    }

    /// Delivers interpreter events, each followed by the shift events it causes.
    fn deliver(&mut self, events: &[GlassEvent]) {
        for event in events {
            self.emit(event);

            let Some((layout, _, reason)) = KeyChangeReason::for_event(event) else {
                continue;
            };
            let panel = self.layout(layout).map(|l| l.active_panel).unwrap_or_default();

            // UnsupportedPanel is logged by the tracker and leaves the state as is.
            if let Ok(derived) = self.shift.on_active_keys_changed(layout, panel, reason) {
                self.emit_all(&derived);
            }
        }
    }

    fn emit_all(&mut self, events: &[GlassEvent]) {
        for event in events {
            self.emit(event);
        }
    }

    fn emit(&mut self, event: &GlassEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
