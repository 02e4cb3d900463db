// SPDX-License-Identifier: GPL-3.0-only

//! Cosboard Glass - the input core of a soft keyboard
//!
//! This crate turns raw pointer events from the keyboard's surfaces into
//! semantic keyboard events: keys pressed, released and long-pressed, word
//! candidates selected, panel switches and keyboard dismissal. Key events
//! also drive a shift / caps-lock state machine.
//!
//! # Architecture
//!
//! ```text
//! host surfaces --PointerEvent--> Glass --+--> GestureInterpreter --> hit-testing
//!                                          |
//!                                          +--> ShiftTracker --> ShiftStateMachine
//!                                          |
//!                                          +--> listeners (GlassEvent, in causal order)
//! ```
//!
//! Rendering, layout loading and feedback are left to the host. The core only
//! reads layout snapshots and reports what happened.
//!
//! # Modules
//!
//! - `app_settings`: Default thresholds and other constants
//! - `config`: User configuration loaded from JSON
//! - `driver`: Async loop feeding pointer events and firing timers
//! - `error`: Error types of the input core
//! - `event`: Raw pointer events and semantic events
//! - `geometry`: Points, rectangles and hit-testing
//! - `gesture`: The per-session gesture interpreter
//! - `layout`: Layout snapshot types
//! - `modifier`: Shift and caps-lock state
//! - `replay`: Scripted replay of pointer sessions
//! - `router`: The [`Glass`] façade and its listeners
//! - `surface`: Surfaces and coordinate translation

pub mod app_settings;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod modifier;
pub mod replay;
pub mod router;
pub mod surface;

pub use config::{ConfigError, GlassConfig};
pub use error::{GlassError, GlassResult};
pub use event::{Dispatch, GlassEvent, PointerEvent, PointerKind};
pub use router::{ChannelListener, EventObserver, FpsMeter, Glass, GlassListener};

// ============================================================================
// Integration Tests
// ============================================================================
