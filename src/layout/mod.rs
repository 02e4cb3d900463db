// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard layout snapshots as seen by the input core.
//!
//! A [`Layout`] owns one [`KeyArea`] per [`Panel`] (center, extended, left and
//! right), a [`WordRibbon`] of suggestions and the offset of the extended
//! panel. Exactly one panel is active at a time; hit-testing always runs
//! against the active panel.
//!
//! Layouts are loaded elsewhere and handed to the router, which owns them for
//! the lifetime of the session. Hosts update them (for example to switch the
//! active panel after a long press) through [`crate::router::Glass::layout_mut`].
//!
//! # Example
//!
//! ```rust
//! use cosboard_glass::geometry::{Point, Rect, Size};
//! use cosboard_glass::layout::{Key, KeyAction, KeyArea, Layout, LayoutId, Panel};
//!
//! let key = Key::new(Point::new(0.0, 0.0), Size::new(20.0, 20.0), KeyAction::Insert("a".into()), "a");
//! let layout = Layout::new(LayoutId(1), KeyArea::new(Rect::new(0.0, 0.0, 200.0, 80.0), vec![key]));
//!
//! assert_eq!(layout.active_panel, Panel::Center);
//! assert_eq!(layout.active_key_area().keys.len(), 1);
//! ```

pub mod types;

pub use types::{
    Key, KeyAction, KeyArea, Label, Layout, LayoutId, Margins, Panel, WordCandidate, WordRibbon,
};
