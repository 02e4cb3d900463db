// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layout snapshots.
//!
//! These types describe what the input core needs to know about a layout:
//! key geometry, the word candidate ribbon and the geometry of each panel.
//! They are produced by the layout loader and are read-only from the core's
//! point of view.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Point, Rect, Size};

// ============================================================================
// Keys
// ============================================================================

/// The logical action of a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "text")]
pub enum KeyAction {
    /// Inserts text.
    Insert(String),
    /// The shift key.
    Shift,
    /// Deletes backwards.
    Backspace,
    /// Inserts a space.
    Space,
    /// Return / enter.
    Return,
    /// Switches to another key set (symbols, numbers).
    Switch,
    /// Closes the keyboard.
    Close,
    /// Commits the current preedit.
    Commit,
    /// A dead key composing with the next key.
    Dead(String),
    /// No action.
    #[default]
    None,
}

/// The text label drawn on a key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Label {
    /// Label text.
    pub text: String,
    /// Label rectangle, relative to the key origin.
    #[serde(default)]
    pub rect: Rect,
}

/// Margins around a key's visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// A key in a key area.
///
/// Keys compare by value. A key with an empty rectangle is invalid and is
/// never returned by hit-testing; `Key::default()` is such a key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Key {
    /// Top-left corner, relative to the key area origin.
    pub origin: Point,
    /// Size of the key.
    pub size: Size,
    /// What the key does.
    #[serde(default)]
    pub action: KeyAction,
    /// Label drawn on the key.
    #[serde(default)]
    pub label: Label,
    /// Margins around the visible area.
    #[serde(default)]
    pub margins: Margins,
    /// Whether a long press reveals an extended key panel.
    #[serde(default)]
    pub has_extended_keys: bool,
}

impl Key {
    /// Creates a key with the given geometry, action and label text.
    pub fn new(origin: Point, size: Size, action: KeyAction, label: impl Into<String>) -> Self {
        Self {
            origin,
            size,
            action,
            label: Label {
                text: label.into(),
                rect: Rect::from_origin_size(Point::ZERO, size),
            },
            margins: Margins::default(),
            has_extended_keys: false,
        }
    }

    /// Marks the key as having extended keys.
    #[must_use]
    pub fn with_extended_keys(mut self) -> Self {
        self.has_extended_keys = true;
        self
    }

    /// Returns the bounding rectangle, relative to the key area origin.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Returns `true` if the key can be hit.
    pub fn is_valid(&self) -> bool {
        !self.size.is_empty()
    }

    /// Returns `true` if this is the shift key.
    pub fn is_shift(&self) -> bool {
        self.action == KeyAction::Shift
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "'{}' {:?}", self.label.text, self.rect())
        } else {
            write!(f, "<invalid key>")
        }
    }
}

// ============================================================================
// Word Candidates
// ============================================================================

/// A selectable suggestion in the word candidate ribbon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordCandidate {
    /// Rectangle, relative to the ribbon origin.
    pub rect: Rect,
    /// Suggested word.
    #[serde(default)]
    pub text: String,
}

impl WordCandidate {
    /// Creates a new word candidate.
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }

    /// Returns `true` if the candidate can be hit.
    pub fn is_valid(&self) -> bool {
        !self.rect.is_empty()
    }
}

/// The word candidate ribbon of a layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordRibbon {
    /// Ribbon geometry.
    pub rect: Rect,
    /// Candidates in display order.
    #[serde(default)]
    pub candidates: Vec<WordCandidate>,
}

// ============================================================================
// Panels and Key Areas
// ============================================================================

/// One of the four logical regions of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// The main key area.
    #[default]
    Center,
    /// The popup panel revealed by a long press.
    Extended,
    /// The panel left of the center panel.
    Left,
    /// The panel right of the center panel.
    Right,
}

impl Panel {
    /// All panels in hit-test order.
    pub const ALL: [Panel; 4] = [Panel::Center, Panel::Extended, Panel::Left, Panel::Right];
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Panel::Center => "center",
            Panel::Extended => "extended",
            Panel::Left => "left",
            Panel::Right => "right",
        };
        f.write_str(name)
    }
}

/// Geometry and keys of one panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyArea {
    /// Panel geometry in its surface's coordinates.
    pub rect: Rect,
    /// Keys in hit-test order, with rectangles relative to `rect`.
    #[serde(default)]
    pub keys: Vec<Key>,
}

impl KeyArea {
    /// Creates a key area.
    pub fn new(rect: Rect, keys: Vec<Key>) -> Self {
        Self { rect, keys }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Identifies a tracked layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayoutId(pub u32);

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout#{}", self.0)
    }
}

/// One on-screen keyboard surface's layout snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Identifier used in emitted events.
    pub id: LayoutId,
    /// The panel currently shown.
    #[serde(default)]
    pub active_panel: Panel,
    #[serde(default)]
    pub center: KeyArea,
    #[serde(default)]
    pub extended: KeyArea,
    #[serde(default)]
    pub left: KeyArea,
    #[serde(default)]
    pub right: KeyArea,
    /// Word candidate ribbon.
    #[serde(default)]
    pub word_ribbon: WordRibbon,
    /// Offset of the extended panel from the primary surface origin.
    ///
    /// The extended panel is anchored beside the key that revealed it, so
    /// positions are mapped into it by subtracting this offset.
    #[serde(default)]
    pub extended_panel_offset: Point,
}

impl Layout {
    /// Creates a layout with only a center panel.
    pub fn new(id: LayoutId, center: KeyArea) -> Self {
        Self {
            id,
            center,
            ..Self::default()
        }
    }

    /// Returns the key area of `panel`.
    pub fn key_area(&self, panel: Panel) -> &KeyArea {
        match panel {
            Panel::Center => &self.center,
            Panel::Extended => &self.extended,
            Panel::Left => &self.left,
            Panel::Right => &self.right,
        }
    }

    /// Returns a mutable reference to the key area of `panel`.
    pub fn key_area_mut(&mut self, panel: Panel) -> &mut KeyArea {
        match panel {
            Panel::Center => &mut self.center,
            Panel::Extended => &mut self.extended,
            Panel::Left => &mut self.left,
            Panel::Right => &mut self.right,
        }
    }

    /// Returns the key area of the active panel.
    pub fn active_key_area(&self) -> &KeyArea {
        self.key_area(self.active_panel)
    }

    /// Returns the geometry of the active panel.
    pub fn active_key_area_geometry(&self) -> Rect {
        self.active_key_area().rect
    }

    /// Returns the first panel whose geometry contains `point`.
    pub fn panel_at(&self, point: Point) -> Option<Panel> {
        Panel::ALL
            .into_iter()
            .find(|&panel| self.key_area(panel).rect.contains(point))
    }

    /// Sets the active panel.
    pub fn set_active_panel(&mut self, panel: Panel) {
        self.active_panel = panel;
    }
}

// ============================================================================
// Tests
// ============================================================================
