// SPDX-License-Identifier: GPL-3.0-only

//! Scripted replay of pointer sessions.
//!
//! A script describes the surfaces, the layouts and a timed list of pointer
//! events. Replaying it runs the events through a fresh [`Glass`] and collects
//! everything it emits, which makes scripts handy both for reproducing bug
//! reports and for end-to-end tests.
//!
//! # Example Script
//!
//! ```json
//! {
//!   "config": { "long_press_ms": 300 },
//!   "primary_origin": { "x": 0, "y": 0 },
//!   "layouts": [ { "id": 1, "center": { "rect": { "x": 0, "y": 0, "width": 150, "height": 100 }, "keys": [] } } ],
//!   "events": [
//!     { "at_ms": 0, "kind": "press", "x": 10, "y": 10 },
//!     { "at_ms": 80, "kind": "release", "x": 10, "y": 10 }
//!   ]
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::config::{ConfigError, GlassConfig};
use crate::error::GlassError;
use crate::event::{GlassEvent, PointerEvent, PointerKind};
use crate::geometry::Point;
use crate::layout::Layout;
use crate::router::Glass;
use crate::surface::{FixedSurface, SurfaceRole, ViewportId};

/// Viewport of the primary surface in a replay.
pub const PRIMARY_VIEWPORT: ViewportId = ViewportId(1);

/// Viewport of the extended surface in a replay.
pub const EXTENDED_VIEWPORT: ViewportId = ViewportId(2);

// ============================================================================
// Script
// ============================================================================

/// One pointer event of a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds since the start of the replay.
    pub at_ms: u64,
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    /// Surface the event arrives on.
    #[serde(default = "primary_role")]
    pub surface: SurfaceRole,
}

fn primary_role() -> SurfaceRole {
    SurfaceRole::Primary
}

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: GlassConfig,
    /// Screen origin of the primary surface.
    #[serde(default)]
    pub primary_origin: Point,
    /// Screen origin of the extended surface. No extended surface if absent.
    #[serde(default)]
    pub extended_origin: Option<Point>,
    pub layouts: Vec<Layout>,
    /// Pointer events, replayed in order. A timestamp earlier than the one
    /// before it is replayed at the earlier event's time.
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parses a script from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        let script: Script = serde_json::from_str(json).map_err(|e| ReplayError::JsonError {
            line_number: Some(e.line()),
            source: e,
            file_path: None,
        })?;
        script.config.validate()?;
        Ok(script)
    }

    /// Loads a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| ReplayError::IoError {
            source: e,
            file_path: Some(path_str.clone()),
        })?;

        Self::from_json_str(&content).map_err(|e| e.with_file_path(path_str))
    }

    /// Replays the script, returning every emitted event in order.
    ///
    /// After the last event, a pending long press is allowed to fire.
    pub fn run(&self) -> Result<Vec<GlassEvent>, ReplayError> {
        self.check_events()?;

        let mut glass = Glass::new(self.config.clone());
        let recorded: Rc<RefCell<Vec<GlassEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = recorded.clone();
        glass.add_listener(move |event: &GlassEvent| sink.borrow_mut().push(event.clone()));

        glass.set_surface(Box::new(FixedSurface::new(PRIMARY_VIEWPORT, self.primary_origin)))?;
        if let Some(origin) = self.extended_origin {
            glass.set_extended_surface(Box::new(FixedSurface::new(EXTENDED_VIEWPORT, origin)))?;
        }
        for layout in &self.layouts {
            glass.add_layout(layout.clone());
        }
        glass.start();

        let start = Instant::now();
        let mut last_ms = 0;
        for event in &self.events {
            last_ms = last_ms.max(event.at_ms);
            let viewport = match event.surface {
                SurfaceRole::Primary => PRIMARY_VIEWPORT,
                SurfaceRole::Extended => EXTENDED_VIEWPORT,
            };
            let pointer = PointerEvent::new(
                event.kind,
                Point::new(event.x, event.y),
                viewport,
                start + Duration::from_millis(last_ms),
            );
            let consumed = glass.handle_pointer_event(&pointer);
            tracing::debug!("{:?} at {}ms consumed: {}", event.kind, event.at_ms, consumed);
        }

        if let Some(deadline) = glass.next_deadline() {
            glass.poll_timers(deadline);
        }

        drop(glass);
        Ok(recorded.take())
    }

    fn check_events(&self) -> Result<(), ReplayError> {
        let extended = self.extended_origin.is_some();
        match self
            .events
            .iter()
            .position(|event| event.surface == SurfaceRole::Extended && !extended)
        {
            Some(index) => Err(ReplayError::UnknownSurface {
                index,
                role: SurfaceRole::Extended,
            }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while loading or replaying a script.
#[derive(Debug)]
pub enum ReplayError {
    /// The script file could not be read.
    IoError {
        source: std::io::Error,
        file_path: Option<String>,
    },

    /// The script is not valid JSON or does not match the script format.
    JsonError {
        source: serde_json::Error,
        file_path: Option<String>,
        line_number: Option<usize>,
    },

    /// The embedded configuration is invalid.
    Config(ConfigError),

    /// The input core rejected the script's setup.
    Setup(GlassError),

    /// An event targets a surface the script does not define.
    UnknownSurface { index: usize, role: SurfaceRole },
}

impl ReplayError {
    fn with_file_path(self, path: String) -> Self {
        match self {
            ReplayError::JsonError {
                source,
                line_number,
                ..
            } => ReplayError::JsonError {
                source,
                file_path: Some(path),
                line_number,
            },
            other => other,
        }
    }
}

impl From<ConfigError> for ReplayError {
    fn from(err: ConfigError) -> Self {
        ReplayError::Config(err)
    }
}

impl From<GlassError> for ReplayError {
    fn from(err: GlassError) -> Self {
        ReplayError::Setup(err)
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::IoError { source, file_path } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)
            }
            ReplayError::JsonError {
                source,
                file_path,
                line_number,
            } => {
                write!(f, "Invalid script")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)
            }
            ReplayError::Config(err) => write!(f, "Invalid script configuration: {}", err),
            ReplayError::Setup(err) => write!(f, "Replay setup failed: {}", err),
            ReplayError::UnknownSurface { index, role } => write!(
                f,
                "Event {} targets the {} surface, which the script does not define",
                index, role
            ),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::IoError { source, .. } => Some(source),
            ReplayError::JsonError { source, .. } => Some(source),
            ReplayError::Config(err) => Some(err),
            ReplayError::Setup(err) => Some(err),
            ReplayError::UnknownSurface { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LAYOUTS: &str = r#"[
        {
            "id": 1,
            "center": {
                "rect": { "x": 0, "y": 0, "width": 150, "height": 100 },
                "keys": [
                    {
                        "origin": { "x": 0, "y": 0 },
                        "size": { "width": 20, "height": 20 },
                        "action": { "type": "insert", "text": "a" },
                        "label": { "text": "a" }
                    },
                    {
                        "origin": { "x": 20, "y": 0 },
                        "size": { "width": 20, "height": 20 },
                        "action": { "type": "insert", "text": "e" },
                        "label": { "text": "e" },
                        "has_extended_keys": true
                    }
                ]
            }
        }
    ]"#;

    fn script(events: &str) -> String {
        format!(r#"{{ "layouts": {}, "events": {} }}"#, LAYOUTS, events)
    }

    fn key_labels(events: &[GlassEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                GlassEvent::KeyPressed { key, .. } => Some(format!("pressed {}", key.label.text)),
                GlassEvent::KeyReleased { key, .. } => Some(format!("released {}", key.label.text)),
                GlassEvent::KeyExited { key, .. } => Some(format!("exited {}", key.label.text)),
                GlassEvent::KeyLongPressed { key, .. } => {
                    Some(format!("long pressed {}", key.label.text))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_replay_tap() {
        let json = script(
            r#"[
                { "at_ms": 0, "kind": "press", "x": 10, "y": 10 },
                { "at_ms": 60, "kind": "release", "x": 10, "y": 10 }
            ]"#,
        );

        let events = Script::from_json_str(&json).unwrap().run().unwrap();
        assert_eq!(key_labels(&events), vec!["pressed a", "released a"]);
        assert!(
            matches!(events[0], GlassEvent::LayoutCaseChanged { .. }),
            "Replay starts the shift machine first"
        );
    }

    #[test]
    fn test_replay_swipe() {
        let json = script(
            r#"[
                { "at_ms": 0, "kind": "press", "x": 100, "y": 50 },
                { "at_ms": 100, "kind": "move", "x": 40, "y": 50 },
                { "at_ms": 150, "kind": "release", "x": 40, "y": 50 }
            ]"#,
        );

        let events = Script::from_json_str(&json).unwrap().run().unwrap();
        assert!(events.contains(&GlassEvent::SwitchRight { layout: LayoutId(1) }));
        assert!(key_labels(&events).is_empty());
    }

    /// A long press pending after the last event still fires.
    #[test]
    fn test_replay_trailing_long_press() {
        let json = script(r#"[ { "at_ms": 0, "kind": "press", "x": 30, "y": 10 } ]"#);

        let events = Script::from_json_str(&json).unwrap().run().unwrap();
        assert_eq!(key_labels(&events), vec!["pressed e", "exited e", "long pressed e"]);
    }

    #[test]
    fn test_unknown_surface() {
        let json = script(
            r#"[ { "at_ms": 0, "kind": "press", "x": 10, "y": 10, "surface": "extended" } ]"#,
        );

        let err = Script::from_json_str(&json).unwrap().run().unwrap_err();
        assert!(matches!(err, ReplayError::UnknownSurface { index: 0, .. }));
    }

    /// An event timed before its predecessor replays at the predecessor's time.
    #[test]
    fn test_earlier_timestamp_replays_in_order() {
        let json = script(
            r#"[
                { "at_ms": 50, "kind": "press", "x": 10, "y": 10 },
                { "at_ms": 10, "kind": "release", "x": 10, "y": 10 }
            ]"#,
        );

        let events = Script::from_json_str(&json).unwrap().run().unwrap();
        assert_eq!(key_labels(&events), vec!["pressed a", "released a"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let json = format!(
            r#"{{ "config": {{ "swipe_ratio": 2.0 }}, "layouts": {}, "events": [] }}"#,
            LAYOUTS
        );

        let err = Script::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ReplayError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ \"layouts\": [ }}").unwrap();

        let err = Script::load(file.path()).unwrap_err();
        match &err {
            ReplayError::JsonError { file_path, .. } => assert!(file_path.is_some()),
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }
}
