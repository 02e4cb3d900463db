// SPDX-License-Identifier: GPL-3.0-only

//! Glass Replay
//!
//! Replays a pointer session script through the input core and prints every
//! emitted event as one JSON object per line.
//!
//! ```text
//! glass-replay <script.json>
//! ```
//!
//! Set `RUST_LOG=cosboard_glass=debug` to trace gesture recognition.

use std::process::ExitCode;

use cosboard_glass::{app_settings, replay::Script};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(app_settings::DEFAULT_LOG_DIRECTIVE.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: glass-replay <script.json>");
        return ExitCode::from(2);
    };

    let events = match Script::load(&path).and_then(|script| script.run()) {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Replay of {} failed: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Replayed {}: {} events", path, events.len());

    for event in &events {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                tracing::error!("Failed to serialize {:?}: {}", event, e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
