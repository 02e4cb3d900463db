// SPDX-License-Identifier: GPL-3.0-only

//! Async host loop for the input core.
//!
//! Hosts that receive pointer events on a channel can hand the channel to
//! [`run`], which feeds every event to the façade and wakes up on its own when
//! a long press is due. Everything still happens on the calling task, so
//! pointer events and timer fires never interleave.

use std::time::Instant;

use futures::channel::mpsc;
use futures::StreamExt;

use crate::event::PointerEvent;
use crate::router::Glass;

/// Drives `glass` until every sender of `events` is dropped.
pub async fn run(glass: &mut Glass, mut events: mpsc::Receiver<PointerEvent>) {
    tracing::debug!("Input driver started");

    loop {
        let deadline = glass.next_deadline();
        let timer = async move {
            match deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = events.next() => match event {
                Some(event) => {
                    glass.handle_pointer_event(&event);
                }
                None => break,
            },
            () = timer => {
                glass.poll_timers(Instant::now());
            }
        }
    }

    tracing::debug!("Input driver stopped: pointer event channel closed");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlassConfig;
    use crate::event::GlassEvent;
    use crate::geometry::{Point, Rect, Size};
    use crate::layout::{Key, KeyAction, KeyArea, Layout, LayoutId};
    use crate::router::ChannelListener;
    use crate::surface::{FixedSurface, ViewportId};
    use std::time::Duration;

    const VIEWPORT: ViewportId = ViewportId(1);

    fn glass(long_press_ms: u64) -> Glass {
        let config = GlassConfig {
            long_press_ms,
            ..GlassConfig::default()
        };
        let mut glass = Glass::new(config);
        glass
            .set_surface(Box::new(FixedSurface::new(VIEWPORT, Point::ZERO)))
            .unwrap();

        let key = Key::new(
            Point::ZERO,
            Size::new(20.0, 20.0),
            KeyAction::Insert("e".into()),
            "e",
        )
        .with_extended_keys();
        glass.add_layout(Layout::new(
            LayoutId(1),
            KeyArea::new(Rect::new(0.0, 0.0, 100.0, 50.0), vec![key]),
        ));
        glass
    }

    #[tokio::test]
    async fn test_run_stops_when_channel_closes() {
        let mut glass = glass(300);
        let (tx, rx) = mpsc::channel::<PointerEvent>(4);
        drop(tx);

        run(&mut glass, rx).await;
        assert!(glass.active_keys().is_empty());
    }

    /// The driver fires a long press without any further pointer event.
    #[tokio::test]
    async fn test_run_fires_long_press() {
        let mut glass = glass(20);
        let (listener, event_rx) = ChannelListener::channel();
        glass.add_listener(listener);

        let (mut tx, rx) = mpsc::channel::<PointerEvent>(4);
        let sender = tokio::spawn(async move {
            tx.try_send(PointerEvent::press(
                Point::new(10.0, 10.0),
                VIEWPORT,
                Instant::now(),
            ))
            .unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            drop(tx);
        });

        run(&mut glass, rx).await;
        sender.await.unwrap();
        drop(glass);

        let events: Vec<GlassEvent> = event_rx.collect().await;
        assert!(
            matches!(events.last(), Some(GlassEvent::KeyLongPressed { .. })),
            "Expected a long press, got {:?}",
            events
        );
    }
}
