// SPDX-License-Identifier: GPL-3.0-only

//! Consumers of semantic events.
//!
//! Any `FnMut(&GlassEvent)` closure is a listener. [`ChannelListener`] forwards
//! events into an unbounded channel for hosts that process them on another
//! task.

use futures::channel::mpsc;

use crate::event::GlassEvent;

/// Receives every semantic event the router emits, in emission order.
pub trait GlassListener {
    fn on_event(&mut self, event: &GlassEvent);
}

impl<F> GlassListener for F
where
    F: FnMut(&GlassEvent),
{
    fn on_event(&mut self, event: &GlassEvent) {
        self(event)
    }
}

/// Forwards events into a channel.
///
/// Events are dropped with an error log once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    event_tx: mpsc::UnboundedSender<GlassEvent>,
}

impl ChannelListener {
    /// Creates a listener sending into `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<GlassEvent>) -> Self {
        Self { event_tx }
    }

    /// Creates a listener together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GlassEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded();
        (Self::new(event_tx), event_rx)
    }
}

impl GlassListener for ChannelListener {
    fn on_event(&mut self, event: &GlassEvent) {
        if let Err(e) = self.event_tx.unbounded_send(event.clone()) {
            tracing::error!("Failed to forward {:?}: {}", event, e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &GlassEvent| seen.push(event.clone());
            listener.on_event(&GlassEvent::ShiftPressed);
            listener.on_event(&GlassEvent::KeyboardClosed);
        }
        assert_eq!(seen, vec![GlassEvent::ShiftPressed, GlassEvent::KeyboardClosed]);
    }

    #[tokio::test]
    async fn test_channel_listener_forwards_in_order() {
        let (mut listener, mut rx) = ChannelListener::channel();

        listener.on_event(&GlassEvent::ShiftPressed);
        listener.on_event(&GlassEvent::ShiftReleased);
        drop(listener);

        assert_eq!(rx.next().await, Some(GlassEvent::ShiftPressed));
        assert_eq!(rx.next().await, Some(GlassEvent::ShiftReleased));
        assert_eq!(rx.next().await, None, "Stream ends when the listener is dropped");
    }

    #[test]
    fn test_channel_listener_closed_receiver() {
        let (mut listener, rx) = ChannelListener::channel();
        drop(rx);

        // Must not panic.
        listener.on_event(&GlassEvent::KeyboardClosed);
    }
}
