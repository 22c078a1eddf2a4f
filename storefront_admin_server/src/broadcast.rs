//! Real-time fan-out of rendered order cards to connected dashboards.
//!
//! Delivery is best-effort and at-most-once per currently connected dashboard: a client that connects after a
//! broadcast never sees it, there is no acknowledgment or replay, and no failure here may fail the HTTP request
//! that triggered the broadcast.

use std::convert::Infallible;

use actix_web::web::Bytes;
use futures::{stream, Stream};
use log::*;
use tokio::sync::broadcast;

/// The event name dashboards subscribe to.
pub const ORDERS_EVENT: &str = "orders";

const CHANNEL_CAPACITY: usize = 32;

/// Fans rendered order-card fragments out to every currently connected dashboard over a broadcast channel.
///
/// Cloning is cheap; every clone publishes into, and subscribes to, the same channel, so one instance created at
/// startup serves all server workers.
#[derive(Clone)]
pub struct OrderBroadcaster {
    sender: broadcast::Sender<String>,
}

impl Default for OrderBroadcaster {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

impl OrderBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a fragment to all current subscribers. Never fails the caller; with no dashboards connected the
    /// fragment simply evaporates.
    pub fn broadcast(&self, fragment: String) {
        match self.sender.send(fragment) {
            Ok(n) => debug!("📬️ Broadcast an order card to {n} connected dashboards"),
            Err(_) => debug!("📬️ No dashboards connected. Order card dropped."),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// The number of currently connected dashboards.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// A server-sent-events byte stream for one subscriber. Each broadcast fragment becomes one `orders` event;
    /// the stream ends when the broadcaster is dropped.
    pub fn event_stream(&self) -> impl Stream<Item = Result<Bytes, Infallible>> {
        let rx = self.subscribe();
        stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(fragment) => return Some((Ok(Bytes::from(sse_frame(ORDERS_EVENT, &fragment))), rx)),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // A slow dashboard just misses the overrun fragments.
                        debug!("📬️ Dashboard stream lagged. {missed} order cards skipped.");
                        continue;
                    },
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}

/// Frames a payload as one server-sent event. Multi-line payloads become multiple `data:` lines; the EventSource
/// client joins them back together with newlines.
fn sse_frame(event: &str, payload: &str) -> String {
    let mut frame = format!("event: {event}\n");
    for line in payload.lines() {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
    if payload.is_empty() {
        frame.push_str("data:\n");
    }
    frame.push('\n');
    frame
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn every_connected_subscriber_receives_one_copy() {
        let broadcaster = OrderBroadcaster::default();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();
        let mut rx3 = broadcaster.subscribe();
        assert_eq!(broadcaster.receiver_count(), 3);

        broadcaster.broadcast("<article>order</article>".to_string());
        for rx in [&mut rx1, &mut rx2, &mut rx3] {
            assert_eq!(rx.recv().await.unwrap(), "<article>order</article>");
            // Exactly once: nothing further is queued.
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn late_subscribers_receive_nothing() {
        let broadcaster = OrderBroadcaster::default();
        let mut early = broadcaster.subscribe();
        broadcaster.broadcast("first".to_string());
        let mut late = broadcaster.subscribe();
        assert_eq!(early.recv().await.unwrap(), "first");
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcasting_without_subscribers_does_not_fail() {
        let broadcaster = OrderBroadcaster::default();
        broadcaster.broadcast("nobody is listening".to_string());
    }

    #[test]
    fn sse_frames_split_payload_lines() {
        let frame = sse_frame(ORDERS_EVENT, "<article>\n  <h2>#1001</h2>\n</article>");
        assert_eq!(frame, "event: orders\ndata: <article>\ndata:   <h2>#1001</h2>\ndata: </article>\n\n");
        assert_eq!(sse_frame(ORDERS_EVENT, ""), "event: orders\ndata:\n\n");
    }
}
