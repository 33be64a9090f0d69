use restkit::SseBroadcaster;

use crate::domain::events::{EventPublisher, PropertyEvent};

/// Event publisher backed by the shared SSE broadcast channel. Sending is
/// synchronous and lossy; subscribers that lag past the channel capacity
/// lose oldest events and recover via snapshot resync.
pub struct SsePublisher {
    broadcaster: SseBroadcaster<PropertyEvent>,
}

impl SsePublisher {
    pub fn new(broadcaster: SseBroadcaster<PropertyEvent>) -> Self {
        Self { broadcaster }
    }
}

impl EventPublisher for SsePublisher {
    fn publish(&self, event: PropertyEvent) {
        self.broadcaster.send(event);
    }
}
