//! Change notifications for presentation layers.
//!
//! The engine never updates UI-facing state directly. After each successful
//! write it publishes an [`HierarchyEvent`]; subscribers re-fetch whatever
//! they display.

use estate_core::models::Level;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Imported,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum HierarchyEvent {
    EntitiesChanged {
        level: Level,
        change: ChangeKind,
        ids: Vec<String>,
    },
}

pub struct EventBus {
    tx: broadcast::Sender<HierarchyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, level: Level, change: ChangeKind, ids: Vec<String>) {
        let event = HierarchyEvent::EntitiesChanged { level, change, ids };
        // Sending only fails when nobody is listening.
        if self.tx.send(event).is_err() {
            debug!(%level, ?change, "No subscribers for hierarchy event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HierarchyEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();

        bus.publish(Level::Floor, ChangeKind::Imported, vec!["FLR-1".into()]);

        assert_eq!(
            rx.recv().await.unwrap(),
            HierarchyEvent::EntitiesChanged {
                level: Level::Floor,
                change: ChangeKind::Imported,
                ids: vec!["FLR-1".into()],
            }
        );
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new(0);
        bus.publish(Level::Campus, ChangeKind::Deleted, vec!["CMP-1".into()]);
    }
}
