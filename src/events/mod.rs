use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the services. Consumed in-process by a logging
/// worker; there is no outbound delivery in this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Nakliye events
    NakliyeCreated(Uuid),
    NakliyeUpdated(Uuid),
    NakliyeDeleted(Uuid),

    // Yatan tutar events
    YatanTutarCreated(Uuid),
    YatanTutarUpdated(Uuid),
    YatanTutarDeleted(Uuid),

    // Backup events
    BackupImported { imported: u64, skipped: u64 },

    // Account events
    UserRegistered(Uuid),
    UserVerified(Uuid),
    PasswordReset(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. A full or closed channel is logged and
    /// otherwise ignored; event delivery is best-effort.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to send event: {}", e);
        }
    }
}

/// Drains the event channel, logging each event. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
    info!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        let id = Uuid::new_v4();
        sender.send(Event::NakliyeCreated(id)).await;

        match rx.recv().await {
            Some(Event::NakliyeCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_on_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        sender.send(Event::NakliyeDeleted(Uuid::new_v4())).await;
    }
}
