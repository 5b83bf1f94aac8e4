//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CharacterEvent, JobEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Job lifecycle on every character queue
    Job,
    /// Character snapshot changes
    Character,
}

impl Topic {
    const ALL: [Topic; 2] = [Topic::Job, Topic::Character];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Job(JobEvent),
    Character(CharacterEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Job(_) => Topic::Job,
            Event::Character(_) => Topic::Character,
        }
    }
}

impl From<JobEvent> for Event {
    fn from(event: JobEvent) -> Self {
        Event::Job(event)
    }
}

impl From<CharacterEvent> for Event {
    fn from(event: CharacterEvent) -> Self {
        Event::Character(event)
    }
}

/// Topic-based event bus
///
/// Channels are created once per topic, so publishing and subscribing never
/// take a lock. Publishing is best-effort.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .iter()
            .map(|topic| (*topic, broadcast::channel(capacity.max(1)).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created in the constructor.
            None => broadcast::channel(1).1,
        }
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut characters = bus.subscribe(Topic::Character);

        bus.publish(JobEvent::Purged {
            character: "ada".into(),
            job_ids: vec![],
        });
        bus.publish(CharacterEvent::Resynced {
            character: "ada".into(),
        });

        let event = characters.recv().await.expect("event delivered");
        assert!(matches!(
            event,
            Event::Character(CharacterEvent::Resynced { .. })
        ));
        assert!(characters.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        EventBus::new().publish(CharacterEvent::Resynced {
            character: "ada".into(),
        });
    }
}
