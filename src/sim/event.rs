//! Semantic game events
//!
//! Collision reports from the physics engine are translated into these
//! variants, queued, and drained by the state machine once per tick.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// An event the state machine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player overlapped an active collectible
    PlayerCollectedItem { item: EntityId },
    /// The player touched a hazard
    PlayerHitHazard { hazard: EntityId },
    /// An entity started or stopped resting on a surface
    EntityRestingOnPlatform { entity: EntityId, resting: bool },
    /// The restart prompt was activated
    RestartRequested,
}

/// Events queued between ticks.
///
/// Identical events are coalesced until the next drain, so a pair the engine
/// reports several times in one tick yields a single event. Resting reports
/// carry state instead: a newer one for the same entity replaces the pending
/// one.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Queue an event. Returns false if an identical event is already pending.
    pub fn push(&mut self, event: GameEvent) -> bool {
        if let GameEvent::EntityRestingOnPlatform { entity, .. } = event {
            self.events.retain(|pending| {
                !matches!(pending, GameEvent::EntityRestingOnPlatform { entity: e, .. } if *e == entity)
            });
            self.events.push(event);
            return true;
        }
        if self.events.contains(&event) {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_coalesce_until_drain() {
        let mut queue = EventQueue::new();
        let event = GameEvent::PlayerCollectedItem { item: EntityId(3) };
        assert!(queue.push(event));
        assert!(!queue.push(event));
        assert!(queue.push(GameEvent::PlayerCollectedItem { item: EntityId(4) }));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());

        // Same pair may fire again next tick
        assert!(queue.push(event));
    }

    #[test]
    fn test_latest_resting_report_wins() {
        let mut queue = EventQueue::new();
        let resting = |entity, resting| GameEvent::EntityRestingOnPlatform { entity, resting };
        queue.push(resting(EntityId(1), true));
        queue.push(resting(EntityId(2), true));
        queue.push(resting(EntityId(1), false));
        assert!(queue.push(resting(EntityId(1), true)));
        assert_eq!(
            queue.drain(),
            vec![resting(EntityId(2), true), resting(EntityId(1), true)]
        );
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::RestartRequested);
        queue.push(GameEvent::PlayerHitHazard { hazard: EntityId(1) });
        assert_eq!(
            queue.drain(),
            vec![
                GameEvent::RestartRequested,
                GameEvent::PlayerHitHazard { hazard: EntityId(1) }
            ]
        );
    }
}
