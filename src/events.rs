//! Simulation event system for decoupled communication with the host.
//!
//! Systems push events while a tick runs; the host drains them afterwards to
//! spawn projectiles, play effects or update its own bookkeeping.

use crate::components::AgentState;
use crate::error::GenerationError;
use glam::Vec3;
use hecs::Entity;

/// Events the simulation emits for its collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A bot fired toward `direction` (horizontal unit vector)
    AttackFired {
        entity: Entity,
        origin: Vec3,
        direction: Vec3,
    },
    /// A bot switched behavioural state
    StateChanged {
        entity: Entity,
        from: AgentState,
        to: AgentState,
    },
    /// A bot lost health
    Damaged {
        entity: Entity,
        amount: i32,
        remaining: i32,
    },
    /// A bot's health reached zero and its death sequence began
    AgentDied {
        entity: Entity,
        position: Vec3,
    },
    /// A bot left the world, after its death sequence or because the map
    /// was regenerated
    AgentRemoved {
        entity: Entity,
    },
    /// A new map was generated and published. Every bot of the old map has
    /// already been reported with `AgentRemoved`.
    MapRegenerated {
        generation: u64,
        seed: u64,
    },
    /// Spawn placement fell short; the missing bots were skipped
    SpawnSkipped {
        error: GenerationError,
    },
}

/// Simple event queue - events are pushed during a tick, drained by the host
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Peek at pending events without consuming them
    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
