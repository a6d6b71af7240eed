//! Body event notifications
//!
//! The physics pass records state transitions (landing, leaving the ground,
//! bumping a ceiling, jumping) into an [`EventQueue`]. After the pass the
//! queue is dispatched to registered handlers. Key principles:
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration per event type (only interested handlers are notified)
//! - Fire-and-forget: nothing a handler does can fail or alter the tick

use std::collections::HashMap;

use crate::ecs::Entity;

/// Event type identification, used for handler registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyEventType {
    /// Body touched a floor-like surface while falling
    Landed,
    /// Grounded body lost its floor
    LeftGround,
    /// Falling body hit a ceiling-like surface while moving up
    HitCeiling,
    /// Controlled body jumped
    Jumped,
    /// Body dropped below the kill plane and was removed
    FellOutOfWorld,
}

/// What happened to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyEventKind {
    /// Landed on a floor
    Landed {
        /// Speed into the floor at the moment of contact
        impact_speed: f32,
    },
    /// Walked off a ledge
    LeftGround,
    /// Bumped a ceiling on the way up
    HitCeiling,
    /// Jumped off the ground
    Jumped,
    /// Removed after crossing the kill plane
    FellOutOfWorld {
        /// Height at which the body was caught
        z: f32,
    },
}

impl BodyEventKind {
    /// Registration key for this kind
    pub fn event_type(&self) -> BodyEventType {
        match self {
            Self::Landed { .. } => BodyEventType::Landed,
            Self::LeftGround => BodyEventType::LeftGround,
            Self::HitCeiling => BodyEventType::HitCeiling,
            Self::Jumped => BodyEventType::Jumped,
            Self::FellOutOfWorld { .. } => BodyEventType::FellOutOfWorld,
        }
    }
}

/// A state transition of one body during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyEvent {
    /// Body the event concerns
    pub entity: Entity,
    /// Tick during which it happened
    pub tick: u64,
    /// What happened
    pub kind: BodyEventKind,
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait BodyEventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &BodyEvent) -> bool;
}

/// Queue of events raised during a tick plus the handlers they go to
#[derive(Default)]
pub struct EventQueue {
    pending: Vec<BodyEvent>,
    handlers: HashMap<BodyEventType, Vec<Box<dyn BodyEventHandler>>>,
    dispatched: u64,
}

impl EventQueue {
    /// Create an empty queue with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event type
    pub fn register_handler(&mut self, event_type: BodyEventType, handler: Box<dyn BodyEventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Register the same handler logic for every event type
    pub fn register_for_all<H>(&mut self, mut make: impl FnMut() -> H)
    where
        H: BodyEventHandler + 'static,
    {
        for event_type in [
            BodyEventType::Landed,
            BodyEventType::LeftGround,
            BodyEventType::HitCeiling,
            BodyEventType::Jumped,
            BodyEventType::FellOutOfWorld,
        ] {
            self.register_handler(event_type, Box::new(make()));
        }
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: BodyEvent) {
        self.pending.push(event);
    }

    /// Events waiting for dispatch
    pub fn pending(&self) -> &[BodyEvent] {
        &self.pending
    }

    /// Total events delivered so far
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }

    /// Deliver pending events in the order they were raised
    ///
    /// Returns the delivered events so callers can inspect what happened
    /// during the tick.
    pub fn dispatch(&mut self) -> Vec<BodyEvent> {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            self.dispatch_event(event);
        }
        self.dispatched += events.len() as u64;
        events
    }

    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &BodyEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind.event_type()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Drop pending events, keeping handlers
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending.len())
            .field("handler_types", &self.handlers.len())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}
