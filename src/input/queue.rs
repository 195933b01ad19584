/// Control intents the simulation understands. Device handling lives in the
/// host; by the time an event lands here it is already a decoded intent.
#[derive(Debug, Clone, Copy)]
pub enum ControlEvent {
    /// Steer the character along the given horizontal direction.
    /// The vector does not need to be normalized; zero means no input.
    Move { x: f32, z: f32 },
    /// Release all movement input.
    Stop,
}

/// A queue of control events.
/// The host writes intents into the queue; the world drains them each tick.
pub struct ControlQueue {
    events: Vec<ControlEvent>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    /// Push a new control event (called from the host between ticks).
    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &ControlEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
