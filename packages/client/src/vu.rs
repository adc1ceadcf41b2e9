//! Virtual user context.

use std::rc::Rc;

use crate::event_loop::EventLoop;

/// One virtual user: an id and the event loop its script runs on.
///
/// Cheap to clone; clones share the same loop. Stays on the VU thread.
#[derive(Debug, Clone)]
pub struct Vu {
    id: u64,
    event_loop: Rc<EventLoop>,
}

impl Vu {
    pub fn new(id: u64) -> Self {
        Self::with_event_loop(id, Rc::new(EventLoop::new()))
    }

    pub fn with_event_loop(id: u64, event_loop: Rc<EventLoop>) -> Self {
        Self { id, event_loop }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }
}
