//! Selection notifications
//!
//! The core emits synchronous notifications at selection transitions; it
//! never depends on a listener's return value.

use crate::hit_test::TargetRef;
use crate::pointer::PointerEvent;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Notification emitted by the canvas core
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CanvasEvent {
    /// A multi-object selection (group) came into effect
    SelectionCreated {
        target: TargetRef,
        event: Option<PointerEvent>,
    },

    /// The current selection is about to be cleared
    BeforeSelectionCleared { target: TargetRef },

    /// The current selection was cleared
    SelectionCleared,

    /// A single object became the active one
    ObjectSelected {
        id: Uuid,
        event: Option<PointerEvent>,
    },
}

/// Listener boundary for canvas notifications
///
/// Delivery is synchronous, in emission order.
pub trait EventSink {
    /// Receive one notification
    fn notify(&mut self, event: CanvasEvent);
}

/// Sink that discards every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: CanvasEvent) {}
}

/// Sink that records notifications in order, for inspection
///
/// Clones share the same log, so a clone kept outside the canvas can read
/// what the canvas-owned sink received.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<CanvasEvent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the received notifications, oldest first
    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for RecordingSink {
    fn notify(&mut self, event: CanvasEvent) {
        self.events.borrow_mut().push(event);
    }
}
