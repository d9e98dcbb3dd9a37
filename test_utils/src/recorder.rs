//! Records grid notifications for later inspection.

use std::cell::RefCell;
use std::rc::Rc;

use warden::grid::{GridEventKind, SubscriptionId};
use warden::{EntityTracker, GridEvent};

/// Every notification raised by a tracker since attachment.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GridEvent>>>,
    subscriptions: Vec<SubscriptionId>,
}

impl EventLog {
    /// Subscribes to all three event kinds on `tracker`.
    pub fn attach(tracker: &mut EntityTracker) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let record = |sink: Rc<RefCell<Vec<GridEvent>>>| {
            move |event: &GridEvent| sink.borrow_mut().push(*event)
        };
        let subscriptions = vec![
            tracker.on_registered(record(Rc::clone(&events))),
            tracker.on_moved(record(Rc::clone(&events))),
            tracker.on_unregistered(record(Rc::clone(&events))),
        ];
        Self {
            events,
            subscriptions,
        }
    }

    /// Removes the subscriptions, keeping what was recorded.
    pub fn detach(&mut self, tracker: &mut EntityTracker) {
        for id in self.subscriptions.drain(..) {
            tracker.unsubscribe(id);
        }
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<GridEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events of `kind`.
    pub fn count(&self, kind: GridEventKind) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }

    /// Total number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
