//! Hand-off point between the focus cycle and whatever delivers
//! notifications (desktop toast, sound, terminal bell).
//!
//! The core only decides *whether* an event is offered; delivery is the
//! dispatcher's business.

use crate::events::Event;
use crate::storage::NotificationsConfig;

pub trait NotificationDispatcher {
    fn dispatch(&mut self, event: &Event);
}

/// Offer `event` to `dispatcher` if it is a notifying event and
/// notifications are enabled. Returns whether it was dispatched.
pub fn offer<D>(dispatcher: &mut D, config: &NotificationsConfig, event: &Event) -> bool
where
    D: NotificationDispatcher + ?Sized,
{
    if !config.enabled || !event.notifies() {
        return false;
    }
    dispatcher.dispatch(event);
    true
}

/// Writes notifying events to the log.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&mut self, event: &Event) {
        if let Event::PhaseChanged {
            from,
            to,
            completed_work_intervals,
        } = event
        {
            tracing::info!(%from, %to, completed_work_intervals, "phase finished");
        }
    }
}

/// Keeps every dispatched event, in order.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub events: Vec<Event>,
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

impl<F> NotificationDispatcher for F
where
    F: FnMut(&Event),
{
    fn dispatch(&mut self, event: &Event) {
        self(event)
    }
}
