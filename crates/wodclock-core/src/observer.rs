//! State-change listeners.
//!
//! Renderers subscribe to the timer instead of polling it. Listeners run
//! synchronously, in registration order, after every operation that changed
//! the timer state.

use std::fmt;

use wodclock_proto::TimerState;

use crate::timer::TimerEvent;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TimerState, &[TimerEvent]) + Send>;

/// Registry of state-change listeners.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl Observers {
    /// Register `listener`.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TimerState, &[TimerEvent]) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Invoke every listener.
    pub fn notify(&mut self, state: &TimerState, events: &[TimerEvent]) {
        for (_, listener) in &mut self.listeners {
            listener(state, events);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("listeners", &self.listeners.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn unsubscribed_listener_stops_hearing() {
        let mut observers = Observers::default();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&calls);
        let a = observers.subscribe(move |_, _| first.lock().unwrap().push("a"));
        let second = Arc::clone(&calls);
        observers.subscribe(move |_, _| second.lock().unwrap().push("b"));

        let state = TimerState::default();
        observers.notify(&state, &[TimerEvent::Started]);
        assert!(observers.unsubscribe(a));
        assert!(!observers.unsubscribe(a));
        observers.notify(&state, &[TimerEvent::Resumed]);

        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "b"]);
        assert_eq!(observers.len(), 1);
    }
}
