//! Lifecycle hook lists
//!
//! An [`EventBus`] is an ordered list of listeners. Listeners run in
//! registration order. On a cancellable bus the first listener returning
//! `false` stops the run and `fire` reports the event as cancelled.

type Listener<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

/// Handle returned by [`EventBus::listen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct EventBus<A> {
    listeners: Vec<(ListenerId, Listener<A>)>,
    break_on_false: bool,
    next_id: u64,
}

impl<A> EventBus<A> {
    /// A bus whose listeners can veto by returning `false`
    pub fn cancellable() -> Self {
        Self {
            listeners: Vec::new(),
            break_on_false: true,
            next_id: 0,
        }
    }

    /// A bus whose listeners are only notified
    pub fn notification() -> Self {
        Self {
            listeners: Vec::new(),
            break_on_false: false,
            next_id: 0,
        }
    }

    pub fn is_cancellable(&self) -> bool {
        self.break_on_false
    }

    pub fn listen<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Run the listeners with `args`.
    ///
    /// Returns `false` only on a cancellable bus when a listener vetoed.
    pub fn fire(&self, args: &A) -> bool {
        for (_, listener) in &self.listeners {
            if !listener(args) && self.break_on_false {
                return false;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<A> std::fmt::Debug for EventBus<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("break_on_false", &self.break_on_false)
            .finish()
    }
}
