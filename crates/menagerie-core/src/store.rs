//! The store: owner of the current state
//!
//! All writes go through [`Store::dispatch`], which runs the root reducer,
//! commits the result and then calls every subscriber, all before returning.
//! `Store` is a cheap, cloneable handle to a single shared container; clone
//! it to hand the same store to several consumers.

use crate::{identity::ListenerId, Action, Error, Reducer, Result, RootReducer};
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tracing::{debug, trace, warn};

#[cfg(feature = "journal")]
use crate::Journal;

type Listener = Rc<dyn Fn()>;
type Listeners = RefCell<IndexMap<ListenerId, Listener>>;

struct Inner<R: Reducer> {
    reducer: R,
    state: RefCell<Arc<R::State>>,
    listeners: Rc<Listeners>,
    next_listener_id: Cell<u64>,
    dispatching: Cell<bool>,
    dispatch_count: Cell<u64>,
    #[cfg(feature = "journal")]
    journal: RefCell<Option<Journal<R::State>>>,
}

/// A single-threaded state container
pub struct Store<R: Reducer = RootReducer> {
    inner: Rc<Inner<R>>,
}

impl<R: Reducer> Store<R> {
    /// Create a store seeded from the reducer's initial state
    pub fn new(reducer: R) -> Self {
        let initial = reducer.initial_state();
        Self::with_state(reducer, initial)
    }

    /// Create a store from a preloaded state
    ///
    /// The preloaded state is still passed through the reducer once with
    /// [`Action::Init`].
    pub fn with_state(reducer: R, preloaded: R::State) -> Self {
        let state = reducer.reduce(&preloaded, &Action::Init);

        Self {
            inner: Rc::new(Inner {
                reducer,
                state: RefCell::new(Arc::new(state)),
                listeners: Rc::new(RefCell::new(IndexMap::new())),
                next_listener_id: Cell::new(0),
                dispatching: Cell::new(false),
                dispatch_count: Cell::new(0),
                #[cfg(feature = "journal")]
                journal: RefCell::new(None),
            }),
        }
    }

    /// The current state snapshot
    pub fn get_state(&self) -> Arc<R::State> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Apply a selector to the current state
    pub fn select<T>(&self, selector: impl FnOnce(&R::State) -> T) -> T {
        selector(&self.get_state())
    }

    /// Reduce `action`, commit the result and notify subscribers
    ///
    /// Returns the dispatched action. Fails with [`Error::ReentrantDispatch`]
    /// when called from a reducer or a listener of this store, or from inside
    /// [`Store::with_journal`].
    pub fn dispatch(&self, action: Action) -> Result<Action> {
        let Some(_guard) = DispatchGuard::enter(&self.inner.dispatching) else {
            warn!(action = action.kind(), "rejected dispatch while dispatching");
            return Err(Error::ReentrantDispatch);
        };

        // The journal must be writable before anything is committed.
        #[cfg(feature = "journal")]
        if self.inner.journal.try_borrow_mut().is_err() {
            warn!(action = action.kind(), "rejected dispatch while the journal is borrowed");
            return Err(Error::ReentrantDispatch);
        }

        let current = self.get_state();
        let next = Arc::new(self.inner.reducer.reduce(&current, &action));
        *self.inner.state.borrow_mut() = Arc::clone(&next);

        let seq = self.inner.dispatch_count.get() + 1;
        self.inner.dispatch_count.set(seq);
        debug!(seq, action = action.kind(), "dispatch committed");

        #[cfg(feature = "journal")]
        if let Some(journal) = self.inner.journal.borrow_mut().as_mut() {
            journal.record_dispatch(seq, &action, &next);
        }

        self.notify();
        Ok(action)
    }

    /// Validate a raw action record and dispatch it
    ///
    /// Fails with [`Error::InvalidAction`] before touching the state when the
    /// record is not an object with a non-empty `type`, or when a known type
    /// is missing its payload.
    pub fn dispatch_record(&self, record: Value) -> Result<Action> {
        let action = Action::from_record(record).inspect_err(|e| debug!(error = %e, "rejected record"))?;
        self.dispatch(action)
    }

    /// Register a listener called after every committed dispatch
    ///
    /// Dropping the returned handle does not unsubscribe.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = ListenerId::new(self.inner.next_listener_id.get());
        self.inner.next_listener_id.set(id.raw() + 1);
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        trace!(%id, "subscribed");

        Subscription {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
            active: Cell::new(true),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Number of committed dispatches since construction
    pub fn dispatch_count(&self) -> u64 {
        self.inner.dispatch_count.get()
    }

    /// Whether a dispatch is currently running
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.get()
    }

    fn notify(&self) {
        // Snapshot first: listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self.inner.listeners.borrow().values().cloned().collect();
        trace!(listeners = listeners.len(), "notifying");
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(feature = "journal")]
impl<R: Reducer> Store<R> {
    /// Attach a journal; it records every later dispatch
    ///
    /// A recording journal gets a snapshot of the current state so its
    /// dispatches can be replayed from a known point.
    ///
    /// # Panics
    ///
    /// Panics when called from inside [`Store::with_journal`].
    pub fn attach_journal(&self, mut journal: Journal<R::State>) {
        if journal.is_recording() {
            journal.take_snapshot(self.dispatch_count(), &self.get_state());
        }
        *self.inner.journal.borrow_mut() = Some(journal);
    }

    /// Remove and return the attached journal
    ///
    /// Returns `None` when called from inside [`Store::with_journal`].
    pub fn detach_journal(&self) -> Option<Journal<R::State>> {
        self.inner.journal.try_borrow_mut().ok()?.take()
    }

    /// Read the attached journal
    pub fn with_journal<T>(&self, f: impl FnOnce(&Journal<R::State>) -> T) -> Option<T> {
        self.inner.journal.borrow().as_ref().map(f)
    }

    /// Append a metadata note at the current dispatch position
    ///
    /// The note is dropped when called from inside [`Store::with_journal`].
    pub fn record_metadata(&self, key: impl Into<String>, value: impl Into<String>) {
        let seq = self.dispatch_count();
        let Ok(mut slot) = self.inner.journal.try_borrow_mut() else {
            warn!(seq, "journal busy; metadata dropped");
            return;
        };
        if let Some(journal) = slot.as_mut() {
            journal.record_metadata(seq, key, value);
        }
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: Reducer + Default> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: Reducer> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("dispatch_count", &self.dispatch_count())
            .field("listeners", &self.listener_count())
            .field("dispatching", &self.is_dispatching())
            .finish()
    }
}

/// Handle returned by [`Store::subscribe`]
pub struct Subscription {
    id: ListenerId,
    listeners: Weak<Listeners>,
    active: Cell<bool>,
}

impl Subscription {
    /// Deregister the listener; later calls are no-ops
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().shift_remove(&self.id);
            trace!(id = %self.id, "unsubscribed");
        }
    }

    /// The id of the registration this handle controls
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether `unsubscribe` has not been called yet
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

/// Marks a dispatch in progress; the flag is cleared on drop, including unwinds
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
