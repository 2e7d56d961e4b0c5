//! Menagerie Core - single-tree state container
//!
//! This crate provides the state container and everything it needs:
//! - Actions (`Action`) and their creator functions
//! - The state tree (`State`, `Person`, `Animal`) and selectors
//! - Slice reducers and the `RootReducer` that composes them
//! - The `Store`: dispatch, subscribe, get_state
//!
//! ## Data Flow
//!
//! ```text
//! dispatch(action) -> RootReducer -> count / people / animals reducers
//!                  -> commit new State -> notify subscribers in order
//! ```
//!
//! ```
//! use menagerie_core::{increase_count, set_count, RootReducer, Store};
//!
//! let store = Store::new(RootReducer::new());
//! store.dispatch(increase_count(2)).unwrap();
//! store.dispatch(set_count(76)).unwrap();
//! assert_eq!(store.get_state().count, 76);
//! ```
//!
//! ## Journal Feature
//!
//! Enable the `journal` feature to record every committed dispatch:
//! ```toml
//! menagerie-core = { version = "0.1", features = ["journal"] }
//! ```

pub mod action;
mod error;
mod identity;
mod model;
pub mod reducer;
mod store;

#[cfg(feature = "journal")]
pub mod journal;

pub use action::{
    add_animal, add_person, increase_count, reduce_count, remove_animal, remove_person,
    reset_count, set_count, Action, ActionType, AnimalDraft,
};
pub use error::{Error, Result};
pub use identity::{ListenerId, SnapshotId};
pub use model::{select_animals, select_count, select_people, Animal, Animals, People, Person, State};
pub use reducer::{
    combine_reducers, AnimalsReducer, CountReducer, PeopleReducer, Reducer, RootReducer,
};
pub use store::{Store, Subscription};

#[cfg(feature = "journal")]
pub use journal::{Journal, JournalConfig, JournalEntry, JournalStats, Seq, Snapshot};
