//! Slice reducers and the root reducer that composes them
//!
//! A reducer is a pure function from (previous state, action) to next state.
//! Slice reducers own one field of [`State`]; [`RootReducer`] routes every
//! action to every slice and assembles the next tree.
//!
//! When an action does not concern a slice the reducer returns its input
//! unchanged. For the sequence slices that means the very same `Arc`, so
//! `Arc::ptr_eq` can be used to detect "nothing happened here".

use crate::{Action, Animal, Animals, People, Person, State};
use std::sync::Arc;

/// A pure state transition function
pub trait Reducer {
    /// The state this reducer owns
    type State;

    /// The value used when there is no previous state
    fn initial_state(&self) -> Self::State;

    /// Compute the next state; must not mutate `state` or cause side effects
    fn reduce(&self, state: &Self::State, action: &Action) -> Self::State;
}

impl<R: Reducer + ?Sized> Reducer for Box<R> {
    type State = R::State;

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn reduce(&self, state: &Self::State, action: &Action) -> Self::State {
        (**self).reduce(state, action)
    }
}

/// Reducer for the `count` slice
#[derive(Debug, Clone, Copy, Default)]
pub struct CountReducer;

impl Reducer for CountReducer {
    type State = i64;

    fn initial_state(&self) -> i64 {
        0
    }

    fn reduce(&self, count: &i64, action: &Action) -> i64 {
        match action {
            Action::IncreaseCount { increase_by } => count.saturating_add(*increase_by),
            Action::ReduceCount { reduce_by } => count.saturating_sub(*reduce_by),
            Action::ResetCount => 0,
            Action::SetCount { set_count_to } => *set_count_to,
            _ => *count,
        }
    }
}

/// Reducer for the `people` slice
#[derive(Debug, Clone, Copy, Default)]
pub struct PeopleReducer;

impl Reducer for PeopleReducer {
    type State = People;

    fn initial_state(&self) -> People {
        Arc::from(Vec::new())
    }

    fn reduce(&self, people: &People, action: &Action) -> People {
        match action {
            Action::AddPerson {
                name,
                age,
                occupation,
                location,
            } => append(
                people,
                Person {
                    name: name.clone(),
                    age: *age,
                    occupation: occupation.clone(),
                    location: location.clone(),
                },
            ),
            Action::RemovePerson { name } => retain(people, |p| p.name != *name),
            _ => Arc::clone(people),
        }
    }
}

/// Reducer for the `animals` slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimalsReducer;

impl Reducer for AnimalsReducer {
    type State = Animals;

    fn initial_state(&self) -> Animals {
        Arc::from(Vec::new())
    }

    fn reduce(&self, animals: &Animals, action: &Action) -> Animals {
        match action {
            Action::AddAnimal {
                name,
                species,
                breed,
                age,
            } => append(
                animals,
                Animal {
                    name: name.clone(),
                    species: species.clone(),
                    breed: breed.clone(),
                    age: *age,
                },
            ),
            Action::RemoveAnimal { name } => retain(animals, |a| a.name != *name),
            _ => Arc::clone(animals),
        }
    }
}

/// New sequence with `item` at the end
fn append<T: Clone>(items: &Arc<[T]>, item: T) -> Arc<[T]> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    Arc::from(next)
}

/// New sequence holding the items that pass `keep`, in order
fn retain<T: Clone>(items: &Arc<[T]>, keep: impl Fn(&T) -> bool) -> Arc<[T]> {
    items.iter().filter(|item| keep(item)).cloned().collect()
}

/// Combines the three slice reducers into one reducer over [`State`]
///
/// The slice set is fixed at construction. Each slice reducer sees only its
/// own field; all of them see every action.
#[derive(Debug, Clone, Default)]
pub struct RootReducer<C = CountReducer, P = PeopleReducer, A = AnimalsReducer> {
    count: C,
    people: P,
    animals: A,
}

impl RootReducer {
    /// The stock reducers
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C, P, A> RootReducer<C, P, A> {
    /// Slice keys, in the order they are reduced
    pub const SLICES: [&'static str; 3] = ["count", "people", "animals"];
}

/// Build a root reducer from one reducer per slice
pub fn combine_reducers<C, P, A>(count: C, people: P, animals: A) -> RootReducer<C, P, A>
where
    C: Reducer<State = i64>,
    P: Reducer<State = People>,
    A: Reducer<State = Animals>,
{
    RootReducer {
        count,
        people,
        animals,
    }
}

impl<C, P, A> Reducer for RootReducer<C, P, A>
where
    C: Reducer<State = i64>,
    P: Reducer<State = People>,
    A: Reducer<State = Animals>,
{
    type State = State;

    fn initial_state(&self) -> State {
        State {
            count: self.count.initial_state(),
            people: self.people.initial_state(),
            animals: self.animals.initial_state(),
        }
    }

    fn reduce(&self, state: &State, action: &Action) -> State {
        State {
            count: self.count.reduce(&state.count, action),
            people: self.people.reduce(&state.people, action),
            animals: self.animals.reduce(&state.animals, action),
        }
    }
}
