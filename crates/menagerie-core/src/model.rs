//! The state tree and its records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A person tracked by the `people` slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: Option<f64>,
    pub occupation: Option<String>,
    pub location: Option<String>,
}

/// An animal tracked by the `animals` slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: Option<u32>,
}

/// Ordered, immutable sequence of people
///
/// Updates always allocate a new backing slice; an untouched slice is shared
/// by pointer between successive states.
pub type People = Arc<[Person]>;

/// Ordered, immutable sequence of animals
pub type Animals = Arc<[Animal]>;

/// The complete state tree
///
/// A `State` is never mutated after it is published by the store. Every
/// committed dispatch produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Running counter
    pub count: i64,
    /// People in insertion order
    pub people: People,
    /// Animals in insertion order
    pub animals: Animals,
}

impl State {
    /// Create the empty state: `count = 0`, no people, no animals
    pub fn new() -> Self {
        Self {
            count: 0,
            people: Arc::from(Vec::new()),
            animals: Arc::from(Vec::new()),
        }
    }

    /// Find a person by exact name
    pub fn person(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.name == name)
    }

    /// Find an animal by exact name
    pub fn animal(&self, name: &str) -> Option<&Animal> {
        self.animals.iter().find(|a| a.name == name)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} people={} animals={}",
            self.count,
            self.people.len(),
            self.animals.len()
        )
    }
}

/// Selector for the `count` slice
pub fn select_count(state: &State) -> i64 {
    state.count
}

/// Selector for the `people` slice
pub fn select_people(state: &State) -> People {
    Arc::clone(&state.people)
}

/// Selector for the `animals` slice
pub fn select_animals(state: &State) -> Animals {
    Arc::clone(&state.animals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = State::new();
        assert_eq!(state.count, 0);
        assert!(state.people.is_empty());
        assert!(state.animals.is_empty());
        assert_eq!(state.to_string(), "count=0 people=0 animals=0");
    }

    #[test]
    fn test_lookup_is_exact() {
        let state = State {
            people: Arc::from(vec![Person {
                name: "Steve".to_string(),
                age: Some(30.0),
                occupation: None,
                location: None,
            }]),
            ..State::new()
        };

        assert!(state.person("Steve").is_some());
        assert!(state.person("steve").is_none());
        assert!(state.person("Steve ").is_none());
    }

    #[test]
    fn test_selectors_share_slices() {
        let state = State::new();
        assert!(Arc::ptr_eq(&select_people(&state), &state.people));
        assert!(Arc::ptr_eq(&select_animals(&state), &state.animals));
        assert_eq!(select_count(&state), 0);
    }

    #[test]
    fn test_state_ron_shape() {
        let state = State::new();
        let text = ron::to_string(&state).unwrap();
        let back: State = ron::from_str(&text).unwrap();
        assert_eq!(back, state);
    }
}
