//! Actions and the creators that build them
//!
//! An [`Action`] is plain data: one variant per intent, each carrying only its
//! payload. On the wire (journal exports, raw records handed to
//! [`Store::dispatch_record`](crate::Store::dispatch_record)) an action is a
//! record with a `type` discriminant and camelCase payload fields:
//!
//! ```text
//! {"type": "INCREASE_COUNT", "increaseBy": 2}
//! {"type": "ADD_PERSON", "name": "Nat", "age": 28, "occupation": "Doctor", "location": "Singapore"}
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name given to an animal when the creator is not told otherwise
pub const DEFAULT_ANIMAL_NAME: &str = "No name";
/// Species given to an animal when the creator is not told otherwise
pub const DEFAULT_ANIMAL_SPECIES: &str = "No species";
/// Breed given to an animal when the creator is not told otherwise
pub const DEFAULT_ANIMAL_BREED: &str = "No breed";

/// An intent to change the state tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Seeds the store; matched by no reducer
    #[serde(rename = "@@INIT")]
    Init,

    #[serde(rename = "ADD_ANIMAL")]
    AddAnimal {
        name: String,
        species: String,
        breed: String,
        #[serde(default)]
        age: Option<u32>,
    },

    #[serde(rename = "REMOVE_ANIMAL")]
    RemoveAnimal { name: String },

    /// Not validated: a missing `name` arrives empty, other missing fields
    /// as `None`, and `age` takes any number
    #[serde(rename = "ADD_PERSON")]
    AddPerson {
        #[serde(default)]
        name: String,
        #[serde(default)]
        age: Option<f64>,
        #[serde(default)]
        occupation: Option<String>,
        #[serde(default)]
        location: Option<String>,
    },

    #[serde(rename = "REMOVE_PERSON")]
    RemovePerson { name: String },

    #[serde(rename = "INCREASE_COUNT")]
    IncreaseCount {
        #[serde(rename = "increaseBy")]
        increase_by: i64,
    },

    #[serde(rename = "REDUCE_COUNT")]
    ReduceCount {
        #[serde(rename = "reduceBy")]
        reduce_by: i64,
    },

    #[serde(rename = "RESET_COUNT")]
    ResetCount,

    #[serde(rename = "SET_COUNT")]
    SetCount {
        #[serde(rename = "setCountTo")]
        set_count_to: i64,
    },

    /// A well-formed record whose `type` no reducer knows
    ///
    /// Only produced by [`Action::from_record`]; serialized through
    /// [`Action::to_record`].
    #[serde(skip)]
    Unrecognized { kind: String },
}

/// The fixed set of action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Init,
    AddAnimal,
    RemoveAnimal,
    AddPerson,
    RemovePerson,
    IncreaseCount,
    ReduceCount,
    ResetCount,
    SetCount,
}

impl ActionType {
    /// Every known type, in declaration order
    pub const ALL: [ActionType; 9] = [
        ActionType::Init,
        ActionType::AddAnimal,
        ActionType::RemoveAnimal,
        ActionType::AddPerson,
        ActionType::RemovePerson,
        ActionType::IncreaseCount,
        ActionType::ReduceCount,
        ActionType::ResetCount,
        ActionType::SetCount,
    ];

    /// The `type` discriminant used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Init => "@@INIT",
            ActionType::AddAnimal => "ADD_ANIMAL",
            ActionType::RemoveAnimal => "REMOVE_ANIMAL",
            ActionType::AddPerson => "ADD_PERSON",
            ActionType::RemovePerson => "REMOVE_PERSON",
            ActionType::IncreaseCount => "INCREASE_COUNT",
            ActionType::ReduceCount => "REDUCE_COUNT",
            ActionType::ResetCount => "RESET_COUNT",
            ActionType::SetCount => "SET_COUNT",
        }
    }

    /// Look up a discriminant; exact, case-sensitive match
    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == kind)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    /// The known type of this action, or `None` for [`Action::Unrecognized`]
    pub fn action_type(&self) -> Option<ActionType> {
        Some(match self {
            Action::Init => ActionType::Init,
            Action::AddAnimal { .. } => ActionType::AddAnimal,
            Action::RemoveAnimal { .. } => ActionType::RemoveAnimal,
            Action::AddPerson { .. } => ActionType::AddPerson,
            Action::RemovePerson { .. } => ActionType::RemovePerson,
            Action::IncreaseCount { .. } => ActionType::IncreaseCount,
            Action::ReduceCount { .. } => ActionType::ReduceCount,
            Action::ResetCount => ActionType::ResetCount,
            Action::SetCount { .. } => ActionType::SetCount,
            Action::Unrecognized { .. } => return None,
        })
    }

    /// The `type` discriminant of this action
    pub fn kind(&self) -> &str {
        match self {
            Action::Unrecognized { kind } => kind,
            other => other
                .action_type()
                .map(|t| t.as_str())
                .unwrap_or_default(),
        }
    }

    /// Validate a raw record and turn it into an action
    ///
    /// The record must be an object with a non-empty string `type`. Known
    /// types must carry their required payload; unknown types become
    /// [`Action::Unrecognized`]. Extra fields are ignored.
    pub fn from_record(record: Value) -> Result<Self> {
        let kind = match &record {
            Value::Object(fields) => match fields.get("type") {
                Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
                Some(Value::String(_)) => {
                    return Err(Error::InvalidAction("`type` is empty".to_string()))
                }
                Some(other) => {
                    return Err(Error::InvalidAction(format!(
                        "`type` must be a string, got {}",
                        describe(other)
                    )))
                }
                None => {
                    return Err(Error::InvalidAction(
                        "record has no `type` field".to_string(),
                    ))
                }
            },
            other => {
                return Err(Error::InvalidAction(format!(
                    "expected a record, got {}",
                    describe(other)
                )))
            }
        };

        if ActionType::parse(&kind).is_none() {
            return Ok(Action::Unrecognized { kind });
        }

        serde_json::from_value(record).map_err(|e| Error::InvalidAction(format!("{kind}: {e}")))
    }

    /// Render this action as a raw record
    pub fn to_record(&self) -> Result<Value> {
        match self {
            Action::Unrecognized { kind } => Ok(serde_json::json!({ "type": kind })),
            known => serde_json::to_value(known).map_err(|e| Error::InvalidAction(e.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a record",
    }
}

/// Serde adapter that writes an [`Action`] in record form
///
/// Unlike the derived impls this also handles [`Action::Unrecognized`].
pub mod record {
    use super::Action;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(action: &Action, serializer: S) -> Result<S::Ok, S::Error> {
        action
            .to_record()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Action, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Action::from_record(value).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Creators
// ---------------------------------------------------------------------------

/// Field values for an `ADD_ANIMAL` action
///
/// `AnimalDraft::default()` is the defaulting policy for animals: every field
/// not set explicitly takes the value listed below.
///
/// | field | default |
/// |---|---|
/// | name | `"No name"` |
/// | species | `"No species"` |
/// | breed | `"No breed"` |
/// | age | `None` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalDraft {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: Option<u32>,
}

impl AnimalDraft {
    /// Start from the defaults with a given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = breed.into();
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

impl Default for AnimalDraft {
    fn default() -> Self {
        Self {
            name: DEFAULT_ANIMAL_NAME.to_string(),
            species: DEFAULT_ANIMAL_SPECIES.to_string(),
            breed: DEFAULT_ANIMAL_BREED.to_string(),
            age: None,
        }
    }
}

impl From<AnimalDraft> for Action {
    fn from(draft: AnimalDraft) -> Self {
        add_animal(draft)
    }
}

/// `ADD_ANIMAL`; pass `AnimalDraft::default()` for an all-defaults animal
pub fn add_animal(draft: AnimalDraft) -> Action {
    Action::AddAnimal {
        name: draft.name,
        species: draft.species,
        breed: draft.breed,
        age: draft.age,
    }
}

/// `REMOVE_ANIMAL`
pub fn remove_animal(name: impl Into<String>) -> Action {
    Action::RemoveAnimal { name: name.into() }
}

/// `ADD_PERSON`; every field is supplied by the caller
pub fn add_person(
    name: impl Into<String>,
    age: Option<u32>,
    occupation: Option<&str>,
    location: Option<&str>,
) -> Action {
    Action::AddPerson {
        name: name.into(),
        age: age.map(f64::from),
        occupation: occupation.map(str::to_string),
        location: location.map(str::to_string),
    }
}

/// `REMOVE_PERSON`
pub fn remove_person(name: impl Into<String>) -> Action {
    Action::RemovePerson { name: name.into() }
}

/// `INCREASE_COUNT`
pub fn increase_count(increase_by: i64) -> Action {
    Action::IncreaseCount { increase_by }
}

/// `REDUCE_COUNT`
pub fn reduce_count(reduce_by: i64) -> Action {
    Action::ReduceCount { reduce_by }
}

/// `RESET_COUNT`
pub fn reset_count() -> Action {
    Action::ResetCount
}

/// `SET_COUNT`
pub fn set_count(set_count_to: i64) -> Action {
    Action::SetCount { set_count_to }
}
