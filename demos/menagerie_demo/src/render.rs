//! Plain-text panels for the three slices

use menagerie_core::{Animal, Person, State};
use std::fmt;

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn person_block(f: &mut fmt::Formatter<'_>, person: &Person) -> fmt::Result {
    writeln!(f, "  Name: {}", person.name)?;
    writeln!(f, "    Age: {}", or_dash(person.age))?;
    writeln!(f, "    Occupation: {}", or_dash(person.occupation.as_deref()))?;
    writeln!(f, "    Location: {}", or_dash(person.location.as_deref()))
}

fn animal_block(f: &mut fmt::Formatter<'_>, animal: &Animal) -> fmt::Result {
    writeln!(f, "  Name: {}", animal.name)?;
    writeln!(f, "    Species: {}", animal.species)?;
    writeln!(f, "    Breed: {}", animal.breed)?;
    writeln!(f, "    Age: {}", or_dash(animal.age))
}

/// The count, people and animals panels of a state
pub struct Panels<'a>(pub &'a State);

impl fmt::Display for Panels<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        writeln!(f, "== Count ==")?;
        writeln!(f, "  Count: {}", state.count)?;

        writeln!(f, "\n== People ==")?;
        for person in state.people.iter() {
            person_block(f, person)?;
        }

        writeln!(f, "\n== Animals ==")?;
        for animal in state.animals.iter() {
            animal_block(f, animal)?;
        }
        Ok(())
    }
}

/// Render the count, people and animals panels
pub fn render(state: &State) -> String {
    Panels(state).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use menagerie_core::{add_animal, add_person, AnimalDraft, Reducer, RootReducer};

    #[test]
    fn test_render_panels() {
        let root = RootReducer::new();
        let state = root.reduce(
            &root.initial_state(),
            &add_person("Nat", Some(28), None, Some("Singapore")),
        );
        let state = root.reduce(&state, &add_animal(AnimalDraft::default()));

        let text = render(&state);
        assert!(text.contains("Count: 0"));
        assert!(text.contains("Name: Nat"));
        assert!(text.contains("Occupation: -"));
        assert!(text.contains("Species: No species"));
        assert!(text.contains("Age: 28\n"));
        assert!(text.contains("== Animals ==\n  Name: No name"));
    }
}
