//! End-to-end sessions against the public store API

use menagerie_core::{
    add_animal, add_person, increase_count, reduce_count, remove_animal, remove_person,
    reset_count, set_count, Animal, AnimalDraft, RootReducer, State, Store,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn store() -> Store {
    Store::new(RootReducer::new())
}

#[test]
fn test_count_increase_then_set() {
    let store = store();
    assert_eq!(*store.get_state(), State::new());

    store.dispatch(increase_count(2)).unwrap();
    assert_eq!(store.get_state().count, 2);

    store.dispatch(set_count(76)).unwrap();
    assert_eq!(store.get_state().count, 76);
}

#[test]
fn test_people_keep_insertion_order() {
    let store = store();
    store
        .dispatch(add_person("Steve", Some(30), Some("Road Auditor"), Some("Brisbane")))
        .unwrap();
    store
        .dispatch(add_person("Nat", Some(28), Some("Doctor"), Some("Singapore")))
        .unwrap();

    let state = store.get_state();
    let names: Vec<_> = state.people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Steve", "Nat"]);
    assert_eq!(state.people[1].location.as_deref(), Some("Singapore"));
}

#[test]
fn test_default_animal() {
    let store = store();
    store.dispatch(add_animal(AnimalDraft::default())).unwrap();

    assert_eq!(
        store.get_state().animals[..],
        [Animal {
            name: "No name".to_string(),
            species: "No species".to_string(),
            breed: "No breed".to_string(),
            age: None,
        }]
    );
}

#[test]
fn test_reduce_then_reset() {
    let store = store();
    store.dispatch(set_count(76)).unwrap();
    store.dispatch(reduce_count(12)).unwrap();
    assert_eq!(store.get_state().count, 64);

    store.dispatch(reset_count()).unwrap();
    assert_eq!(store.get_state().count, 0);
    store.dispatch(reset_count()).unwrap();
    assert_eq!(store.get_state().count, 0);
}

#[test]
fn test_missing_names_are_silent_noops() {
    let store = store();
    store
        .dispatch(add_person("Steve", Some(30), Some("Road Auditor"), Some("Brisbane")))
        .unwrap();
    let before = store.get_state();

    store.dispatch(remove_person("Maxi")).unwrap();
    store.dispatch(remove_animal("Catto")).unwrap();

    let after = store.get_state();
    assert_eq!(after.people, before.people);
    assert_eq!(after.animals, before.animals);
}

#[test]
fn test_add_remove_round_trip_restores_people() {
    let store = store();
    store.dispatch(add_person("Steve", Some(30), None, None)).unwrap();
    let before = store.get_state();

    store.dispatch(add_person("Nat", Some(28), None, None)).unwrap();
    store.dispatch(remove_person("Nat")).unwrap();

    assert_eq!(store.get_state().people, before.people);
}

#[test]
fn test_earlier_snapshots_are_never_touched() {
    let store = store();
    let s0 = store.get_state();
    store.dispatch(add_person("Steve", None, None, None)).unwrap();
    let s1 = store.get_state();
    store.dispatch(remove_person("Steve")).unwrap();

    assert!(s0.people.is_empty());
    assert_eq!(s1.people.len(), 1);
    assert!(Arc::ptr_eq(&s0.animals, &s1.animals));
}

#[test]
fn test_scripted_session_logs_every_state() {
    let store = store();
    let log: Rc<RefCell<Vec<i64>>> = Rc::new(RefCell::new(Vec::new()));

    let reader = store.clone();
    let sink = Rc::clone(&log);
    store.subscribe(move || sink.borrow_mut().push(reader.get_state().count));

    let script = [
        increase_count(2),
        set_count(76),
        add_person("Steve", Some(30), Some("Road Auditor"), Some("Brisbane")),
        add_person("Nat", Some(28), Some("Doctor"), Some("Singapore")),
        reduce_count(12),
        reset_count(),
        add_animal(AnimalDraft::named("Wombo").species("Wombat").breed("Big Nose").age(17)),
        remove_person("Maxi"),
        remove_animal("Catto"),
        increase_count(17),
    ];
    for action in script {
        store.dispatch(action).unwrap();
    }

    assert_eq!(*log.borrow(), [2, 76, 76, 76, 64, 0, 0, 0, 0, 17]);

    let state = store.get_state();
    assert_eq!(state.people.len(), 2);
    assert_eq!(state.animals.len(), 1);
    assert_eq!(state.animal("Wombo").and_then(|a| a.age), Some(17));
    assert_eq!(store.dispatch_count(), 10);
}
