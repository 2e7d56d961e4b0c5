//! Tick-driven action producers
//!
//! The driver owns nothing but a store handle: everything it does goes
//! through `dispatch`.

use crate::config::{AnimalGenerator, Config, PersonGenerator};
use crate::rng::DriverRng;
use menagerie_core::{
    add_animal, add_person, increase_count, reduce_count, remove_animal, remove_person,
    reset_count, set_count, Action, AnimalDraft, Result, Store,
};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// The fixed opening session
pub fn scripted_session() -> Vec<Action> {
    vec![
        increase_count(2),
        set_count(76),
        add_person("Steve", Some(30), Some("Road Auditor"), Some("Brisbane")),
        add_person("Nat", Some(28), Some("Doctor"), Some("Singapore")),
        reduce_count(12),
        reset_count(),
        add_animal(
            AnimalDraft::named("Wombo")
                .species("Wombat")
                .breed("Big Nose")
                .age(17),
        ),
        remove_person("Maxi"),
        remove_animal("Catto"),
        increase_count(17),
    ]
}

/// A producer that fires every `every_ticks` ticks
#[derive(Debug, Clone)]
enum Generator {
    Person {
        every_ticks: u64,
        settings: PersonGenerator,
    },
    Animal {
        every_ticks: u64,
        settings: AnimalGenerator,
    },
}

impl Generator {
    fn every_ticks(&self) -> u64 {
        match self {
            Generator::Person { every_ticks, .. } | Generator::Animal { every_ticks, .. } => {
                *every_ticks
            }
        }
    }

    fn produce(&self, rng: &mut DriverRng) -> Action {
        match self {
            Generator::Person { settings, .. } => add_person(
                settings.name.as_str(),
                Some(rng.below(settings.max_age)),
                Some(settings.occupation.as_str()),
                Some(settings.location.as_str()),
            ),
            Generator::Animal { settings, .. } => add_animal(
                AnimalDraft::named(settings.name.as_str())
                    .species(settings.species.as_str())
                    .breed(settings.breed.as_str())
                    .age(rng.below(settings.max_age)),
            ),
        }
    }
}

/// Convert a period in ms to whole ticks, rounding up; `None` when disabled
fn period_ticks(every_ms: u64, tick_ms: u64) -> Option<u64> {
    if every_ms == 0 {
        return None;
    }
    Some(every_ms.div_ceil(tick_ms).max(1))
}

/// Runs the periodic generators against a store
pub struct Driver {
    store: Store,
    tick: u64,
    tick_ms: u64,
    rng: DriverRng,
    generators: Vec<Generator>,
}

impl Driver {
    /// Build a driver from configuration
    pub fn new(store: Store, config: &Config) -> Self {
        let mut generators = Vec::new();
        if let Some(every_ticks) = period_ticks(config.people.every_ms, config.tick_ms) {
            generators.push(Generator::Person {
                every_ticks,
                settings: config.people.clone(),
            });
        }
        if let Some(every_ticks) = period_ticks(config.animals.every_ms, config.tick_ms) {
            generators.push(Generator::Animal {
                every_ticks,
                settings: config.animals.clone(),
            });
        }

        Self {
            store,
            tick: 0,
            tick_ms: config.tick_ms,
            rng: DriverRng::new(config.seed),
            generators,
        }
    }

    /// Current tick
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick, dispatching whatever is due
    ///
    /// Returns the number of actions dispatched.
    pub fn step(&mut self) -> Result<usize> {
        self.tick += 1;
        let mut dispatched = 0;

        for generator in &self.generators {
            if self.tick % generator.every_ticks() != 0 {
                continue;
            }
            let action = generator.produce(&mut self.rng);
            debug!(tick = self.tick, action = action.kind(), "generator fired");
            self.store.dispatch(action)?;
            dispatched += 1;
        }

        Ok(dispatched)
    }

    /// Run `ticks` ticks, optionally sleeping one tick length between them
    pub fn run(&mut self, ticks: u64, realtime: bool) -> Result<usize> {
        let mut total = 0;
        for _ in 0..ticks {
            if realtime {
                thread::sleep(Duration::from_millis(self.tick_ms));
            }
            total += self.step()?;
        }
        Ok(total)
    }
}
