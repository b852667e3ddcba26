//! Drives a [`TipEngine`] through a scripted [`Session`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use beacon_tips::{
    ActiveTips, InputSnapshot, InputState, KeyValueStore, MemoryActivityStore, ObjectCounter,
    Platform, Resolver, SceneSnapshot, TickOutcome, TipEngine,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::script::Session;

/// One published change of the active tips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Index of the script frame that produced it
    pub frame: usize,
    /// Global tick counter, starting at 0
    pub tick: u64,
    pub tips: ActiveTips,
}

/// Hands out the world handles only after a number of ticks.
struct DelayedResolver {
    world: Rc<World>,
    remaining: Cell<usize>,
}

impl Resolver for DelayedResolver {
    fn input(&self) -> Option<Rc<dyn InputState>> {
        let remaining = self.remaining.get();
        if remaining > 0 {
            self.remaining.set(remaining - 1);
            return None;
        }
        Some(self.world.input.clone())
    }

    fn object_counter(&self) -> Option<Rc<dyn ObjectCounter>> {
        Some(self.world.objects.clone())
    }
}

/// Mutable state the script writes and the engine reads.
struct World {
    input: Rc<RefCell<InputSnapshot>>,
    scene: Rc<RefCell<SceneSnapshot>>,
    objects: Rc<Cell<usize>>,
    activity: Rc<MemoryActivityStore>,
}

/// Replays a session against a fresh engine backed by `store`.
pub struct Replayer<S> {
    engine: TipEngine<S>,
    world: Rc<World>,
    transitions: Rc<RefCell<Vec<Transition>>>,
    frame: Rc<Cell<usize>>,
    ticks: Rc<Cell<u64>>,
}

impl<S: KeyValueStore> Replayer<S> {
    pub fn new(platform: Platform, store: S, ready_after: usize) -> Self {
        let world = Rc::new(World {
            input: Rc::new(RefCell::new(InputSnapshot::default())),
            scene: Rc::new(RefCell::new(SceneSnapshot::default())),
            objects: Rc::new(Cell::new(0)),
            activity: Rc::new(MemoryActivityStore::default()),
        });
        let resolver = DelayedResolver {
            world: world.clone(),
            remaining: Cell::new(ready_after),
        };

        let mut engine = TipEngine::new(platform, store, world.scene.clone(), resolver)
            .with_activity_store(world.activity.clone());

        let transitions = Rc::new(RefCell::new(Vec::new()));
        let frame = Rc::new(Cell::new(0));
        let ticks = Rc::new(Cell::new(0));
        {
            let transitions = transitions.clone();
            let frame = frame.clone();
            let ticks = ticks.clone();
            engine.subscribe(move |tips| {
                transitions.borrow_mut().push(Transition {
                    frame: frame.get(),
                    tick: ticks.get(),
                    tips: tips.clone(),
                });
            });
        }

        Self {
            engine,
            world,
            transitions,
            frame,
            ticks,
        }
    }

    pub fn engine(&mut self) -> &mut TipEngine<S> {
        &mut self.engine
    }

    /// Run every frame of `session` and return the changes it produced.
    pub fn run(&mut self, session: &Session) -> Vec<Transition> {
        for (index, step) in session.frames.iter().enumerate() {
            self.frame.set(index);

            // Reset first so the frame's own state survives it.
            if step.reset {
                self.engine.reset_all();
            }
            if let Some(input) = &step.input {
                *self.world.input.borrow_mut() = input.clone();
            }
            if let Some(scene) = &step.scene {
                *self.world.scene.borrow_mut() = scene.clone();
            }
            if let Some(objects) = step.objects {
                self.world.objects.set(objects);
            }
            if let Some(activity) = step.activity {
                self.world.activity.set_flags(activity);
            }
            if let Some(dismissal) = &step.dismiss {
                self.engine.dismiss(&dismissal.tip, dismissal.scope);
            }

            for _ in 0..step.repeat {
                let outcome = self.engine.tick();
                if outcome == TickOutcome::NotReady {
                    debug!(frame = index, "engine not ready");
                }
                self.ticks.set(self.ticks.get() + 1);
            }
        }

        info!(
            frames = session.frames.len(),
            ticks = self.ticks.get(),
            changes = self.transitions.borrow().len(),
            "session replayed"
        );
        self.transitions.borrow_mut().drain(..).collect()
    }
}
