//! Frame driver and public tip state.
//!
//! A [`TipEngine`] owns everything that changes over time: the finished-tip
//! cache, per-scope exhaustion, the last published [`ActiveTips`] and the
//! change listeners. Hosts call [`TipEngine::tick`] once per frame.
//!
//! # Startup
//!
//! The input provider and the object counter usually come up a few frames
//! after the engine. Until the [`Resolver`] hands out both, ticks are silent
//! no-ops. Once both resolve the engine keeps the handles and never asks
//! again.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::TipCatalog;
use crate::context::{
    ActivitySnapshot, ActivityStore, FrameContext, InputState, KeyValueStore, ObjectCounter,
    Resolver, SceneState,
};
use crate::evaluator::ScopeEvaluator;
use crate::store::FinishedTips;
use crate::tip::{Platform, QualifiedTip, Scope, TipId};
use crate::validators::ValidatorRegistry;

/// The tip currently selected for each scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveTips {
    pub top: Option<QualifiedTip>,
    pub bottom: Option<QualifiedTip>,
}

impl ActiveTips {
    pub fn get(&self, scope: Scope) -> Option<&QualifiedTip> {
        match scope {
            Scope::Top => self.top.as_ref(),
            Scope::Bottom => self.bottom.as_ref(),
        }
    }

    fn set(&mut self, scope: Scope, tip: Option<QualifiedTip>) {
        match scope {
            Scope::Top => self.top = tip,
            Scope::Bottom => self.bottom = tip,
        }
    }
}

impl fmt::Display for ActiveTips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |tip: &Option<QualifiedTip>| {
            tip.as_ref().map_or_else(|| "-".to_string(), |t| t.to_string())
        };
        write!(f, "top={} bottom={}", show(&self.top), show(&self.bottom))
    }
}

/// What a call to [`TipEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Dependencies not resolved yet; nothing evaluated
    NotReady,
    /// Evaluated; selection identical to the previous tick
    Unchanged,
    /// Evaluated; selection changed and listeners were notified
    Changed,
}

enum Startup {
    Pending,
    Ready {
        input: Rc<dyn InputState>,
        objects: Rc<dyn ObjectCounter>,
    },
}

type Listener = Box<dyn FnMut(&ActiveTips)>;

/// Per-frame tip selection for one platform.
pub struct TipEngine<S> {
    platform: Platform,
    catalog: TipCatalog,
    registry: ValidatorRegistry,
    finished: FinishedTips<S>,
    evaluators: [ScopeEvaluator; 2],
    scene: Rc<dyn SceneState>,
    activity: Option<Rc<dyn ActivityStore>>,
    resolver: Box<dyn Resolver>,
    startup: Startup,
    active: ActiveTips,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> TipEngine<S> {
    /// Engine using the built-in catalog and validators for `platform`.
    pub fn new(
        platform: Platform,
        store: S,
        scene: Rc<dyn SceneState>,
        resolver: impl Resolver + 'static,
    ) -> Self {
        Self {
            platform,
            catalog: TipCatalog::for_platform(platform),
            registry: ValidatorRegistry::builtin(),
            finished: FinishedTips::new(store),
            evaluators: [ScopeEvaluator::new(Scope::Top), ScopeEvaluator::new(Scope::Bottom)],
            scene,
            activity: None,
            resolver: Box::new(resolver),
            startup: Startup::Pending,
            active: ActiveTips::default(),
            listeners: Vec::new(),
        }
    }

    /// Wire up the durable activity-flags store.
    pub fn with_activity_store(mut self, activity: Rc<dyn ActivityStore>) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Replace the catalog.
    pub fn with_catalog(mut self, catalog: TipCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the validator registry.
    pub fn with_registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn catalog(&self) -> &TipCatalog {
        &self.catalog
    }

    /// Selection published by the most recent tick.
    pub fn active_tips(&self) -> &ActiveTips {
        &self.active
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.startup, Startup::Ready { .. })
    }

    pub fn is_exhausted(&self, scope: Scope) -> bool {
        self.evaluators[scope.index()].is_exhausted()
    }

    pub fn is_finished(&mut self, tip: &TipId) -> bool {
        self.finished.is_finished(tip)
    }

    pub fn finished_tips(&mut self) -> Vec<TipId> {
        self.finished.finished_tips()
    }

    pub fn store(&self) -> &S {
        self.finished.store()
    }

    /// Register a listener called with the new selection whenever it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&ActiveTips) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Evaluate both scopes for the current frame.
    pub fn tick(&mut self) -> TickOutcome {
        let Some((input, objects)) = self.resolve() else {
            return TickOutcome::NotReady;
        };

        let ctx = FrameContext {
            input: input.as_ref(),
            scene: self.scene.as_ref(),
            object_count: objects.count(),
            activity: self.activity.as_deref().map(|store| ActivitySnapshot::capture(store)),
        };

        let mut next = ActiveTips::default();
        for scope in Scope::ALL {
            let selected = self.evaluators[scope.index()].evaluate(
                self.catalog.tips(scope),
                &self.registry,
                &mut self.finished,
                &ctx,
            );
            next.set(scope, selected.map(|tip| QualifiedTip::new(self.platform, tip)));
        }

        if next == self.active {
            return TickOutcome::Unchanged;
        }

        debug!(tips = %next, "active tips changed");
        self.active = next;
        for listener in &mut self.listeners {
            listener(&self.active);
        }
        TickOutcome::Changed
    }

    /// Close a tip.
    ///
    /// Locally dismissible tips finish alone; anything else finishes every
    /// tip in `scope`.
    pub fn dismiss(&mut self, tip: &QualifiedTip, scope: Scope) {
        if tip.platform != self.platform {
            debug!(tip = %tip, platform = %self.platform, "dismissing tip from another platform");
        }

        if self.catalog.is_locally_dismissible(&tip.tip) {
            info!(tip = %tip, "tip dismissed");
            self.finished.mark_finished(&tip.tip);
        } else {
            info!(tip = %tip, scope = %scope, "tip dismissed, finishing scope");
            self.finished.mark_all_finished(self.catalog.tips(scope));
        }
    }

    /// Finish a single tip directly.
    pub fn mark_finished(&mut self, tip: &TipId) {
        self.finished.mark_finished(tip);
    }

    /// Forget all tip history.
    ///
    /// Clears finished tips and exhaustion, and asks the activity store to
    /// clear its own flags.
    pub fn reset_all(&mut self) {
        self.finished.reset();
        if let Some(activity) = &self.activity {
            activity.reset_activity_flags();
            activity.reset_confirmed_rooms_flag();
        }
        for evaluator in &mut self.evaluators {
            evaluator.reset();
        }
        info!("tip history reset");
    }

    fn resolve(&mut self) -> Option<(Rc<dyn InputState>, Rc<dyn ObjectCounter>)> {
        if let Startup::Pending = self.startup {
            let input = self.resolver.input()?;
            let objects = self.resolver.object_counter()?;
            info!(platform = %self.platform, "tip engine ready");
            self.startup = Startup::Ready { input, objects };
        }

        match &self.startup {
            Startup::Ready { input, objects } => Some((Rc::clone(input), Rc::clone(objects))),
            Startup::Pending => None,
        }
    }
}

impl<S> fmt::Debug for TipEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipEngine")
            .field("platform", &self.platform)
            .field("active", &self.active)
            .field("ready", &matches!(self.startup, Startup::Ready { .. }))
            .field("evaluators", &self.evaluators)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{
        CapabilitySet, InputSnapshot, MemoryActivityStore, SceneFlag, SceneSnapshot, Signal,
        SignalPath, StaticResolver,
    };
    use crate::store::{MemoryStore, FINISHED_TIPS_KEY};
    use crate::tip::ValidationResult;
    use crate::validators::Validator;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};

    /// Shared handles a test mutates between ticks.
    struct World {
        input: Rc<RefCell<InputSnapshot>>,
        scene: Rc<RefCell<SceneSnapshot>>,
        objects: Rc<Cell<usize>>,
        activity: Rc<MemoryActivityStore>,
    }

    impl World {
        fn new() -> Self {
            Self {
                input: Rc::new(RefCell::new(InputSnapshot::default())),
                scene: Rc::new(RefCell::new(SceneSnapshot::default())),
                objects: Rc::new(Cell::new(0)),
                activity: Rc::new(MemoryActivityStore::default()),
            }
        }

        fn engine(&self, platform: Platform) -> TipEngine<MemoryStore> {
            let resolver = StaticResolver::new(self.input.clone(), self.objects.clone());
            TipEngine::new(platform, MemoryStore::new(), self.scene.clone(), resolver)
                .with_activity_store(self.activity.clone())
        }

        fn set_flag(&self, flag: SceneFlag, on: bool) {
            let mut scene = self.scene.borrow_mut();
            if on {
                scene.flags.insert(flag);
            } else {
                scene.flags.remove(&flag);
            }
        }

        fn set_input(&self, input: InputSnapshot) {
            *self.input.borrow_mut() = input;
        }
    }

    fn name(tip: Option<&QualifiedTip>) -> Option<String> {
        tip.map(|t| t.to_string())
    }

    /// Validator driven by a cell, counting how often it is asked.
    #[derive(Clone)]
    struct Scripted {
        result: Rc<Cell<ValidationResult>>,
        calls: Rc<Cell<usize>>,
    }

    impl Scripted {
        fn new(result: ValidationResult) -> Self {
            Self {
                result: Rc::new(Cell::new(result)),
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Validator for Scripted {
        fn validate(&self, _ctx: &FrameContext<'_>) -> ValidationResult {
            self.calls.set(self.calls.get() + 1);
            self.result.get()
        }
    }

    /// Engine with a custom bottom catalog of scripted validators.
    fn scripted_engine(
        world: &World,
        names: &[&str],
        initial: ValidationResult,
    ) -> (TipEngine<MemoryStore>, Vec<Scripted>) {
        let mut registry = ValidatorRegistry::new();
        let mut scripted = Vec::new();
        for n in names {
            let v = Scripted::new(initial);
            registry.register(TipId::new(*n), v.clone());
            scripted.push(v);
        }
        let catalog = TipCatalog::new(vec![], names.iter().map(|n| TipId::new(*n)).collect());
        let engine = world
            .engine(Platform::Desktop)
            .with_catalog(catalog)
            .with_registry(registry);
        (engine, scripted)
    }

    #[test]
    fn not_ready_until_both_dependencies_resolve() {
        struct Late {
            input: RefCell<Option<Rc<dyn InputState>>>,
            objects: RefCell<Option<Rc<dyn ObjectCounter>>>,
            asked: Rc<Cell<usize>>,
        }

        impl Resolver for Rc<Late> {
            fn input(&self) -> Option<Rc<dyn InputState>> {
                self.asked.set(self.asked.get() + 1);
                self.input.borrow().clone()
            }

            fn object_counter(&self) -> Option<Rc<dyn ObjectCounter>> {
                self.objects.borrow().clone()
            }
        }

        let world = World::new();
        let asked = Rc::new(Cell::new(0));
        let late = Rc::new(Late {
            input: RefCell::new(None),
            objects: RefCell::new(None),
            asked: asked.clone(),
        });
        let mut engine = TipEngine::new(
            Platform::Desktop,
            MemoryStore::new(),
            world.scene.clone(),
            late.clone(),
        );

        assert_eq!(engine.tick(), TickOutcome::NotReady);
        *late.input.borrow_mut() = Some(world.input.clone());
        assert_eq!(engine.tick(), TickOutcome::NotReady);
        assert!(!engine.is_ready());
        assert_eq!(engine.active_tips(), &ActiveTips::default());

        *late.objects.borrow_mut() = Some(world.objects.clone());
        assert_eq!(engine.tick(), TickOutcome::Changed);
        assert!(engine.is_ready());

        let asked_at_ready = asked.get();
        engine.tick();
        engine.tick();
        assert_eq!(asked.get(), asked_at_ready);
    }

    #[test]
    fn not_ready_tick_touches_nothing() {
        struct Never;

        impl Resolver for Never {
            fn input(&self) -> Option<Rc<dyn InputState>> {
                None
            }

            fn object_counter(&self) -> Option<Rc<dyn ObjectCounter>> {
                None
            }
        }

        let world = World::new();
        let mut engine =
            TipEngine::new(Platform::Desktop, MemoryStore::new(), world.scene.clone(), Never);
        assert_eq!(engine.tick(), TickOutcome::NotReady);
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn fresh_desktop_session() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);

        assert_eq!(engine.tick(), TickOutcome::Changed);
        assert_eq!(name(engine.active_tips().top.as_ref()).as_deref(), Some("desktop.invite"));
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.look"));
    }

    #[test]
    fn onboarding_walkthrough() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);
        engine.tick();

        world.set_input(
            InputSnapshot::default().with_signal(SignalPath::CameraDelta, Signal::Vector([1.0, 0.0])),
        );
        engine.tick();
        assert!(engine.is_finished(&TipId::from_static("look")));
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.locomotion"));

        // Stopping the mouse does not bring "look" back.
        world.set_input(InputSnapshot::default());
        engine.tick();
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.locomotion"));

        world.set_input(
            InputSnapshot::default()
                .with_signal(SignalPath::CharacterAcceleration, Signal::Vector([0.0, 1.0])),
        );
        engine.tick();
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.spawn_menu"));

        world.objects.set(1);
        engine.tick();
        assert_eq!(
            name(engine.active_tips().bottom.as_ref()).as_deref(),
            Some("desktop.freeze_gesture")
        );

        world.set_flag(SceneFlag::Frozen, true);
        engine.tick();
        assert_eq!(
            name(engine.active_tips().bottom.as_ref()).as_deref(),
            Some("desktop.object_rotate_button")
        );

        world.activity.set_flags(ActivitySnapshot { has_rotated: true, ..Default::default() });
        engine.tick();
        assert_eq!(
            name(engine.active_tips().bottom.as_ref()).as_deref(),
            Some("desktop.object_scale_button")
        );
    }

    #[test]
    fn mode_indicator_takes_priority_while_active() {
        let world = World::new();
        let mut engine = world.engine(Platform::Mobile);
        engine.tick();
        assert_eq!(name(engine.active_tips().top.as_ref()).as_deref(), Some("mobile.invite"));

        world.set_input(InputSnapshot::default().with_capability(CapabilitySet::HoldingPen));
        engine.tick();
        assert_eq!(name(engine.active_tips().top.as_ref()).as_deref(), Some("mobile.pen_mode"));

        world.set_input(InputSnapshot::default());
        engine.tick();
        assert_eq!(name(engine.active_tips().top.as_ref()).as_deref(), Some("mobile.invite"));
        assert!(!engine.is_finished(&TipId::from_static("pen_mode")));
    }

    #[test]
    fn change_notification_fires_once_per_change() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.subscribe(move |tips| sink.borrow_mut().push(tips.clone()));

        assert_eq!(engine.tick(), TickOutcome::Changed);
        assert_eq!(engine.tick(), TickOutcome::Unchanged);
        assert_eq!(engine.tick(), TickOutcome::Unchanged);
        assert_eq!(seen.borrow().len(), 1);

        world.set_flag(SceneFlag::Muted, true);
        assert_eq!(engine.tick(), TickOutcome::Changed);
        assert_eq!(engine.tick(), TickOutcome::Unchanged);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(name(seen[1].top.as_ref()).as_deref(), Some("desktop.mute_mode"));
        assert_eq!(&seen[1], engine.active_tips());
    }

    #[test]
    fn scripted_scenario_to_exhaustion() {
        use ValidationResult::{Finish, Invalid, Valid};

        let world = World::new();
        let (mut engine, v) = scripted_engine(&world, &["a", "b"], Invalid);
        v[1].result.set(Valid);

        engine.tick();
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.b"));

        v[0].result.set(Finish);
        assert_eq!(engine.tick(), TickOutcome::Unchanged);
        assert!(engine.is_finished(&TipId::new("a")));
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.b"));

        v[1].result.set(Finish);
        assert_eq!(engine.tick(), TickOutcome::Changed);
        assert_eq!(engine.active_tips().bottom, None);
        assert!(engine.is_exhausted(Scope::Bottom));

        let calls: Vec<_> = v.iter().map(|s| s.calls.get()).collect();
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(v.iter().map(|s| s.calls.get()).collect::<Vec<_>>(), calls);
    }

    #[test]
    fn reset_all_starts_over() {
        let world = World::new();
        world.activity.set_flags(ActivitySnapshot { has_pinned: true, ..Default::default() });
        world.activity.set_confirmed_rooms(true);
        let (mut engine, v) = scripted_engine(&world, &["a", "b"], ValidationResult::Finish);

        engine.tick();
        assert!(engine.is_exhausted(Scope::Bottom));

        engine.reset_all();
        assert!(!engine.is_exhausted(Scope::Bottom));
        assert!(engine.finished_tips().is_empty());
        assert_eq!(world.activity.flags(), ActivitySnapshot::default());
        assert!(!world.activity.confirmed_rooms());

        v[0].result.set(ValidationResult::Valid);
        engine.tick();
        assert_eq!(name(engine.active_tips().bottom.as_ref()).as_deref(), Some("desktop.a"));
    }

    #[test]
    fn dismiss_invite_only_finishes_invite() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);
        engine.tick();

        let invite: QualifiedTip = "desktop.invite".parse().unwrap();
        engine.dismiss(&invite, Scope::Top);

        assert!(engine.is_finished(&TipId::from_static("invite")));
        for other in ["pen_mode", "video_share_mode", "mute_mode"] {
            assert!(!engine.is_finished(&TipId::from_static(other)));
        }

        engine.tick();
        assert_eq!(engine.active_tips().top, None);
        world.set_flag(SceneFlag::SharingVideo, true);
        engine.tick();
        assert_eq!(
            name(engine.active_tips().top.as_ref()).as_deref(),
            Some("desktop.video_share_mode")
        );
    }

    #[test]
    fn dismiss_generic_tip_finishes_whole_scope() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);
        engine.tick();

        let spawn: QualifiedTip = "desktop.spawn_menu".parse().unwrap();
        engine.dismiss(&spawn, Scope::Bottom);

        let bottom: Vec<TipId> = engine.catalog().tips(Scope::Bottom).to_vec();
        for tip in &bottom {
            assert!(engine.is_finished(tip), "{} should be finished", tip);
        }
        assert!(!engine.is_finished(&TipId::from_static("invite")));

        engine.tick();
        assert_eq!(engine.active_tips().bottom, None);
        assert!(engine.is_exhausted(Scope::Bottom));
        assert!(!engine.is_exhausted(Scope::Top));
    }

    #[test]
    fn finished_record_survives_restart() {
        let world = World::new();
        let mut engine = world.engine(Platform::Desktop);
        engine.mark_finished(&TipId::from_static("look"));
        let store = engine.store().clone();
        assert!(store.raw(FINISHED_TIPS_KEY).is_some());

        let resolver = StaticResolver::new(world.input.clone(), world.objects.clone());
        let mut restarted = TipEngine::new(Platform::Desktop, store, world.scene.clone(), resolver);
        restarted.tick();
        assert_eq!(
            name(restarted.active_tips().bottom.as_ref()).as_deref(),
            Some("desktop.locomotion")
        );
    }

    #[test]
    fn engines_do_not_share_state() {
        let world = World::new();
        let mut first = world.engine(Platform::Desktop);
        let mut second = world.engine(Platform::Desktop);

        first.dismiss(&"desktop.look".parse().unwrap(), Scope::Bottom);
        first.tick();
        second.tick();

        assert!(first.is_exhausted(Scope::Bottom));
        assert!(!second.is_exhausted(Scope::Bottom));
        assert_eq!(name(second.active_tips().bottom.as_ref()).as_deref(), Some("desktop.look"));
    }

    #[test]
    fn works_without_activity_store() {
        let world = World::new();
        world.objects.set(1);
        world.set_flag(SceneFlag::Frozen, true);
        let resolver = StaticResolver::new(world.input.clone(), world.objects.clone());
        let mut engine =
            TipEngine::new(Platform::Desktop, MemoryStore::new(), world.scene.clone(), resolver);
        for tip in ["look", "locomotion", "spawn_menu", "freeze_gesture"] {
            engine.mark_finished(&TipId::from_static(tip));
        }

        engine.tick();
        assert_eq!(
            name(engine.active_tips().bottom.as_ref()).as_deref(),
            Some("desktop.object_rotate_button")
        );
    }

    fn result_strategy() -> impl Strategy<Value = ValidationResult> {
        prop_oneof![
            Just(ValidationResult::Invalid),
            Just(ValidationResult::Valid),
            Just(ValidationResult::Finish),
        ]
    }

    const NAMES: [&str; 5] = ["t0", "t1", "t2", "t3", "t4"];

    proptest! {
        #[test]
        fn selection_is_first_unfinished_valid(
            frames in prop::collection::vec(prop::collection::vec(result_strategy(), 5), 1..8)
        ) {
            let world = World::new();
            let (mut engine, v) = scripted_engine(&world, &NAMES, ValidationResult::Invalid);
            let mut finished = [false; 5];

            for frame in frames {
                for (s, r) in v.iter().zip(&frame) {
                    s.result.set(*r);
                }
                engine.tick();

                let mut expected = None;
                for (i, r) in frame.iter().enumerate() {
                    if finished[i] {
                        continue;
                    }
                    match r {
                        ValidationResult::Finish => finished[i] = true,
                        ValidationResult::Valid => {
                            expected = Some(format!("desktop.{}", NAMES[i]));
                            break;
                        }
                        ValidationResult::Invalid => {}
                    }
                }

                prop_assert_eq!(name(engine.active_tips().bottom.as_ref()), expected);
                for (i, n) in NAMES.iter().enumerate() {
                    prop_assert_eq!(engine.is_finished(&TipId::new(*n)), finished[i]);
                }
            }
        }

        #[test]
        fn repeated_ticks_are_idempotent(
            frame in prop::collection::vec(
                prop_oneof![Just(ValidationResult::Invalid), Just(ValidationResult::Valid)],
                5,
            ),
            repeats in 2usize..6,
        ) {
            let world = World::new();
            let (mut engine, v) = scripted_engine(&world, &NAMES, ValidationResult::Invalid);
            for (s, r) in v.iter().zip(&frame) {
                s.result.set(*r);
            }

            engine.tick();
            let first = engine.active_tips().clone();
            for _ in 0..repeats {
                prop_assert_ne!(engine.tick(), TickOutcome::Changed);
                prop_assert_eq!(engine.active_tips(), &first);
            }
        }

        #[test]
        fn finished_tip_never_selected_again(
            finish_at in 0usize..5,
            later in prop::collection::vec(prop::collection::vec(result_strategy(), 5), 1..5)
        ) {
            let world = World::new();
            let (mut engine, v) = scripted_engine(&world, &NAMES, ValidationResult::Invalid);
            v[finish_at].result.set(ValidationResult::Finish);
            engine.tick();

            let gone = format!("desktop.{}", NAMES[finish_at]);
            for frame in later {
                for (s, r) in v.iter().zip(&frame) {
                    s.result.set(*r);
                }
                engine.tick();
                prop_assert_ne!(name(engine.active_tips().bottom.as_ref()), Some(gone.clone()));
            }
        }
    }
}
