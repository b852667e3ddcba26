//! Collaborator interfaces and the per-frame context handed to validators.
//!
//! The engine never reads input devices, scene state or storage directly.
//! Hosts plug those in through the traits here. Plain snapshot types are
//! provided for hosts that already have the data in hand, and for tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Named input capability sets that may be active this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilitySet {
    HoldingPen,
    HoldingInteractable,
}

/// Input action paths a validator may query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPath {
    CameraDelta,
    CharacterAcceleration,
    SnapRotateLeft,
    SnapRotateRight,
    PenColorChange,
    PenSizeChange,
    ZoomDelta,
    ScaleDelta,
}

/// Named boolean scene states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneFlag {
    Frozen,
    Copresent,
    SharingVideo,
    Mirroring,
    Muted,
}

/// A value reported on an input path this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Signal {
    Flag(bool),
    Axis(f32),
    Vector([f32; 2]),
}

impl Signal {
    /// Whether the signal represents an action actually taken.
    ///
    /// Some bindings emit zero vectors every frame while idle; those do not
    /// count.
    pub fn is_active(&self) -> bool {
        match *self {
            Signal::Flag(on) => on,
            Signal::Axis(v) => v != 0.0,
            Signal::Vector([x, y]) => x != 0.0 || y != 0.0,
        }
    }
}

/// Live user input for the current frame.
pub trait InputState {
    fn has_capability(&self, set: CapabilitySet) -> bool;
    fn signal(&self, path: SignalPath) -> Option<Signal>;
}

/// Scene/application boolean flags.
pub trait SceneState {
    fn flag(&self, flag: SceneFlag) -> bool;
}

/// Number of shared objects currently present.
pub trait ObjectCounter {
    fn count(&self) -> usize;
}

/// Durable "has the user ever done X" flags, owned by another store.
pub trait ActivityStore {
    fn has_rotated(&self) -> bool;
    fn has_scaled(&self) -> bool;
    fn has_recentered(&self) -> bool;
    fn has_pinned(&self) -> bool;

    /// Clear the activity flags above. Called only on a full tip reset.
    fn reset_activity_flags(&self);

    /// Clear the unrelated confirmed-rooms flag. Called only on a full tip reset.
    fn reset_confirmed_rooms_flag(&self);
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Late-bound handles the engine needs before it can evaluate anything.
///
/// Both may be unavailable for the first few frames after startup.
pub trait Resolver {
    fn input(&self) -> Option<Rc<dyn InputState>>;
    fn object_counter(&self) -> Option<Rc<dyn ObjectCounter>>;
}

/// Resolver over handles that already exist.
#[derive(Clone)]
pub struct StaticResolver {
    pub input: Rc<dyn InputState>,
    pub objects: Rc<dyn ObjectCounter>,
}

impl StaticResolver {
    pub fn new(input: Rc<dyn InputState>, objects: Rc<dyn ObjectCounter>) -> Self {
        Self { input, objects }
    }
}

impl Resolver for StaticResolver {
    fn input(&self) -> Option<Rc<dyn InputState>> {
        Some(Rc::clone(&self.input))
    }

    fn object_counter(&self) -> Option<Rc<dyn ObjectCounter>> {
        Some(Rc::clone(&self.objects))
    }
}

/// Activity flags copied out of an [`ActivityStore`] at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    #[serde(default)]
    pub has_rotated: bool,
    #[serde(default)]
    pub has_scaled: bool,
    #[serde(default)]
    pub has_recentered: bool,
    #[serde(default)]
    pub has_pinned: bool,
}

impl ActivitySnapshot {
    pub fn capture(store: &dyn ActivityStore) -> Self {
        Self {
            has_rotated: store.has_rotated(),
            has_scaled: store.has_scaled(),
            has_recentered: store.has_recentered(),
            has_pinned: store.has_pinned(),
        }
    }
}

/// Everything a validator may look at for one frame.
pub struct FrameContext<'a> {
    pub input: &'a dyn InputState,
    pub scene: &'a dyn SceneState,
    pub object_count: usize,
    /// `None` when no activity store is wired up.
    pub activity: Option<ActivitySnapshot>,
}

impl FrameContext<'_> {
    pub fn holding(&self, set: CapabilitySet) -> bool {
        self.input.has_capability(set)
    }

    pub fn flag(&self, flag: SceneFlag) -> bool {
        self.scene.flag(flag)
    }

    pub fn acted(&self, path: SignalPath) -> bool {
        self.input.signal(path).is_some_and(|s| s.is_active())
    }
}

/// Input state as plain data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    #[serde(default)]
    pub capabilities: HashSet<CapabilitySet>,
    #[serde(default)]
    pub signals: HashMap<SignalPath, Signal>,
}

impl InputSnapshot {
    pub fn with_capability(mut self, set: CapabilitySet) -> Self {
        self.capabilities.insert(set);
        self
    }

    pub fn with_signal(mut self, path: SignalPath, signal: Signal) -> Self {
        self.signals.insert(path, signal);
        self
    }
}

impl InputState for InputSnapshot {
    fn has_capability(&self, set: CapabilitySet) -> bool {
        self.capabilities.contains(&set)
    }

    fn signal(&self, path: SignalPath) -> Option<Signal> {
        self.signals.get(&path).copied()
    }
}

/// Scene flags as plain data. Flags not present are false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneSnapshot {
    pub flags: HashSet<SceneFlag>,
}

impl SceneSnapshot {
    pub fn with(mut self, flag: SceneFlag) -> Self {
        self.flags.insert(flag);
        self
    }
}

impl SceneState for SceneSnapshot {
    fn flag(&self, flag: SceneFlag) -> bool {
        self.flags.contains(&flag)
    }
}

// Hosts update shared handles between frames through interior mutability.

impl<T: InputState> InputState for RefCell<T> {
    fn has_capability(&self, set: CapabilitySet) -> bool {
        self.borrow().has_capability(set)
    }

    fn signal(&self, path: SignalPath) -> Option<Signal> {
        self.borrow().signal(path)
    }
}

impl<T: SceneState> SceneState for RefCell<T> {
    fn flag(&self, flag: SceneFlag) -> bool {
        self.borrow().flag(flag)
    }
}

impl ObjectCounter for Cell<usize> {
    fn count(&self) -> usize {
        self.get()
    }
}

/// In-process [`ActivityStore`].
#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    flags: Cell<ActivitySnapshot>,
    confirmed_rooms: Cell<bool>,
}

impl MemoryActivityStore {
    pub fn new(flags: ActivitySnapshot) -> Self {
        Self {
            flags: Cell::new(flags),
            confirmed_rooms: Cell::new(false),
        }
    }

    pub fn set_flags(&self, flags: ActivitySnapshot) {
        self.flags.set(flags);
    }

    pub fn flags(&self) -> ActivitySnapshot {
        self.flags.get()
    }

    pub fn set_confirmed_rooms(&self, confirmed: bool) {
        self.confirmed_rooms.set(confirmed);
    }

    pub fn confirmed_rooms(&self) -> bool {
        self.confirmed_rooms.get()
    }
}

impl ActivityStore for MemoryActivityStore {
    fn has_rotated(&self) -> bool {
        self.flags.get().has_rotated
    }

    fn has_scaled(&self) -> bool {
        self.flags.get().has_scaled
    }

    fn has_recentered(&self) -> bool {
        self.flags.get().has_recentered
    }

    fn has_pinned(&self) -> bool {
        self.flags.get().has_pinned
    }

    fn reset_activity_flags(&self) {
        self.flags.set(ActivitySnapshot::default());
    }

    fn reset_confirmed_rooms_flag(&self) {
        self.confirmed_rooms.set(false);
    }
}
