//! Beacon Tips
//!
//! Picks, once per frame, at most one contextual help tip for each of two
//! screen regions (`top` and `bottom`).
//!
//! # Design
//!
//! Every platform has a static catalog: per scope, an ordered list of tip
//! names. Each tip has a pure [`Validator`] that looks at the frame
//! (input, scene flags, shared-object count, durable activity flags) and
//! answers `Invalid`, `Valid` or `Finish`. The first `Valid` tip in catalog
//! order wins its scope. `Finish` is permanent: the tip is written to a
//! durable record and never evaluated again until a full reset.
//!
//! When every tip in a scope is finished the scope is marked exhausted and
//! skipped outright.
//!
//! # Example
//!
//! ```
//! use std::cell::{Cell, RefCell};
//! use std::rc::Rc;
//! use beacon_tips::{
//!     InputSnapshot, MemoryStore, Platform, SceneSnapshot, StaticResolver, TickOutcome, TipEngine,
//! };
//!
//! let input = Rc::new(RefCell::new(InputSnapshot::default()));
//! let objects = Rc::new(Cell::new(0usize));
//! let scene = Rc::new(RefCell::new(SceneSnapshot::default()));
//!
//! let mut engine = TipEngine::new(
//!     Platform::Desktop,
//!     MemoryStore::new(),
//!     scene,
//!     StaticResolver::new(input, objects),
//! );
//!
//! assert_eq!(engine.tick(), TickOutcome::Changed);
//! let bottom = engine.active_tips().bottom.as_ref().unwrap();
//! assert_eq!(bottom.to_string(), "desktop.look");
//! ```

mod catalog;
mod context;
mod engine;
mod error;
mod evaluator;
mod store;
mod tip;
mod validators;

pub use catalog::{TipCatalog, LOCALLY_DISMISSIBLE};
pub use context::{
    ActivitySnapshot, ActivityStore, CapabilitySet, FrameContext, InputSnapshot, InputState,
    KeyValueStore, MemoryActivityStore, ObjectCounter, Resolver, SceneFlag, SceneSnapshot,
    SceneState, Signal, SignalPath, StaticResolver,
};
pub use engine::{ActiveTips, TickOutcome, TipEngine};
pub use error::{Error, Result};
pub use evaluator::ScopeEvaluator;
pub use store::{FinishedRecord, FinishedTips, MemoryStore, TipRecord, FINISHED_TIPS_KEY};
pub use tip::{DeviceProfile, Platform, QualifiedTip, Scope, TipId, ValidationResult};
pub use validators::{BuiltinValidator, Validator, ValidatorRegistry};
