//! Beacon Replay
//!
//! Feeds a scripted session of frames through a [`beacon_tips::TipEngine`]
//! and reports every change of the active tips. Finished tips persist in a
//! JSON file between runs, the same way a host keeps them between sessions.

pub mod config;
pub mod file_store;
pub mod replay;
pub mod script;

pub use config::ReplayConfig;
pub use file_store::JsonFileStore;
pub use replay::{Replayer, Transition};
pub use script::{Dismissal, Frame, Session};
