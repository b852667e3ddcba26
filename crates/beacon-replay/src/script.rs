//! Scripted session format.
//!
//! ```json
//! {
//!   "device": { "is_mobile": false, "is_mobile_vr": false },
//!   "ready_after": 2,
//!   "frames": [
//!     { "scene": ["muted"], "objects": 0 },
//!     { "input": { "signals": { "camera_delta": [1.0, 0.0] } }, "repeat": 3 },
//!     { "dismiss": { "tip": "desktop.invite", "scope": "top" } },
//!     { "reset": true }
//!   ]
//! }
//! ```
//!
//! Fields left out of a frame keep their value from the previous frame.
//! Within a frame, `reset` runs first, then the state fields are applied,
//! then `dismiss`, then the ticks.

use std::fs;
use std::path::Path;

use beacon_tips::{
    ActivitySnapshot, DeviceProfile, InputSnapshot, QualifiedTip, Result, SceneSnapshot, Scope,
};
use serde::{Deserialize, Serialize};

/// A whole scripted session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub device: DeviceProfile,
    /// Ticks before input and the object counter become available.
    #[serde(default)]
    pub ready_after: usize,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Session {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// One step of the script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub input: Option<InputSnapshot>,
    pub scene: Option<SceneSnapshot>,
    pub objects: Option<usize>,
    pub activity: Option<ActivitySnapshot>,
    /// Close a tip before ticking.
    pub dismiss: Option<Dismissal>,
    /// Wipe all tip history before ticking.
    #[serde(default)]
    pub reset: bool,
    /// How many ticks to run with this frame's state.
    #[serde(default = "one")]
    pub repeat: usize,
}

fn one() -> usize {
    1
}

/// A user closing a tip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dismissal {
    pub tip: QualifiedTip,
    pub scope: Scope,
}
