//! Tip identity: platforms, scopes, tip identifiers and validation outcomes.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Device class the tip catalog is chosen for.
///
/// Picked once at startup and never changes for the life of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Desktop,
    Mobile,
    /// Standalone mobile VR headsets
    Standalone,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Desktop, Platform::Mobile, Platform::Standalone];

    /// Pick the platform from device capability signals.
    ///
    /// Mobile VR wins over plain mobile; anything else is desktop.
    pub fn detect(device: &DeviceProfile) -> Self {
        if device.is_mobile_vr {
            Platform::Standalone
        } else if device.is_mobile {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
            Platform::Standalone => "standalone",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}

/// Device capability signals used for platform detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    #[serde(default)]
    pub is_mobile: bool,
    #[serde(default)]
    pub is_mobile_vr: bool,
}

/// Screen region a tip is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Top,
    Bottom,
}

impl Scope {
    /// Evaluation order for a tick.
    pub const ALL: [Scope; 2] = [Scope::Top, Scope::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Top => "top",
            Scope::Bottom => "bottom",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Scope::Top => 0,
            Scope::Bottom => 1,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::UnknownScope(s.to_string()))
    }
}

/// Opaque tip name, e.g. `locomotion`.
///
/// Built-in catalog entries borrow static strings; host-defined tips own
/// their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipId(Cow<'static, str>);

impl TipId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TipId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TipId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl fmt::Display for TipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tip together with the platform whose catalog it came from.
///
/// Rendered as `platform.tip`. Parsing splits on the first `.` only, so the
/// tip part may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTip {
    pub platform: Platform,
    pub tip: TipId,
}

impl QualifiedTip {
    pub fn new(platform: Platform, tip: TipId) -> Self {
        Self { platform, tip }
    }
}

impl fmt::Display for QualifiedTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.platform, self.tip)
    }
}

impl FromStr for QualifiedTip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (platform, tip) = s
            .split_once('.')
            .ok_or_else(|| Error::InvalidTip(s.to_string()))?;
        if tip.is_empty() {
            return Err(Error::InvalidTip(s.to_string()));
        }
        Ok(Self {
            platform: platform.parse()?,
            tip: TipId::new(tip),
        })
    }
}

impl Serialize for QualifiedTip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedTip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of running one validator against one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    /// Not showable now; no memory effect
    Invalid,
    /// Showable now
    Valid,
    /// Never show again (terminal)
    Finish,
}
