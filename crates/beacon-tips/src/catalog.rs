//! Static tip catalogs.
//!
//! Each platform lists, per scope, the tips it may show in priority order.
//! The first entry whose validator passes wins.

use std::collections::HashSet;

use crate::tip::{Platform, Scope, TipId};

const TOP_TIPS: &[&str] = &["pen_mode", "video_share_mode", "mute_mode", "invite"];

const DESKTOP_BOTTOM: &[&str] = &[
    "look",
    "locomotion",
    "spawn_menu",
    "freeze_gesture",
    "object_grab",
    "object_zoom",
    "object_rotate_button",
    "object_scale_button",
    "object_recenter_button",
    "object_pin",
    "pen_color",
    "pen_size",
];

const MOBILE_BOTTOM: &[&str] = &[
    "look",
    "locomotion",
    "spawn_menu",
    "freeze_gesture",
    "object_grab",
    "object_scale",
    "object_rotate_button",
    "object_recenter_button",
    "object_pin",
];

const STANDALONE_BOTTOM: &[&str] = &[
    "locomotion",
    "turning",
    "spawn_menu",
    "freeze_gesture",
    "object_grab",
    "object_scale",
    "object_pin",
    "pen_color",
    "pen_size",
];

/// Tips whose close button finishes only themselves. Closing any other tip
/// finishes its whole scope.
pub const LOCALLY_DISMISSIBLE: &[&str] = &["invite"];

/// Ordered tip lists for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipCatalog {
    scopes: [Vec<TipId>; 2],
    dismissible: HashSet<TipId>,
}

impl TipCatalog {
    /// Build a catalog from explicit ordered lists.
    pub fn new(top: Vec<TipId>, bottom: Vec<TipId>) -> Self {
        Self {
            scopes: [top, bottom],
            dismissible: HashSet::new(),
        }
    }

    /// Mark tips that dismiss individually.
    pub fn with_dismissible(mut self, tips: impl IntoIterator<Item = TipId>) -> Self {
        self.dismissible.extend(tips);
        self
    }

    /// The built-in catalog for `platform`.
    pub fn for_platform(platform: Platform) -> Self {
        let bottom = match platform {
            Platform::Desktop => DESKTOP_BOTTOM,
            Platform::Mobile => MOBILE_BOTTOM,
            Platform::Standalone => STANDALONE_BOTTOM,
        };
        Self::new(static_ids(TOP_TIPS), static_ids(bottom))
            .with_dismissible(static_ids(LOCALLY_DISMISSIBLE))
    }

    /// Tips in `scope`, highest priority first.
    pub fn tips(&self, scope: Scope) -> &[TipId] {
        &self.scopes[scope.index()]
    }

    pub fn is_locally_dismissible(&self, tip: &TipId) -> bool {
        self.dismissible.contains(tip)
    }

    /// Scope containing `tip`, if any.
    pub fn scope_of(&self, tip: &TipId) -> Option<Scope> {
        Scope::ALL.into_iter().find(|s| self.tips(*s).contains(tip))
    }

    /// Every tip across both scopes.
    pub fn all_tips(&self) -> impl Iterator<Item = &TipId> {
        self.scopes.iter().flatten()
    }
}

fn static_ids(names: &'static [&'static str]) -> Vec<TipId> {
    names.iter().copied().map(TipId::from_static).collect()
}
