//! Per-tip validators.
//!
//! A validator looks at one frame and answers [`ValidationResult`]. It never
//! mutates anything; the scope evaluator applies the consequences of a
//! `Finish`.
//!
//! # Validator shapes
//!
//! - **Mode indicators** mirror a live flag and never finish.
//! - **One-shot actions** finish the first frame the taught action shows up
//!   on its input path, and go invalid while preconditions don't hold.
//! - **Count-gated** tips need shared objects to demonstrate on.
//! - **Activity-gated** tips finish once a durable activity flag is set, no
//!   matter what the current frame looks like.

use std::collections::HashMap;
use std::fmt;

use crate::context::{ActivitySnapshot, CapabilitySet, FrameContext, SceneFlag, SignalPath};
use crate::tip::{TipId, ValidationResult};

use ValidationResult::{Finish, Invalid, Valid};

/// Decides whether a tip may be shown this frame.
pub trait Validator {
    fn validate(&self, ctx: &FrameContext<'_>) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&FrameContext<'_>) -> ValidationResult,
{
    fn validate(&self, ctx: &FrameContext<'_>) -> ValidationResult {
        self(ctx)
    }
}

/// The built-in tips, one variant each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinValidator {
    PenMode,
    VideoShareMode,
    MuteMode,
    Invite,
    Look,
    Locomotion,
    Turning,
    SpawnMenu,
    FreezeGesture,
    ObjectGrab,
    ObjectZoom,
    ObjectScale,
    ObjectRotateButton,
    ObjectScaleButton,
    ObjectRecenterButton,
    ObjectPin,
    PenColor,
    PenSize,
}

impl BuiltinValidator {
    pub const ALL: [BuiltinValidator; 18] = [
        BuiltinValidator::PenMode,
        BuiltinValidator::VideoShareMode,
        BuiltinValidator::MuteMode,
        BuiltinValidator::Invite,
        BuiltinValidator::Look,
        BuiltinValidator::Locomotion,
        BuiltinValidator::Turning,
        BuiltinValidator::SpawnMenu,
        BuiltinValidator::FreezeGesture,
        BuiltinValidator::ObjectGrab,
        BuiltinValidator::ObjectZoom,
        BuiltinValidator::ObjectScale,
        BuiltinValidator::ObjectRotateButton,
        BuiltinValidator::ObjectScaleButton,
        BuiltinValidator::ObjectRecenterButton,
        BuiltinValidator::ObjectPin,
        BuiltinValidator::PenColor,
        BuiltinValidator::PenSize,
    ];

    /// Catalog name of this tip.
    pub const fn name(&self) -> &'static str {
        match self {
            BuiltinValidator::PenMode => "pen_mode",
            BuiltinValidator::VideoShareMode => "video_share_mode",
            BuiltinValidator::MuteMode => "mute_mode",
            BuiltinValidator::Invite => "invite",
            BuiltinValidator::Look => "look",
            BuiltinValidator::Locomotion => "locomotion",
            BuiltinValidator::Turning => "turning",
            BuiltinValidator::SpawnMenu => "spawn_menu",
            BuiltinValidator::FreezeGesture => "freeze_gesture",
            BuiltinValidator::ObjectGrab => "object_grab",
            BuiltinValidator::ObjectZoom => "object_zoom",
            BuiltinValidator::ObjectScale => "object_scale",
            BuiltinValidator::ObjectRotateButton => "object_rotate_button",
            BuiltinValidator::ObjectScaleButton => "object_scale_button",
            BuiltinValidator::ObjectRecenterButton => "object_recenter_button",
            BuiltinValidator::ObjectPin => "object_pin",
            BuiltinValidator::PenColor => "pen_color",
            BuiltinValidator::PenSize => "pen_size",
        }
    }

    pub const fn id(&self) -> TipId {
        TipId::from_static(self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

impl Validator for BuiltinValidator {
    fn validate(&self, ctx: &FrameContext<'_>) -> ValidationResult {
        let frozen = ctx.flag(SceneFlag::Frozen);
        let holding_pen = ctx.holding(CapabilitySet::HoldingPen);
        let holding_object = ctx.holding(CapabilitySet::HoldingInteractable);
        let objects = ctx.object_count;

        match self {
            BuiltinValidator::PenMode => indicator(holding_pen),
            BuiltinValidator::VideoShareMode => indicator(ctx.flag(SceneFlag::SharingVideo)),
            BuiltinValidator::MuteMode => indicator(ctx.flag(SceneFlag::Muted)),

            BuiltinValidator::Invite => {
                if ctx.flag(SceneFlag::Copresent) {
                    Finish
                } else if ctx.flag(SceneFlag::Mirroring) {
                    Invalid
                } else {
                    Valid
                }
            }
            BuiltinValidator::Look => {
                one_shot(!holding_pen && !holding_object, ctx.acted(SignalPath::CameraDelta))
            }
            BuiltinValidator::Locomotion => {
                one_shot(!frozen, ctx.acted(SignalPath::CharacterAcceleration))
            }
            BuiltinValidator::Turning => one_shot(
                !frozen,
                ctx.acted(SignalPath::SnapRotateLeft) || ctx.acted(SignalPath::SnapRotateRight),
            ),
            BuiltinValidator::PenColor => one_shot(holding_pen, ctx.acted(SignalPath::PenColorChange)),
            BuiltinValidator::PenSize => one_shot(holding_pen, ctx.acted(SignalPath::PenSizeChange)),
            BuiltinValidator::ObjectZoom => one_shot(holding_object, ctx.acted(SignalPath::ZoomDelta)),
            BuiltinValidator::ObjectScale => one_shot(holding_object, ctx.acted(SignalPath::ScaleDelta)),

            BuiltinValidator::SpawnMenu => {
                if frozen {
                    Invalid
                } else if objects > 0 {
                    Finish
                } else {
                    Valid
                }
            }
            BuiltinValidator::FreezeGesture => {
                if objects == 0 {
                    Invalid
                } else if frozen {
                    Finish
                } else if holding_object {
                    Invalid
                } else {
                    Valid
                }
            }
            BuiltinValidator::ObjectGrab => {
                if objects == 0 || frozen {
                    Invalid
                } else if holding_object {
                    Finish
                } else {
                    Valid
                }
            }

            BuiltinValidator::ObjectRotateButton => activity_gated(ctx, |a| a.has_rotated),
            BuiltinValidator::ObjectScaleButton => activity_gated(ctx, |a| a.has_scaled),
            BuiltinValidator::ObjectRecenterButton => activity_gated(ctx, |a| a.has_recentered),
            BuiltinValidator::ObjectPin => activity_gated(ctx, |a| a.has_pinned),
        }
    }
}

fn indicator(on: bool) -> ValidationResult {
    if on {
        Valid
    } else {
        Invalid
    }
}

fn one_shot(preconditions: bool, performed: bool) -> ValidationResult {
    if !preconditions {
        Invalid
    } else if performed {
        Finish
    } else {
        Valid
    }
}

fn activity_gated(ctx: &FrameContext<'_>, done: fn(&ActivitySnapshot) -> bool) -> ValidationResult {
    // No activity store means the flag reads as never set.
    if ctx.activity.as_ref().is_some_and(done) {
        return Finish;
    }
    if !ctx.flag(SceneFlag::Frozen) || ctx.object_count == 0 {
        return Invalid;
    }
    Valid
}

/// Tip name to validator, resolved once when an engine is built.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<TipId, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tip.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for validator in BuiltinValidator::ALL {
            registry.register(validator.id(), validator);
        }
        registry
    }

    /// Add or replace the validator for `tip`.
    pub fn register(&mut self, tip: TipId, validator: impl Validator + 'static) {
        self.validators.insert(tip, Box::new(validator));
    }

    pub fn get(&self, tip: &TipId) -> Option<&dyn Validator> {
        self.validators.get(tip).map(|v| v.as_ref())
    }

    pub fn contains(&self, tip: &TipId) -> bool {
        self.validators.contains_key(tip)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tips: Vec<_> = self.validators.keys().map(TipId::as_str).collect();
        tips.sort_unstable();
        f.debug_struct("ValidatorRegistry").field("tips", &tips).finish()
    }
}
