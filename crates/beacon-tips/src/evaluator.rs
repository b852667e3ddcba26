//! Per-scope tip selection.
//!
//! Walks a scope's catalog in priority order:
//!
//! ```text
//! finished already -> skip (validator not called)
//! Finish           -> persist, keep scanning
//! Valid            -> select, stop
//! Invalid          -> keep scanning
//! ```
//!
//! Once every tip in the scope is known finished the scope is marked
//! exhausted and later passes return immediately.

use tracing::debug;

use crate::context::{FrameContext, KeyValueStore};
use crate::store::FinishedTips;
use crate::tip::{Scope, TipId, ValidationResult};
use crate::validators::ValidatorRegistry;

/// Selection state for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEvaluator {
    scope: Scope,
    exhausted: bool,
}

impl ScopeEvaluator {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            exhausted: false,
        }
    }

    /// Whether every tip in this scope is finished.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Forget exhaustion so the next pass scans again.
    pub fn reset(&mut self) {
        self.exhausted = false;
    }

    /// Run one selection pass and return the chosen tip, if any.
    pub fn evaluate<S: KeyValueStore>(
        &mut self,
        tips: &[TipId],
        registry: &ValidatorRegistry,
        finished: &mut FinishedTips<S>,
        ctx: &FrameContext<'_>,
    ) -> Option<TipId> {
        if self.exhausted {
            return None;
        }

        let mut finished_count = 0;

        for tip in tips {
            if finished.is_finished(tip) {
                finished_count += 1;
                continue;
            }

            let Some(validator) = registry.get(tip) else {
                debug!(scope = %self.scope, tip = %tip, "no validator registered, skipping");
                continue;
            };

            match validator.validate(ctx) {
                ValidationResult::Valid => return Some(tip.clone()),
                ValidationResult::Finish => {
                    finished.mark_finished(tip);
                    finished_count += 1;
                }
                ValidationResult::Invalid => {}
            }
        }

        if finished_count == tips.len() {
            debug!(scope = %self.scope, "all tips finished, scope exhausted");
            self.exhausted = true;
        }

        None
    }
}
