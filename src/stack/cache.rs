use std::collections::HashMap;

use crate::stack::transform::TransformState;

/// Largest translate delta (px) that is still considered unchanged.
pub const TRANSLATE_THRESHOLD: f64 = 1.0;
/// Largest scale delta that is still considered unchanged.
pub const SCALE_THRESHOLD: f64 = 0.01;
/// Largest rotation (deg) or blur (px) delta that is still considered unchanged.
pub const ANGLE_BLUR_THRESHOLD: f64 = 1.0;

/// Last-applied state per card index.
///
/// A missing entry means the card has never been written and must be written unconditionally.
#[derive(Debug, Default)]
pub struct TransformCache {
    applied: HashMap<usize, TransformState>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `next` differs enough from what card `index` last received to warrant a write.
    pub fn needs_write(&self, index: usize, next: &TransformState) -> bool {
        self.applied
            .get(&index)
            .is_none_or(|prev| exceeds_thresholds(prev, next))
    }

    /// Record `next` if it needs writing. Returns `true` when the caller must apply it.
    pub fn observe(&mut self, index: usize, next: TransformState) -> bool {
        if !self.needs_write(index, &next) {
            return false;
        }
        self.applied.insert(index, next);
        true
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }
}

fn exceeds_thresholds(prev: &TransformState, next: &TransformState) -> bool {
    prev.visibility != next.visibility
        || (prev.translate_x - next.translate_x).abs() > TRANSLATE_THRESHOLD
        || (prev.translate_y_offset - next.translate_y_offset).abs() > TRANSLATE_THRESHOLD
        || (prev.scale - next.scale).abs() > SCALE_THRESHOLD
        || (prev.rotation - next.rotation).abs() > ANGLE_BLUR_THRESHOLD
        || (prev.blur - next.blur).abs() > ANGLE_BLUR_THRESHOLD
}

#[cfg(test)]
#[path = "../../tests/unit/stack/cache.rs"]
mod tests;
