//! Pure per-card transform computation.
//!
//! Everything here is a function of `(index, card top, scroll sample, config)`; nothing touches a
//! rendering tree. The engine feeds the results to the change detector, which decides what to write.

use crate::{
    animation::{ease::out_expo, progress::progress},
    foundation::core::{Affine, ScrollSample, Vec2, round_to},
    stack::config::{ResolvedWindows, StackConfig},
};

/// Scroll distance (px) after a card's trigger start over which it flips to visible.
pub const FAST_WINDOW: f64 = 800.0;
/// Scroll distance (px) over which a card glides into place.
pub const SLOW_WINDOW: f64 = 8000.0;
/// Vertical offset (px) a card starts its entrance from.
pub const ENTRY_DISTANCE: f64 = 200.0;
/// Horizontal offset (px) per index, giving the diagonal cascade.
pub const HORIZONTAL_STEP: f64 = 100.0;

const TRANSLATE_DIGITS: i32 = 2;
const SCALE_DIGITS: i32 = 3;
const ANGLE_DIGITS: i32 = 2;
const BLUR_DIGITS: i32 = 2;

/// Card visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Desired visual state of one card for one tick. Values are already rounded.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    pub translate_x: f64,
    pub translate_y_offset: f64,
    pub visibility: Visibility,
    pub scale: f64,
    /// Degrees.
    pub rotation: f64,
    /// Pixels.
    pub blur: f64,
}

impl TransformState {
    /// `translate3d(..) scale(..) rotate(..)` as written to the card's `transform` style.
    pub fn transform_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) scale({}) rotate({}deg)",
            self.translate_x, self.translate_y_offset, self.scale, self.rotation
        )
    }

    /// `blur(..)` filter, or an empty string when unblurred.
    pub fn filter_css(&self) -> String {
        if self.blur > 0.0 {
            format!("blur({}px)", self.blur)
        } else {
            String::new()
        }
    }

    /// Same transform as [`Self::transform_css`], about a top-center origin for a card of
    /// `card_width` pixels.
    pub fn to_affine(&self, card_width: f64) -> Affine {
        let origin = Vec2::new(card_width / 2.0, 0.0);
        Affine::translate(origin)
            * Affine::translate(Vec2::new(self.translate_x, self.translate_y_offset))
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate(-origin)
    }
}

/// Scroll offset at which card `index` starts stacking.
pub fn trigger_start(card_top: f64, index: usize, windows: ResolvedWindows, config: &StackConfig) -> f64 {
    card_top - windows.stack_position_px - config.item_stack_distance * index as f64
}

/// Scroll offset at which card `index` reaches its target scale.
pub fn trigger_end(card_top: f64, windows: ResolvedWindows) -> f64 {
    card_top - windows.scale_end_position_px
}

/// Highest index whose trigger start has been reached; 0 when none has.
pub fn top_visible_index(
    card_tops: &[f64],
    scroll_top: f64,
    windows: ResolvedWindows,
    config: &StackConfig,
) -> usize {
    card_tops
        .iter()
        .enumerate()
        .rev()
        .find(|&(j, &top)| scroll_top >= trigger_start(top, j, windows, config))
        .map_or(0, |(j, _)| j)
}

/// Compute one card's state. `top_visible` comes from [`top_visible_index`] for the same tick.
pub fn compute_card(
    index: usize,
    card_top: f64,
    top_visible: usize,
    scroll_top: f64,
    windows: ResolvedWindows,
    config: &StackConfig,
) -> TransformState {
    let i = index as f64;
    let start = trigger_start(card_top, index, windows, config);
    let end = trigger_end(card_top, windows);

    let scale_progress = progress(scroll_top, start, end);
    let target_scale = config.base_scale + i * config.item_scale;
    let scale = 1.0 - scale_progress * (1.0 - target_scale);
    let rotation = if config.rotation_amount != 0.0 {
        i * config.rotation_amount * scale_progress
    } else {
        0.0
    };

    let blur = if config.blur_amount != 0.0 && index < top_visible {
        ((top_visible - index) as f64 * config.blur_amount).max(0.0)
    } else {
        0.0
    };

    let (visibility, translate_y_offset) = entrance(index, scroll_top, start);

    TransformState {
        translate_x: round_to(i * HORIZONTAL_STEP, TRANSLATE_DIGITS),
        translate_y_offset: round_to(translate_y_offset, TRANSLATE_DIGITS),
        visibility,
        scale: round_to(scale, SCALE_DIGITS),
        rotation: round_to(rotation, ANGLE_DIGITS),
        blur: round_to(blur, BLUR_DIGITS),
    }
}

/// Visibility flips over the fast window; the glide-in runs over the much longer slow window, so
/// a card can be on screen and still arriving.
fn entrance(index: usize, scroll_top: f64, start: f64) -> (Visibility, f64) {
    if index == 0 {
        return (Visibility::Visible, 0.0);
    }
    let appear = progress(scroll_top, start, start + FAST_WINDOW);
    if appear <= 0.0 {
        return (Visibility::Hidden, ENTRY_DISTANCE);
    }
    let glide = progress(scroll_top, start, start + SLOW_WINDOW);
    (Visibility::Visible, ENTRY_DISTANCE * (1.0 - out_expo(glide)))
}

/// Compute every card's state for one scroll sample, in index order.
pub fn compute_frame(card_tops: &[f64], sample: ScrollSample, config: &StackConfig) -> Vec<TransformState> {
    let windows = config.resolve(sample.container_height);
    let top_visible = if config.blur_amount != 0.0 {
        top_visible_index(card_tops, sample.scroll_top, windows, config)
    } else {
        0
    };
    card_tops
        .iter()
        .enumerate()
        .map(|(i, &top)| compute_card(i, top, top_visible, sample.scroll_top, windows, config))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/stack/transform.rs"]
mod tests;
