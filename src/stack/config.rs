use crate::foundation::{
    core::Length,
    error::{StackError, StackResult},
};

/// Immutable configuration for one mounted stack.
///
/// Field names deserialize in camelCase (`itemDistance`, `stackPosition`, ...). Missing fields
/// fall back to [`StackConfig::default`]; unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackConfig {
    /// Trailing margin (px) applied to every card but the last at mount.
    pub item_distance: f64,
    /// Per-index increment added to `base_scale` to get a card's target scale.
    pub item_scale: f64,
    /// Scroll pixels of stagger between successive cards' trigger windows.
    pub item_stack_distance: f64,
    /// Where a card's trigger window starts, measured from the top of the container.
    pub stack_position: Length,
    /// Where a card's scale window ends, measured from the top of the container.
    pub scale_end_position: Length,
    /// Target scale of card 0 once fully stacked.
    pub base_scale: f64,
    /// Degrees of rotation per index at full scale progress. 0 disables rotation.
    pub rotation_amount: f64,
    /// Blur (px) per level of depth below the top visible card. 0 disables blur.
    pub blur_amount: f64,
    /// Window scroll (`true`) or a dedicated scroll container (`false`).
    pub use_window_scroll: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            item_distance: 50.0,
            item_scale: 0.02,
            item_stack_distance: 10_000.0,
            stack_position: Length::Percent(15.0),
            scale_end_position: Length::Percent(10.0),
            base_scale: 0.9,
            rotation_amount: 0.7,
            blur_amount: 4.0,
            use_window_scroll: true,
        }
    }
}

/// Which scroll surface drives the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// The page viewport scrolls.
    Window,
    /// A designated container element scrolls.
    Container,
}

impl StackConfig {
    pub fn validate(&self) -> StackResult<()> {
        let numbers = [
            ("itemDistance", self.item_distance),
            ("itemScale", self.item_scale),
            ("itemStackDistance", self.item_stack_distance),
            ("stackPosition", self.stack_position.value()),
            ("scaleEndPosition", self.scale_end_position.value()),
            ("baseScale", self.base_scale),
            ("rotationAmount", self.rotation_amount),
            ("blurAmount", self.blur_amount),
        ];
        for (name, v) in numbers {
            if !v.is_finite() {
                return Err(StackError::validation(format!("{name} must be finite")));
            }
        }
        if self.item_distance < 0.0 {
            return Err(StackError::validation("itemDistance must be >= 0"));
        }
        Ok(())
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        if self.use_window_scroll {
            ScrollMode::Window
        } else {
            ScrollMode::Container
        }
    }

    /// Resolve percentage bounds against the current container height.
    pub fn resolve(&self, container_height: f64) -> ResolvedWindows {
        ResolvedWindows {
            stack_position_px: self.stack_position.resolve(container_height),
            scale_end_position_px: self.scale_end_position.resolve(container_height),
        }
    }

    /// Static, mount-time presentation for card `index` of `count`.
    pub fn card_setup(&self, index: usize, count: usize) -> CardSetup {
        CardSetup {
            margin_bottom: (index + 1 < count).then_some(self.item_distance),
            ..CardSetup::default()
        }
    }
}

/// Trigger-window bounds in pixels for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedWindows {
    pub stack_position_px: f64,
    pub scale_end_position_px: f64,
}

/// Mount-time style applied once per card before the first tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CardSetup {
    /// Trailing spacing; `None` for the last card.
    pub margin_bottom: Option<f64>,
    pub transform_origin: &'static str,
    pub will_change: &'static str,
    pub perspective_px: f64,
    pub backface_hidden: bool,
    /// Initial transform, an identity that still promotes the card to its own layer.
    pub initial_transform: &'static str,
}

impl Default for CardSetup {
    fn default() -> Self {
        Self {
            margin_bottom: None,
            transform_origin: "top center",
            will_change: "transform, filter",
            perspective_px: 1000.0,
            backface_hidden: true,
            initial_transform: "translateZ(0)",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/config.rs"]
mod tests;
