//! Inertial smooth scrolling.
//!
//! Input deltas move a *target* offset; every animation frame the *animated* offset eases toward
//! it over a fixed duration. New input mid-flight retargets from wherever the animation currently
//! is, so motion never jumps.

use crate::{
    animation::ease::Ease,
    foundation::error::{StackError, StackResult},
};

/// Smooth-scroll tuning. Deserializes in camelCase.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothScrollOptions {
    /// Seconds for one retarget animation to settle.
    pub duration: f64,
    pub easing: Ease,
    /// Scale applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Scale applied to touch drag deltas.
    pub touch_multiplier: f64,
    /// Animate wheel input; when `false` wheel deltas jump immediately.
    pub smooth_wheel: bool,
    /// Disable clamping to `[0, limit]`.
    pub infinite: bool,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self::window()
    }
}

impl SmoothScrollOptions {
    /// Preset used when the page viewport scrolls.
    pub fn window() -> Self {
        Self {
            duration: 2.0,
            easing: Ease::SmoothScroll,
            wheel_multiplier: 0.3,
            touch_multiplier: 2.0,
            smooth_wheel: true,
            infinite: false,
        }
    }

    /// Preset used for a dedicated scroll container.
    pub fn container() -> Self {
        Self {
            duration: 1.2,
            wheel_multiplier: 1.0,
            ..Self::window()
        }
    }

    pub fn validate(&self) -> StackResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(StackError::scroll("duration must be finite and >= 0"));
        }
        if !self.wheel_multiplier.is_finite() || !self.touch_multiplier.is_finite() {
            return Err(StackError::scroll("input multipliers must be finite"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    elapsed_secs: f64,
}

/// Smooth-scroll emulator. Owns the effective scroll offset; the host mirrors it onto the real
/// scroll surface.
#[derive(Debug)]
pub struct SmoothScroll {
    opts: SmoothScrollOptions,
    animated: f64,
    target: f64,
    limit: f64,
    tween: Option<Tween>,
    last_time_ms: Option<f64>,
    stopped: bool,
    destroyed: bool,
}

impl SmoothScroll {
    pub fn new(opts: SmoothScrollOptions, initial_offset: f64, limit: f64) -> StackResult<Self> {
        opts.validate()?;
        if !initial_offset.is_finite() || !limit.is_finite() {
            return Err(StackError::scroll("initial offset and limit must be finite"));
        }
        let mut s = Self {
            opts,
            animated: 0.0,
            target: 0.0,
            limit: limit.max(0.0),
            tween: None,
            last_time_ms: None,
            stopped: false,
            destroyed: false,
        };
        let start = s.clamp(initial_offset);
        s.animated = start;
        s.target = start;
        Ok(s)
    }

    pub fn options(&self) -> &SmoothScrollOptions {
        &self.opts
    }

    /// Effective scroll offset, updated by [`Self::raf`].
    pub fn current_offset(&self) -> f64 {
        self.animated
    }

    pub fn target_offset(&self) -> f64 {
        self.target
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Update the maximum scroll offset (content or viewport resized).
    pub fn set_limit(&mut self, limit: f64) {
        if !limit.is_finite() {
            return;
        }
        self.limit = limit.max(0.0);
        if self.opts.infinite {
            return;
        }
        let target = self.clamp(self.target);
        let animated = self.clamp(self.animated);
        self.target = target;
        match self.tween.as_mut() {
            Some(t) => t.to = target,
            None => self.animated = animated,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.tween.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Wheel input, in raw device pixels.
    pub fn wheel(&mut self, delta_y: f64) {
        let to = self.target + delta_y * self.opts.wheel_multiplier;
        self.input_to(to, !self.opts.smooth_wheel);
    }

    /// Touch drag input, in raw pixels.
    pub fn touch(&mut self, delta_y: f64) {
        let to = self.target + delta_y * self.opts.touch_multiplier;
        self.input_to(to, false);
    }

    fn input_to(&mut self, to: f64, immediate: bool) {
        if self.stopped {
            return;
        }
        self.scroll_to(to, immediate);
    }

    /// Programmatic scroll. `immediate` jumps without animating.
    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        if self.destroyed || !offset.is_finite() {
            return;
        }
        let to = self.clamp(offset);
        self.target = to;
        if immediate || self.opts.duration == 0.0 {
            self.animated = to;
            self.tween = None;
            return;
        }
        self.tween = Some(Tween {
            from: self.animated,
            to,
            elapsed_secs: 0.0,
        });
    }

    /// Adopt a native scroll position (e.g. a scrollbar drag) unless an animation owns the offset.
    pub fn sync_native(&mut self, offset: f64) {
        if self.destroyed || self.tween.is_some() || !offset.is_finite() {
            return;
        }
        self.animated = self.clamp(offset);
        self.target = self.animated;
    }

    /// Advance to `time_ms` (a monotonically increasing frame timestamp). Returns `true` when the
    /// effective offset changed.
    pub fn raf(&mut self, time_ms: f64) -> bool {
        if self.destroyed {
            return false;
        }
        let dt_secs = self
            .last_time_ms
            .map_or(0.0, |last| ((time_ms - last) / 1000.0).max(0.0));
        self.last_time_ms = Some(time_ms);

        let Some(mut tween) = self.tween else {
            return false;
        };
        tween.elapsed_secs += dt_secs;
        let before = self.animated;

        let p = if self.opts.duration > 0.0 {
            (tween.elapsed_secs / self.opts.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if p >= 1.0 {
            self.animated = tween.to;
            self.tween = None;
        } else {
            self.animated = tween.from + (tween.to - tween.from) * self.opts.easing.apply(p);
            self.tween = Some(tween);
        }
        self.animated != before
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.tween = None;
        self.target = self.animated;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }

    /// Release the emulator. Idempotent; later calls to `raf` and input are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.tween = None;
        self.last_time_ms = None;
        tracing::debug!(offset = self.animated, "smooth scroll destroyed");
    }

    fn clamp(&self, v: f64) -> f64 {
        if self.opts.infinite {
            v
        } else {
            v.clamp(0.0, self.limit)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smooth.rs"]
mod tests;
