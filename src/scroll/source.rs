use crate::{
    foundation::{core::ScrollSample, error::StackResult},
    scroll::smooth::{SmoothScroll, SmoothScrollOptions},
    stack::config::ScrollMode,
};

/// Host-reported state of the scroll surface (viewport or container) for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollMetrics {
    /// Native scroll offset as the host currently renders it.
    pub scroll_top: f64,
    /// Visible height of the surface.
    pub height: f64,
    /// Maximum scroll offset.
    pub limit: f64,
}

/// Scroll position source for one stack: a smooth scroller scoped to the window or a container.
#[derive(Debug)]
pub struct ScrollSource {
    smooth: SmoothScroll,
    /// Offset handed out by the previous step; the host is expected to mirror it.
    last_reported: f64,
}

impl ScrollSource {
    /// Create a source starting at the surface's current native offset. `opts` defaults to the
    /// preset for `mode`.
    pub fn new(
        mode: ScrollMode,
        opts: Option<SmoothScrollOptions>,
        metrics: ScrollMetrics,
    ) -> StackResult<Self> {
        let opts = opts.unwrap_or_else(|| match mode {
            ScrollMode::Window => SmoothScrollOptions::window(),
            ScrollMode::Container => SmoothScrollOptions::container(),
        });
        let smooth = SmoothScroll::new(opts, metrics.scroll_top, metrics.limit)?;
        Ok(Self {
            smooth,
            last_reported: metrics.scroll_top,
        })
    }

    pub fn current_offset(&self) -> f64 {
        self.smooth.current_offset()
    }

    pub fn smooth(&self) -> &SmoothScroll {
        &self.smooth
    }

    pub fn smooth_mut(&mut self) -> &mut SmoothScroll {
        &mut self.smooth
    }

    /// One emulator step. Picks up native scrolling when idle, advances the animation, and
    /// returns the sample the transform pass should use.
    pub fn step(&mut self, time_ms: f64, metrics: ScrollMetrics) -> ScrollSample {
        self.adopt(metrics);
        self.smooth.raf(time_ms);
        self.report(metrics)
    }

    /// Like [`Self::step`] without advancing time: serves passes scheduled by a scroll event,
    /// where the host offset is newer than the last frame.
    pub fn sync(&mut self, metrics: ScrollMetrics) -> ScrollSample {
        self.adopt(metrics);
        self.report(metrics)
    }

    /// A host offset that differs from the previous report was moved natively.
    fn adopt(&mut self, metrics: ScrollMetrics) {
        self.smooth.set_limit(metrics.limit);
        if metrics.scroll_top != self.last_reported {
            self.smooth.sync_native(metrics.scroll_top);
        }
    }

    fn report(&mut self, metrics: ScrollMetrics) -> ScrollSample {
        self.last_reported = self.smooth.current_offset();
        ScrollSample::new(self.last_reported, metrics.height)
    }

    pub fn is_destroyed(&self) -> bool {
        self.smooth.is_destroyed()
    }

    /// Idempotent.
    pub fn destroy(&mut self) {
        self.smooth.destroy();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/source.rs"]
mod tests;
