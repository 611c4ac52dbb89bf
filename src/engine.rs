//! The mounted stack: wires the scroll source, geometry reader, transform engine, change detector
//! and completion notifier into one per-frame pass.

use std::fmt;

use crate::{
    foundation::{
        core::ScrollSample,
        error::{StackError, StackResult},
    },
    scroll::{
        smooth::SmoothScrollOptions,
        source::{ScrollMetrics, ScrollSource},
    },
    stack::{
        cache::TransformCache,
        completion::{CompletionNotifier, CompletionState, PinWindow},
        config::{CardSetup, ScrollMode, StackConfig},
        geometry::{GeometryReader, Layout},
        transform::{TransformState, compute_frame, trigger_start},
    },
};

/// The rendering tree as seen by a mounted stack: layout reads plus the few writes it performs.
pub trait StackHost: Layout {
    /// State of the scroll surface for `mode`. `None` in container mode means the container is
    /// not mounted.
    fn scroll_metrics(&self, mode: ScrollMode) -> Option<ScrollMetrics>;

    /// Move the real scroll surface. The smooth scroller is the scroll driver.
    fn set_scroll_top(&mut self, mode: ScrollMode, offset: f64);

    /// One-time, mount-time styling for card `index`.
    fn prepare_card(&mut self, index: usize, setup: &CardSetup);

    /// Write `state` to card `index`'s transform, visibility and filter.
    fn apply(&mut self, index: usize, state: &TransformState);
}

/// Invoked on each entry into the last card's pin window. Errors propagate out of the pass.
pub type CompletionCallback = Box<dyn FnMut() -> anyhow::Result<()>>;

/// What one pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameReport {
    /// Cards whose styles were written.
    pub writes: usize,
    /// The completion callback fired during this pass.
    pub completed: bool,
    /// No pass ran (inert, unmounted, or nothing scheduled).
    pub skipped: bool,
}

impl FrameReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    /// Mounted without a container or without cards; every call is a no-op.
    Inert,
    Running,
    Unmounted,
}

/// Configures and mounts a [`ScrollStack`].
pub struct StackBuilder {
    config: StackConfig,
    smooth: Option<SmoothScrollOptions>,
    on_complete: Option<CompletionCallback>,
}

impl StackBuilder {
    pub fn new(config: StackConfig) -> Self {
        Self {
            config,
            smooth: None,
            on_complete: None,
        }
    }

    /// Override the smooth-scroll preset chosen from the scroll mode.
    pub fn smooth_scroll(mut self, opts: SmoothScrollOptions) -> Self {
        self.smooth = Some(opts);
        self
    }

    pub fn on_stack_complete<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Attach to `host`: style the cards, start the scroll source, run the first pass.
    #[tracing::instrument(skip_all, fields(mode = ?self.config.scroll_mode()))]
    pub fn mount<H: StackHost + ?Sized>(self, host: &mut H) -> StackResult<ScrollStack> {
        self.config.validate()?;
        let mode = self.config.scroll_mode();
        let mut stack = ScrollStack {
            reader: GeometryReader::new(mode),
            config: self.config,
            card_count: 0,
            source: None,
            cache: TransformCache::new(),
            completion: CompletionNotifier::new(),
            on_complete: self.on_complete,
            updating: false,
            pass_requested: false,
            lifecycle: Lifecycle::Inert,
        };

        let Some(metrics) = host.scroll_metrics(mode) else {
            tracing::debug!("scroll container not mounted; stack is inert");
            return Ok(stack);
        };
        let count = host.card_count();
        if count == 0 {
            tracing::debug!("no cards found; stack is inert");
            return Ok(stack);
        }

        for i in 0..count {
            host.prepare_card(i, &stack.config.card_setup(i, count));
        }
        stack.source = Some(ScrollSource::new(mode, self.smooth, metrics)?);
        stack.card_count = count;
        stack.lifecycle = Lifecycle::Running;
        tracing::debug!(cards = count, "stack mounted");

        let sample = ScrollSample::new(metrics.scroll_top, metrics.height);
        stack.pass(host, sample)?;
        Ok(stack)
    }
}

/// A mounted scroll stack. Created by [`StackBuilder::mount`]; torn down by [`ScrollStack::unmount`]
/// or on drop.
pub struct ScrollStack {
    config: StackConfig,
    reader: GeometryReader,
    card_count: usize,
    source: Option<ScrollSource>,
    cache: TransformCache,
    completion: CompletionNotifier,
    on_complete: Option<CompletionCallback>,
    /// Re-entrancy guard: at most one pass in flight.
    updating: bool,
    /// A scroll event asked for a pass that no frame has served yet.
    pass_requested: bool,
    lifecycle: Lifecycle,
}

impl fmt::Debug for ScrollStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollStack")
            .field("config", &self.config)
            .field("card_count", &self.card_count)
            .field("lifecycle", &self.lifecycle)
            .field("completion", &self.completion.state())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ScrollStack {
    /// Mount with default smooth scrolling and no completion callback.
    pub fn mount<H: StackHost + ?Sized>(config: StackConfig, host: &mut H) -> StackResult<Self> {
        StackBuilder::new(config).mount(host)
    }

    pub fn builder(config: StackConfig) -> StackBuilder {
        StackBuilder::new(config)
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Whether frames do any work.
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn completion_state(&self) -> CompletionState {
        self.completion.state()
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    pub fn scroll_source(&self) -> Option<&ScrollSource> {
        self.source.as_ref()
    }

    /// Current effective scroll offset, if a source is running.
    pub fn scroll_offset(&self) -> Option<f64> {
        self.source.as_ref().map(ScrollSource::current_offset)
    }

    /// Continuous per-frame driver: step the smooth scroller, push its offset to the host, then
    /// run the (coalesced) transform pass. Serves any pending scroll-event request.
    #[tracing::instrument(level = "trace", skip(self, host))]
    pub fn frame<H: StackHost + ?Sized>(&mut self, host: &mut H, time_ms: f64) -> StackResult<FrameReport> {
        if !self.is_active() {
            return Ok(FrameReport::skipped());
        }
        let mode = self.reader.mode();
        let Some(metrics) = host.scroll_metrics(mode) else {
            return Ok(FrameReport::skipped());
        };
        let Some(source) = self.source.as_mut() else {
            return Ok(FrameReport::skipped());
        };
        let sample = source.step(time_ms, metrics);
        if sample.scroll_top != metrics.scroll_top {
            host.set_scroll_top(mode, sample.scroll_top);
        }
        self.pass_requested = false;
        self.pass(host, sample)
    }

    /// Scroll-event trigger (container mode). Schedules a pass for the next frame without running
    /// one; returns `true` if this call scheduled it.
    pub fn request_pass(&mut self) -> bool {
        if !self.is_active() || self.reader.mode() != ScrollMode::Container || self.pass_requested {
            return false;
        }
        self.pass_requested = true;
        true
    }

    pub fn has_pending_pass(&self) -> bool {
        self.pass_requested
    }

    /// Run a pass requested by [`Self::request_pass`], if a frame has not already served it. The
    /// pass sees the host's native offset unless a smooth-scroll animation owns the position.
    pub fn run_scheduled<H: StackHost + ?Sized>(&mut self, host: &mut H) -> StackResult<FrameReport> {
        if !self.pass_requested || !self.is_active() {
            return Ok(FrameReport::skipped());
        }
        self.pass_requested = false;
        let Some(metrics) = host.scroll_metrics(self.reader.mode()) else {
            return Ok(FrameReport::skipped());
        };
        let Some(source) = self.source.as_mut() else {
            return Ok(FrameReport::skipped());
        };
        let sample = source.sync(metrics);
        self.pass(host, sample)
    }

    /// Full desired state of every card at the current scroll offset, independent of what the
    /// change detector last let through. Empty when the stack is not running.
    pub fn desired_states<H: StackHost + ?Sized>(&self, host: &H) -> StackResult<Vec<TransformState>> {
        if !self.is_active() {
            return Ok(Vec::new());
        }
        let Some(metrics) = host.scroll_metrics(self.reader.mode()) else {
            return Ok(Vec::new());
        };
        let offset = self.scroll_offset().unwrap_or(metrics.scroll_top);
        let geometry = self.reader.read_frame(host, self.card_count)?;
        Ok(compute_frame(
            &geometry.card_tops,
            ScrollSample::new(offset, metrics.height),
            &self.config,
        ))
    }

    /// Wheel input forwarded to the smooth scroller.
    pub fn wheel(&mut self, delta_y: f64) {
        if let Some(s) = self.source.as_mut() {
            s.smooth_mut().wheel(delta_y);
        }
    }

    /// Touch drag input forwarded to the smooth scroller.
    pub fn touch(&mut self, delta_y: f64) {
        if let Some(s) = self.source.as_mut() {
            s.smooth_mut().touch(delta_y);
        }
    }

    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        if let Some(s) = self.source.as_mut() {
            s.smooth_mut().scroll_to(offset, immediate);
        }
    }

    /// Tear down: stop frames, destroy the scroll source, clear the cache, reset completion and
    /// the guard. Idempotent.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        if let Some(s) = self.source.as_mut() {
            s.destroy();
        }
        self.cache.clear();
        self.completion.reset();
        self.updating = false;
        self.pass_requested = false;
        self.lifecycle = Lifecycle::Unmounted;
        tracing::debug!("stack unmounted");
    }

    fn pass<H: StackHost + ?Sized>(&mut self, host: &mut H, sample: ScrollSample) -> StackResult<FrameReport> {
        if self.updating {
            return Ok(FrameReport::skipped());
        }
        self.updating = true;
        let out = self.pass_inner(host, sample);
        self.updating = false;
        out
    }

    fn pass_inner<H: StackHost + ?Sized>(&mut self, host: &mut H, sample: ScrollSample) -> StackResult<FrameReport> {
        let geometry = self.reader.read_frame(&*host, self.card_count)?;
        let states = compute_frame(&geometry.card_tops, sample, &self.config);

        let mut report = FrameReport::default();
        for (i, state) in states.into_iter().enumerate() {
            if self.cache.observe(i, state) {
                host.apply(i, &state);
                report.writes += 1;
            }
        }

        let last = self.card_count - 1;
        let windows = self.config.resolve(sample.container_height);
        let window = PinWindow::new(
            trigger_start(geometry.card_tops[last], last, windows, &self.config),
            geometry.end_top,
            sample.container_height,
        );
        if self.completion.update(sample.scroll_top, window) {
            report.completed = true;
            tracing::debug!(scroll_top = sample.scroll_top, "stack complete");
            if let Some(cb) = self.on_complete.as_mut() {
                cb().map_err(StackError::Callback)?;
            }
        }

        tracing::trace!(writes = report.writes, scroll_top = sample.scroll_top, "pass");
        Ok(report)
    }
}

impl Drop for ScrollStack {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine/engine.rs"]
mod tests;
