//! Headless host: a vertical page of cards with a viewport, plus a trace replayer.
//!
//! Used by the CLI and the integration tests to drive a [`ScrollStack`] without a browser.

use crate::{
    engine::{ScrollStack, StackHost},
    foundation::error::{StackError, StackResult},
    scroll::{smooth::SmoothScrollOptions, source::ScrollMetrics},
    stack::{
        config::{CardSetup, ScrollMode, StackConfig},
        geometry::{ElementRef, Layout},
        transform::TransformState,
    },
};

/// Static description of the simulated page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSpec {
    /// Page offset of the first card.
    pub stack_top: f64,
    pub card_heights: Vec<f64>,
    pub viewport_height: f64,
    /// Page content below the end sentinel.
    pub content_after: f64,
    /// Whether a scroll container exists (only consulted in container mode).
    pub container: bool,
    pub end_sentinel: bool,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            stack_top: 0.0,
            card_heights: vec![600.0; 9],
            viewport_height: 800.0,
            content_after: 800.0,
            container: true,
            end_sentinel: true,
        }
    }
}

impl PageSpec {
    pub fn validate(&self) -> StackResult<()> {
        let finite = [self.stack_top, self.viewport_height, self.content_after]
            .into_iter()
            .chain(self.card_heights.iter().copied())
            .all(f64::is_finite);
        if !finite {
            return Err(StackError::geometry("page dimensions must be finite"));
        }
        if self.card_heights.iter().any(|h| *h < 0.0) || self.viewport_height < 0.0 {
            return Err(StackError::geometry("heights must be >= 0"));
        }
        Ok(())
    }
}

/// A style write the engine performed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AppliedWrite {
    pub index: usize,
    pub state: TransformState,
}

/// In-memory [`StackHost`]. Cards are laid out top to bottom; margins set at mount shift later
/// cards down, like the real layout does.
#[derive(Debug)]
pub struct PageLayout {
    spec: PageSpec,
    margins: Vec<f64>,
    setups: Vec<Option<CardSetup>>,
    applied: Vec<Option<TransformState>>,
    writes: Vec<AppliedWrite>,
    scroll_top: f64,
}

impl PageLayout {
    pub fn new(spec: PageSpec) -> StackResult<Self> {
        spec.validate()?;
        let n = spec.card_heights.len();
        Ok(Self {
            spec,
            margins: vec![0.0; n],
            setups: vec![None; n],
            applied: vec![None; n],
            writes: Vec::new(),
            scroll_top: 0.0,
        })
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    /// Page offset of card `index`.
    pub fn card_top(&self, index: usize) -> Option<f64> {
        if index >= self.spec.card_heights.len() {
            return None;
        }
        let above: f64 = self.spec.card_heights[..index]
            .iter()
            .zip(&self.margins)
            .map(|(h, m)| h + m)
            .sum();
        Some(self.spec.stack_top + above)
    }

    fn sentinel_top(&self) -> f64 {
        let n = self.spec.card_heights.len();
        match n.checked_sub(1) {
            Some(last) => {
                self.card_top(last).unwrap_or(self.spec.stack_top)
                    + self.spec.card_heights[last]
                    + self.margins[last]
            }
            None => self.spec.stack_top,
        }
    }

    fn page_top(&self, el: ElementRef) -> Option<f64> {
        match el {
            ElementRef::Card(i) => self.card_top(i),
            ElementRef::EndSentinel => self.spec.end_sentinel.then(|| self.sentinel_top()),
        }
    }

    pub fn page_height(&self) -> f64 {
        self.sentinel_top() + self.spec.content_after
    }

    pub fn scroll_limit(&self) -> f64 {
        (self.page_height() - self.spec.viewport_height).max(0.0)
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Move the scroll position behind the engine's back (scrollbar drag, keyboard).
    pub fn native_scroll(&mut self, offset: f64) {
        self.scroll_top = offset.clamp(0.0, self.scroll_limit());
    }

    /// Last state written to card `index`.
    pub fn applied(&self, index: usize) -> Option<&TransformState> {
        self.applied.get(index).and_then(Option::as_ref)
    }

    pub fn setup(&self, index: usize) -> Option<&CardSetup> {
        self.setups.get(index).and_then(Option::as_ref)
    }

    pub fn writes(&self) -> &[AppliedWrite] {
        &self.writes
    }

    /// Drain the write log.
    pub fn take_writes(&mut self) -> Vec<AppliedWrite> {
        std::mem::take(&mut self.writes)
    }
}

impl Layout for PageLayout {
    fn card_count(&self) -> usize {
        self.spec.card_heights.len()
    }

    fn viewport_top(&self, el: ElementRef) -> Option<f64> {
        self.page_top(el).map(|top| top - self.scroll_top)
    }

    fn offset_top(&self, el: ElementRef) -> Option<f64> {
        self.page_top(el)
    }

    fn window_scroll_top(&self) -> f64 {
        self.scroll_top
    }
}

impl StackHost for PageLayout {
    fn scroll_metrics(&self, mode: ScrollMode) -> Option<ScrollMetrics> {
        if mode == ScrollMode::Container && !self.spec.container {
            return None;
        }
        Some(ScrollMetrics {
            scroll_top: self.scroll_top,
            height: self.spec.viewport_height,
            limit: self.scroll_limit(),
        })
    }

    fn set_scroll_top(&mut self, _mode: ScrollMode, offset: f64) {
        self.scroll_top = offset;
    }

    fn prepare_card(&mut self, index: usize, setup: &CardSetup) {
        if let Some(slot) = self.setups.get_mut(index) {
            *slot = Some(setup.clone());
        }
        if let Some(m) = self.margins.get_mut(index) {
            *m = setup.margin_bottom.unwrap_or(0.0);
        }
    }

    fn apply(&mut self, index: usize, state: &TransformState) {
        if let Some(slot) = self.applied.get_mut(index) {
            *slot = Some(*state);
        }
        self.writes.push(AppliedWrite {
            index,
            state: *state,
        });
    }
}

/// One input event in a replay trace.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    Wheel { at_ms: f64, delta: f64 },
    Touch { at_ms: f64, delta: f64 },
    ScrollTo { at_ms: f64, offset: f64, #[serde(default)] immediate: bool },
    /// Native scroll the engine does not control (scrollbar drag).
    Native { at_ms: f64, offset: f64 },
}

impl TraceEvent {
    pub fn at_ms(&self) -> f64 {
        match *self {
            Self::Wheel { at_ms, .. }
            | Self::Touch { at_ms, .. }
            | Self::ScrollTo { at_ms, .. }
            | Self::Native { at_ms, .. } => at_ms,
        }
    }
}

/// Timed input for [`replay`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollTrace {
    pub fps: f64,
    pub frames: u64,
    pub events: Vec<TraceEvent>,
    /// Smooth-scroll override; the mode preset when absent.
    pub smooth_scroll: Option<SmoothScrollOptions>,
}

impl Default for ScrollTrace {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: 0,
            events: Vec::new(),
            smooth_scroll: None,
        }
    }
}

/// Per-frame replay output.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ReplayFrame {
    pub frame: u64,
    pub time_ms: f64,
    pub scroll_top: f64,
    pub writes: Vec<AppliedWrite>,
    pub completed: bool,
}

/// Mount a stack on `page`, feed `trace` at a fixed frame rate, and collect what each frame wrote.
/// Frame 0 reports the writes made at mount.
#[tracing::instrument(skip_all, fields(frames = trace.frames))]
pub fn replay(config: StackConfig, page: PageSpec, trace: &ScrollTrace) -> StackResult<Vec<ReplayFrame>> {
    if !(trace.fps.is_finite() && trace.fps > 0.0) {
        return Err(StackError::validation("trace fps must be > 0"));
    }
    let mut host = PageLayout::new(page)?;
    let mut builder = ScrollStack::builder(config);
    if let Some(opts) = trace.smooth_scroll.clone() {
        builder = builder.smooth_scroll(opts);
    }
    let mut stack = builder.mount(&mut host)?;

    let mut events = trace.events.clone();
    events.sort_by(|a, b| a.at_ms().total_cmp(&b.at_ms()));
    let mut pending = events.into_iter().peekable();

    let frame_ms = 1000.0 / trace.fps;
    let mut out = Vec::with_capacity(trace.frames as usize + 1);
    out.push(ReplayFrame {
        frame: 0,
        time_ms: 0.0,
        scroll_top: host.scroll_top(),
        writes: host.take_writes(),
        completed: false,
    });

    for frame in 1..=trace.frames {
        let time_ms = frame as f64 * frame_ms;
        while let Some(ev) = pending.next_if(|ev| ev.at_ms() <= time_ms) {
            match ev {
                TraceEvent::Wheel { delta, .. } => stack.wheel(delta),
                TraceEvent::Touch { delta, .. } => stack.touch(delta),
                TraceEvent::ScrollTo {
                    offset, immediate, ..
                } => stack.scroll_to(offset, immediate),
                TraceEvent::Native { offset, .. } => {
                    host.native_scroll(offset);
                    stack.request_pass();
                }
            }
        }
        let report = stack.frame(&mut host, time_ms)?;
        out.push(ReplayFrame {
            frame,
            time_ms,
            scroll_top: host.scroll_top(),
            writes: host.take_writes(),
            completed: report.completed,
        });
    }

    stack.unmount();
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/sim/sim.rs"]
mod tests;
