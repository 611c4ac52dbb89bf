use crate::{
    foundation::error::{StackError, StackResult},
    stack::config::ScrollMode,
};

/// An element the engine needs geometry for. Cards are addressed by index only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Card(usize),
    /// Marker placed after the last card; closes the pin window.
    EndSentinel,
}

/// Read-only view of the host's layout engine.
pub trait Layout {
    /// Number of cards attached inside the stack.
    fn card_count(&self) -> usize;

    /// Top edge relative to the viewport, or `None` if the element is not attached.
    fn viewport_top(&self, el: ElementRef) -> Option<f64>;

    /// Top edge relative to the scrolling container, or `None` if the element is not attached.
    fn offset_top(&self, el: ElementRef) -> Option<f64>;

    /// Native scroll offset of the page viewport.
    fn window_scroll_top(&self) -> f64;
}

/// Page-space geometry of every card plus the end sentinel, read fresh for one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameGeometry {
    pub card_tops: Vec<f64>,
    /// 0 when the sentinel is absent; completion may then fire early.
    pub end_top: f64,
}

/// Resolves element offsets for the configured scroll mode.
#[derive(Clone, Copy, Debug)]
pub struct GeometryReader {
    mode: ScrollMode,
}

impl GeometryReader {
    pub fn new(mode: ScrollMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Top offset of `el` in scroll coordinates.
    pub fn element_top<L: Layout + ?Sized>(&self, layout: &L, el: ElementRef) -> Option<f64> {
        match self.mode {
            ScrollMode::Window => layout
                .viewport_top(el)
                .map(|top| top + layout.window_scroll_top()),
            ScrollMode::Container => layout.offset_top(el),
        }
    }

    pub fn end_sentinel_top<L: Layout + ?Sized>(&self, layout: &L) -> f64 {
        self.element_top(layout, ElementRef::EndSentinel)
            .unwrap_or(0.0)
    }

    /// Read `count` card tops and the sentinel.
    ///
    /// Cards are identified at mount; a card that no longer resolves is a host contract violation.
    pub fn read_frame<L: Layout + ?Sized>(&self, layout: &L, count: usize) -> StackResult<FrameGeometry> {
        let card_tops = (0..count)
            .map(|i| {
                self.element_top(layout, ElementRef::Card(i))
                    .ok_or_else(|| StackError::geometry(format!("card {i} is not attached")))
            })
            .collect::<StackResult<Vec<_>>>()?;
        Ok(FrameGeometry {
            card_tops,
            end_top: self.end_sentinel_top(layout),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/geometry.rs"]
mod tests;
