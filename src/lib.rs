//! Scroll-driven card stacking.
//!
//! A stack is a vertical run of cards that, as the page scrolls, shrink, tilt, blur and glide into
//! a diagonal cascade. Each animation frame the engine:
//!
//! 1. **Scrolls**: steps an inertial smooth scroller ([`SmoothScroll`]) and pushes its offset to
//!    the host, which makes the scroller the scroll driver.
//! 2. **Measures**: reads every card's top offset fresh from the host [`Layout`].
//! 3. **Computes**: `(index, card top, scroll sample, config) -> TransformState`, a pure function
//!    ([`compute_frame`]) with no access to any rendering tree.
//! 4. **Applies**: diffs against the last applied state ([`TransformCache`]) and writes only cards
//!    that moved past a small hysteresis band.
//!
//! Hosts implement [`StackHost`]; [`sim::PageLayout`] is a headless implementation used by the
//! CLI and the tests.
#![forbid(unsafe_code)]

mod animation;
mod engine;
mod foundation;
mod scroll;
mod stack;

/// Headless host and trace replay.
pub mod sim;

pub use animation::ease::{Ease, out_expo};
pub use animation::progress::progress;
pub use engine::{CompletionCallback, FrameReport, ScrollStack, StackBuilder, StackHost};
pub use foundation::core::{Affine, Length, ScrollSample, Vec2, round_to};
pub use foundation::error::{StackError, StackResult};
pub use scroll::smooth::{SmoothScroll, SmoothScrollOptions};
pub use scroll::source::{ScrollMetrics, ScrollSource};
pub use stack::cache::{ANGLE_BLUR_THRESHOLD, SCALE_THRESHOLD, TRANSLATE_THRESHOLD, TransformCache};
pub use stack::completion::{CompletionNotifier, CompletionState, PinWindow};
pub use stack::config::{CardSetup, ResolvedWindows, ScrollMode, StackConfig};
pub use stack::geometry::{ElementRef, FrameGeometry, GeometryReader, Layout};
pub use stack::transform::{
    ENTRY_DISTANCE, FAST_WINDOW, HORIZONTAL_STEP, SLOW_WINDOW, TransformState, Visibility,
    compute_card, compute_frame, top_visible_index, trigger_end, trigger_start,
};
