/// Clamped progress of `scroll_top` through the window `[start, end]`.
///
/// Before the window this is 0, at or past `end` it is 1, linear in between. A degenerate
/// window (`start == end`, or an inverted one) is a step: 0 before `start`, 1 from `start` on.
/// Non-finite inputs resolve to 0.
pub fn progress(scroll_top: f64, start: f64, end: f64) -> f64 {
    if scroll_top.is_nan() || scroll_top < start {
        return 0.0;
    }
    if scroll_top >= end {
        return 1.0;
    }
    let t = (scroll_top - start) / (end - start);
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/progress.rs"]
mod tests;
