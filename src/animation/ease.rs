/// Easing functions used to map normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-out.
    OutQuad,
    /// Cubic ease-out.
    OutCubic,
    /// Exponential ease-out, `1 - 2^(-10t)`, pinned to exactly 1 at `t == 1`.
    OutExpo,
    /// Smooth-scroll curve `min(1, 1.001 - 2^(-10t))`.
    ///
    /// Starts slightly above zero so the first frame of a scroll already moves.
    #[default]
    SmoothScroll,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutExpo => out_expo(t),
            Self::SmoothScroll => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
        }
    }
}

/// `1 - 2^(-10t)` with the asymptote removed at `t == 1`.
pub fn out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
