/// Convenience result type used across the stack engine.
pub type StackResult<T> = Result<T, StackError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StackError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Layout data that cannot be turned into card geometry.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Invalid smooth-scroll state or options.
    #[error("scroll error: {0}")]
    Scroll(String),

    /// Error raised by the `on_stack_complete` callback, passed through untouched.
    #[error("stack-complete callback failed: {0}")]
    Callback(anyhow::Error),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Build a [`StackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StackError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`StackError::Scroll`] value.
    pub fn scroll(msg: impl Into<String>) -> Self {
        Self::Scroll(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
