/// Whether the last card's pin window is currently occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    #[default]
    Pending,
    Completed,
}

/// Scroll range during which the stack is considered complete.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PinWindow {
    pub start: f64,
    pub end: f64,
}

impl PinWindow {
    /// `start` is the last card's trigger start; `end` is half a container above the end sentinel.
    pub fn new(last_trigger_start: f64, end_sentinel_top: f64, container_height: f64) -> Self {
        Self {
            start: last_trigger_start,
            end: end_sentinel_top - container_height / 2.0,
        }
    }

    pub fn contains(&self, scroll_top: f64) -> bool {
        scroll_top >= self.start && scroll_top <= self.end
    }
}

/// Two-state edge detector that reports entry into the pin window once per entry.
#[derive(Debug, Default)]
pub struct CompletionNotifier {
    state: CompletionState,
}

impl CompletionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CompletionState {
        self.state
    }

    /// Feed one tick. Returns `true` exactly on the `Pending -> Completed` edge.
    pub fn update(&mut self, scroll_top: f64, window: PinWindow) -> bool {
        let inside = window.contains(scroll_top);
        match (self.state, inside) {
            (CompletionState::Pending, true) => {
                self.state = CompletionState::Completed;
                true
            }
            (CompletionState::Completed, false) => {
                self.state = CompletionState::Pending;
                false
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = CompletionState::Pending;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/completion.rs"]
mod tests;
