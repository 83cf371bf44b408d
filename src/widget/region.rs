use std::sync::{Arc, Mutex};

/// An output area the widget replaces wholesale with new markup
pub trait RenderTarget: Send + Sync {
    fn render(&self, markup: String);
}

/// In-memory region that keeps the latest markup and a write count.
#[derive(Clone, Default)]
pub struct MarkupRegion {
    state: Arc<Mutex<RegionState>>,
}

#[derive(Default)]
struct RegionState {
    markup: Option<String>,
    writes: usize,
}

impl MarkupRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup, `None` if nothing was ever rendered
    pub fn markup(&self) -> Option<String> {
        self.lock().markup.clone()
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RenderTarget for MarkupRegion {
    fn render(&self, markup: String) {
        let mut state = self.lock();
        state.markup = Some(markup);
        state.writes += 1;
    }
}

/// Prints each render to stdout under a label
pub struct TerminalRegion {
    label: String,
}

impl TerminalRegion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl RenderTarget for TerminalRegion {
    fn render(&self, markup: String) {
        println!("[{}] {}", self.label, markup);
    }
}
