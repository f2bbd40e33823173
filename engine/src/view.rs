//! View state the TUI renders from.

use abacus_types::{KeypadMode, UiOptions};

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub keypad: KeypadMode,
    pub history_open: bool,
    /// Highlighted history row while the panel is open.
    pub selected: Option<usize>,
    /// A clear-history y/n prompt is showing.
    pub confirm_clear: bool,
    pub ui_options: UiOptions,
}

impl ViewState {
    #[must_use]
    pub fn new(keypad: KeypadMode, ui_options: UiOptions) -> Self {
        Self {
            keypad,
            ui_options,
            ..Self::default()
        }
    }

    pub(crate) fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => index.saturating_sub(1).min(len - 1),
            None => 0,
        });
    }

    pub(crate) fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        });
    }

    /// Keep the selection inside a history of `len` entries.
    pub(crate) fn clamp_selection(&mut self, len: usize) {
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(index) => Some(index.min(len - 1)),
            None => None,
        };
    }
}
