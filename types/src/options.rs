//! Presentation options shared by the engine and the TUI.

/// Accessibility and appearance switches resolved from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// Which keypad the calculator shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeypadMode {
    #[default]
    Basic,
    Scientific,
}

impl KeypadMode {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            KeypadMode::Basic => KeypadMode::Scientific,
            KeypadMode::Scientific => KeypadMode::Basic,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            KeypadMode::Basic => "Basic",
            KeypadMode::Scientific => "Scientific",
        }
    }

    /// Parse a keypad name from config.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" | "standard" => Some(KeypadMode::Basic),
            "scientific" | "sci" => Some(KeypadMode::Scientific),
            _ => None,
        }
    }
}
