//! Display state: the single visible expression string and its mode.

use serde::{Deserialize, Serialize};

/// Mode of the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The display holds `0` or a partial expression
    Normal,
    /// The display holds the error marker until the pending reset fires
    Error,
}

impl Mode {
    /// Get the mode's name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Error => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Text on the display plus its mode.
///
/// The text is never empty. It starts as `0`, and every mutation other than
/// [`DisplayState::show_error`] leaves the display in [`Mode::Normal`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    text: String,
    mode: Mode,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    pub const ZERO: &'static str = "0";

    pub fn new() -> Self {
        Self {
            text: Self::ZERO.to_string(),
            mode: Mode::Normal,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the next input should replace the text instead of extending it.
    ///
    /// True for the initial `0` and while the error marker is shown.
    pub fn is_replaceable(&self) -> bool {
        self.mode.is_error() || self.text == Self::ZERO
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().last()
    }

    /// Replace the whole text.
    pub fn set(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if text.is_empty() {
            Self::ZERO.to_string()
        } else {
            text
        };
        self.mode = Mode::Normal;
    }

    pub fn append(&mut self, suffix: &str) {
        self.text.push_str(suffix);
        self.mode = Mode::Normal;
    }

    /// Swap the trailing character for `ch`.
    pub fn replace_last(&mut self, ch: char) {
        self.text.pop();
        self.text.push(ch);
        self.mode = Mode::Normal;
    }

    pub fn show_error(&mut self, marker: &str) {
        self.text = marker.to_string();
        self.mode = Mode::Error;
    }

    pub fn reset(&mut self) {
        self.set(Self::ZERO);
    }
}
