//! Keyboard and button mapping.
//!
//! Keys use the browser-style names the calculator was designed around
//! (`"Enter"`, `"Escape"`, `"Backspace"`), buttons use their printed label.

use crate::core::{Event, ExtraOp, MemoryOp};

/// An event produced by a key, plus whether the key's default action
/// (form submission, navigation) should be suppressed.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyBinding {
    pub event: Event,
    pub prevent_default: bool,
}

impl KeyBinding {
    fn plain(event: Event) -> Self {
        Self {
            event,
            prevent_default: false,
        }
    }

    fn exclusive(event: Event) -> Self {
        Self {
            event,
            prevent_default: true,
        }
    }
}

/// Map a key name to its binding. Unbound keys return `None`.
pub fn binding_for(key: &str) -> Option<KeyBinding> {
    match key {
        "Enter" => Some(KeyBinding::exclusive(Event::Equals)),
        "Escape" | "Backspace" => Some(KeyBinding::exclusive(Event::Clear)),
        _ => {
            let ch = single_char(key)?;
            Event::digit(ch)
                .or_else(|| Event::operator(ch))
                .map(KeyBinding::plain)
        }
    }
}

/// Map a button label to its event.
pub fn binding_for_button(label: &str) -> Option<Event> {
    let event = match label {
        "MC" => Event::Memory(MemoryOp::Clear),
        "MR" => Event::Memory(MemoryOp::Recall),
        "M+" => Event::Memory(MemoryOp::Add),
        "M-" => Event::Memory(MemoryOp::Subtract),
        "C" => Event::Clear,
        "=" => Event::Equals,
        "%" => Event::ExtraOp(ExtraOp::Percent),
        "√" => Event::ExtraOp(ExtraOp::SquareRoot),
        _ => {
            let ch = single_char(label)?;
            return Event::digit(ch).or_else(|| Event::operator(ch));
        }
    };
    Some(event)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
