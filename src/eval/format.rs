//! Number formatting for the display and history.

/// Format a finite number as its shortest round-trippable decimal string.
///
/// Whole numbers carry no fractional part, scientific notation is never
/// used, and negative zero is shown as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
