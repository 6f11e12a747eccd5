//! The calculator state machine.
//!
//! Every event is applied synchronously and runs to completion. The machine
//! performs no I/O: the caller persists the history when a step reports a new
//! entry, and passes the current time in so error resets can be fired.

use super::event::{Digit, Event, ExtraOp, MemoryOp, Operator};
use super::history::{HistoryEntry, HistoryLog};
use super::memory::MemoryRegister;
use super::reset::{PendingResets, ResetPolicy};
use super::state::{DisplayState, Mode};
use crate::config::CalculatorConfig;
use crate::eval::{self, EvalError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of applying a single event.
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult {
    /// Display, memory or both changed
    Updated,

    /// An evaluation succeeded and the entry was appended to the history
    Recorded(HistoryEntry),

    /// Evaluation failed; the error marker is shown and a reset is armed
    Failed(EvalError),

    /// The event had no effect (MR with an empty register)
    Unchanged,
}

impl StepResult {
    /// Whether the history changed and should be persisted.
    pub fn history_changed(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Calculator engine: display, memory register, history and pending resets.
///
/// # Example
///
/// ```rust
/// use tally::core::{Calculator, Event, StepResult};
/// use std::time::Instant;
///
/// let mut calc = Calculator::default();
/// let now = Instant::now();
///
/// for key in ['1', '2'] {
///     calc.apply(Event::digit(key).unwrap(), now);
/// }
/// calc.apply(Event::operator('+').unwrap(), now);
/// calc.apply(Event::digit('3').unwrap(), now);
///
/// let step = calc.apply(Event::Equals, now);
/// assert!(matches!(step, StepResult::Recorded(_)));
/// assert_eq!(calc.text(), "15");
/// assert_eq!(calc.history().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Calculator {
    display: DisplayState,
    memory: MemoryRegister,
    history: HistoryLog,
    resets: PendingResets,
    error_marker: String,
    reset_delay: Duration,
    reset_policy: ResetPolicy,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl Calculator {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self::with_history(config, HistoryLog::new())
    }

    /// Create a calculator continuing a restored history.
    pub fn with_history(config: &CalculatorConfig, history: HistoryLog) -> Self {
        Self {
            display: DisplayState::new(),
            memory: MemoryRegister::new(),
            history,
            resets: PendingResets::new(),
            error_marker: config.error_marker.clone(),
            reset_delay: config.reset_delay(),
            reset_policy: config.reset_policy,
        }
    }

    pub fn text(&self) -> &str {
        self.display.text()
    }

    pub fn mode(&self) -> Mode {
        self.display.mode()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn error_marker(&self) -> &str {
        &self.error_marker
    }

    pub fn pending_resets(&self) -> usize {
        self.resets.len()
    }

    pub fn next_reset_deadline(&self) -> Option<Instant> {
        self.resets.next_deadline()
    }

    /// Apply one event at time `now`.
    pub fn apply(&mut self, event: Event, now: Instant) -> StepResult {
        if self.reset_policy == ResetPolicy::Cancellable {
            let cancelled = self.resets.cancel_all();
            if cancelled > 0 {
                debug!(cancelled, "Cancelled pending resets");
            }
        }

        let name = event.name();
        let result = match event {
            Event::Digit(digit) => self.press_digit(digit),
            Event::Operator(op) => self.press_operator(op),
            Event::ExtraOp(op) => self.press_extra(op),
            Event::Memory(op) => self.press_memory(op, now),
            Event::Clear => {
                self.display.reset();
                StepResult::Updated
            }
            Event::Equals => self.equals(now),
            Event::HistoryReplay(entry) => {
                self.display.set(entry.result);
                StepResult::Updated
            }
        };

        debug!(
            event = name,
            text = self.display.text(),
            mode = self.display.mode().name(),
            "Applied event"
        );
        result
    }

    /// Fire every reset due at `now`. Returns `true` if the display was reset.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        let fired = self.resets.take_due(now);
        if fired == 0 {
            return false;
        }
        debug!(fired, text = self.display.text(), "Error reset fired");
        self.display.reset();
        true
    }

    fn press_digit(&mut self, digit: Digit) -> StepResult {
        let ch = digit.as_char();
        if self.display.is_replaceable() {
            self.display.set(ch.to_string());
        } else {
            self.display.append(ch.encode_utf8(&mut [0; 4]));
        }
        StepResult::Updated
    }

    fn press_operator(&mut self, op: Operator) -> StepResult {
        match self.display.last_char() {
            Some(last) if Operator::is_symbol(last) => self.display.replace_last(op.symbol()),
            _ => self.display.append(op.symbol().encode_utf8(&mut [0; 4])),
        }
        StepResult::Updated
    }

    fn press_extra(&mut self, op: ExtraOp) -> StepResult {
        match op {
            ExtraOp::Percent => {
                self.display.append("%");
                StepResult::Updated
            }
            // √ is appended even after a number; evaluation only binds it to
            // the digits that follow.
            ExtraOp::SquareRoot => {
                if self.display.is_replaceable() {
                    self.display.set("√");
                } else {
                    self.display.append("√");
                }
                StepResult::Updated
            }
            ExtraOp::Power => self.press_operator(Operator::Power),
        }
    }

    fn press_memory(&mut self, op: MemoryOp, now: Instant) -> StepResult {
        match op {
            MemoryOp::Clear => {
                self.memory.clear();
                StepResult::Updated
            }
            MemoryOp::Recall => {
                let Some(text) = self.memory.recall_text() else {
                    return StepResult::Unchanged;
                };
                if self.display.is_replaceable() {
                    self.display.set(text);
                } else {
                    self.display.append(&text);
                }
                StepResult::Updated
            }
            MemoryOp::Add | MemoryOp::Subtract => match eval::evaluate(self.display.text()) {
                Ok(value) => {
                    if op == MemoryOp::Add {
                        self.memory.add(value);
                    } else {
                        self.memory.subtract(value);
                    }
                    debug!(memory = ?self.memory.value(), "Memory updated");
                    self.display.reset();
                    StepResult::Updated
                }
                Err(err) => self.fail(err, now),
            },
        }
    }

    fn equals(&mut self, now: Instant) -> StepResult {
        match eval::evaluate_to_string(self.display.text()) {
            Ok(result) => {
                let entry = HistoryEntry::new(self.display.text(), result.clone());
                self.display.set(result);
                self.history = std::mem::take(&mut self.history).record(entry.clone());
                StepResult::Recorded(entry)
            }
            Err(err) => self.fail(err, now),
        }
    }

    fn fail(&mut self, err: EvalError, now: Instant) -> StepResult {
        debug!(expression = self.display.text(), error = %err, "Evaluation failed");
        self.display.show_error(&self.error_marker);
        self.resets.arm(now + self.reset_delay);
        StepResult::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(calc: &mut Calculator, keys: &str, now: Instant) {
        for ch in keys.chars() {
            let event = Event::digit(ch)
                .or_else(|| Event::operator(ch))
                .or_else(|| Event::extra_op(ch))
                .unwrap_or_else(|| panic!("no event for {ch}"));
            calc.apply(event, now);
        }
    }

    fn entered(keys: &str) -> Calculator {
        let mut calc = Calculator::default();
        press(&mut calc, keys, Instant::now());
        calc
    }

    #[test]
    fn digits_replace_initial_zero() {
        let calc = entered("123");
        assert_eq!(calc.text(), "123");
    }

    #[test]
    fn zero_digit_on_zero_stays_zero() {
        let calc = entered("007");
        assert_eq!(calc.text(), "7");
    }

    #[test]
    fn consecutive_operators_collapse() {
        assert_eq!(entered("5+*").text(), "5*");
        assert_eq!(entered("5+-/").text(), "5/");
    }

    #[test]
    fn operator_after_zero_appends() {
        assert_eq!(entered("+").text(), "0+");
    }

    #[test]
    fn percent_always_appends() {
        assert_eq!(entered("%").text(), "0%");
        assert_eq!(entered("50%%").text(), "50%%");
    }

    #[test]
    fn square_root_replaces_zero_but_appends_otherwise() {
        assert_eq!(entered("√9").text(), "√9");
        assert_eq!(entered("4√9").text(), "4√9");
    }

    #[test]
    fn extra_power_behaves_like_operator() {
        let mut calc = entered("2+");
        calc.apply(Event::ExtraOp(ExtraOp::Power), Instant::now());
        assert_eq!(calc.text(), "2^");
    }

    #[test]
    fn equals_records_history() {
        let now = Instant::now();
        let mut calc = entered("6*7");
        let step = calc.apply(Event::Equals, now);

        assert_eq!(step, StepResult::Recorded(HistoryEntry::new("6*7", "42")));
        assert!(step.history_changed());
        assert_eq!(calc.text(), "42");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn digits_after_result_extend_it() {
        let now = Instant::now();
        let mut calc = entered("2*3");
        calc.apply(Event::Equals, now);
        press(&mut calc, "1", now);
        assert_eq!(calc.text(), "61");
    }

    #[test]
    fn equals_failure_shows_marker_and_arms_reset() {
        let now = Instant::now();
        let mut calc = entered("5/0");
        let step = calc.apply(Event::Equals, now);

        assert_eq!(step, StepResult::Failed(EvalError::Infinite));
        assert_eq!(calc.text(), "Ошибка");
        assert_eq!(calc.mode(), Mode::Error);
        assert!(calc.history().is_empty());
        assert_eq!(calc.next_reset_deadline(), Some(now + Duration::from_secs(1)));

        assert!(!calc.fire_due(now + Duration::from_millis(999)));
        assert_eq!(calc.text(), "Ошибка");
        assert!(calc.fire_due(now + Duration::from_millis(1000)));
        assert_eq!(calc.text(), "0");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn digit_replaces_error_marker() {
        let now = Instant::now();
        let mut calc = entered("5/0");
        calc.apply(Event::Equals, now);
        press(&mut calc, "8", now);
        assert_eq!(calc.text(), "8");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn legacy_reset_overwrites_later_input() {
        let now = Instant::now();
        let mut calc = entered("5/0");
        calc.apply(Event::Equals, now);
        press(&mut calc, "12", now + Duration::from_millis(200));
        assert_eq!(calc.text(), "12");

        assert!(calc.fire_due(now + Duration::from_secs(1)));
        assert_eq!(calc.text(), "0");
    }

    #[test]
    fn legacy_second_error_arms_another_reset() {
        let now = Instant::now();
        let mut calc = entered("5/0");
        calc.apply(Event::Equals, now);
        let later = now + Duration::from_millis(500);
        calc.apply(Event::Equals, later);
        assert_eq!(calc.pending_resets(), 2);

        assert!(calc.fire_due(now + Duration::from_secs(1)));
        press(&mut calc, "7", now + Duration::from_millis(1200));
        assert!(calc.fire_due(later + Duration::from_secs(1)));
        assert_eq!(calc.text(), "0");
    }

    #[test]
    fn cancellable_reset_is_dropped_by_input() {
        let config = CalculatorConfig {
            reset_policy: ResetPolicy::Cancellable,
            ..CalculatorConfig::default()
        };
        let now = Instant::now();
        let mut calc = Calculator::new(&config);
        press(&mut calc, "5/0", now);
        calc.apply(Event::Equals, now);
        assert_eq!(calc.pending_resets(), 1);

        press(&mut calc, "12", now + Duration::from_millis(200));
        assert_eq!(calc.pending_resets(), 0);
        assert!(!calc.fire_due(now + Duration::from_secs(2)));
        assert_eq!(calc.text(), "12");
    }

    #[test]
    fn clear_resets_display() {
        let mut calc = entered("99+");
        calc.apply(Event::Clear, Instant::now());
        assert_eq!(calc.text(), "0");
    }

    #[test]
    fn memory_add_accumulates_and_consumes_display() {
        let now = Instant::now();
        let mut calc = Calculator::default();
        press(&mut calc, "7", now);
        calc.apply(Event::Memory(MemoryOp::Add), now);
        assert_eq!(calc.text(), "0");
        press(&mut calc, "3", now);
        calc.apply(Event::Memory(MemoryOp::Add), now);
        assert_eq!(calc.memory().value(), Some(10.0));

        calc.apply(Event::Memory(MemoryOp::Recall), now);
        assert_eq!(calc.text(), "10");
    }

    #[test]
    fn memory_add_evaluates_expression() {
        let now = Instant::now();
        let mut calc = entered("2+50%");
        calc.apply(Event::Memory(MemoryOp::Add), now);
        assert_eq!(calc.memory().value(), Some(2.5));
    }

    #[test]
    fn memory_subtract_on_empty_register_negates() {
        let now = Instant::now();
        let mut calc = entered("4");
        calc.apply(Event::Memory(MemoryOp::Subtract), now);
        assert_eq!(calc.memory().value(), Some(-4.0));

        press(&mut calc, "1", now);
        calc.apply(Event::Memory(MemoryOp::Subtract), now);
        assert_eq!(calc.memory().value(), Some(-5.0));
    }

    #[test]
    fn memory_recall_concatenates() {
        let now = Instant::now();
        let mut calc = entered("7");
        calc.apply(Event::Memory(MemoryOp::Add), now);
        press(&mut calc, "1+", now);
        calc.apply(Event::Memory(MemoryOp::Recall), now);
        assert_eq!(calc.text(), "1+7");

        press(&mut calc, "2", now);
        calc.apply(Event::Memory(MemoryOp::Recall), now);
        assert_eq!(calc.text(), "1+727");
    }

    #[test]
    fn memory_recall_on_empty_register_is_noop() {
        let mut calc = entered("12");
        let step = calc.apply(Event::Memory(MemoryOp::Recall), Instant::now());
        assert_eq!(step, StepResult::Unchanged);
        assert_eq!(calc.text(), "12");
    }

    #[test]
    fn memory_add_failure_enters_error() {
        let now = Instant::now();
        let mut calc = entered("1/0");
        let step = calc.apply(Event::Memory(MemoryOp::Add), now);
        assert!(matches!(step, StepResult::Failed(_)));
        assert!(calc.memory().is_empty());
        assert_eq!(calc.mode(), Mode::Error);
        assert_eq!(calc.pending_resets(), 1);
    }

    #[test]
    fn memory_subtract_failure_enters_error() {
        let now = Instant::now();
        let mut calc = entered("4");
        calc.apply(Event::Memory(MemoryOp::Add), now);
        press(&mut calc, "2*", now);

        let step = calc.apply(Event::Memory(MemoryOp::Subtract), now);
        assert!(matches!(step, StepResult::Failed(_)));
        assert_eq!(calc.memory().value(), Some(4.0));
        assert_eq!(calc.text(), "Ошибка");
        assert_eq!(calc.pending_resets(), 1);
    }

    #[test]
    fn memory_recall_replaces_error_marker() {
        let now = Instant::now();
        let mut calc = entered("4");
        calc.apply(Event::Memory(MemoryOp::Add), now);
        press(&mut calc, "5/0", now);
        calc.apply(Event::Equals, now);
        assert_eq!(calc.mode(), Mode::Error);

        calc.apply(Event::Memory(MemoryOp::Recall), now);
        assert_eq!(calc.text(), "4");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn square_root_replaces_error_marker() {
        let now = Instant::now();
        let mut calc = entered("5/0");
        calc.apply(Event::Equals, now);
        assert_eq!(calc.mode(), Mode::Error);

        press(&mut calc, "√", now);
        assert_eq!(calc.text(), "√");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn oversized_power_chain_shows_marker() {
        let now = Instant::now();
        let mut calc = entered("1");
        for _ in 0..5000 {
            press(&mut calc, "^1", now);
        }

        let step = calc.apply(Event::Equals, now);
        assert_eq!(step, StepResult::Failed(EvalError::TooComplex));
        assert_eq!(calc.text(), "Ошибка");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn memory_clear_empties_register() {
        let now = Instant::now();
        let mut calc = entered("3");
        calc.apply(Event::Memory(MemoryOp::Add), now);
        calc.apply(Event::Memory(MemoryOp::Clear), now);
        assert!(calc.memory().is_empty());
    }

    #[test]
    fn history_replay_uses_result() {
        let mut calc = entered("1+");
        calc.apply(
            Event::HistoryReplay(HistoryEntry::new("6*7", "42")),
            Instant::now(),
        );
        assert_eq!(calc.text(), "42");
        assert_eq!(calc.mode(), Mode::Normal);
    }

    #[test]
    fn restored_history_is_extended() {
        let history = HistoryLog::new().record(HistoryEntry::new("1+1", "2"));
        let mut calc = Calculator::with_history(&CalculatorConfig::default(), history);
        press(&mut calc, "3*3", Instant::now());
        calc.apply(Event::Equals, Instant::now());
        assert_eq!(calc.history().len(), 2);
        assert_eq!(calc.history().last().unwrap().result, "9");
    }

    #[test]
    fn custom_error_marker_is_shown() {
        let config = CalculatorConfig {
            error_marker: "Error".to_string(),
            ..CalculatorConfig::default()
        };
        let mut calc = Calculator::new(&config);
        press(&mut calc, "5+", Instant::now());
        calc.apply(Event::Equals, Instant::now());
        assert_eq!(calc.text(), "Error");
    }
}
