//! The calculator state machine.
//!
//! An [`Engine`] consumes one user action at a time and keeps the text the user
//! sees alongside the numeric value behind it. Faults such as division by zero
//! never escape: they replace the display with a sentinel message and the next
//! digit starts over.

use tracing::{debug, warn};

use super::base::{self, Base};
use super::evaluation::{EvaluationMode, SoftError, format_value};
use super::operator::Operator;

/// Calculator state for one interactive session.
#[derive(Debug, Clone)]
pub struct Engine {
    current_value: f64,
    display: String,
    pending_operand: f64,
    pending_operator: Option<Operator>,
    awaiting_new_entry: bool,
    just_produced_result: bool,
    /// Set by an operator press, cleared by anything that yields an operand.
    just_queued_operator: bool,
    mode: EvaluationMode,
    input_base: Base,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// A reset engine in immediate mode and decimal input.
    pub fn new() -> Self {
        Self {
            current_value: 0.0,
            display: "0".to_string(),
            pending_operand: 0.0,
            pending_operator: None,
            awaiting_new_entry: true,
            just_produced_result: false,
            just_queued_operator: false,
            mode: EvaluationMode::Immediate,
            input_base: Base::Decimal,
        }
    }

    /// A reset engine with precedence mode set as given.
    pub fn with_precedence(enabled: bool) -> Self {
        let mut engine = Self::new();
        engine.set_precedence_mode(enabled);
        engine
    }

    /* ------------------------------ Observers ------------------------------ */

    /// The exact text shown to the user.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn pending_operand(&self) -> f64 {
        self.pending_operand
    }

    /// True when the next digit starts a fresh number.
    pub fn is_awaiting_new_entry(&self) -> bool {
        self.awaiting_new_entry
    }

    /// True right after `=` or a soft error; the next digit resets everything.
    pub fn just_produced_result(&self) -> bool {
        self.just_produced_result
    }

    pub fn precedence_enabled(&self) -> bool {
        self.mode.is_precedence()
    }

    /// Operators and operands recorded so far in precedence mode.
    pub fn history(&self) -> (&[Operator], &[f64]) {
        self.mode.trace()
    }

    pub fn input_base(&self) -> Base {
        self.input_base
    }

    /// Whether the display currently shows a message instead of a number.
    pub fn shows_message(&self) -> bool {
        SoftError::is_sentinel(&self.display) || self.current_value.is_nan()
    }

    /* ------------------------------ Configuration ------------------------------ */

    /// Switch between immediate and precedence evaluation.
    ///
    /// Turning the mode on or off drops any recorded trace; the pending
    /// operator survives and is evaluated immediately on `=`.
    pub fn set_precedence_mode(&mut self, enabled: bool) {
        if self.mode.is_precedence() != enabled {
            self.mode = EvaluationMode::new(enabled);
            debug!(enabled, "Precedence mode changed");
        }
    }

    /// Change the base digits are typed in, converting the current display.
    ///
    /// Decimal text is truncated toward zero. A display that cannot be read in
    /// the previous base resets the engine.
    pub fn set_input_base(&mut self, target: Base) {
        let previous = self.input_base;
        self.input_base = target;
        if previous == target || self.display.is_empty() || self.display == "0" {
            return;
        }

        let converted = match previous {
            Base::Decimal => Ok(parse_decimal(&self.display)
                .map(|value| value.trunc() as i64)
                .unwrap_or(0)),
            other => base::parse_digits(&self.display, other),
        };

        match converted {
            Ok(value) => {
                self.show(value as f64);
                self.awaiting_new_entry = true;
                self.just_queued_operator = false;
            }
            Err(err) => {
                warn!(display = %self.display, from = %previous, to = %target, "Base conversion failed: {err}");
                self.clear();
            }
        }
        self.log_action("set_input_base");
    }

    /* ------------------------------ Entry ------------------------------ */

    /// Append one digit (0-9, or A-F for hexadecimal entry).
    pub fn append_digit(&mut self, digit: &str) {
        if digit.is_empty() {
            return;
        }
        if digit == "." {
            self.append_decimal_point();
            return;
        }
        if self.just_produced_result {
            self.clear();
        }

        self.just_queued_operator = false;
        if self.awaiting_new_entry {
            self.display = digit.to_string();
            self.awaiting_new_entry = false;
        } else if self.display == "0" {
            if digit == "0" {
                return;
            }
            self.display = digit.to_string();
        } else {
            self.display.push_str(digit);
        }

        if let Some(value) = self.read_entry(&self.display) {
            self.current_value = value;
        }
        self.log_action("append_digit");
    }

    /// Append a decimal point. Only meaningful in decimal input.
    pub fn append_decimal_point(&mut self) {
        if self.input_base != Base::Decimal {
            return;
        }
        if self.just_produced_result {
            self.clear();
        }

        self.just_queued_operator = false;
        if self.awaiting_new_entry {
            self.display = "0.".to_string();
            self.current_value = 0.0;
            self.awaiting_new_entry = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
        self.log_action("append_decimal_point");
    }

    /// Inject a value from memory recall or paste.
    pub fn set_value(&mut self, value: f64) {
        self.show(value);
        self.awaiting_new_entry = true;
        self.log_action("set_value");
    }

    /* ------------------------------ Operators ------------------------------ */

    /// Queue a binary operator.
    ///
    /// In immediate mode a pending operation is evaluated first if the user
    /// has typed its right operand. Pressing operators back to back replaces
    /// the pending one; any operand produced in between (typed, recalled or
    /// computed by a function) is recorded instead.
    pub fn set_operator(&mut self, op: Operator) {
        let replacing = self.pending_operator.is_some() && self.just_queued_operator;

        if !self.mode.is_precedence() && self.pending_operator.is_some() && !self.awaiting_new_entry
        {
            self.evaluate_immediate();
        }

        if replacing && self.mode.has_trace() {
            self.mode.replace_last(op);
        } else {
            self.mode.record(self.current_value, op);
        }

        self.pending_operand = self.current_value;
        self.pending_operator = Some(op);
        self.awaiting_new_entry = true;
        self.just_produced_result = false;
        self.just_queued_operator = true;
        debug!(op = %op, operand = self.pending_operand, "Operator queued");
    }

    /// The `=` action.
    pub fn evaluate(&mut self) {
        if self.mode.has_trace() {
            self.evaluate_with_precedence();
        } else {
            self.evaluate_immediate();
        }
        self.log_action("evaluate");
    }

    fn evaluate_immediate(&mut self) {
        let Some(op) = self.pending_operator else {
            return;
        };
        if self.awaiting_new_entry {
            return;
        }

        self.pending_operator = None;
        match op.apply(self.pending_operand, self.current_value) {
            Some(result) => {
                self.show(result);
                self.awaiting_new_entry = true;
                self.just_produced_result = true;
            }
            None => self.fail_soft(SoftError::DivideByZero),
        }
    }

    fn evaluate_with_precedence(&mut self) {
        match self.mode.finish(self.current_value) {
            Ok(result) => {
                self.show(result);
                self.pending_operator = None;
                self.awaiting_new_entry = true;
                self.just_produced_result = true;
            }
            Err(err) => {
                self.clear();
                self.fail_soft(err);
            }
        }
    }

    /* ------------------------------ Functions ------------------------------ */

    /// `%`: with `+`/`-` pending it is a percentage of the left operand,
    /// with `*`/`/` (or nothing) pending it is a plain division by 100.
    pub fn percentage(&mut self) {
        let value = self.current_value;
        let result = match self.pending_operator {
            None | Some(Operator::Multiply | Operator::Divide) => value / 100.0,
            Some(Operator::Add | Operator::Subtract) => self.pending_operand * (value / 100.0),
            Some(Operator::Modulo) => value,
        };
        self.show(result);
        self.awaiting_new_entry = true;
        self.log_action("percentage");
    }

    /// `1/x`.
    pub fn reciprocal(&mut self) {
        if self.current_value == 0.0 {
            self.fail_soft(SoftError::DivideByZero);
            return;
        }
        self.show(1.0 / self.current_value);
        self.awaiting_new_entry = true;
        self.log_action("reciprocal");
    }

    /// `x²`.
    pub fn square(&mut self) {
        self.show(self.current_value * self.current_value);
        self.awaiting_new_entry = true;
        self.log_action("square");
    }

    /// `√x`.
    pub fn square_root(&mut self) {
        if self.current_value < 0.0 {
            self.fail_soft(SoftError::InvalidInput);
            return;
        }
        self.show(self.current_value.sqrt());
        self.awaiting_new_entry = true;
        self.log_action("square_root");
    }

    /// `±`: flips the sign of the value and of the text in place, keeping any
    /// partial entry such as a trailing decimal point.
    pub fn negate(&mut self) {
        if self.shows_message() {
            return;
        }
        self.current_value = -self.current_value;
        self.just_queued_operator = false;
        if let Some(unsigned) = self.display.strip_prefix('-') {
            self.display = unsigned.to_string();
        } else if self.display != "0" {
            self.display.insert(0, '-');
        }
        self.log_action("negate");
    }

    /* ------------------------------ Clearing ------------------------------ */

    /// `C`: back to the reset state. Mode and input base are kept.
    pub fn clear(&mut self) {
        self.current_value = 0.0;
        self.display = "0".to_string();
        self.pending_operand = 0.0;
        self.pending_operator = None;
        self.awaiting_new_entry = true;
        self.just_produced_result = false;
        self.just_queued_operator = false;
        self.mode.reset();
        self.log_action("clear");
    }

    /// `CE`: drops the number being entered, keeps the pending operation.
    pub fn clear_entry(&mut self) {
        self.current_value = 0.0;
        self.display = "0".to_string();
        self.awaiting_new_entry = true;
        self.just_queued_operator = false;
        self.log_action("clear_entry");
    }

    /// `⌫`: removes the last typed character.
    pub fn backspace(&mut self) {
        if self.awaiting_new_entry || self.display.chars().count() <= 1 {
            self.clear_entry();
            return;
        }

        self.just_queued_operator = false;
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
            self.current_value = 0.0;
        } else {
            self.current_value = self.read_entry(&self.display).unwrap_or(0.0);
        }
        self.log_action("backspace");
    }

    /* ------------------------------ Internals ------------------------------ */

    /// Read typed text as a number, trying each stage in order.
    ///
    /// Decimal input: strict decimal, then hexadecimal integer. Other bases:
    /// an integer in that base. `None` means every stage failed.
    fn read_entry(&self, text: &str) -> Option<f64> {
        match self.input_base {
            Base::Decimal => parse_decimal(text).or_else(|| {
                base::parse_digits(text, Base::Hexadecimal)
                    .ok()
                    .map(|value| value as f64)
            }),
            other => base::parse_digits(text, other).ok().map(|value| value as f64),
        }
    }

    fn show(&mut self, value: f64) {
        self.current_value = value;
        self.just_queued_operator = false;
        self.display = match self.input_base {
            Base::Decimal => format_value(value),
            _ if !value.is_finite() => format_value(value),
            other => base::render_digits(value.trunc() as i64, other),
        };
    }

    fn fail_soft(&mut self, err: SoftError) {
        debug!(error = %err, "Soft error");
        self.display = err.message().to_string();
        self.awaiting_new_entry = true;
        self.just_produced_result = true;
        self.just_queued_operator = false;
    }

    fn log_action(&self, action: &'static str) {
        debug!(action, display = %self.display, value = self.current_value, "Engine action");
    }
}

/// Parse plain decimal text: optional `-`, digits, at most one `.`.
///
/// Exponents, `inf` and `nan` are rejected so hexadecimal entry such as `1E5`
/// falls through to the hexadecimal stage.
fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let has_digit = unsigned.chars().any(|c| c.is_ascii_digit());
    let plain = unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && unsigned.matches('.').count() <= 1;
    if !has_digit || !plain {
        return None;
    }
    text.parse().ok()
}
