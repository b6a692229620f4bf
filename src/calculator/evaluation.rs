//! Evaluation strategies and result formatting.
//!
//! The engine evaluates either immediately (strict left to right, one pending
//! operator at a time) or with operator precedence, where every operator and
//! operand is recorded and the whole trace is folded on `=`.

use std::fmt;

use super::operator::Operator;

/// A failure that is only ever shown on the display, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftError {
    DivideByZero,
    InvalidInput,
}

impl SoftError {
    /// The sentinel text written to the display.
    pub fn message(self) -> &'static str {
        match self {
            Self::DivideByZero => "Cannot divide by zero",
            Self::InvalidInput => "Invalid input",
        }
    }

    /// Whether `text` is one of the sentinel messages.
    pub fn is_sentinel(text: &str) -> bool {
        text == Self::DivideByZero.message() || text == Self::InvalidInput.message()
    }
}

impl fmt::Display for SoftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How `=` combines what the user entered.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EvaluationMode {
    /// Apply the pending operator as soon as the next operator or `=` arrives.
    #[default]
    Immediate,
    /// Record the expression and honor `*`, `/`, `%` before `+`, `-`.
    ///
    /// `operators[i]` joins `operands[i]` with the operand after it; the last
    /// operand is the one being typed and is appended only on evaluation.
    Precedence {
        operators: Vec<Operator>,
        operands: Vec<f64>,
    },
}

impl EvaluationMode {
    /// A fresh mode for the given flag.
    pub fn new(precedence: bool) -> Self {
        if precedence {
            Self::Precedence {
                operators: Vec::new(),
                operands: Vec::new(),
            }
        } else {
            Self::Immediate
        }
    }

    pub fn is_precedence(&self) -> bool {
        matches!(self, Self::Precedence { .. })
    }

    /// Whether a precedence trace has been started.
    pub fn has_trace(&self) -> bool {
        match self {
            Self::Immediate => false,
            Self::Precedence { operators, .. } => !operators.is_empty(),
        }
    }

    /// Record `lhs op` in the trace. A no-op in immediate mode.
    pub fn record(&mut self, lhs: f64, op: Operator) {
        if let Self::Precedence {
            operators,
            operands,
        } = self
        {
            operators.push(op);
            operands.push(lhs);
        }
    }

    /// Swap the most recently recorded operator for `op`.
    pub fn replace_last(&mut self, op: Operator) {
        if let Self::Precedence { operators, .. } = self
            && let Some(last) = operators.last_mut()
        {
            *last = op;
        }
    }

    /// Drop the recorded trace, keeping the mode.
    pub fn reset(&mut self) {
        if let Self::Precedence {
            operators,
            operands,
        } = self
        {
            operators.clear();
            operands.clear();
        }
    }

    /// The recorded operators and operands, empty in immediate mode.
    pub fn trace(&self) -> (&[Operator], &[f64]) {
        match self {
            Self::Immediate => (&[], &[]),
            Self::Precedence {
                operators,
                operands,
            } => (operators.as_slice(), operands.as_slice()),
        }
    }

    /// Close the trace with `last` and fold it. The trace is emptied either way.
    pub fn finish(&mut self, last: f64) -> Result<f64, SoftError> {
        match self {
            Self::Immediate => Ok(last),
            Self::Precedence {
                operators,
                operands,
            } => {
                operands.push(last);
                let result = fold_with_precedence(operators, operands);
                operators.clear();
                operands.clear();
                result
            }
        }
    }
}

/// Fold an operator/operand trace honoring multiplicative precedence.
///
/// Pass one collapses every `*`, `/`, `%` into its left neighbor; pass two
/// applies the remaining `+`/`-` left to right. Division by zero aborts the
/// whole fold. Expects `operands.len() == operators.len() + 1`.
pub fn fold_with_precedence(operators: &[Operator], operands: &[f64]) -> Result<f64, SoftError> {
    let Some((&first, rest)) = operands.split_first() else {
        return Ok(0.0);
    };

    let mut terms = vec![first];
    let mut additive = Vec::new();
    for (&op, &rhs) in operators.iter().zip(rest) {
        if op.is_multiplicative() {
            let lhs = terms.last_mut().ok_or(SoftError::InvalidInput)?;
            *lhs = op.apply(*lhs, rhs).ok_or(SoftError::DivideByZero)?;
        } else {
            additive.push(op);
            terms.push(rhs);
        }
    }

    let (&head, tail) = terms.split_first().ok_or(SoftError::InvalidInput)?;
    let mut result = head;
    for (op, &rhs) in additive.iter().zip(tail) {
        result = op.apply(result, rhs).ok_or(SoftError::DivideByZero)?;
    }
    Ok(result)
}

/// Format a value for the display.
///
/// Finite values use the shortest text that parses back to the same `f64`,
/// without a trailing `.0`. Negative zero shows as `0`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "Not a Number".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}
