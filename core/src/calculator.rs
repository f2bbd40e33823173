//! Input state machine.
//!
//! [`Calculator`] holds the operand being typed, the operand captured before an
//! operator was chosen, and the operator itself. Every user action is a method
//! that runs to completion; actions that need the calculation service return a
//! [`CalculationRequest`] for the caller to dispatch, and the caller reports
//! the outcome back through [`Calculator::apply_result`].
//!
//! ```text
//!            digit / . / ± / ⌫                    + - * / power mod
//!   ┌──────┐ ───────────────► ┌──────┐ ──────────────────────────► ┌─────────────────┐
//!   │ Idle │                  │ Idle │                             │ PendingOperator │
//!   └──────┘ ◄─────────────── └──────┘ ◄─────────────────────────  └─────────────────┘
//!               clear                        result applied
//! ```

use thiserror::Error;

use abacus_types::{
    CalculationRequest, Operator, OperatorKind, format_number, number_to_operand, parse_operand,
};

pub const DEFAULT_OPERAND: &str = "0";

const DEFAULT_LOG_BASE: f64 = 10.0;

/// An edit the input layer refuses. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidOperandEdit {
    #[error("operand already has a decimal point")]
    DuplicateDecimalPoint,
    #[error("zero has no sign to toggle")]
    NegateZero,
    #[error("{0:?} is not a digit or decimal point")]
    NotNumeric(char),
}

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingOperator(Operator),
}

/// What the caller must do after an operator is selected.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The operator is recorded; the next digit starts its second operand.
    Deferred,
    /// Send this request now.
    Submit(CalculationRequest),
    /// Resolve the pending calculation first; once it succeeds, continue
    /// with `next` applied to the result.
    Chain {
        request: CalculationRequest,
        next: Operator,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    current_operand: String,
    pending_operand: Option<String>,
    pending_operator: Option<Operator>,
    awaiting_new_operand: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            current_operand: DEFAULT_OPERAND.to_string(),
            pending_operand: None,
            pending_operator: None,
            awaiting_new_operand: false,
        }
    }
}

impl Calculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_operand(&self) -> &str {
        &self.current_operand
    }

    #[must_use]
    pub fn pending_operand(&self) -> Option<&str> {
        self.pending_operand.as_deref()
    }

    #[must_use]
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    #[must_use]
    pub fn awaiting_new_operand(&self) -> bool {
        self.awaiting_new_operand
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.pending_operator {
            Some(op) => Phase::PendingOperator(op),
            None => Phase::Idle,
        }
    }

    /// Type a digit or decimal point.
    pub fn insert(&mut self, ch: char) -> Result<(), InvalidOperandEdit> {
        if !ch.is_ascii_digit() && ch != '.' {
            return Err(InvalidOperandEdit::NotNumeric(ch));
        }

        if self.awaiting_new_operand {
            self.current_operand = ch.to_string();
            self.awaiting_new_operand = false;
            return Ok(());
        }

        if self.current_operand == DEFAULT_OPERAND && ch != '.' {
            self.current_operand = ch.to_string();
        } else if ch == '.' && self.current_operand.contains('.') {
            return Err(InvalidOperandEdit::DuplicateDecimalPoint);
        } else {
            self.current_operand.push(ch);
        }
        Ok(())
    }

    /// Replace the current operand with π.
    pub fn insert_pi(&mut self) {
        self.current_operand = number_to_operand(std::f64::consts::PI);
        self.awaiting_new_operand = false;
    }

    pub fn toggle_sign(&mut self) -> Result<(), InvalidOperandEdit> {
        if self.current_operand == DEFAULT_OPERAND {
            return Err(InvalidOperandEdit::NegateZero);
        }
        self.current_operand = number_to_operand(-parse_operand(&self.current_operand));
        Ok(())
    }

    pub fn backspace(&mut self) {
        self.current_operand.pop();
        if self.current_operand.is_empty() || self.current_operand == "-" {
            self.current_operand = DEFAULT_OPERAND.to_string();
        }
    }

    /// Reset everything except history, which the calculator does not own.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Choose an operator.
    pub fn select_operator(&mut self, op: Operator) -> Selection {
        match op.kind() {
            OperatorKind::Binary => {
                if self.pending_operator.is_some()
                    && !self.awaiting_new_operand
                    && let Some(request) = self.request()
                {
                    return Selection::Chain { request, next: op };
                }
                self.pending_operand = Some(self.current_operand.clone());
                self.pending_operator = Some(op);
                self.awaiting_new_operand = true;
                Selection::Deferred
            }
            // State is untouched until the result is applied.
            OperatorKind::Trig | OperatorKind::Log => match self.request_for(op) {
                Some(request) => Selection::Submit(request),
                None => Selection::Deferred,
            },
            OperatorKind::Power => {
                self.pending_operand = Some(self.current_operand.clone());
                self.pending_operator = Some(op);
                self.awaiting_new_operand = true;
                Selection::Deferred
            }
            OperatorKind::Mod => {
                if self.pending_operand.is_none() {
                    self.pending_operand = Some(self.current_operand.clone());
                }
                self.pending_operator = Some(op);
                self.awaiting_new_operand = true;
                Selection::Deferred
            }
        }
    }

    /// The request "evaluate" would send, or `None` when nothing is pending.
    ///
    /// `power` and `mod` also return `None` without a captured first operand;
    /// selecting either always captures one, so that only happens to states
    /// built by hand.
    #[must_use]
    pub fn request(&self) -> Option<CalculationRequest> {
        self.request_for(self.pending_operator?)
    }

    /// The request `op` would send against the current operands.
    fn request_for(&self, op: Operator) -> Option<CalculationRequest> {
        let current = parse_operand(&self.current_operand);
        let pending = self.pending_operand.as_deref().map(parse_operand);

        match op.kind() {
            OperatorKind::Binary => {
                CalculationRequest::pair(op, pending.unwrap_or(current), current)
            }
            OperatorKind::Trig => CalculationRequest::trig(op, pending, current),
            OperatorKind::Log => Some(match pending {
                Some(number) => CalculationRequest::Log {
                    number,
                    base: current,
                },
                None => CalculationRequest::Log {
                    number: current,
                    base: DEFAULT_LOG_BASE,
                },
            }),
            OperatorKind::Power => Some(CalculationRequest::Power {
                base: pending?,
                exponent: current,
            }),
            OperatorKind::Mod => CalculationRequest::pair(op, pending?, current),
        }
    }

    /// Load a successful result as a fresh operand.
    pub fn apply_result(&mut self, result: f64) {
        self.current_operand = number_to_operand(result);
        self.pending_operand = None;
        self.pending_operator = None;
        self.awaiting_new_operand = false;
    }

    /// After a chained calculation resolved, start the next operator with the
    /// result as its first operand.
    pub fn continue_chain(&mut self, next: Operator) {
        self.pending_operand = Some(self.current_operand.clone());
        self.pending_operator = Some(next);
        self.awaiting_new_operand = true;
    }

    /// Main display text.
    #[must_use]
    pub fn display(&self) -> String {
        format_number(&self.current_operand)
    }

    /// `"<pending operand> <symbol>"`, or empty when nothing is pending.
    #[must_use]
    pub fn pending_label(&self) -> String {
        match (&self.pending_operand, self.pending_operator) {
            (Some(operand), Some(op)) => format!("{} {}", format_number(operand), op.symbol()),
            _ => String::new(),
        }
    }
}
