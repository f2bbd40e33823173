use serde::{Deserialize, Serialize};

/// Every operation the calculation service understands.
///
/// The serde names are the wire names used in the `operation` field of a
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "sin")]
    Sin,
    #[serde(rename = "cos")]
    Cos,
    #[serde(rename = "tan")]
    Tan,
    #[serde(rename = "cot")]
    Cot,
    #[serde(rename = "log")]
    Log,
    #[serde(rename = "power")]
    Power,
    #[serde(rename = "mod")]
    Mod,
}

/// How an operator collects its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// `+ - * /`: waits for a second operand, chains on the next operator.
    Binary,
    /// `sin cos tan cot`: submitted as soon as it is selected.
    Trig,
    /// `log`: submitted as soon as it is selected.
    Log,
    /// `power`: waits for the exponent.
    Power,
    /// `mod`: waits for the divisor.
    Mod,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Sin,
        Operator::Cos,
        Operator::Tan,
        Operator::Cot,
        Operator::Log,
        Operator::Power,
        Operator::Mod,
    ];

    /// Wire name sent in the `operation` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Tan => "tan",
            Operator::Cot => "cot",
            Operator::Log => "log",
            Operator::Power => "power",
            Operator::Mod => "mod",
        }
    }

    /// Symbol shown next to the pending operand.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            other => other.as_str(),
        }
    }

    #[must_use]
    pub const fn kind(self) -> OperatorKind {
        match self {
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide => {
                OperatorKind::Binary
            }
            Operator::Sin | Operator::Cos | Operator::Tan | Operator::Cot => OperatorKind::Trig,
            Operator::Log => OperatorKind::Log,
            Operator::Power => OperatorKind::Power,
            Operator::Mod => OperatorKind::Mod,
        }
    }

    /// Parse an operator from its wire name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == raw)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
