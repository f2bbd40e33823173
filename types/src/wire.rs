//! Request and response shapes exchanged with the calculation service.
//!
//! The service accepts a flat JSON object whose `operation` field selects the
//! variant and whose remaining fields carry that variant's operands:
//!
//! | operation | fields |
//! |-----------|--------|
//! | `+ - * /` | `num1`, `num2` |
//! | `sin cos tan cot` | `num1` (nullable), `angle` |
//! | `log` | `number`, `base` |
//! | `power` | `base`, `exponent` |
//! | `mod` | `num1`, `num2` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Operator;

/// A calculation ready to send. Built at submission time, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum CalculationRequest {
    #[serde(rename = "+")]
    Add { num1: f64, num2: f64 },
    #[serde(rename = "-")]
    Subtract { num1: f64, num2: f64 },
    #[serde(rename = "*")]
    Multiply { num1: f64, num2: f64 },
    #[serde(rename = "/")]
    Divide { num1: f64, num2: f64 },
    #[serde(rename = "sin")]
    Sin { num1: Option<f64>, angle: f64 },
    #[serde(rename = "cos")]
    Cos { num1: Option<f64>, angle: f64 },
    #[serde(rename = "tan")]
    Tan { num1: Option<f64>, angle: f64 },
    #[serde(rename = "cot")]
    Cot { num1: Option<f64>, angle: f64 },
    #[serde(rename = "log")]
    Log { number: f64, base: f64 },
    #[serde(rename = "power")]
    Power { base: f64, exponent: f64 },
    #[serde(rename = "mod")]
    Mod { num1: f64, num2: f64 },
}

impl CalculationRequest {
    /// Build a two-operand request for `+ - * /` or `mod`.
    ///
    /// Returns `None` for operators that take a different operand shape.
    #[must_use]
    pub fn pair(op: Operator, num1: f64, num2: f64) -> Option<Self> {
        Some(match op {
            Operator::Add => Self::Add { num1, num2 },
            Operator::Subtract => Self::Subtract { num1, num2 },
            Operator::Multiply => Self::Multiply { num1, num2 },
            Operator::Divide => Self::Divide { num1, num2 },
            Operator::Mod => Self::Mod { num1, num2 },
            _ => return None,
        })
    }

    /// Build a trigonometric request. `num1` rides along unchanged.
    #[must_use]
    pub fn trig(op: Operator, num1: Option<f64>, angle: f64) -> Option<Self> {
        Some(match op {
            Operator::Sin => Self::Sin { num1, angle },
            Operator::Cos => Self::Cos { num1, angle },
            Operator::Tan => Self::Tan { num1, angle },
            Operator::Cot => Self::Cot { num1, angle },
            _ => return None,
        })
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        match self {
            Self::Add { .. } => Operator::Add,
            Self::Subtract { .. } => Operator::Subtract,
            Self::Multiply { .. } => Operator::Multiply,
            Self::Divide { .. } => Operator::Divide,
            Self::Sin { .. } => Operator::Sin,
            Self::Cos { .. } => Operator::Cos,
            Self::Tan { .. } => Operator::Tan,
            Self::Cot { .. } => Operator::Cot,
            Self::Log { .. } => Operator::Log,
            Self::Power { .. } => Operator::Power,
            Self::Mod { .. } => Operator::Mod,
        }
    }
}

/// Outcome reported by the calculation service.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResponse {
    Success {
        /// Human-readable description, e.g. `"5 + 3"`.
        operation_label: String,
        result: f64,
    },
    Failure {
        error_message: String,
    },
}

#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("successful response is missing `{0}`")]
    MissingField(&'static str),
}

/// Raw body as the service sends it; both outcomes share one object shape.
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: bool,
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

impl CalculationResponse {
    /// Parse a response body.
    ///
    /// A failure without an `error` field still counts as a failure; a success
    /// without `result` is malformed.
    pub fn from_json(body: &str) -> Result<Self, MalformedResponse> {
        let raw: RawResponse = serde_json::from_str(body)?;
        if !raw.success {
            return Ok(Self::Failure {
                error_message: raw
                    .error
                    .unwrap_or_else(|| "Calculation failed".to_string()),
            });
        }
        let result = raw.result.ok_or(MalformedResponse::MissingField("result"))?;
        let operation_label = raw
            .operation
            .ok_or(MalformedResponse::MissingField("operation"))?;
        Ok(Self::Success {
            operation_label,
            result,
        })
    }
}

/// Body of the service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn binary_request_is_flat_with_operation_tag() {
        let request = CalculationRequest::pair(Operator::Add, 5.0, 3.0).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"operation": "+", "num1": 5.0, "num2": 3.0}));
    }

    #[test]
    fn trig_request_sends_null_num1_when_absent() {
        let request = CalculationRequest::trig(Operator::Sin, None, 30.0).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"operation": "sin", "num1": null, "angle": 30.0})
        );
    }

    #[test]
    fn trig_request_carries_auxiliary_num1() {
        let request = CalculationRequest::trig(Operator::Cot, Some(2.0), 45.0).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"operation": "cot", "num1": 2.0, "angle": 45.0})
        );
    }

    #[test]
    fn log_and_power_use_named_fields() {
        let log = CalculationRequest::Log {
            number: 100.0,
            base: 10.0,
        };
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!({"operation": "log", "number": 100.0, "base": 10.0})
        );

        let power = CalculationRequest::Power {
            base: 2.0,
            exponent: 10.0,
        };
        assert_eq!(
            serde_json::to_value(&power).unwrap(),
            json!({"operation": "power", "base": 2.0, "exponent": 10.0})
        );
    }

    #[test]
    fn constructors_reject_mismatched_operators() {
        assert!(CalculationRequest::pair(Operator::Sin, 1.0, 2.0).is_none());
        assert!(CalculationRequest::pair(Operator::Power, 1.0, 2.0).is_none());
        assert!(CalculationRequest::trig(Operator::Add, None, 2.0).is_none());
    }

    #[test]
    fn operator_matches_variant() {
        for op in [Operator::Add, Operator::Divide, Operator::Mod] {
            assert_eq!(CalculationRequest::pair(op, 1.0, 2.0).unwrap().operator(), op);
        }
        assert_eq!(
            CalculationRequest::trig(Operator::Tan, None, 1.0)
                .unwrap()
                .operator(),
            Operator::Tan
        );
    }

    #[test]
    fn parses_success_response() {
        let response = CalculationResponse::from_json(
            r#"{"success": true, "operation": "5 + 3", "result": 8}"#,
        )
        .unwrap();
        assert_eq!(
            response,
            CalculationResponse::Success {
                operation_label: "5 + 3".to_string(),
                result: 8.0,
            }
        );
    }

    #[test]
    fn parses_failure_response() {
        let response =
            CalculationResponse::from_json(r#"{"success": false, "error": "divide by zero"}"#)
                .unwrap();
        assert_eq!(
            response,
            CalculationResponse::Failure {
                error_message: "divide by zero".to_string(),
            }
        );
    }

    #[test]
    fn success_without_result_is_malformed() {
        let err = CalculationResponse::from_json(r#"{"success": true, "operation": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, MalformedResponse::MissingField("result")));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = CalculationResponse::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, MalformedResponse::Json(_)));
    }

    #[test]
    fn health_status_reports_healthy() {
        let status: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "service": "Calculator API", "version": "1.0.0"}"#,
        )
        .unwrap();
        assert!(status.is_healthy());
        assert_eq!(status.version.as_deref(), Some("1.0.0"));
    }
}
