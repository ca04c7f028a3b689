//! Response classification for Vearch replies.
//!
//! Vearch endpoints do not share one envelope: some return `{code, msg, data}`,
//! document endpoints return `{status, _id, ...}`, failures carry an `error`
//! object, and a few calls return no JSON at all. [`classify`] maps all of
//! them onto a [`Verdict`]; [`Verdict::record`] writes the log line. Callers
//! go through [`checked`] and never look at raw status codes.

use serde::Serialize;
use serde_json::Value;

const OK: i64 = 200;

/// Outcome of one Vearch call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    Success { message: String },
    Warning { code: i64, message: String },
    Error { reason: String },
}

impl Verdict {
    /// Whether the caller may go on using the response.
    ///
    /// Warnings proceed; only an explicit error object stops the caller.
    pub fn proceed(&self) -> bool {
        !matches!(self, Verdict::Error { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Verdict::Success { message } | Verdict::Warning { message, .. } => message,
            Verdict::Error { reason } => reason,
        }
    }

    /// Emit one log event for `action` on `subject`.
    pub fn record(&self, action: &str, subject: &str) {
        match self {
            Verdict::Success { message } => {
                tracing::info!(action, subject, "{} {}: {}", action, subject, message);
            }
            Verdict::Warning { code, message } => {
                tracing::warn!(action, subject, code, "{} {}: {}", action, subject, message);
            }
            Verdict::Error { reason } => {
                tracing::error!(action, subject, "{} {} failed: {}", action, subject, reason);
            }
        }
    }
}

/// Classify a decoded response body.
pub fn classify(response: &Value) -> Verdict {
    let Value::Object(map) = response else {
        return Verdict::Success {
            message: "success".to_string(),
        };
    };

    if let Some(error) = map.get("error") {
        return Verdict::Error {
            reason: error_reason(error),
        };
    }

    let code = status_code(map.get("code"))
        .or_else(|| status_code(map.get("status")))
        .unwrap_or(OK);

    let msg = map
        .get("msg")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    if code != OK {
        Verdict::Warning {
            code,
            message: msg.unwrap_or_else(|| "failed".to_string()),
        }
    } else {
        Verdict::Success {
            message: msg.unwrap_or_else(|| "success".to_string()),
        }
    }
}

/// Classify, log, and report whether the caller may proceed.
pub fn checked(action: &str, subject: &str, response: &Value) -> bool {
    let verdict = classify(response);
    verdict.record(action, subject);
    verdict.proceed()
}

// Zero and null fall through to the next candidate field.
fn status_code(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().filter(|c| *c != 0),
        Value::String(s) => s.parse::<i64>().ok().filter(|c| *c != 0),
        _ => None,
    }
}

fn error_reason(error: &Value) -> String {
    match error {
        Value::Object(obj) => match obj.get("reason") {
            Some(Value::String(reason)) => reason.clone(),
            Some(other) => other.to_string(),
            None => error.to_string(),
        },
        Value::String(reason) => reason.clone(),
        other => other.to_string(),
    }
}
