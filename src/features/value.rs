//! Per-feature outcome: a scalar, or the reason it is unavailable.

use crate::error::{FeatureError, FeatureResult};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    EmptyGraph,
    /// Left out of a sampled computation
    NotSampled,
    NotComputed,
    NonConvergence(String),
    Degenerate(String),
    ScaleExcluded(String),
    Disabled(String),
    Missing(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::EmptyGraph => write!(f, "empty graph"),
            UnavailableReason::NotSampled => write!(f, "not in sample"),
            UnavailableReason::NotComputed => write!(f, "not computed"),
            UnavailableReason::NonConvergence(s)
            | UnavailableReason::Degenerate(s)
            | UnavailableReason::ScaleExcluded(s)
            | UnavailableReason::Disabled(s)
            | UnavailableReason::Missing(s) => write!(f, "{s}"),
        }
    }
}

impl From<FeatureError> for UnavailableReason {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::NonConvergence { .. } => {
                UnavailableReason::NonConvergence(err.to_string())
            }
            FeatureError::Degenerate(s) => UnavailableReason::Degenerate(s),
            FeatureError::ScaleExcluded(s) => UnavailableReason::ScaleExcluded(s.to_string()),
            FeatureError::Disabled(s) => UnavailableReason::Disabled(s.to_string()),
            FeatureError::Missing(s) => UnavailableReason::Missing(s.to_string()),
        }
    }
}

/// Serializes as a JSON number, or `null` when unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Float(f64),
    Int(i64),
    Unavailable(UnavailableReason),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, FeatureValue::Unavailable(_))
    }

    pub fn reason(&self) -> Option<&UnavailableReason> {
        match self {
            FeatureValue::Unavailable(r) => Some(r),
            _ => None,
        }
    }

    pub fn from_result<T: Into<FeatureValue>>(result: FeatureResult<T>) -> Self {
        match result {
            Ok(v) => v.into(),
            Err(e) => FeatureValue::Unavailable(e.into()),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            FeatureValue::Float(v)
        } else {
            let reason = UnavailableReason::Degenerate(format!("non-finite value {v}"));
            FeatureValue::Unavailable(reason)
        }
    }
}

impl From<usize> for FeatureValue {
    fn from(v: usize) -> Self {
        FeatureValue::Int(v as i64)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        FeatureValue::Int(v as i64)
    }
}

impl From<UnavailableReason> for FeatureValue {
    fn from(r: UnavailableReason) -> Self {
        FeatureValue::Unavailable(r)
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Float(v) => serializer.serialize_f64(*v),
            FeatureValue::Int(v) => serializer.serialize_i64(*v),
            FeatureValue::Unavailable(_) => serializer.serialize_none(),
        }
    }
}
