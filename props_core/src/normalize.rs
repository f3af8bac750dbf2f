//! # Result Normalizer
//!
//! The single chokepoint where untrusted channel output becomes a
//! [`ComputationResult`]. Pure: no state, no I/O.
//!
//! Native hosts do not agree on a response shape. Some return the bare value
//! array, some a `(values, duration)` pair, some a slot-shaped object.
//! [`RawResponse`] accepts all three:
//!
//! ```text
//! [a1, a2, a3]
//! [[a1, a2, a3], {"secs": 0, "nanos": 1200}]
//! {"value": [a1, a2, a3], "timing": {"secs": 0, "nanos": 1200}}
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;
use crate::result::{ComputationResult, Timing};

/// Response shapes accepted from a native host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawResponse {
    Values(Vec<f64>),
    Pair(Vec<f64>, Timing),
    Slot { value: Vec<f64>, timing: Timing },
    TaggedSlot { value: TaggedValues, timing: Timing },
}

/// Kind-tagged values, as serialized by [`ComputationResult`]. Arity is
/// checked later by [`normalize`], so a short array here is reported as
/// `ArityMismatch` rather than as an unrecognized shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaggedValues {
    pub kind: ComputationKind,
    pub values: Vec<f64>,
}

impl RawResponse {
    /// Decode a JSON response. `channel` names the source for diagnostics.
    pub fn from_json(channel: &str, value: Value) -> DispatchResult<Self> {
        serde_json::from_value(value).map_err(|_| {
            DispatchError::malformed_response(
                channel,
                "expected a number array, a [values, timing] pair or a {value, timing} slot",
            )
        })
    }

    /// Split into the raw values and the host-reported timing, if any.
    ///
    /// A kind-tagged response must be tagged with `kind`; anything else is
    /// `MalformedResponse`.
    pub fn into_parts(self, channel: &str, kind: ComputationKind) -> DispatchResult<(Vec<f64>, Option<Timing>)> {
        match self {
            RawResponse::Values(values) => Ok((values, None)),
            RawResponse::Pair(values, timing) | RawResponse::Slot { value: values, timing } => {
                Ok((values, Some(timing)))
            }
            RawResponse::TaggedSlot { value, timing } => {
                if value.kind != kind {
                    return Err(DispatchError::malformed_response(
                        channel,
                        format!("result is tagged {} but {} was requested", value.kind, kind),
                    ));
                }
                Ok((value.values, Some(timing)))
            }
        }
    }
}

/// Shape raw values into a result for `kind`.
///
/// Fails with `ArityMismatch` when `raw.len()` differs from the kind's arity.
pub fn normalize(kind: ComputationKind, raw: Vec<f64>) -> DispatchResult<ComputationResult> {
    ComputationResult::checked(kind, raw)
}
