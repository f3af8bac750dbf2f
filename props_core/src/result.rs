//! # Computation Results
//!
//! `ComputationResult` is a fixed-arity vector of computed properties tagged
//! with the kind that produced it. The only ways to obtain one are the
//! [`normalize`](crate::normalize) chokepoint and deserialization, and both
//! enforce that the vector length equals the kind's arity.
//!
//! `BenchmarkedResultSlot` pairs the latest result with the wall-clock
//! [`Timing`] of the attempt that produced it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::DispatchError;
use crate::kind::ComputationKind;

const NANOS_PER_SEC: u32 = 1_000_000_000;

// ============================================================================
// Timing
// ============================================================================

/// Elapsed wall-clock time of one successful invocation attempt.
///
/// Serializes as `{secs, nanos}`, the same shape a native host reports.
/// `nanos` is always below one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawTiming")]
pub struct Timing {
    secs: u64,
    nanos: u32,
}

#[derive(Deserialize)]
struct RawTiming {
    secs: u64,
    nanos: u32,
}

impl From<RawTiming> for Timing {
    fn from(raw: RawTiming) -> Self {
        Timing::new(raw.secs, raw.nanos)
    }
}

impl Timing {
    /// "No timed computation has completed yet"
    pub const ZERO: Timing = Timing { secs: 0, nanos: 0 };

    /// Create a timing, carrying whole seconds out of `nanos`.
    pub fn new(secs: u64, nanos: u32) -> Self {
        Timing {
            secs: secs.saturating_add(u64::from(nanos / NANOS_PER_SEC)),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    pub fn secs(&self) -> u64 {
        self.secs
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    pub fn is_zero(&self) -> bool {
        *self == Timing::ZERO
    }

    pub fn as_duration(&self) -> Duration {
        Duration::new(self.secs, self.nanos)
    }
}

impl From<Duration> for Timing {
    fn from(duration: Duration) -> Self {
        Timing::new(duration.as_secs(), duration.subsec_nanos())
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09} s", self.secs, self.nanos)
    }
}

// ============================================================================
// Computation result
// ============================================================================

/// Computed property values for one kind, in the kind's label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComputationResult")]
pub struct ComputationResult {
    kind: ComputationKind,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawComputationResult {
    kind: ComputationKind,
    values: Vec<f64>,
}

impl TryFrom<RawComputationResult> for ComputationResult {
    type Error = DispatchError;

    fn try_from(raw: RawComputationResult) -> Result<Self, Self::Error> {
        ComputationResult::checked(raw.kind, raw.values)
    }
}

impl ComputationResult {
    /// Construct after checking the arity invariant.
    pub(crate) fn checked(kind: ComputationKind, values: Vec<f64>) -> Result<Self, DispatchError> {
        if values.len() != kind.arity() {
            return Err(DispatchError::arity_mismatch(
                kind.command(),
                kind.arity(),
                values.len(),
            ));
        }
        Ok(ComputationResult { kind, values })
    }

    pub fn kind(&self) -> ComputationKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(label, value)` pairs in result order
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.kind
            .family()
            .labels()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

// ============================================================================
// Benchmarked result slot
// ============================================================================

/// The value/timing pair exposed to presentation.
///
/// Replaced wholesale on every successful computation, never mutated in
/// place. An empty slot (`value == None`) means nothing has been computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkedResultSlot {
    pub value: Option<ComputationResult>,
    pub timing: Timing,
}

impl BenchmarkedResultSlot {
    /// The slot a session starts with
    pub fn empty() -> Self {
        BenchmarkedResultSlot::default()
    }

    pub fn new(value: ComputationResult, timing: Timing) -> Self {
        BenchmarkedResultSlot {
            value: Some(value),
            timing,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Result values, or an empty slice when nothing has been computed
    pub fn values(&self) -> &[f64] {
        match &self.value {
            Some(result) => result.values(),
            None => &[],
        }
    }

    pub fn kind(&self) -> Option<ComputationKind> {
        self.value.as_ref().map(ComputationResult::kind)
    }
}
