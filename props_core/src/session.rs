//! # Compute Session
//!
//! Owner of the Benchmarked Result Slot for one UI surface. The session is
//! the only writer of its slot: a successful computation replaces it
//! wholesale, a failed one leaves it exactly as it was.
//!
//! `compute` takes `&mut self`, so a session can have at most one
//! computation in flight.
//!
//! ## Example
//!
//! ```rust,no_run
//! use props_core::config::DispatchConfig;
//! use props_core::dispatcher::Dispatcher;
//! use props_core::kind::ComputationKind;
//! use props_core::request::ComputationRequest;
//! use props_core::session::ComputeSession;
//!
//! # async fn run() -> props_core::DispatchResult<()> {
//! let dispatcher = Dispatcher::from_config(&DispatchConfig::default())?;
//! let mut session = ComputeSession::new(dispatcher);
//!
//! let request = ComputationRequest::builder(2)
//!     .param("fibre_content", 0.2)
//!     .param("k_for_fiber", 100.0)
//!     .param("k_for_matrix", 1.0)
//!     .build()?;
//!
//! if session.compute(ComputationKind::ThermalConductivityForUnidirectionalComposite, &request).await {
//!     println!("{:?} in {}", session.slot().values(), session.slot().timing);
//! }
//! # Ok(())
//! # }
//! ```

use tracing::warn;

use crate::dispatcher::Dispatcher;
use crate::errors::DispatchResult;
use crate::kind::ComputationKind;
use crate::request::ComputationRequest;
use crate::result::BenchmarkedResultSlot;

/// A dispatcher plus the slot it feeds.
pub struct ComputeSession {
    dispatcher: Dispatcher,
    slot: BenchmarkedResultSlot,
}

impl ComputeSession {
    /// Start a session with an empty slot
    pub fn new(dispatcher: Dispatcher) -> Self {
        ComputeSession {
            dispatcher,
            slot: BenchmarkedResultSlot::empty(),
        }
    }

    /// Current slot contents
    pub fn slot(&self) -> &BenchmarkedResultSlot {
        &self.slot
    }

    /// Swap the dispatcher (e.g. after a configuration reload). The slot
    /// is kept.
    pub fn replace_dispatcher(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = dispatcher;
    }

    /// Run a computation and report whether it succeeded.
    ///
    /// The failure reason is logged, not returned; use
    /// [`ComputeSession::compute_detailed`] for the error itself.
    pub async fn compute(&mut self, kind: ComputationKind, request: &ComputationRequest) -> bool {
        match self.compute_detailed(kind, request).await {
            Ok(_) => true,
            Err(e) => {
                warn!(%kind, code = e.error_code(), error = %e, "computation failed, keeping previous result");
                false
            }
        }
    }

    /// Run a computation, returning the new slot or the failure.
    pub async fn compute_detailed(
        &mut self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<&BenchmarkedResultSlot> {
        self.slot = self.dispatcher.compute(kind, request).await?;
        Ok(&self.slot)
    }
}
