//! # Dispatcher
//!
//! Chooses a channel, runs exactly one attempt on it (or two, when falling
//! back), and wraps the normalized result into a [`BenchmarkedResultSlot`].
//!
//! ## Routing
//!
//! ```text
//! validate request
//!   └─ embedded available? ── yes ─> embedded attempt ─ ok ──> slot (timing = ZERO)
//!        │                                  └─ error ─> report (or remote, per policy)
//!        └─ no ──> remote attempt (timed) ─ ok ──> slot (timing = elapsed)
//!                                └─ error ─> report
//! ```
//!
//! Attempts never run concurrently: the embedded attempt, if any, completes
//! before the remote one starts.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelRoute, EmbeddedBridgeChannel, ProcessBridge, RemoteNetworkChannel};
use crate::config::{DispatchConfig, FallbackPolicy};
use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;
use crate::request::ComputationRequest;
use crate::result::{BenchmarkedResultSlot, Timing};

/// Orchestrates channel selection and fallback.
#[derive(Clone)]
pub struct Dispatcher {
    embedded: Arc<dyn Channel>,
    remote: Arc<dyn Channel>,
    policy: FallbackPolicy,
}

impl Dispatcher {
    /// Create a dispatcher over the two channels, using the default policy.
    pub fn new(embedded: Arc<dyn Channel>, remote: Arc<dyn Channel>) -> Self {
        Dispatcher {
            embedded,
            remote,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the concrete channels described by `config`.
    pub fn from_config(config: &DispatchConfig) -> DispatchResult<Self> {
        let embedded = match &config.bridge.program {
            Some(program) => {
                let bridge = ProcessBridge::new(program).with_args(config.bridge.args.iter().cloned());
                EmbeddedBridgeChannel::new(Arc::new(bridge))
            }
            None => EmbeddedBridgeChannel::absent(),
        };
        let remote = RemoteNetworkChannel::new(config.remote.base_url.as_str(), config.remote.timeout())?;

        Ok(Dispatcher::new(Arc::new(embedded), Arc::new(remote)).with_policy(config.fallback))
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Run one computation.
    ///
    /// On success the returned slot holds a result of exactly
    /// `kind.arity()` values. Embedded results carry [`Timing::ZERO`];
    /// remote results carry the measured wall-clock time of the attempt.
    pub async fn compute(
        &self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<BenchmarkedResultSlot> {
        request.validate_for(kind)?;

        if self.embedded.is_available() {
            match self.embedded.attempt_invoke(kind, request).await {
                Ok(result) => {
                    info!(%kind, route = %ChannelRoute::Embedded, "computation succeeded");
                    return Ok(BenchmarkedResultSlot::new(result, Timing::ZERO));
                }
                Err(e) if e.is_routing_signal() => {
                    debug!(%kind, "embedded bridge disappeared before invocation, using remote");
                }
                Err(e) if self.policy == FallbackPolicy::AnyEmbeddedFailure => {
                    warn!(%kind, error = %e, "embedded attempt failed, falling back to remote");
                }
                Err(e) => {
                    warn!(%kind, error = %e, "embedded attempt failed");
                    return Err(e);
                }
            }
        } else {
            debug!(%kind, "embedded bridge unavailable, using remote");
        }

        self.compute_remote(kind, request).await
    }

    async fn compute_remote(
        &self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<BenchmarkedResultSlot> {
        if !self.remote.is_available() {
            warn!(%kind, "no channel available");
            return Err(no_channel_available());
        }

        let started = Instant::now();
        let outcome = self.remote.attempt_invoke(kind, request).await;
        let timing = Timing::from(started.elapsed());

        match outcome {
            Ok(result) => {
                info!(%kind, route = %ChannelRoute::Remote, %timing, "computation succeeded");
                Ok(BenchmarkedResultSlot::new(result, timing))
            }
            Err(e) if e.is_routing_signal() => {
                warn!(%kind, "remote channel vanished before invocation");
                Err(no_channel_available())
            }
            Err(e) => {
                warn!(%kind, error = %e, %timing, "remote attempt failed");
                Err(e)
            }
        }
    }
}

/// Neither channel could be used. Reported as a failure, since
/// `ChannelUnavailable` never leaves the dispatcher.
fn no_channel_available() -> DispatchError {
    DispatchError::channel_invocation(ChannelRoute::Remote.name(), "no channel available")
}
