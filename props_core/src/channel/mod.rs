//! # Invocation Channels
//!
//! A channel is a transport-specific strategy for performing one computation.
//! Every channel exposes the same two operations:
//!
//! - [`Channel::is_available`] - a cheap capability check, never an I/O call
//! - [`Channel::attempt_invoke`] - one attempt, no internal retries
//!
//! Retry and fallback belong to the [`Dispatcher`](crate::dispatcher::Dispatcher).
//!
//! ## Available Channels
//!
//! - [`embedded`] - request/response bridge to a co-located native host
//! - [`remote`] - HTTP(S) computation endpoint

pub mod embedded;
pub mod remote;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DispatchResult;
use crate::kind::ComputationKind;
use crate::request::ComputationRequest;
use crate::result::ComputationResult;

pub use embedded::{EmbeddedBridgeChannel, NativeBridge, ProcessBridge};
pub use remote::RemoteNetworkChannel;

/// Which transport a channel uses. Decides the timing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRoute {
    Embedded,
    Remote,
}

impl ChannelRoute {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelRoute::Embedded => "embedded",
            ChannelRoute::Remote => "remote",
        }
    }
}

impl fmt::Display for ChannelRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform contract over the concrete transports.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Transport this channel uses
    fn route(&self) -> ChannelRoute;

    /// Whether the transport exists in the current host.
    ///
    /// Must not perform I/O.
    fn is_available(&self) -> bool;

    /// Perform one invocation and return a normalized result.
    ///
    /// Fails with `ChannelUnavailable`, `ChannelInvocation`,
    /// `MalformedResponse` or `ArityMismatch`.
    async fn attempt_invoke(
        &self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<ComputationResult>;
}
