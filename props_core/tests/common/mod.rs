//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use props_core::channel::{Channel, ChannelRoute};
use props_core::normalize::normalize;
use props_core::{ComputationKind, ComputationRequest, ComputationResult, DispatchError, DispatchResult};

/// Channel with a scripted availability and answer.
pub struct FakeChannel {
    route: ChannelRoute,
    available: bool,
    answer: DispatchResult<Vec<f64>>,
    delay: Duration,
    calls: AtomicUsize,
    windows: Mutex<Vec<Duration>>,
}

impl FakeChannel {
    pub fn new(route: ChannelRoute, available: bool, answer: DispatchResult<Vec<f64>>) -> Arc<Self> {
        Arc::new(FakeChannel {
            route,
            available,
            answer,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
        })
    }

    pub fn absent(route: ChannelRoute) -> Arc<Self> {
        FakeChannel::new(route, false, Err(DispatchError::channel_unavailable(route.name())))
    }

    pub fn answering(route: ChannelRoute, values: Vec<f64>) -> Arc<Self> {
        FakeChannel::new(route, true, Ok(values))
    }

    pub fn failing(route: ChannelRoute, reason: &str) -> Arc<Self> {
        FakeChannel::new(route, true, Err(DispatchError::channel_invocation(route.name(), reason)))
    }

    /// Same as [`FakeChannel::answering`], but each call takes at least `delay`
    pub fn slow(route: ChannelRoute, values: Vec<f64>, delay: Duration) -> Arc<Self> {
        Arc::new(FakeChannel {
            route,
            available: true,
            answer: Ok(values),
            delay,
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Measured duration of every call so far
    pub fn windows(&self) -> Vec<Duration> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn route(&self) -> ChannelRoute {
        self.route
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn attempt_invoke(
        &self,
        kind: ComputationKind,
        _request: &ComputationRequest,
    ) -> DispatchResult<ComputationResult> {
        let started = Instant::now();
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let outcome = self.answer.clone().and_then(|values| normalize(kind, values));
        self.windows.lock().unwrap().push(started.elapsed());
        outcome
    }
}

/// A structurally complete request for `kind`
pub fn request_for(kind: ComputationKind) -> ComputationRequest {
    kind.required_parameters()
        .into_iter()
        .fold(ComputationRequest::builder(1), |builder, name| builder.param(name, 0.25))
        .build()
        .unwrap()
}

/// `arity` distinct values
pub fn values(arity: usize) -> Vec<f64> {
    (0..arity).map(|i| 0.1 * (i + 1) as f64).collect()
}
