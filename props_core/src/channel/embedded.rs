//! # Embedded Bridge Channel
//!
//! Invokes a co-located native host through a request/response bridge. The
//! bridge itself is injected as a [`NativeBridge`]; the channel only knows
//! its contract:
//!
//! - `command` - the kind's command identifier
//! - `payload` - flat JSON object of named parameters
//! - response - any shape [`RawResponse`] accepts, or an error message
//!
//! A channel built without a bridge, or whose bridge reports itself absent,
//! is unavailable and never attempts I/O.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{Channel, ChannelRoute};
use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;
use crate::normalize::{normalize, RawResponse};
use crate::request::ComputationRequest;
use crate::result::ComputationResult;

/// Request/response bridge to a native computation host.
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Capability check. Must be cheap and must not call the host.
    fn is_present(&self) -> bool;

    /// Run `command` with `payload`; an `Err` carries the host's message.
    async fn invoke(&self, command: &str, payload: Map<String, Value>) -> Result<Value, String>;
}

/// Channel backed by an optional [`NativeBridge`].
#[derive(Clone, Default)]
pub struct EmbeddedBridgeChannel {
    bridge: Option<Arc<dyn NativeBridge>>,
}

impl EmbeddedBridgeChannel {
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        EmbeddedBridgeChannel { bridge: Some(bridge) }
    }

    /// A channel for hosts without any bridge
    pub fn absent() -> Self {
        EmbeddedBridgeChannel { bridge: None }
    }
}

#[async_trait]
impl Channel for EmbeddedBridgeChannel {
    fn route(&self) -> ChannelRoute {
        ChannelRoute::Embedded
    }

    fn is_available(&self) -> bool {
        self.bridge.as_ref().is_some_and(|bridge| bridge.is_present())
    }

    async fn attempt_invoke(
        &self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<ComputationResult> {
        let channel = self.route().name();
        let bridge = match &self.bridge {
            Some(bridge) if bridge.is_present() => bridge,
            _ => return Err(DispatchError::channel_unavailable(channel)),
        };

        let response = bridge
            .invoke(kind.command(), request.to_payload())
            .await
            .map_err(|reason| DispatchError::channel_invocation(channel, reason))?;

        let (values, host_timing) = RawResponse::from_json(channel, response)?.into_parts(channel, kind)?;
        if let Some(timing) = host_timing {
            debug!(%kind, %timing, "native host reported its own timing");
        }
        normalize(kind, values)
    }
}

// ============================================================================
// Process bridge
// ============================================================================

/// Bridge to a native host executable.
///
/// Each invocation runs `<program> [args...] <command>`, writes the payload
/// JSON to the child's stdin and parses its stdout as the response. A
/// non-zero exit status is an invocation error carrying the child's stderr.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBridge {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessBridge {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the command identifier
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl NativeBridge for ProcessBridge {
    fn is_present(&self) -> bool {
        self.program.is_file()
    }

    async fn invoke(&self, command: &str, payload: Map<String, Value>) -> Result<Value, String> {
        let input = serde_json::to_vec(&payload).map_err(|e| format!("Failed to encode payload: {}", e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to start '{}': {}", self.program.display(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A host that answers without reading its input closes the pipe early.
            if let Err(e) = stdin.write_all(&input).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(format!("Failed to write payload: {}", e));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("Failed to wait for native host: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("Native host exited with {}: {}", output.status, stderr.trim()));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| format!("Failed to parse host output: {}", e))
    }
}
