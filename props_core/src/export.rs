//! # Export Pipeline
//!
//! Turns the current slot into a downloadable spreadsheet:
//!
//! 1. Refuse empty slots (`ExportUnavailable`) without touching the encoder
//! 2. Copy the values into a fixed-length [`ExportBuffer`]
//! 3. Initialize the encoder on first use; reuse it afterwards
//! 4. Hand the buffer to the kind-specific download entry point
//!
//! The encoder is opaque here. The only contract is "accepts a float buffer
//! of known length, tagged with its kind, and produces a file".
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use props_core::export::ExportPipeline;
//! use props_core::result::BenchmarkedResultSlot;
//! use props_core::xlsx::XlsxEncoderLoader;
//!
//! # async fn run(slot: BenchmarkedResultSlot) -> props_core::DispatchResult<()> {
//! let pipeline = ExportPipeline::new(Arc::new(XlsxEncoderLoader::new("exports")));
//! let artifact = pipeline.export_result(&slot).await?;
//! println!("saved {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;
use crate::result::{BenchmarkedResultSlot, ComputationResult};

/// Fixed-length copy of a result, sized by the kind's arity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportBuffer {
    /// Thermal expansion / thermal conductivity
    Triple([f64; 3]),
    /// Elastic moduli
    Nonuple([f64; 9]),
}

impl ExportBuffer {
    pub fn from_result(result: &ComputationResult) -> DispatchResult<Self> {
        let values = result.values();
        let mismatch = || DispatchError::arity_mismatch(result.kind().command(), result.kind().arity(), values.len());
        match result.kind().arity() {
            3 => values.try_into().map(ExportBuffer::Triple).map_err(|_| mismatch()),
            9 => values.try_into().map(ExportBuffer::Nonuple).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            ExportBuffer::Triple(values) => values,
            ExportBuffer::Nonuple(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// What a download produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub kind: ComputationKind,
    pub path: PathBuf,
    pub exported_at: DateTime<Utc>,
}

/// A ready-to-use spreadsheet encoder.
pub trait SpreadsheetEncoder: Send + Sync {
    /// Kind-specific download entry point.
    fn download(&self, kind: ComputationKind, buffer: &ExportBuffer) -> DispatchResult<ExportArtifact>;
}

/// One-time asynchronous encoder initialization.
#[async_trait]
pub trait EncoderLoader: Send + Sync {
    /// Failures should be reported as `EncoderInit`.
    async fn load(&self) -> DispatchResult<Arc<dyn SpreadsheetEncoder>>;
}

/// Lazily-initialized encoder plus the export steps around it.
pub struct ExportPipeline {
    loader: Arc<dyn EncoderLoader>,
    encoder: OnceCell<Arc<dyn SpreadsheetEncoder>>,
}

impl ExportPipeline {
    pub fn new(loader: Arc<dyn EncoderLoader>) -> Self {
        ExportPipeline {
            loader,
            encoder: OnceCell::new(),
        }
    }

    /// Whether the encoder has been initialized
    pub fn is_warm(&self) -> bool {
        self.encoder.initialized()
    }

    /// Initialize the encoder if needed. A failed attempt is not cached, so
    /// the next call tries again.
    pub async fn ensure_initialized(&self) -> DispatchResult<&Arc<dyn SpreadsheetEncoder>> {
        if !self.is_warm() {
            debug!("initializing spreadsheet encoder");
        }
        self.encoder.get_or_try_init(|| self.loader.load()).await
    }

    /// Export the slot's result.
    pub async fn export_result(&self, slot: &BenchmarkedResultSlot) -> DispatchResult<ExportArtifact> {
        let result = slot.value.as_ref().ok_or(DispatchError::ExportUnavailable)?;
        let buffer = ExportBuffer::from_result(result)?;

        let encoder = self.ensure_initialized().await?;
        let artifact = encoder.download(result.kind(), &buffer)?;
        info!(kind = %artifact.kind, path = %artifact.path.display(), "result exported");
        Ok(artifact)
    }
}
