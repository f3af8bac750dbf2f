//! # props_core - Material Properties Compute Dispatcher
//!
//! `props_core` obtains derived material properties (elastic moduli, thermal
//! expansion and conductivity coefficients) from an analytical model whether
//! or not a native computation host is installed next to the application.
//!
//! ## Design Philosophy
//!
//! - **Two channels, one contract**: an embedded native bridge and a remote
//!   HTTP endpoint behind the same [`channel::Channel`] trait
//! - **Strict fallback**: remote is used when the bridge is absent, not to
//!   mask an error reported by a present bridge
//! - **One chokepoint**: every channel response passes the
//!   [`normalize`](normalize::normalize) arity check
//! - **Replace, never patch**: a result slot is swapped wholesale on success
//!   and left untouched on failure
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use props_core::{ComputationKind, ComputationRequest, ComputeSession, DispatchConfig, Dispatcher};
//!
//! # async fn run() -> props_core::DispatchResult<()> {
//! let dispatcher = Dispatcher::from_config(&DispatchConfig::default())?;
//! let mut session = ComputeSession::new(dispatcher);
//!
//! let request = ComputationRequest::builder(1)
//!     .param("l_cell_side_size", 9.24)
//!     .param("h_cell_side_size", 8.4619)
//!     .param("wall_thickness", 0.4)
//!     .param("angle", std::f64::consts::PI / 6.0)
//!     .param("alpha_for_honeycomb", 20e-5)
//!     .build()?;
//!
//! session.compute(ComputationKind::ThermalExpansionForHoneycomb, &request).await;
//! println!("{}", serde_json::to_string_pretty(session.slot()).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`kind`] - Computation kinds, arities and parameter names
//! - [`request`] - Parameter sets and structural validation
//! - [`result`] - Results, timings and the benchmarked result slot
//! - [`normalize`] - Response-shape decoding and the arity check
//! - [`channel`] - Embedded bridge and remote network channels
//! - [`dispatcher`] - Channel selection, fallback and timing
//! - [`session`] - Slot ownership for one UI surface
//! - [`export`] / [`xlsx`] - Lazily-initialized spreadsheet export
//! - [`config`] - TOML configuration
//! - [`errors`] - Structured error types

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod export;
pub mod kind;
pub mod normalize;
pub mod request;
pub mod result;
pub mod session;
pub mod xlsx;

// Re-export commonly used types at crate root for convenience
pub use config::{load_config, DispatchConfig, FallbackPolicy};
pub use dispatcher::Dispatcher;
pub use errors::{DispatchError, DispatchResult};
pub use export::{ExportArtifact, ExportPipeline};
pub use kind::ComputationKind;
pub use request::ComputationRequest;
pub use result::{BenchmarkedResultSlot, ComputationResult, Timing};
pub use session::ComputeSession;
