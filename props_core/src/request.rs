//! # Computation Requests
//!
//! A `ComputationRequest` is the validated parameter set handed over by the
//! UI: a model number plus named float parameters. It is immutable once
//! built. Domain ranges (fibre content in `[0, 1]`, positive moduli, ...) are
//! the caller's business; this module only checks structural shape.
//!
//! ## Example
//!
//! ```rust
//! use props_core::kind::ComputationKind;
//! use props_core::request::ComputationRequest;
//!
//! let request = ComputationRequest::builder(1)
//!     .param("fibre_content", 0.2)
//!     .param("k_for_fiber", 100.0)
//!     .param("k_for_matrix", 1.0)
//!     .build()
//!     .unwrap();
//!
//! assert!(request
//!     .validate_for(ComputationKind::ThermalConductivityForUnidirectionalComposite)
//!     .is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;

/// Payload key carrying the model number
pub const MODEL_NUMBER_KEY: &str = "number_of_model";

/// Model number plus named parameters for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationRequest {
    model_number: u8,
    parameters: BTreeMap<String, f64>,
}

impl ComputationRequest {
    /// Create a request. Model numbers start at 1.
    pub fn new(model_number: u8, parameters: BTreeMap<String, f64>) -> DispatchResult<Self> {
        if model_number == 0 {
            return Err(DispatchError::invalid_input(
                MODEL_NUMBER_KEY,
                "0",
                "Model numbers start at 1",
            ));
        }
        Ok(ComputationRequest {
            model_number,
            parameters,
        })
    }

    /// Start building a request for the given model number
    pub fn builder(model_number: u8) -> RequestBuilder {
        RequestBuilder {
            model_number,
            parameters: BTreeMap::new(),
        }
    }

    pub fn model_number(&self) -> u8 {
        self.model_number
    }

    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }

    /// Look up a single parameter
    pub fn get(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    /// Check the request carries every parameter `kind` needs, each finite.
    ///
    /// Parameters the kind does not know about are allowed and forwarded.
    pub fn validate_for(&self, kind: ComputationKind) -> DispatchResult<()> {
        for name in kind.required_parameters() {
            if !self.parameters.contains_key(name) {
                return Err(DispatchError::missing_field(name));
            }
        }
        for (name, value) in &self.parameters {
            if !value.is_finite() {
                return Err(DispatchError::invalid_input(
                    name.as_str(),
                    value.to_string(),
                    "Parameter values must be finite numbers",
                ));
            }
        }
        Ok(())
    }

    /// Flat JSON object sent over both channels: the model number as an
    /// integer plus every parameter by name.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(MODEL_NUMBER_KEY.to_string(), Value::from(self.model_number));
        for (name, value) in &self.parameters {
            payload.insert(name.clone(), Value::from(*value));
        }
        payload
    }
}

/// Builder for [`ComputationRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    model_number: u8,
    parameters: BTreeMap<String, f64>,
}

impl RequestBuilder {
    /// Set a parameter, replacing any previous value under the same name
    pub fn param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn build(self) -> DispatchResult<ComputationRequest> {
        ComputationRequest::new(self.model_number, self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn honeycomb_request() -> ComputationRequest {
        ComputationRequest::builder(1)
            .param("l_cell_side_size", 9.24)
            .param("h_cell_side_size", 8.4619)
            .param("wall_thickness", 0.4)
            .param("angle", std::f64::consts::PI / 6.0)
            .param("alpha_for_honeycomb", 20e-5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_zero_model_rejected() {
        let err = ComputationRequest::new(0, BTreeMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_validate_complete_request() {
        let request = honeycomb_request();
        assert!(request.validate_for(ComputationKind::ThermalExpansionForHoneycomb).is_ok());
    }

    #[test]
    fn test_validate_missing_parameter() {
        let request = honeycomb_request();
        let err = request
            .validate_for(ComputationKind::ElasticModulesForHoneycomb)
            .unwrap_err();
        assert_eq!(err, DispatchError::missing_field("e_for_honeycomb"));
    }

    #[test]
    fn test_validate_non_finite() {
        let request = ComputationRequest::builder(1)
            .param("fibre_content", f64::NAN)
            .param("k_for_fiber", 100.0)
            .param("k_for_matrix", 1.0)
            .build()
            .unwrap();
        let err = request
            .validate_for(ComputationKind::ThermalConductivityForUnidirectionalComposite)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_extra_parameters_allowed() {
        let request = ComputationRequest::builder(2)
            .param("fibre_content", 0.2)
            .param("k_for_fiber", 100.0)
            .param("k_for_matrix", 1.0)
            .param("note", 7.0)
            .build()
            .unwrap();
        assert!(request
            .validate_for(ComputationKind::ThermalConductivityForUnidirectionalComposite)
            .is_ok());
        assert_eq!(request.to_payload().get("note"), Some(&Value::from(7.0)));
    }

    #[test]
    fn test_payload_shape() {
        let payload = honeycomb_request().to_payload();
        assert_eq!(payload.get(MODEL_NUMBER_KEY), Some(&Value::from(1u8)));
        assert_eq!(payload.get("wall_thickness"), Some(&Value::from(0.4)));
        assert_eq!(payload.len(), 6);
        assert!(payload[MODEL_NUMBER_KEY].is_u64());
    }
}
