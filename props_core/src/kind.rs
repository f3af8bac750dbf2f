//! # Computation Kinds
//!
//! Each analytical model category the dispatcher can route. A kind fixes
//! everything that does not depend on the channel used:
//!
//! - the command identifier (bridge command name and remote path segment)
//! - the result family, and with it the result arity
//! - the parameter names a request must carry
//! - the column labels the export encoder writes
//!
//! ## Example
//!
//! ```rust
//! use props_core::kind::ComputationKind;
//!
//! let kind: ComputationKind = "elastic-modules-for-honeycomb".parse().unwrap();
//! assert_eq!(kind.arity(), 9);
//! assert_eq!(kind.command(), "elastic_modules_for_honeycomb");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DispatchError;

/// Analytical model category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationKind {
    ThermalExpansionForHoneycomb,
    ElasticModulesForHoneycomb,
    ThermalExpansionForUnidirectionalComposite,
    ElasticModulesForUnidirectionalComposite,
    ThermalConductivityForUnidirectionalComposite,
}

/// The physical quantity a kind computes. Determines arity and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultFamily {
    ThermalExpansion,
    ThermalConductivity,
    ElasticModuli,
}

impl ResultFamily {
    /// Number of values a result of this family contains
    pub fn arity(&self) -> usize {
        self.labels().len()
    }

    /// Column labels, in result order
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            ResultFamily::ThermalExpansion => &["alpha1", "alpha2", "alpha3"],
            ResultFamily::ThermalConductivity => &["k1", "k2", "k3"],
            ResultFamily::ElasticModuli => &[
                "E1", "E2", "E3", "nu12", "nu13", "nu23", "G12", "G13", "G23",
            ],
        }
    }

    /// Human-readable family name
    pub fn display_name(&self) -> &'static str {
        match self {
            ResultFamily::ThermalExpansion => "Thermal expansion",
            ResultFamily::ThermalConductivity => "Thermal conductivity",
            ResultFamily::ElasticModuli => "Elastic moduli",
        }
    }
}

const HONEYCOMB_GEOMETRY: [&str; 4] = ["l_cell_side_size", "h_cell_side_size", "wall_thickness", "angle"];

impl ComputationKind {
    /// Every kind, in a stable order
    pub const ALL: [ComputationKind; 5] = [
        ComputationKind::ThermalExpansionForHoneycomb,
        ComputationKind::ElasticModulesForHoneycomb,
        ComputationKind::ThermalExpansionForUnidirectionalComposite,
        ComputationKind::ElasticModulesForUnidirectionalComposite,
        ComputationKind::ThermalConductivityForUnidirectionalComposite,
    ];

    /// Command identifier shared by the bridge and the remote path
    pub fn command(&self) -> &'static str {
        match self {
            ComputationKind::ThermalExpansionForHoneycomb => "thermal_expansion_for_honeycomb",
            ComputationKind::ElasticModulesForHoneycomb => "elastic_modules_for_honeycomb",
            ComputationKind::ThermalExpansionForUnidirectionalComposite => {
                "thermal_expansion_for_unidirectional_composite"
            }
            ComputationKind::ElasticModulesForUnidirectionalComposite => {
                "elastic_modules_for_unidirectional_composite"
            }
            ComputationKind::ThermalConductivityForUnidirectionalComposite => {
                "thermal_conductivity_for_unidirectional_composite"
            }
        }
    }

    pub fn family(&self) -> ResultFamily {
        match self {
            ComputationKind::ThermalExpansionForHoneycomb
            | ComputationKind::ThermalExpansionForUnidirectionalComposite => ResultFamily::ThermalExpansion,
            ComputationKind::ElasticModulesForHoneycomb
            | ComputationKind::ElasticModulesForUnidirectionalComposite => ResultFamily::ElasticModuli,
            ComputationKind::ThermalConductivityForUnidirectionalComposite => {
                ResultFamily::ThermalConductivity
            }
        }
    }

    /// Expected number of result values
    pub fn arity(&self) -> usize {
        self.family().arity()
    }

    /// Parameter names a request for this kind must carry (besides the
    /// model number).
    pub fn required_parameters(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        match self {
            ComputationKind::ThermalExpansionForHoneycomb => {
                names.extend(HONEYCOMB_GEOMETRY);
                names.push("alpha_for_honeycomb");
            }
            ComputationKind::ElasticModulesForHoneycomb => {
                names.extend(HONEYCOMB_GEOMETRY);
                names.extend(["e_for_honeycomb", "nu_for_honeycomb"]);
            }
            ComputationKind::ThermalExpansionForUnidirectionalComposite => {
                names.extend([
                    "fibre_content",
                    "e_for_fiber",
                    "nu_for_fiber",
                    "alpha_for_fiber",
                    "e_for_matrix",
                    "nu_for_matrix",
                    "alpha_for_matrix",
                ]);
            }
            ComputationKind::ElasticModulesForUnidirectionalComposite => {
                names.extend([
                    "fibre_content",
                    "e_for_fiber",
                    "nu_for_fiber",
                    "e_for_matrix",
                    "nu_for_matrix",
                ]);
            }
            ComputationKind::ThermalConductivityForUnidirectionalComposite => {
                names.extend(["fibre_content", "k_for_fiber", "k_for_matrix"]);
            }
        }
        names
    }

    /// File name the export encoder writes for this kind
    pub fn export_file_name(&self) -> String {
        format!("{}.xlsx", self.command())
    }
}

impl fmt::Display for ComputationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for ComputationKind {
    type Err = DispatchError;

    /// Accepts the command identifier in snake_case or kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_lowercase();
        ComputationKind::ALL
            .into_iter()
            .find(|kind| kind.command() == normalized)
            .ok_or_else(|| DispatchError::invalid_input("kind", s, "Unknown computation kind"))
    }
}
