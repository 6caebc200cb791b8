#![cfg_attr(docsrs, feature(doc_cfg))]
//! Unit systems, the UDDF measurement taxonomy, and tree conversion.
//!
//! UDDF stores every physical quantity in SI base units. This crate decides
//! which fields are measurements and rewrites their values for the requested
//! [`UnitSystem`].
//!
//! ```rust
//! use uddf_units::{convert_leaf, UnitSystem};
//! use uddf_xml::Node;
//!
//! let celsius = convert_leaf("temperature", &Node::text("293.15"), UnitSystem::Metric);
//! assert!((celsius.as_f64().unwrap() - 20.0).abs() < 1e-9);
//! ```

pub mod convert;
pub mod taxonomy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use convert::{coerce, convert_field, convert_leaf, convert_tree, round_half_up, round_to};
pub use taxonomy::{category_for, format_measurement, Category, Quantity, CATEGORIES};

/// Errors produced while interpreting unit-related input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The label does not name one of `si`, `metric`, or `imperial`.
    #[error("unknown unit system: {0}")]
    UnknownUnitSystem(String),
}

/// Target unit system for converted measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// UDDF base units, values only coerced to numbers.
    #[default]
    Si,
    /// Celsius, liters, bar; lengths and masses stay in SI.
    Metric,
    /// Fahrenheit, cubic feet, psi, feet, minutes, pounds.
    Imperial,
}

impl UnitSystem {
    /// All unit systems in declaration order.
    pub const ALL: [UnitSystem; 3] = [UnitSystem::Si, UnitSystem::Metric, UnitSystem::Imperial];

    /// Lower-case label used on the wire and in CLI flags.
    pub const fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Si => "si",
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" => Ok(UnitSystem::Si),
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(UnitError::UnknownUnitSystem(s.to_string())),
        }
    }
}
