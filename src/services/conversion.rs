//! Weight unit handling.
//!
//! Every weight is stored in kilograms. Requests may arrive in either unit
//! system and are normalized here before they reach the store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kilograms per pound.
pub const KG_PER_LB: f64 = 0.453592;

/// Unit system chosen by a user or attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Parses a stored or submitted unit preference.
    ///
    /// Anything that is not exactly `metric` or `imperial` (including an
    /// empty value) resolves to `Metric`, the canonical storage unit.
    pub fn from_preference(value: &str) -> Self {
        match value.trim() {
            "imperial" => Self::Imperial,
            "metric" => Self::Metric,
            other => {
                if !other.is_empty() {
                    tracing::debug!("Unknown unit preference '{}', using metric", other);
                }
                Self::Metric
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Converts a weight expressed in `unit` to kilograms.
pub fn to_metric(weight: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => weight,
        UnitSystem::Imperial => lbs_to_kg(weight),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0} cannot be stored as a decimal weight")]
pub struct DecimalConversionError(pub f64);

/// Encodes a float as a decimal using its shortest round-trip text form,
/// so `45.3592_f64` becomes exactly `45.3592`.
pub fn to_decimal(value: f64) -> Result<Decimal, DecimalConversionError> {
    if !value.is_finite() {
        return Err(DecimalConversionError(value));
    }

    Decimal::from_str(&value.to_string()).map_err(|_| DecimalConversionError(value))
}
