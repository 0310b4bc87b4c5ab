//! Result status vocabulary for lab observations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Observation result status.
///
/// Mirrors the FHIR observation status value set. Only `Final` is a
/// terminal state; every other status counts as pending under the
/// status-based policy. Unrecognized strings parse to `Unknown` rather
/// than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
}

impl ObservationStatus {
    /// Canonical lowercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationStatus::Registered => "registered",
            ObservationStatus::Preliminary => "preliminary",
            ObservationStatus::Final => "final",
            ObservationStatus::Amended => "amended",
            ObservationStatus::Corrected => "corrected",
            ObservationStatus::Cancelled => "cancelled",
            ObservationStatus::EnteredInError => "entered-in-error",
            ObservationStatus::Unknown => "unknown",
        }
    }

    /// True when the result has reached its terminal state.
    pub fn is_final(&self) -> bool {
        matches!(self, ObservationStatus::Final)
    }
}

impl FromStr for ObservationStatus {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let status = match value.trim().to_ascii_lowercase().as_str() {
            "registered" => ObservationStatus::Registered,
            "preliminary" => ObservationStatus::Preliminary,
            "final" => ObservationStatus::Final,
            "amended" => ObservationStatus::Amended,
            "corrected" => ObservationStatus::Corrected,
            "cancelled" => ObservationStatus::Cancelled,
            "entered-in-error" => ObservationStatus::EnteredInError,
            _ => ObservationStatus::Unknown,
        };
        Ok(status)
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "FINAL".parse::<ObservationStatus>().unwrap(),
            ObservationStatus::Final
        );
        assert_eq!(
            "  Preliminary ".parse::<ObservationStatus>().unwrap(),
            ObservationStatus::Preliminary
        );
    }

    #[test]
    fn unrecognized_strings_become_unknown() {
        assert_eq!(
            "draft".parse::<ObservationStatus>().unwrap(),
            ObservationStatus::Unknown
        );
        assert!(!"draft".parse::<ObservationStatus>().unwrap().is_final());
    }

    #[test]
    fn only_final_is_terminal() {
        assert!(ObservationStatus::Final.is_final());
        assert!(!ObservationStatus::Amended.is_final());
        assert!(!ObservationStatus::Registered.is_final());
    }
}
