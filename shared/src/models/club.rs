//! Closed value sets carried by member rows
//!
//! Each enum serializes to the capitalized string the backend schema stores
//! ("Phi Kappa Alpha", "Freshman", "Single"). Lower-case spellings written by
//! older app builds are accepted on read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unrecognised enum string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// Club
// ============================================================================

/// Social club a member belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Club {
    #[serde(rename = "Phi Kappa Alpha", alias = "phi kappa alpha")]
    PhiKappaAlpha,
    #[serde(rename = "Omega Chi", alias = "omega chi")]
    OmegaChi,
    /// Default club for new registrations
    #[default]
    #[serde(rename = "Chi Beta Chi", alias = "chi beta chi")]
    ChiBetaChi,
    #[serde(rename = "Sigma Rho", alias = "sigma rho")]
    SigmaRho,
    #[serde(rename = "Xi Chi Delta", alias = "xi chi delta")]
    XiChiDelta,
}

impl Club {
    pub const ALL: [Club; 5] = [
        Club::PhiKappaAlpha,
        Club::OmegaChi,
        Club::ChiBetaChi,
        Club::SigmaRho,
        Club::XiChiDelta,
    ];

    /// Wire string stored in the `club` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Club::PhiKappaAlpha => "Phi Kappa Alpha",
            Club::OmegaChi => "Omega Chi",
            Club::ChiBetaChi => "Chi Beta Chi",
            Club::SigmaRho => "Sigma Rho",
            Club::XiChiDelta => "Xi Chi Delta",
        }
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Club {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Club::ALL
            .into_iter()
            .find(|club| club.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "club",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Classification {
    #[default]
    #[serde(alias = "freshman")]
    Freshman,
    #[serde(alias = "sophomore")]
    Sophomore,
    #[serde(alias = "junior")]
    Junior,
    #[serde(alias = "senior")]
    Senior,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Freshman,
        Classification::Sophomore,
        Classification::Junior,
        Classification::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Freshman => "Freshman",
            Classification::Sophomore => "Sophomore",
            Classification::Junior => "Junior",
            Classification::Senior => "Senior",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "classification",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Relationship Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RelationshipStatus {
    #[default]
    #[serde(alias = "single")]
    Single,
    #[serde(alias = "taken")]
    Taken,
    #[serde(alias = "complicated")]
    Complicated,
}

impl RelationshipStatus {
    pub const ALL: [RelationshipStatus; 3] = [
        RelationshipStatus::Single,
        RelationshipStatus::Taken,
        RelationshipStatus::Complicated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Single => "Single",
            RelationshipStatus::Taken => "Taken",
            RelationshipStatus::Complicated => "Complicated",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipStatus::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "relationship status",
                value: s.to_string(),
            })
    }
}
