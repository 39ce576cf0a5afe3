//! Dashboard variants, each with its own stage table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::facility::FacilityKind;

/// Which dashboard a progress bar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardVariant {
    /// Operator navbar, tied to the user account.
    Operator,
    /// Commercial facility detail view.
    CommercialFacility,
    /// Residential facility detail view.
    ResidentialFacility,
}

impl DashboardVariant {
    pub const ALL: [DashboardVariant; 3] = [
        DashboardVariant::Operator,
        DashboardVariant::CommercialFacility,
        DashboardVariant::ResidentialFacility,
    ];

    /// Number of stages in this variant's table.
    pub fn stage_count(self) -> u32 {
        match self {
            DashboardVariant::Operator => 4,
            DashboardVariant::CommercialFacility => 6,
            DashboardVariant::ResidentialFacility => 6,
        }
    }

    /// Facility kind for facility views, `None` for the operator navbar.
    pub fn facility_kind(self) -> Option<FacilityKind> {
        match self {
            DashboardVariant::Operator => None,
            DashboardVariant::CommercialFacility => Some(FacilityKind::Commercial),
            DashboardVariant::ResidentialFacility => Some(FacilityKind::Residential),
        }
    }
}

impl fmt::Display for DashboardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardVariant::Operator => write!(f, "operator"),
            DashboardVariant::CommercialFacility => write!(f, "commercial"),
            DashboardVariant::ResidentialFacility => write!(f, "residential"),
        }
    }
}

/// Unknown dashboard variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dashboard variant: {0}")]
pub struct ParseVariantError(pub String);

impl FromStr for DashboardVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operator" => Ok(DashboardVariant::Operator),
            "commercial" | "commercial-facility" => Ok(DashboardVariant::CommercialFacility),
            "residential" | "residential-facility" => Ok(DashboardVariant::ResidentialFacility),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}
