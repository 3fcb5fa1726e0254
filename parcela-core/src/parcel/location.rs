//! Administrative location hierarchy: city → district.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a location node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Level in the administrative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationLevel {
    City,
    District,
}

impl LocationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::District => "district",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "city" => Some(Self::City),
            "district" => Some(Self::District),
            _ => None,
        }
    }
}

/// A node of the location hierarchy. Districts carry their parent city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: LocationId,
    pub name: String,
    pub level: LocationLevel,
    pub parent: Option<LocationId>,
}
