//! Facility records and the resource context handed to stage predicates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::ids::FacilityId;

/// Kind of facility a view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    #[default]
    Commercial,
    Residential,
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityKind::Commercial => write!(f, "commercial"),
            FacilityKind::Residential => write!(f, "residential"),
        }
    }
}

/// A facility object as returned by the backend.
///
/// The backend schema is wide and changes often, so fields are looked up by
/// their camelCase name rather than mapped onto a fixed struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityRecord(Map<String, Value>);

impl FacilityRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from any JSON value; non-objects yield an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a field, if it is a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn id(&self) -> Option<FacilityId> {
        match self.0.get("id")? {
            Value::String(s) => Some(FacilityId::new(s.clone())),
            Value::Number(n) => Some(FacilityId::new(n.to_string())),
            _ => None,
        }
    }

    /// The facility's verification `status`.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for FacilityRecord {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

/// Resources a facility-level view already has in memory.
///
/// Operator views leave everything empty. Facility views set either the
/// loaded record (purely-local checks then need no fetch) or just its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceContext {
    pub facility: Option<FacilityRecord>,
    pub facility_id: Option<FacilityId>,
    pub facility_kind: FacilityKind,
}

impl ResourceContext {
    /// Context for views that are not tied to a facility.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_facility(kind: FacilityKind, facility: FacilityRecord) -> Self {
        let facility_id = facility.id();
        Self {
            facility: Some(facility),
            facility_id,
            facility_kind: kind,
        }
    }

    pub fn with_facility_id(kind: FacilityKind, facility_id: impl Into<FacilityId>) -> Self {
        Self {
            facility: None,
            facility_id: Some(facility_id.into()),
            facility_kind: kind,
        }
    }
}
