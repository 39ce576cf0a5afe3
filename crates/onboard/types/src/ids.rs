//! Strongly-typed identifiers for onboarding entities
//!
//! User and facility ids are opaque strings issued by the backend. Stage ids
//! are small 1-based integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a dashboard user account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifier of a commercial or residential facility
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "facility:{}", self.0)
    }
}

impl From<&str> for FacilityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FacilityId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// 1-based identifier of an onboarding stage.
///
/// Stage ids within a stage set are dense and strictly ordered; stage 1 is
/// the implicit "account created" baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StageId(u32);

impl StageId {
    /// The baseline stage every account starts in.
    pub const FIRST: StageId = StageId(1);

    /// Returns `None` for 0.
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The following stage id.
    pub fn succ(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Zero-based position within a stage set.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for StageId {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        StageId::new(value).ok_or_else(|| "stage ids start at 1".to_string())
    }
}

impl From<StageId> for u32 {
    fn from(value: StageId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_rejects_zero() {
        assert!(StageId::new(0).is_none());
        assert_eq!(StageId::new(1), Some(StageId::FIRST));
    }

    #[test]
    fn test_stage_id_index_and_succ() {
        let stage = StageId::new(3).unwrap();
        assert_eq!(stage.index(), 2);
        assert_eq!(stage.succ().get(), 4);
    }

    #[test]
    fn test_stage_id_serde_guards_zero() {
        assert!(serde_json::from_str::<StageId>("0").is_err());
        assert_eq!(serde_json::from_str::<StageId>("2").unwrap().get(), 2);
    }

    #[test]
    fn test_blank_user_id() {
        assert!(UserId::new("  ").is_blank());
        assert!(!UserId::new("u-1").is_blank());
        assert_eq!(UserId::new("u-1").to_string(), "user:u-1");
    }
}
