//! SCIM PATCH operations.
//!
//! A [`PatchOperation`] is the RFC 7644 `{op, path, value}` triple. Operations
//! are applied in order by [`PatchApplier`], which supports plain attribute
//! paths (`displayName`, `name.givenName`) and the path-less form whose value
//! maps attribute names to new values. Value filter paths such as
//! `members[value eq "2819c223"]` are rejected as unsupported.
//!
//! ```rust
//! use scim_resource_store::patch::{PatchApplier, PatchOperation};
//! use scim_resource_store::resource::Group;
//! use serde_json::json;
//!
//! let group = Group::new("ops").with_id("g1");
//! let patched = PatchApplier::for_record::<Group>()
//!     .apply(&group, &[PatchOperation::replace("displayName", json!("platform"))])
//!     .unwrap();
//! assert_eq!(patched.display_name.as_deref(), Some("platform"));
//! assert_eq!(group.display_name.as_deref(), Some("ops"));
//! ```

pub mod applier;

pub use applier::PatchApplier;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The kind of a patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Replace => "replace",
            PatchOp::Remove => "remove",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchOp {
    type Err = String;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op.to_ascii_lowercase().as_str() {
            "add" => Ok(PatchOp::Add),
            "replace" => Ok(PatchOp::Replace),
            "remove" => Ok(PatchOp::Remove),
            _ => Err(format!("Unsupported PATCH operation: {}", op)),
        }
    }
}

// Clients send "Add", "REPLACE" and so on; accept any case.
impl<'de> Deserialize<'de> for PatchOp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let op = String::deserialize(deserializer)?;
        op.parse().map_err(serde::de::Error::custom)
    }
}

/// One operation of a PATCH request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: Some(path.into()),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: Some(path.into()),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: Some(path.into()),
            value: None,
        }
    }

    /// Path-less operation whose value maps attribute names to values.
    pub fn without_path(op: PatchOp, value: Value) -> Self {
        Self {
            op,
            path: None,
            value: Some(value),
        }
    }
}
