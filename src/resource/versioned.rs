//! Stored records paired with their SCIM `meta` attributes.
//!
//! The store keeps one [`Versioned`] per id. The record itself stays opaque to
//! the store; the metadata (creation and modification timestamps, content
//! version) is maintained alongside it.

use super::Record;
use super::version::RawVersion;
use crate::error::ScimResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SCIM resource metadata maintained by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub resource_type: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub version: RawVersion,
}

/// A record together with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    #[serde(flatten)]
    record: T,
    meta: Meta,
}

impl<T: Record> Versioned<T> {
    /// Wrap a freshly created record.
    pub fn new(record: T) -> ScimResult<Self> {
        let now = Utc::now();
        let version = content_version(&record)?;
        Ok(Self {
            record,
            meta: Meta {
                resource_type: T::RESOURCE_TYPE.to_string(),
                created: now,
                last_modified: now,
                version,
            },
        })
    }

    /// Replace the record, keeping `created` and refreshing `lastModified` and the version.
    pub fn replace(&self, record: T) -> ScimResult<Self> {
        let version = content_version(&record)?;
        Ok(Self {
            record,
            meta: Meta {
                last_modified: Utc::now(),
                version,
                ..self.meta.clone()
            },
        })
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn into_record(self) -> T {
        self.record
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn version(&self) -> &RawVersion {
        &self.meta.version
    }
}

fn content_version<T: Record>(record: &T) -> ScimResult<RawVersion> {
    let bytes = serde_json::to_vec(record)?;
    Ok(RawVersion::from_content(&bytes))
}
