//! Storage layer for SCIM resources.
//!
//! One [`ResourceStore`] exists per resource type. It owns the id map, the
//! unique-attribute index and the insertion order behind a single lock, and
//! implements the SCIM conflict rules (create is never an upsert, unique
//! lookup values, content versions). Callers hand it typed records and
//! receive independent copies back.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_resource_store::storage::{PageRequest, ResourceStore, UpdateRequest};
//! use scim_resource_store::resource::Group;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ResourceStore::<Group>::new();
//!
//! let created = store.create(Group::new("test-me")).await?;
//! let id = created.id.clone().unwrap_or_default();
//!
//! let renamed = Group::new("test-me2").with_id(id.clone());
//! store.update(UpdateRequest::replace(id.clone(), renamed)).await?;
//!
//! let listed = store.find(None, &PageRequest::default()).await?;
//! assert_eq!(listed.total_results, 1);
//!
//! assert!(store.delete(&id).await);
//! # Ok(())
//! # }
//! ```

pub mod in_memory;

pub use in_memory::ResourceStore;

use crate::patch::PatchOperation;
use crate::resource::RawVersion;
use serde::{Deserialize, Serialize};

/// Pagination parameters as defined by RFC 7644 section 3.4.2.4.
///
/// `start_index` is 1-based; `count` of `None` means "all remaining".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub start_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl PageRequest {
    pub fn new(start_index: usize, count: Option<usize>) -> Self {
        Self { start_index, count }
    }

    /// Select the page from an ordered result list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = self.start_index.saturating_sub(1);
        let iter = items.into_iter().skip(skip);
        match self.count {
            Some(count) => iter.take(count).collect(),
            None => iter.collect(),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            start_index: 1,
            count: None,
        }
    }
}

/// Result of a find: the selected page plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse<T> {
    pub resources: Vec<T>,
    pub total_results: usize,
    pub page_request: PageRequest,
}

impl<T> FilterResponse<T> {
    pub fn new(resources: Vec<T>, total_results: usize, page_request: PageRequest) -> Self {
        Self {
            resources,
            total_results,
            page_request,
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.resources.len()
    }
}

/// How an update changes the stored record.
#[derive(Debug, Clone)]
pub enum Update<T> {
    /// Overwrite with a complete record.
    Replace(T),
    /// Apply patch operations to `original`, the record the caller read.
    Patch {
        original: T,
        operations: Vec<PatchOperation>,
    },
}

/// Update of the record stored under `id`.
#[derive(Debug, Clone)]
pub struct UpdateRequest<T> {
    pub id: String,
    pub update: Update<T>,
    /// When set, the update fails unless the stored version still matches.
    pub expected_version: Option<RawVersion>,
}

impl<T> UpdateRequest<T> {
    pub fn replace(id: impl Into<String>, record: T) -> Self {
        Self {
            id: id.into(),
            update: Update::Replace(record),
            expected_version: None,
        }
    }

    pub fn patch(id: impl Into<String>, original: T, operations: Vec<PatchOperation>) -> Self {
        Self {
            id: id.into(),
            update: Update::Patch {
                original,
                operations,
            },
            expected_version: None,
        }
    }

    pub fn with_expected_version(mut self, version: RawVersion) -> Self {
        self.expected_version = Some(version);
        self
    }
}
