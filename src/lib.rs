//! In-memory SCIM 2.0 resource store for Rust.
//!
//! Holds SCIM User and Group records with the conflict rules a SCIM service
//! provider needs (create is never an upsert, unique `userName`, content
//! versions for optimistic updates), applies PATCH operations against a static
//! per-type schema, and answers equality lookups on the unique attribute.
//! HTTP transport and filter string parsing are left to the protocol layer.
//!
//! # Core Components
//!
//! - [`ResourceStore`] - Thread-safe store for one resource type
//! - [`PatchApplier`] - Ordered application of SCIM PATCH operations
//! - [`FilterEvaluator`] - `attribute eq "value"` lookups on the unique attribute
//! - [`ProviderRegistry`] - The configured stores, ready for the protocol layer
//!
//! # Quick Start
//!
//! ```rust
//! use scim_resource_store::ProviderRegistry;
//! use scim_resource_store::patch::PatchOperation;
//! use scim_resource_store::resource::Group;
//! use scim_resource_store::storage::UpdateRequest;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::builder().build().await?;
//! let groups = registry.groups();
//!
//! let group = groups.create(Group::new("test-me")).await?;
//! let id = group.id.clone().unwrap_or_default();
//!
//! groups
//!     .update(UpdateRequest::patch(
//!         id.clone(),
//!         group,
//!         vec![PatchOperation::replace("displayName", json!("test-me2"))],
//!     ))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod patch;
pub mod providers;
pub mod resource;
pub mod schema;
pub mod storage;

pub use error::{ScimError, ScimResult};
pub use filter::{FilterEvaluator, FilterExpression};
pub use patch::{PatchApplier, PatchOp, PatchOperation};
pub use providers::{ProviderRegistry, ProviderRegistryBuilder, RegistryConfig};
pub use resource::{Group, GroupMember, Record, User, Versioned};
pub use storage::{FilterResponse, PageRequest, ResourceStore, UpdateRequest};
