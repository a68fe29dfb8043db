//! Resource records held by the stores.
//!
//! A [`Record`] is any serializable structure with a single string identity.
//! The store never looks inside a record beyond its id and, for types whose
//! schema declares one, its unique lookup value; everything else is carried
//! opaquely and only touched by the patch applier through serialization.

pub mod group;
pub mod user;
pub mod version;
pub mod versioned;

pub use group::{Group, GroupMember};
pub use user::{Address, Email, Name, User};
pub use version::{HttpVersion, RawVersion, VersionConflict};
pub use versioned::{Meta, Versioned};

use crate::schema::ResourceSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A resource type that can be kept in a [`ResourceStore`](crate::storage::ResourceStore).
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// SCIM resource type name ("User", "Group").
    const RESOURCE_TYPE: &'static str;

    /// Static schema describing this type's attributes.
    fn schema() -> &'static ResourceSchema;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Value of the schema's unique lookup attribute, if this type has one.
    fn lookup_key(&self) -> Option<&str> {
        None
    }
}
