//! Shared helpers for the integration suites.

#![allow(dead_code)]

use scim_resource_store::providers::{ProviderRegistry, ProviderRegistryBuilder};
use scim_resource_store::resource::{Group, User};
use scim_resource_store::storage::ResourceStore;

/// Route `log` output through the test harness; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A user store seeded the way a default registry seeds it.
pub async fn seeded_user_store() -> ResourceStore<User> {
    init_logging();
    let users = ResourceStore::new();
    scim_resource_store::providers::fixtures::seed_users(&users)
        .await
        .expect("seeding an empty store succeeds");
    users
}

pub fn group_store() -> ResourceStore<Group> {
    init_logging();
    ResourceStore::new()
}

pub async fn empty_registry() -> ProviderRegistry {
    init_logging();
    ProviderRegistryBuilder::new()
        .with_seed_fixtures(false)
        .build()
        .await
        .expect("default configuration is valid")
}
