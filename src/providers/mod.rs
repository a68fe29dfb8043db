//! Wiring of the per-type stores for the protocol layer.
//!
//! * [`ProviderRegistry`] - owns the user and group stores plus the service
//!   provider configuration advertised to clients
//! * [`ProviderRegistryBuilder`] - explicit construction of a registry from
//!   a [`RegistryConfig`] and optionally pre-built stores
//! * [`fixtures`] - the example user seeded into fresh registries

pub mod fixtures;
pub mod registry;

pub use registry::{
    AuthenticationScheme, ProviderRegistry, ProviderRegistryBuilder, RegistryConfig,
    ServiceProviderConfig,
};
