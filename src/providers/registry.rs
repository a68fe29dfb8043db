//! Provider registry and its configuration.
//!
//! The registry is built once at startup and handed to the protocol layer.
//! A `ResourceStore` is a cheap handle over shared state, so a caller may
//! build its own store, keep a clone and register it with the builder.
//!
//! # Examples
//!
//! ```rust
//! use scim_resource_store::providers::ProviderRegistryBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistryBuilder::new()
//!     .with_base_url("https://scim.company.com")
//!     .with_seed_fixtures(false)
//!     .build()
//!     .await?;
//!
//! assert!(registry.users().is_empty().await);
//! assert_eq!(
//!     registry.ref_url("Groups", "g1"),
//!     "https://scim.company.com/v2/Groups/g1"
//! );
//! # Ok(())
//! # }
//! ```

use super::fixtures;
use crate::error::{ScimError, ScimResult};
use crate::resource::{Group, GroupMember, Record, User};
use crate::schema::{ResourceSchema, group_schema, user_schema};
use crate::storage::ResourceStore;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Configuration for resource locations and startup data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Root URL without SCIM path information, e.g. "https://scim.example.com".
    pub base_url: String,

    /// SCIM protocol version segment used in URLs. Defaults to "v2".
    pub scim_version: String,

    /// Seed the user store with the example user on build.
    pub seed_fixtures: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            scim_version: "v2".to_string(),
            seed_fixtures: true,
        }
    }
}

impl RegistryConfig {
    /// Location of a resource, e.g. `https://localhost/v2/Users/123`.
    pub fn ref_url(&self, endpoint: &str, resource_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.scim_version,
            endpoint,
            resource_id
        )
    }

    pub fn validate(&self) -> ScimResult<()> {
        if self.base_url.is_empty() {
            return Err(ScimError::invalid_configuration("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ScimError::invalid_configuration(
                "Base URL must start with http:// or https://",
            ));
        }

        if self.scim_version.is_empty() {
            return Err(ScimError::invalid_configuration(
                "SCIM version cannot be empty",
            ));
        }

        Ok(())
    }
}

/// Service provider configuration as defined in RFC 7643 section 5.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceProviderConfig {
    #[serde(rename = "patch")]
    pub patch_supported: bool,

    #[serde(rename = "bulk")]
    pub bulk_supported: bool,

    /// Filtering is limited to equality on the unique lookup attribute.
    #[serde(rename = "filter")]
    pub filter_supported: bool,

    #[serde(rename = "changePassword")]
    pub change_password_supported: bool,

    #[serde(rename = "sort")]
    pub sort_supported: bool,

    #[serde(rename = "etag")]
    pub etag_supported: bool,

    #[serde(rename = "authenticationSchemes")]
    pub authentication_schemes: Vec<AuthenticationScheme>,
}

impl Default for ServiceProviderConfig {
    fn default() -> Self {
        Self {
            patch_supported: true,
            bulk_supported: false,
            filter_supported: true,
            change_password_supported: false,
            sort_supported: false,
            etag_supported: true,
            authentication_schemes: Vec::new(),
        }
    }
}

/// Authentication scheme advertised in the service provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticationScheme {
    pub name: String,
    pub description: String,
    #[serde(rename = "specUri", skip_serializing_if = "Option::is_none")]
    pub spec_uri: Option<String>,
    #[serde(rename = "documentationUri", skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,
    /// Authentication type (e.g., "oauth2", "httpbasic")
    #[serde(rename = "type")]
    pub auth_type: String,
    pub primary: bool,
}

impl AuthenticationScheme {
    pub fn http_basic(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            spec_uri: Some("https://www.rfc-editor.org/rfc/rfc7617".to_string()),
            documentation_uri: None,
            auth_type: "httpbasic".to_string(),
            primary: true,
        }
    }

    /// The HTTP Basic scheme registered by default.
    pub fn example() -> Self {
        Self::http_basic("SCIMple Example", "Tomee + Spring SCIMple Example")
    }
}

/// The stores for every supported resource type.
#[derive(Clone)]
pub struct ProviderRegistry {
    config: RegistryConfig,
    service_provider_config: ServiceProviderConfig,
    users: ResourceStore<User>,
    groups: ResourceStore<Group>,
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    pub fn users(&self) -> &ResourceStore<User> {
        &self.users
    }

    pub fn groups(&self) -> &ResourceStore<Group> {
        &self.groups
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn service_provider_config(&self) -> &ServiceProviderConfig {
        &self.service_provider_config
    }

    pub fn ref_url(&self, endpoint: &str, resource_id: &str) -> String {
        self.config.ref_url(endpoint, resource_id)
    }

    /// Core schemas of the registered resource types.
    pub fn schemas(&self) -> Vec<&'static ResourceSchema> {
        vec![user_schema(), group_schema()]
    }

    /// Extension schemas registered for a resource type. Neither store carries any.
    pub fn extension_schemas(&self, resource_type: &str) -> Vec<&'static ResourceSchema> {
        debug!("No extension schemas for {}", resource_type);
        Vec::new()
    }

    /// Member reference to a stored user, with its location filled in.
    pub fn user_member(&self, user: &User) -> Option<GroupMember> {
        let id = user.id()?;
        let mut member = GroupMember::new(id);
        member.display = user.display_name.clone();
        member.reference = Some(self.ref_url("Users", id));
        member.member_type = Some(User::RESOURCE_TYPE.to_string());
        Some(member)
    }
}

/// Builder for a [`ProviderRegistry`].
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    config: RegistryConfig,
    authentication_schemes: Vec<AuthenticationScheme>,
    users: Option<ResourceStore<User>>,
    groups: Option<ResourceStore<Group>>,
}

impl ProviderRegistryBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_scim_version(mut self, version: impl Into<String>) -> Self {
        self.config.scim_version = version.into();
        self
    }

    pub fn with_seed_fixtures(mut self, seed: bool) -> Self {
        self.config.seed_fixtures = seed;
        self
    }

    /// Advertise an authentication scheme. Without any, the example HTTP Basic
    /// scheme is advertised.
    pub fn with_authentication_scheme(mut self, scheme: AuthenticationScheme) -> Self {
        self.authentication_schemes.push(scheme);
        self
    }

    pub fn with_user_store(mut self, users: ResourceStore<User>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_group_store(mut self, groups: ResourceStore<Group>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Validate the configuration, create missing stores and seed fixtures.
    ///
    /// # Errors
    ///
    /// * [`ScimError::InvalidConfiguration`] - the configuration is invalid
    /// * any error of [`ResourceStore::create`] while seeding
    pub async fn build(self) -> ScimResult<ProviderRegistry> {
        self.config.validate()?;

        let users = self.users.unwrap_or_default();
        let groups = self.groups.unwrap_or_default();

        if self.config.seed_fixtures {
            fixtures::seed_users(&users).await?;
        }

        let authentication_schemes = if self.authentication_schemes.is_empty() {
            vec![AuthenticationScheme::example()]
        } else {
            self.authentication_schemes
        };

        info!(
            "Provider registry ready at {}/{} ({} user(s), {} group(s))",
            self.config.base_url,
            self.config.scim_version,
            users.len().await,
            groups.len().await
        );

        Ok(ProviderRegistry {
            config: self.config,
            service_provider_config: ServiceProviderConfig {
                authentication_schemes,
                ..ServiceProviderConfig::default()
            },
            users,
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterExpression;
    use crate::storage::PageRequest;

    #[tokio::test]
    async fn test_default_registry_seeds_example_user() {
        let registry = ProviderRegistryBuilder::new().build().await.unwrap();

        let found = registry
            .users()
            .find(
                Some(&FilterExpression::eq("userName", fixtures::EXAMPLE_USER_NAME)),
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(found.total_results, 1);
        assert!(registry.groups().is_empty().await);
    }

    #[tokio::test]
    async fn test_default_authentication_scheme() {
        let registry = ProviderRegistryBuilder::new()
            .with_seed_fixtures(false)
            .build()
            .await
            .unwrap();

        let schemes = &registry.service_provider_config().authentication_schemes;
        assert_eq!(schemes.len(), 1);
        assert_eq!(schemes[0].name, "SCIMple Example");
        assert_eq!(schemes[0].auth_type, "httpbasic");
        assert!(registry.service_provider_config().patch_supported);
    }

    #[tokio::test]
    async fn test_registered_stores_are_shared() {
        let groups = ResourceStore::<Group>::new();
        let registry = ProviderRegistryBuilder::new()
            .with_seed_fixtures(false)
            .with_group_store(groups.clone())
            .build()
            .await
            .unwrap();

        let created = groups.create(Group::new("ops")).await.unwrap();
        let id = created.id.clone().unwrap();
        assert_eq!(registry.groups().get(&id).await, Some(created));

        // Writes through the registry's handle are visible to the caller's
        let handle = registry.groups().clone();
        assert!(handle.delete(&id).await);
        assert!(groups.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_rejected() {
        let err = ProviderRegistryBuilder::new()
            .with_base_url("scim.example.com")
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScimError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_ref_url() {
        let config = RegistryConfig {
            base_url: "https://scim.example.com/".to_string(),
            ..RegistryConfig::default()
        };
        assert_eq!(
            config.ref_url("Users", "123"),
            "https://scim.example.com/v2/Users/123"
        );
    }

    #[tokio::test]
    async fn test_extension_schemas_are_empty() {
        let registry = ProviderRegistryBuilder::new()
            .with_seed_fixtures(false)
            .build()
            .await
            .unwrap();
        assert!(registry.extension_schemas("User").is_empty());
        assert!(registry.extension_schemas("Group").is_empty());
        assert_eq!(registry.schemas().len(), 2);
    }

    #[tokio::test]
    async fn test_user_member_reference() {
        let registry = ProviderRegistryBuilder::new()
            .with_seed_fixtures(false)
            .build()
            .await
            .unwrap();
        let user = registry
            .users()
            .create(User::new("jcoder").with_id("u1").with_name("Jay", "Coder"))
            .await
            .unwrap();

        let member = registry.user_member(&user).unwrap();
        assert_eq!(member.value, "u1");
        assert_eq!(member.reference.as_deref(), Some("https://localhost/v2/Users/u1"));
        assert_eq!(member.display.as_deref(), Some("Coder, Jay"));
        assert!(registry.user_member(&User::new("no-id")).is_none());
    }
}
