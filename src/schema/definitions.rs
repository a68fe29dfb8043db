//! Built-in schemas for the User and Group resource types.
//!
//! These mirror the RFC 7643 core schemas, restricted to the attributes the
//! [`User`](crate::resource::User) and [`Group`](crate::resource::Group) records carry.

use super::types::{AttributeDefinition, AttributeType, ResourceSchema, Uniqueness};
use std::sync::LazyLock;

pub const USER_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const GROUP_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

static USER_SCHEMA: LazyLock<ResourceSchema> = LazyLock::new(|| ResourceSchema {
    id: USER_SCHEMA_URN.to_string(),
    name: "User".to_string(),
    resource_type: "User".to_string(),
    attributes: vec![
        AttributeDefinition::simple("id", AttributeType::String),
        AttributeDefinition::simple("externalId", AttributeType::String),
        AttributeDefinition::simple("userName", AttributeType::String)
            .with_uniqueness(Uniqueness::Server),
        AttributeDefinition::complex(
            "name",
            vec![
                AttributeDefinition::simple("formatted", AttributeType::String),
                AttributeDefinition::simple("familyName", AttributeType::String),
                AttributeDefinition::simple("givenName", AttributeType::String),
                AttributeDefinition::simple("middleName", AttributeType::String),
            ],
        ),
        AttributeDefinition::simple("displayName", AttributeType::String),
        AttributeDefinition::simple("active", AttributeType::Boolean),
        AttributeDefinition::multi_valued(
            "emails",
            vec![
                AttributeDefinition::simple("value", AttributeType::String),
                AttributeDefinition::simple("type", AttributeType::String),
                AttributeDefinition::simple("primary", AttributeType::Boolean),
            ],
        ),
        AttributeDefinition::multi_valued(
            "addresses",
            vec![
                AttributeDefinition::simple("streetAddress", AttributeType::String),
                AttributeDefinition::simple("locality", AttributeType::String),
                AttributeDefinition::simple("region", AttributeType::String),
                AttributeDefinition::simple("postalCode", AttributeType::String),
                AttributeDefinition::simple("country", AttributeType::String),
                AttributeDefinition::simple("type", AttributeType::String),
            ],
        ),
    ],
});

static GROUP_SCHEMA: LazyLock<ResourceSchema> = LazyLock::new(|| ResourceSchema {
    id: GROUP_SCHEMA_URN.to_string(),
    name: "Group".to_string(),
    resource_type: "Group".to_string(),
    attributes: vec![
        AttributeDefinition::simple("id", AttributeType::String),
        AttributeDefinition::simple("externalId", AttributeType::String),
        AttributeDefinition::simple("displayName", AttributeType::String),
        AttributeDefinition::multi_valued(
            "members",
            vec![
                AttributeDefinition::simple("value", AttributeType::String),
                AttributeDefinition::simple("display", AttributeType::String),
                AttributeDefinition::simple("$ref", AttributeType::Reference),
                AttributeDefinition::simple("type", AttributeType::String),
            ],
        ),
    ],
});

/// Core User schema.
pub fn user_schema() -> &'static ResourceSchema {
    &USER_SCHEMA
}

/// Core Group schema.
pub fn group_schema() -> &'static ResourceSchema {
    &GROUP_SCHEMA
}
