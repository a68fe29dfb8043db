//! SCIM User record.

use super::Record;
use crate::schema::{ResourceSchema, user_schema};
use serde::{Deserialize, Serialize};

/// A SCIM User, keyed by `id` and looked up by `userName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<Email>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
}

impl User {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the name and derive `name.formatted` and `displayName` as "Family, Given".
    pub fn with_name(mut self, given_name: &str, family_name: &str) -> Self {
        let formatted = format!("{family_name}, {given_name}");
        self.display_name = Some(formatted.clone());
        self.name = Some(Name {
            formatted: Some(formatted),
            family_name: Some(family_name.to_string()),
            given_name: Some(given_name.to_string()),
            middle_name: None,
        });
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.emails.push(Email {
            value: value.into(),
            email_type: None,
            primary: None,
        });
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

impl Record for User {
    const RESOURCE_TYPE: &'static str = "User";

    fn schema() -> &'static ResourceSchema {
        user_schema()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn lookup_key(&self) -> Option<&str> {
        self.user_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_wire_format() {
        let user = User::new("jcoder")
            .with_id("42")
            .with_name("Jay", "Coder")
            .with_email("jcoder@example.com")
            .with_active(true);

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["userName"], "jcoder");
        assert_eq!(value["displayName"], "Coder, Jay");
        assert_eq!(value["name"]["givenName"], "Jay");
        assert_eq!(value["emails"], json!([{"value": "jcoder@example.com"}]));
        assert!(value.get("addresses").is_none());
        assert!(value.get("externalId").is_none());
    }

    #[test]
    fn test_user_from_wire() {
        let user: User = serde_json::from_value(json!({
            "userName": "bjensen",
            "active": false,
            "addresses": [{"locality": "Springfield", "type": "home"}]
        }))
        .unwrap();

        assert_eq!(user.lookup_key(), Some("bjensen"));
        assert_eq!(user.id(), None);
        assert_eq!(user.active, Some(false));
        assert_eq!(user.addresses[0].address_type.as_deref(), Some("home"));
    }
}
