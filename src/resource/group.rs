//! SCIM Group record.

use super::Record;
use crate::schema::{ResourceSchema, group_schema};
use serde::{Deserialize, Serialize};

/// A SCIM Group with an optional display name and member references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_member(mut self, member: GroupMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.value.as_str())
    }
}

impl Record for Group {
    const RESOURCE_TYPE: &'static str = "Group";

    fn schema() -> &'static ResourceSchema {
        group_schema()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Reference from a group to one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Id of the member resource
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// "User" or "Group"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
}

impl GroupMember {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: None,
            reference: None,
            member_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_members_wire_format() {
        let mut member = GroupMember::new("member1");
        member.reference = Some("https://localhost/v2/Users/member1".to_string());
        let group = Group::new("admins").with_member(member);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            json!({
                "displayName": "admins",
                "members": [{"value": "member1", "$ref": "https://localhost/v2/Users/member1"}]
            })
        );
        assert_eq!(group.member_ids().collect::<Vec<_>>(), vec!["member1"]);
    }

    #[test]
    fn test_group_without_members_deserializes() {
        let group: Group = serde_json::from_value(json!({"id": "g1"})).unwrap();
        assert_eq!(group.id(), Some("g1"));
        assert!(group.members.is_empty());
        assert!(group.display_name.is_none());
    }
}
