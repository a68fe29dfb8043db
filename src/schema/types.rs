//! Core schema type definitions for SCIM resources.
//!
//! This module contains the data structures that describe a resource type's
//! attributes: their names, data types, multiplicity and uniqueness. The patch
//! applier consults these definitions instead of inspecting records at runtime.

use serde::{Deserialize, Serialize};

/// A SCIM schema definition for one resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Human-readable schema name
    pub name: String,
    /// Resource type served under this schema ("User", "Group")
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    /// List of attribute definitions
    pub attributes: Vec<AttributeDefinition>,
}

/// Definition of a SCIM attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name, in its canonical spelling
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values
    pub multi_valued: bool,
    /// Uniqueness constraints
    pub uniqueness: Uniqueness,
    /// Sub-attributes for complex types
    #[serde(default)]
    pub sub_attributes: Vec<AttributeDefinition>,
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: AttributeType::String,
            multi_valued: false,
            uniqueness: Uniqueness::None,
            sub_attributes: Vec::new(),
        }
    }
}

impl AttributeDefinition {
    /// Single-valued attribute of the given type.
    pub fn simple(name: &str, data_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            ..Default::default()
        }
    }

    /// Single-valued complex attribute.
    pub fn complex(name: &str, sub_attributes: Vec<AttributeDefinition>) -> Self {
        Self {
            name: name.to_string(),
            data_type: AttributeType::Complex,
            sub_attributes,
            ..Default::default()
        }
    }

    /// Multi-valued complex attribute.
    pub fn multi_valued(name: &str, sub_attributes: Vec<AttributeDefinition>) -> Self {
        Self {
            multi_valued: true,
            ..Self::complex(name, sub_attributes)
        }
    }

    pub fn with_uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Look up a sub-attribute by name, ignoring case as SCIM attribute names do.
    pub fn sub_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.sub_attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }
}

/// SCIM attribute data types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    /// String value
    #[default]
    String,
    /// Boolean value
    Boolean,
    /// Integer number
    Integer,
    /// DateTime in RFC3339 format
    DateTime,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

/// Attribute uniqueness constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    #[default]
    None,
    /// Unique within the server
    Server,
    /// Globally unique
    Global,
}

/// An attribute path resolved against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    /// Canonical attribute names, outermost first
    pub segments: Vec<&'a str>,
    /// Definition of the attribute the path ends at
    pub definition: &'a AttributeDefinition,
}

impl ResolvedPath<'_> {
    /// Whether the path's target holds a collection of values.
    pub fn is_multi_valued(&self) -> bool {
        self.definition.multi_valued
    }
}

impl ResourceSchema {
    /// Look up a top-level attribute by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a dotted attribute path such as `name.givenName`.
    ///
    /// A leading schema URN matching this schema's id is accepted and stripped.
    /// Returns `None` when any segment is unknown or a segment descends into a
    /// non-complex attribute.
    pub fn resolve_path(&self, path: &str) -> Option<ResolvedPath<'_>> {
        let path = self.strip_urn(path)?;
        let mut parts = path.split('.');
        let mut definition = self.attribute(parts.next()?)?;
        let mut segments = vec![definition.name.as_str()];

        for part in parts {
            if definition.data_type != AttributeType::Complex || definition.multi_valued {
                return None;
            }
            definition = definition.sub_attribute(part)?;
            segments.push(definition.name.as_str());
        }

        Some(ResolvedPath {
            segments,
            definition,
        })
    }

    /// The attribute whose values are unique across the store, if any.
    pub fn unique_attribute(&self) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attr| attr.uniqueness != Uniqueness::None && !attr.multi_valued)
    }

    fn strip_urn<'p>(&self, path: &'p str) -> Option<&'p str> {
        if !path.starts_with("urn:") {
            return Some(path);
        }
        let rest = path.get(self.id.len()..)?;
        if path[..self.id.len()].eq_ignore_ascii_case(&self.id) {
            rest.strip_prefix(':')
        } else {
            None
        }
    }
}
