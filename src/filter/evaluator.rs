//! Evaluates the one supported filter shape against a store.
//!
//! Only `<lookup attribute> eq "<value>"` is supported, where the lookup
//! attribute is the attribute the resource schema declares unique (userName
//! for users). The match is answered from the store's unique index. Any other
//! shape is rejected with [`ScimError::UnsupportedFilter`] naming the construct;
//! translating richer filters is left to backends with a query engine.

use super::{CompareOperator, FilterExpression, FilterValue};
use crate::error::{ScimError, ScimResult};
use crate::schema::ResourceSchema;
use log::{debug, warn};

/// Something that can answer exact lookups on the unique attribute.
pub trait LookupSource<T> {
    fn find_by_lookup_key(&self, value: &str) -> Option<T>;
}

/// Filter evaluator configured from a resource schema.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'s> {
    schema: &'s ResourceSchema,
    lookup_attribute: Option<&'s str>,
}

impl<'s> FilterEvaluator<'s> {
    pub fn for_schema(schema: &'s ResourceSchema) -> Self {
        Self {
            schema,
            lookup_attribute: schema.unique_attribute().map(|attr| attr.name.as_str()),
        }
    }

    pub fn lookup_attribute(&self) -> Option<&'s str> {
        self.lookup_attribute
    }

    /// Evaluate `expression`, returning zero or one matching records.
    pub fn evaluate<T, S>(&self, source: &S, expression: &FilterExpression) -> ScimResult<Vec<T>>
    where
        S: LookupSource<T>,
    {
        let value = self.lookup_value(expression).inspect_err(|e| {
            warn!(
                "Rejecting {} filter `{}`: {}",
                self.schema.resource_type, expression, e
            );
        })?;

        let matches: Vec<T> = source.find_by_lookup_key(value).into_iter().collect();
        debug!(
            "Filter `{}` matched {} {} resource(s)",
            expression,
            matches.len(),
            self.schema.resource_type
        );
        Ok(matches)
    }

    /// Check the expression shape and extract the value to look up.
    fn lookup_value<'e>(&self, expression: &'e FilterExpression) -> ScimResult<&'e str> {
        let (attribute, operator, value) = match expression {
            FilterExpression::Comparison {
                attribute,
                operator,
                value,
            } => (attribute, operator, value),
            FilterExpression::Present(attribute) => {
                return Err(self.unsupported(format!("presence test '{} pr'", attribute)));
            }
            FilterExpression::And(..) => return Err(self.unsupported("logical 'and'")),
            FilterExpression::Or(..) => return Err(self.unsupported("logical 'or'")),
            FilterExpression::Not(..) => return Err(self.unsupported("logical 'not'")),
            FilterExpression::ValuePath { attribute, .. } => {
                return Err(self.unsupported(format!("value path filter on '{}'", attribute)));
            }
        };

        let Some(lookup_attribute) = self.lookup_attribute else {
            return Err(self.unsupported(format!(
                "filtering {} resources",
                self.schema.resource_type
            )));
        };

        if let Some(urn) = &attribute.schema_urn {
            if !urn.eq_ignore_ascii_case(&self.schema.id) {
                return Err(self.unsupported(format!("attribute from schema '{}'", urn)));
            }
        }
        if attribute.sub_attribute.is_some() {
            return Err(self.unsupported(format!("nested attribute path '{}'", attribute)));
        }
        if !attribute.attribute_name.eq_ignore_ascii_case(lookup_attribute) {
            return Err(self.unsupported(format!(
                "comparison on attribute '{}'",
                attribute.attribute_name
            )));
        }
        if *operator != CompareOperator::Eq {
            return Err(self.unsupported(format!("operator '{}'", operator)));
        }

        match value {
            FilterValue::String(value) => Ok(value),
            other => Err(self.unsupported(format!("non-string comparison value {}", other))),
        }
    }

    fn unsupported(&self, construct: impl Into<String>) -> ScimError {
        let supported = match self.lookup_attribute {
            Some(attribute) => format!("{} eq \"value\"", attribute),
            None => "none".to_string(),
        };
        ScimError::unsupported_filter(construct, supported)
    }
}
