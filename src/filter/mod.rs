//! Parsed SCIM filter expressions.
//!
//! Filter strings are parsed by the protocol layer; the store only receives the
//! resulting [`FilterExpression`] tree and pattern-matches on its shape. The
//! full RFC 7644 expression algebra is modelled so callers can hand over
//! whatever they parsed, while [`FilterEvaluator`] implements only equality on
//! a resource type's unique lookup attribute.

pub mod evaluator;

pub use evaluator::{FilterEvaluator, LookupSource};

use std::fmt;

/// Attribute reference inside a filter, e.g. `urn:...:User:name.givenName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    pub schema_urn: Option<String>,
    pub attribute_name: String,
    pub sub_attribute: Option<String>,
}

impl AttributePath {
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            schema_urn: None,
            attribute_name: attribute_name.into(),
            sub_attribute: None,
        }
    }

    pub fn with_sub_attribute(mut self, sub_attribute: impl Into<String>) -> Self {
        self.sub_attribute = Some(sub_attribute.into());
        self
    }

    pub fn with_schema_urn(mut self, schema_urn: impl Into<String>) -> Self {
        self.schema_urn = Some(schema_urn.into());
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(urn) = &self.schema_urn {
            write!(f, "{}:", urn)?;
        }
        write!(f, "{}", self.attribute_name)?;
        if let Some(sub) = &self.sub_attribute {
            write!(f, ".{}", sub)?;
        }
        Ok(())
    }
}

/// Comparison operators of RFC 7644 section 3.4.2.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    Gt,
    Ge,
    Lt,
    Le,
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            CompareOperator::Eq => "eq",
            CompareOperator::Ne => "ne",
            CompareOperator::Co => "co",
            CompareOperator::Sw => "sw",
            CompareOperator::Ew => "ew",
            CompareOperator::Gt => "gt",
            CompareOperator::Ge => "ge",
            CompareOperator::Lt => "lt",
            CompareOperator::Le => "le",
        };
        f.write_str(op)
    }
}

/// Literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Boolean(bool),
    Number(serde_json::Number),
    Null,
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(s) => write!(f, "{:?}", s),
            FilterValue::Boolean(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Null => f.write_str("null"),
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// `attribute op value`
    Comparison {
        attribute: AttributePath,
        operator: CompareOperator,
        value: FilterValue,
    },
    /// `attribute pr`
    Present(AttributePath),
    And(Box<FilterExpression>, Box<FilterExpression>),
    Or(Box<FilterExpression>, Box<FilterExpression>),
    Not(Box<FilterExpression>),
    /// `attribute[filter]`, e.g. `emails[type eq "work"]`
    ValuePath {
        attribute: AttributePath,
        filter: Box<FilterExpression>,
    },
}

impl FilterExpression {
    /// `attribute eq "value"`
    pub fn eq(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpression::Comparison {
            attribute: AttributePath::new(attribute),
            operator: CompareOperator::Eq,
            value: FilterValue::String(value.into()),
        }
    }

    pub fn and(left: FilterExpression, right: FilterExpression) -> Self {
        FilterExpression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: FilterExpression, right: FilterExpression) -> Self {
        FilterExpression::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: FilterExpression) -> Self {
        FilterExpression::Not(Box::new(inner))
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Comparison {
                attribute,
                operator,
                value,
            } => write!(f, "{} {} {}", attribute, operator, value),
            FilterExpression::Present(attribute) => write!(f, "{} pr", attribute),
            FilterExpression::And(left, right) => write!(f, "({}) and ({})", left, right),
            FilterExpression::Or(left, right) => write!(f, "({}) or ({})", left, right),
            FilterExpression::Not(inner) => write!(f, "not ({})", inner),
            FilterExpression::ValuePath { attribute, filter } => {
                write!(f, "{}[{}]", attribute, filter)
            }
        }
    }
}
