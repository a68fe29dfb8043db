//! Applies ordered patch operations to a copy of a record.
//!
//! Operations are first validated and normalised against the record type's
//! static schema, then applied to the record's JSON form, and the result is
//! deserialized back into the record type. The original is never touched.

use super::{PatchOp, PatchOperation};
use crate::error::{ScimError, ScimResult};
use crate::resource::Record;
use crate::schema::ResourceSchema;
use log::{debug, trace, warn};
use serde_json::{Map, Value};

/// Patch applier for one resource schema.
#[derive(Debug, Clone, Copy)]
pub struct PatchApplier<'s> {
    schema: &'s ResourceSchema,
}

/// An operation whose path has been resolved to canonical attribute names.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedOperation {
    op: PatchOp,
    segments: Vec<String>,
    value: Option<Value>,
}

impl PatchApplier<'static> {
    /// Applier for the record type's built-in schema.
    pub fn for_record<T: Record>() -> Self {
        Self::new(T::schema())
    }
}

impl<'s> PatchApplier<'s> {
    pub fn new(schema: &'s ResourceSchema) -> Self {
        Self { schema }
    }

    /// Apply `operations` in order to a copy of `original`.
    ///
    /// # Errors
    ///
    /// * [`ScimError::MalformedPatch`] - path-less operation without an object
    ///   value, unknown attribute path, or add/replace without a value
    /// * [`ScimError::UnsupportedPatch`] - value filter paths, or removal
    ///   targeting a multi-valued attribute
    /// * [`ScimError::PatchApply`] - the patched document no longer maps onto `T`
    /// * [`ScimError::Json`] - `original` could not be serialized
    pub fn apply<T: Record>(&self, original: &T, operations: &[PatchOperation]) -> ScimResult<T> {
        if operations.is_empty() {
            return Ok(original.clone());
        }

        let resolved = self.resolve_all(operations)?;
        debug!(
            "Applying {} patch operation(s) ({} after expansion) to {}",
            operations.len(),
            resolved.len(),
            self.schema.resource_type
        );

        let mut document = serde_json::to_value(original)?;

        for operation in &resolved {
            trace!(
                "{} {} = {:?}",
                operation.op,
                operation.segments.join("."),
                operation.value
            );
            apply_operation(&mut document, operation)?;
        }

        serde_json::from_value(document).map_err(|e| {
            ScimError::patch_apply(format!(
                "Patched document is not a valid {}: {}",
                self.schema.resource_type, e
            ))
        })
    }

    fn resolve_all(&self, operations: &[PatchOperation]) -> ScimResult<Vec<ResolvedOperation>> {
        let mut resolved = Vec::with_capacity(operations.len());

        for operation in operations {
            match (&operation.path, &operation.value) {
                (Some(path), value) => {
                    resolved.push(self.resolve(operation.op, path, value.clone())?);
                }
                // Bare attribute update: one operation per entry of the value object
                (None, Some(Value::Object(properties))) => {
                    for (attribute, value) in properties {
                        resolved.push(self.resolve(
                            operation.op,
                            attribute,
                            Some(value.clone()),
                        )?);
                    }
                }
                (None, _) => {
                    return Err(ScimError::malformed_patch(format!(
                        "'{}' operation without a path expects an object value",
                        operation.op
                    )));
                }
            }
        }

        Ok(resolved)
    }

    fn resolve(&self, op: PatchOp, path: &str, value: Option<Value>) -> ScimResult<ResolvedOperation> {
        if path.contains('[') {
            warn!("Rejecting patch path with value filter: {}", path);
            return Err(ScimError::unsupported_patch(format!(
                "Path filter expressions are not supported: {}",
                path
            )));
        }

        let target = self.schema.resolve_path(path).ok_or_else(|| {
            ScimError::malformed_patch(format!(
                "Unknown attribute path '{}' for {}",
                path, self.schema.resource_type
            ))
        })?;

        // Removing a single element needs a filter like members[value eq "x"]
        if op == PatchOp::Remove && target.is_multi_valued() {
            warn!("Rejecting removal from multi-valued attribute: {}", path);
            return Err(ScimError::unsupported_patch(format!(
                "Removing items from collection '{}' requires a path filter expression",
                path
            )));
        }

        if op != PatchOp::Remove && value.is_none() {
            return Err(ScimError::malformed_patch(format!(
                "'{}' operation on '{}' requires a value",
                op, path
            )));
        }

        Ok(ResolvedOperation {
            op,
            segments: target.segments.iter().map(|s| s.to_string()).collect(),
            value,
        })
    }
}

fn apply_operation(document: &mut Value, operation: &ResolvedOperation) -> ScimResult<()> {
    let Some((last, parents)) = operation.segments.split_last() else {
        return Ok(());
    };

    match (operation.op, &operation.value) {
        (PatchOp::Add | PatchOp::Replace, Some(value)) => {
            let parent = parent_object_mut(document, parents)?;
            parent.insert(last.clone(), value.clone());
        }
        (PatchOp::Remove, _) => {
            if let Some(parent) = existing_parent_mut(document, parents) {
                parent.remove(last);
            }
        }
        // Values were checked during resolution
        (PatchOp::Add | PatchOp::Replace, None) => {}
    }

    Ok(())
}

/// Walk to the object holding the target attribute, creating intermediate objects.
fn parent_object_mut<'d>(
    document: &'d mut Value,
    parents: &[String],
) -> ScimResult<&'d mut Map<String, Value>> {
    let mut current = document;
    for segment in parents {
        let object = as_object_mut(current)?;
        let child = object
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        current = child;
    }
    as_object_mut(current)
}

fn existing_parent_mut<'d>(
    document: &'d mut Value,
    parents: &[String],
) -> Option<&'d mut Map<String, Value>> {
    let mut current = document;
    for segment in parents {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    current.as_object_mut()
}

fn as_object_mut(value: &mut Value) -> ScimResult<&mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| ScimError::patch_apply("Cannot set a value beneath a non-object attribute"))
}
