//! Error types for SCIM resource store operations.
//!
//! Every failure path in the store, the patch applier and the filter evaluator
//! returns a distinct [`ScimError`] variant so the calling protocol layer can
//! pick the outward HTTP status without inspecting messages. Absence of a
//! resource on read is not an error: [`ResourceStore::get`] returns `None`.
//!
//! [`ResourceStore::get`]: crate::storage::ResourceStore::get

use crate::resource::version::VersionConflict;

/// Main error type for resource store operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// A create targeted an id that is already stored. Create is never an upsert.
    #[error("{resource_type} with id '{id}' already exists")]
    Conflict { resource_type: String, id: String },

    /// A unique attribute value is already held by another resource.
    #[error("{resource_type} with {attribute} '{value}' already exists")]
    DuplicateAttribute {
        resource_type: String,
        attribute: String,
        value: String,
    },

    /// An update targeted an id that is not stored.
    #[error("Resource not found: {resource_type} with id '{id}'")]
    NotFound { resource_type: String, id: String },

    /// The caller's expected version no longer matches the stored resource.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(#[from] VersionConflict),

    /// A patch operation is structurally invalid.
    #[error("Malformed patch: {message}")]
    MalformedPatch { message: String },

    /// A patch operation is well-formed but outside what the applier supports.
    #[error("Unsupported patch: {message}")]
    UnsupportedPatch { message: String },

    /// The patched document could not be mapped back onto the resource type.
    #[error("Failed to apply patch: {message}")]
    PatchApply { message: String },

    /// The filter expression shape is not supported by the evaluator.
    #[error("Unsupported filter: {construct} (supported: {supported})")]
    UnsupportedFilter {
        construct: String,
        supported: String,
    },

    /// Registry configuration rejected at build time.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScimError {
    pub fn conflict(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn malformed_patch(message: impl Into<String>) -> Self {
        Self::MalformedPatch {
            message: message.into(),
        }
    }

    pub fn unsupported_patch(message: impl Into<String>) -> Self {
        Self::UnsupportedPatch {
            message: message.into(),
        }
    }

    pub fn patch_apply(message: impl Into<String>) -> Self {
        Self::PatchApply {
            message: message.into(),
        }
    }

    pub fn unsupported_filter(construct: impl Into<String>, supported: impl Into<String>) -> Self {
        Self::UnsupportedFilter {
            construct: construct.into(),
            supported: supported.into(),
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// HTTP status the protocol layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Conflict { .. } | Self::DuplicateAttribute { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::PreconditionFailed(_) => 412,
            Self::MalformedPatch { .. } | Self::PatchApply { .. } => 400,
            Self::UnsupportedPatch { .. } | Self::UnsupportedFilter { .. } => 501,
            Self::InvalidConfiguration { .. } | Self::Json(_) => 500,
        }
    }

    /// RFC 7644 `scimType` detail keyword, where one applies.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::Conflict { .. } | Self::DuplicateAttribute { .. } => Some("uniqueness"),
            Self::MalformedPatch { .. } => Some("invalidPath"),
            Self::PatchApply { .. } => Some("invalidValue"),
            _ => None,
        }
    }

    /// Whether the failure was caused by client input rather than by a limit of this store.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias for store operations.
pub type ScimResult<T> = Result<T, ScimError>;
