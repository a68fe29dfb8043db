//! Content-derived resource versions for optimistic concurrency.
//!
//! Every stored record carries a version computed from its serialized content.
//! Callers that read a record can pass its version back on update; the store
//! rejects the update with a [`VersionConflict`] if the record changed in
//! between. Versions come in two formats distinguished at compile time:
//!
//! * [`RawVersion`] - the opaque string as stored (`abc123`)
//! * [`HttpVersion`] - the weak ETag form used on the wire (`W/"abc123"`)
//!
//! ```rust
//! use scim_resource_store::resource::version::{HttpVersion, RawVersion};
//!
//! let raw = RawVersion::from_content(br#"{"id":"1","displayName":"ops"}"#);
//! let etag = HttpVersion::from(raw.clone()).to_string();
//! let parsed: HttpVersion = etag.parse().unwrap();
//! assert_eq!(raw, parsed);
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{fmt, marker::PhantomData, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct Http;

#[derive(Debug, Clone, Copy)]
pub struct Raw;

/// Opaque version identifier with a phantom format marker.
#[derive(Debug, Clone, Eq, Hash)]
pub struct ScimVersion<Format> {
    opaque: String,
    _format: PhantomData<Format>,
}

/// Weak ETag format (`W/"abc123"`).
pub type HttpVersion = ScimVersion<Http>;

/// Raw internal format (`abc123`).
pub type RawVersion = ScimVersion<Raw>;

impl<Format> ScimVersion<Format> {
    /// Hash resource content into a version.
    ///
    /// SHA-256 over the bytes, truncated to the first 8 bytes and base64 encoded
    /// to keep ETags short.
    pub fn from_content(content: &[u8]) -> RawVersion {
        let hash = Sha256::digest(content);
        ScimVersion {
            opaque: BASE64.encode(&hash[..8]),
            _format: PhantomData,
        }
    }

    /// Wrap a pre-computed version string.
    pub fn from_hash(hash_string: impl AsRef<str>) -> RawVersion {
        ScimVersion {
            opaque: hash_string.as_ref().to_string(),
            _format: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.opaque
    }
}

impl fmt::Display for ScimVersion<Raw> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opaque)
    }
}

impl fmt::Display for ScimVersion<Http> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W/\"{}\"", self.opaque)
    }
}

impl FromStr for ScimVersion<Raw> {
    type Err = VersionError;

    fn from_str(version_str: &str) -> Result<Self, Self::Err> {
        let trimmed = version_str.trim();
        if trimmed.is_empty() {
            return Err(VersionError::ParseError(
                "Version string cannot be empty".to_string(),
            ));
        }
        Ok(Self::from_hash(trimmed))
    }
}

impl FromStr for ScimVersion<Http> {
    type Err = VersionError;

    fn from_str(etag_header: &str) -> Result<Self, Self::Err> {
        let trimmed = etag_header.trim();
        let etag_value = trimmed.strip_prefix("W/").unwrap_or(trimmed);

        let opaque = etag_value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .filter(|opaque| !opaque.is_empty())
            .ok_or_else(|| VersionError::InvalidEtagFormat(etag_header.to_string()))?;

        Ok(ScimVersion {
            opaque: opaque.to_string(),
            _format: PhantomData,
        })
    }
}

impl From<ScimVersion<Raw>> for ScimVersion<Http> {
    fn from(raw: ScimVersion<Raw>) -> Self {
        ScimVersion {
            opaque: raw.opaque,
            _format: PhantomData,
        }
    }
}

impl From<ScimVersion<Http>> for ScimVersion<Raw> {
    fn from(http: ScimVersion<Http>) -> Self {
        ScimVersion {
            opaque: http.opaque,
            _format: PhantomData,
        }
    }
}

// Versions are equal across formats when the opaque strings match
impl<F1, F2> PartialEq<ScimVersion<F2>> for ScimVersion<F1> {
    fn eq(&self, other: &ScimVersion<F2>) -> bool {
        self.opaque == other.opaque
    }
}

impl<Format> Serialize for ScimVersion<Format> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.opaque.serialize(serializer)
    }
}

impl<'de, Format> Deserialize<'de> for ScimVersion<Format> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opaque = String::deserialize(deserializer)?;
        Ok(ScimVersion {
            opaque,
            _format: PhantomData,
        })
    }
}

/// Expected and current versions of a record that changed under the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConflict {
    /// The version the caller read
    pub expected: RawVersion,
    /// The version currently stored
    pub current: RawVersion,
    pub message: String,
}

impl VersionConflict {
    pub fn new<E, C>(expected: E, current: C, message: impl Into<String>) -> Self
    where
        E: Into<RawVersion>,
        C: Into<RawVersion>,
    {
        Self {
            expected: expected.into(),
            current: current.into(),
            message: message.into(),
        }
    }

    pub fn standard_message<E, C>(expected: E, current: C) -> Self
    where
        E: Into<RawVersion>,
        C: Into<RawVersion>,
    {
        Self::new(
            expected,
            current,
            "Resource was modified by another client. Please refresh and try again.",
        )
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version conflict: expected '{}', found '{}'. {}",
            self.expected, self.current, self.message
        )
    }
}

impl std::error::Error for VersionConflict {}

/// Errors that can occur while parsing versions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VersionError {
    #[error("Invalid ETag format: {0}")]
    InvalidEtagFormat(String),

    #[error("Failed to parse version: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_content() {
        let version1 = RawVersion::from_content(b"test content");
        let version2 = RawVersion::from_content(b"test content");
        let version3 = RawVersion::from_content(b"different content");

        assert_eq!(version1, version2);
        assert_ne!(version1, version3);
        // 8 bytes base64 encoded
        assert_eq!(version1.as_str().len(), 12);
    }

    #[test]
    fn test_http_version_parse() {
        let weak: HttpVersion = "W/\"abc123\"".parse().unwrap();
        assert_eq!(weak.as_str(), "abc123");

        let strong: HttpVersion = "\"xyz789\"".parse().unwrap();
        assert_eq!(strong.as_str(), "xyz789");

        assert!("invalid".parse::<HttpVersion>().is_err());
        assert!("\"\"".parse::<HttpVersion>().is_err());
        assert!("W/invalid".parse::<HttpVersion>().is_err());
        assert!("\"".parse::<HttpVersion>().is_err());
    }

    #[test]
    fn test_raw_version_parse() {
        let version: RawVersion = " abc123def ".parse().unwrap();
        assert_eq!(version.as_str(), "abc123def");
        assert!("".parse::<RawVersion>().is_err());
        assert!("   ".parse::<RawVersion>().is_err());
    }

    #[test]
    fn test_format_display() {
        let raw_version = RawVersion::from_hash("abc123");
        let http_version = HttpVersion::from(raw_version.clone());

        assert_eq!(raw_version.to_string(), "abc123");
        assert_eq!(http_version.to_string(), "W/\"abc123\"");
        assert_eq!(raw_version, http_version);
    }

    #[test]
    fn test_version_conflict_display() {
        let conflict = VersionConflict::standard_message(
            RawVersion::from_hash("old"),
            RawVersion::from_hash("new"),
        );
        let display_str = conflict.to_string();
        assert!(display_str.contains("expected 'old'"));
        assert!(display_str.contains("found 'new'"));
    }

    #[test]
    fn test_version_serialization() {
        let version = RawVersion::from_hash("test123");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"test123\"");

        let deserialized: RawVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(version, deserialized);
    }
}
