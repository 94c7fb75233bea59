//! Shared primitives for all fortify-bridge crates.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across fortify-bridge crates.
pub type SyncResult<T> = Result<T, SyncError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> SyncResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SyncError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Provisioning step that ran after the application version was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningStep {
    /// Custom attribute values update.
    AttributeUpdate,
    /// Final commit of the application version.
    Commit,
}

impl ProvisioningStep {
    /// Returns a stable label for logs and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttributeUpdate => "attribute_update",
            Self::Commit => "commit",
        }
    }
}

impl Display for ProvisioningStep {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error categories of the mapping resolution and provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Mapping definition is unreadable or malformed. Aborts the whole run.
    #[error("mapping load error: {0}")]
    MappingLoad(String),

    /// Existence query or catalog read against the target system failed.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Creating the application or version failed; nothing was created.
    #[error("provisioning error: {0}")]
    Provisioning(String),

    /// A required attribute has no configured value.
    #[error("attribute value for '{attribute}' is missing in {location}")]
    MissingAttributeValue {
        /// Attribute display name.
        attribute: String,
        /// Configuration location that should hold the value.
        location: String,
    },

    /// A configured option value is not part of the attribute's option set.
    #[error("{attribute}'s attribute value \"{value}\" is not a valid option")]
    InvalidOption {
        /// Attribute display name.
        attribute: String,
        /// Offending configured value.
        value: String,
    },

    /// A configured value cannot be converted to the attribute's type.
    #[error("{attribute}'s attribute value \"{value}\" is not a valid {expected}")]
    AttributeType {
        /// Attribute display name.
        attribute: String,
        /// Offending configured value.
        value: String,
        /// Expected type, with a format hint where one applies.
        expected: String,
    },

    /// The application version was created but a later step failed.
    #[error(
        "application version {application_id} was created but the {step} step failed: {detail}"
    )]
    PartialProvisioning {
        /// Identifier of the created, uncommitted application version.
        application_id: i64,
        /// Step that failed.
        step: ProvisioningStep,
        /// Failure detail.
        detail: String,
    },

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),
}

impl SyncError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MappingLoad(_) => "mapping_load",
            Self::Lookup(_) => "lookup",
            Self::Provisioning(_) => "provisioning",
            Self::MissingAttributeValue { .. } => "missing_attribute_value",
            Self::InvalidOption { .. } => "invalid_option",
            Self::AttributeType { .. } => "attribute_type",
            Self::PartialProvisioning { .. } => "partial_provisioning",
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
        }
    }

    /// Returns the orphaned application version id for partial provisioning failures.
    #[must_use]
    pub fn orphaned_application_id(&self) -> Option<i64> {
        match self {
            Self::PartialProvisioning { application_id, .. } => Some(*application_id),
            _ => None,
        }
    }
}
