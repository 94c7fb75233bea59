use std::ops::RangeInclusive;
use std::str::FromStr;

use fortify_bridge_core::SyncError;
use fortify_bridge_domain::{
    AttributeDefinition, AttributeValuePayload, CreationTemplate, OptionValue,
};

/// Handling of unexpected status codes from the attribute update and commit calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseCodePolicy {
    /// Unexpected status fails the group with a partial provisioning error.
    #[default]
    Strict,
    /// Unexpected status is logged and provisioning continues.
    LogOnly,
}

impl ResponseCodePolicy {
    /// Returns a stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::LogOnly => "log_only",
        }
    }
}

impl FromStr for ResponseCodePolicy {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "strict" => Ok(Self::Strict),
            "log_only" => Ok(Self::LogOnly),
            _ => Err(SyncError::Configuration(format!(
                "unknown response code policy '{value}'"
            ))),
        }
    }
}

/// Which tokens of a comma-separated MULTIPLE value are checked against the option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultipleValueValidation {
    /// Only the first token is checked; later tokens pass through unchecked.
    #[default]
    FirstToken,
    /// Every token is checked.
    EveryToken,
}

impl MultipleValueValidation {
    /// Returns a stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstToken => "first_token",
            Self::EveryToken => "every_token",
        }
    }
}

impl FromStr for MultipleValueValidation {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "first_token" => Ok(Self::FirstToken),
            "every_token" => Ok(Self::EveryToken),
            _ => Err(SyncError::Configuration(format!(
                "unknown multiple value validation mode '{value}'"
            ))),
        }
    }
}

/// Business rules applied when a new application version is provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningPolicy {
    /// Attribute ids that never need a configured value.
    pub reserved_attribute_ids: Vec<RangeInclusive<i64>>,
    /// Attribute category that never needs a configured value. Compared ignoring case.
    pub reserved_category: String,
    /// Attribute values always sent first.
    pub baseline_attributes: Vec<AttributeValuePayload>,
    /// Literals stamped onto creation requests.
    pub creation_template: CreationTemplate,
    /// Status expected from attribute update and commit.
    pub success_status: u16,
    /// Handling of unexpected update and commit statuses.
    pub response_code_policy: ResponseCodePolicy,
    /// MULTIPLE attribute validation mode.
    pub multiple_value_validation: MultipleValueValidation,
}

impl ProvisioningPolicy {
    /// Returns whether a definition is covered by the baseline or not required at creation.
    #[must_use]
    pub fn is_reserved(&self, definition: &AttributeDefinition) -> bool {
        self.reserved_attribute_ids
            .iter()
            .any(|range| range.contains(&definition.id()))
            || definition
                .category()
                .eq_ignore_ascii_case(self.reserved_category.as_str())
    }
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        let selected = |id: i64, guid: &str| {
            AttributeValuePayload::options(id, vec![OptionValue::new(guid)])
        };
        let empty = |id: i64| AttributeValuePayload::options(id, Vec::new());

        Self {
            // Ids up to 7 are the built-in Fortify attributes, 10..=12 are the
            // dynamic scan ones; the baseline below covers all of them.
            reserved_attribute_ids: vec![1..=7, 10..=12],
            reserved_category: "DYNAMIC_SCAN_REQUEST".to_owned(),
            baseline_attributes: vec![
                selected(5, "New"),
                selected(6, "Internal"),
                selected(7, "internalnetwork"),
                empty(10),
                empty(11),
                empty(12),
                selected(1, "High"),
                empty(2),
                empty(3),
                empty(4),
            ],
            creation_template: CreationTemplate::default(),
            success_status: 201,
            response_code_policy: ResponseCodePolicy::default(),
            multiple_value_validation: MultipleValueValidation::default(),
        }
    }
}
