use chrono::NaiveDate;
use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{
    AttributeDefinition, AttributeScalar, AttributeType, AttributeValuePayload, OptionValue,
};
use tracing::debug;

use crate::{AttributeValueSource, MultipleValueValidation, ProvisioningPolicy};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_EXPECTATION: &str = "date (expected format yyyy-MM-dd)";

/// Builds the attribute payload committed with a new application version.
#[derive(Debug, Clone, Copy)]
pub struct AttributeValueBuilder<'a> {
    policy: &'a ProvisioningPolicy,
}

impl<'a> AttributeValueBuilder<'a> {
    /// Creates a builder for one policy.
    #[must_use]
    pub fn new(policy: &'a ProvisioningPolicy) -> Self {
        Self { policy }
    }

    /// Returns the baseline entries followed by one entry per required definition.
    pub fn build(
        &self,
        definitions: &[AttributeDefinition],
        values: &dyn AttributeValueSource,
    ) -> SyncResult<Vec<AttributeValuePayload>> {
        let mut payload = self.policy.baseline_attributes.clone();

        for definition in definitions {
            if self.policy.is_reserved(definition) {
                continue;
            }

            let raw_value = values
                .value_for(definition.name().trim())
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| SyncError::MissingAttributeValue {
                    attribute: definition.name().to_owned(),
                    location: values.location(),
                })?;

            debug!(
                attribute_id = definition.id(),
                attribute = %definition.name(),
                attribute_type = %definition.attribute_type(),
                "building attribute value"
            );
            payload.push(self.build_one(definition, raw_value.as_str())?);
        }

        Ok(payload)
    }

    fn build_one(
        &self,
        definition: &AttributeDefinition,
        raw_value: &str,
    ) -> SyncResult<AttributeValuePayload> {
        let id = definition.id();
        let trimmed = raw_value.trim();

        let payload = match definition.attribute_type() {
            AttributeType::Single => {
                let option = definition
                    .find_option(trimmed)
                    .ok_or_else(|| invalid_option(definition, raw_value))?;
                AttributeValuePayload::options(id, vec![OptionValue::new(option.guid())])
            }
            AttributeType::Multiple => {
                AttributeValuePayload::options(id, self.multiple_values(definition, raw_value)?)
            }
            AttributeType::Integer => {
                let parsed = trimmed.parse::<i64>().map_err(|_| SyncError::AttributeType {
                    attribute: definition.name().to_owned(),
                    value: raw_value.to_owned(),
                    expected: definition.attribute_type().to_string(),
                })?;
                AttributeValuePayload::scalar(id, AttributeScalar::Integer(parsed))
            }
            AttributeType::Boolean => AttributeValuePayload::scalar(
                id,
                AttributeScalar::Boolean(trimmed.eq_ignore_ascii_case("true")),
            ),
            AttributeType::Date => {
                // Zero-padded four-digit years only: the text must survive a format round-trip.
                let is_padded_date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                    .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == trimmed);
                if !is_padded_date {
                    return Err(SyncError::AttributeType {
                        attribute: definition.name().to_owned(),
                        value: raw_value.to_owned(),
                        expected: DATE_EXPECTATION.to_owned(),
                    });
                }
                AttributeValuePayload::scalar(id, AttributeScalar::Text(trimmed.to_owned()))
            }
            AttributeType::Text
            | AttributeType::LongText
            | AttributeType::SensitiveText
            | AttributeType::Other(_) => {
                AttributeValuePayload::scalar(id, AttributeScalar::Text(trimmed.to_owned()))
            }
        };

        Ok(payload)
    }

    fn multiple_values(
        &self,
        definition: &AttributeDefinition,
        raw_value: &str,
    ) -> SyncResult<Vec<OptionValue>> {
        let tokens: Vec<&str> = raw_value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(invalid_option(definition, raw_value));
        }

        tokens
            .iter()
            .enumerate()
            .map(|(position, token)| {
                let must_match = position == 0
                    || self.policy.multiple_value_validation == MultipleValueValidation::EveryToken;
                match definition.find_option(token) {
                    Some(option) => Ok(OptionValue::new(option.guid())),
                    None if must_match => Err(invalid_option(definition, token)),
                    None => Ok(OptionValue::new(*token)),
                }
            })
            .collect()
    }
}

fn invalid_option(definition: &AttributeDefinition, value: &str) -> SyncError {
    SyncError::InvalidOption {
        attribute: definition.name().to_owned(),
        value: value.to_owned(),
    }
}
