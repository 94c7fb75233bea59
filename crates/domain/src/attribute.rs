use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Value type of a Fortify custom attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    /// One option out of the attribute's option set.
    Single,
    /// Several options out of the attribute's option set.
    Multiple,
    /// Short text.
    Text,
    /// Long text.
    LongText,
    /// Text hidden in the Fortify UI.
    SensitiveText,
    /// Whole number.
    Integer,
    /// True or false.
    Boolean,
    /// Calendar date in `yyyy-MM-dd` form.
    Date,
    /// Type name this client does not know about.
    Other(String),
}

impl AttributeType {
    /// Returns the Fortify wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Single => "SINGLE",
            Self::Multiple => "MULTIPLE",
            Self::Text => "TEXT",
            Self::LongText => "LONG_TEXT",
            Self::SensitiveText => "SENSITIVE_TEXT",
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns whether values are picked from the option set.
    #[must_use]
    pub fn uses_options(&self) -> bool {
        matches!(self, Self::Single | Self::Multiple)
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SINGLE" => Self::Single,
            "MULTIPLE" => Self::Multiple,
            "TEXT" => Self::Text,
            "LONG_TEXT" => Self::LongText,
            "SENSITIVE_TEXT" => Self::SensitiveText,
            "INTEGER" => Self::Integer,
            "BOOLEAN" => Self::Boolean,
            "DATE" => Self::Date,
            _ => Self::Other(value),
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for AttributeType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One selectable option of a SINGLE or MULTIPLE attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeOption {
    guid: String,
    #[serde(rename = "name", alias = "label", default)]
    label: String,
}

impl AttributeOption {
    /// Creates an option.
    #[must_use]
    pub fn new(guid: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            label: label.into(),
        }
    }

    /// Returns the option guid sent back in attribute payloads.
    #[must_use]
    pub fn guid(&self) -> &str {
        self.guid.as_str()
    }

    /// Returns the option display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

/// Fortify metadata describing one custom attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    attribute_type: AttributeType,
    #[serde(default)]
    category: String,
    #[serde(default)]
    object_type: Option<String>,
    #[serde(default)]
    options: Vec<AttributeOption>,
}

impl AttributeDefinition {
    /// Creates an attribute definition without options.
    #[must_use]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        attribute_type: AttributeType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            attribute_type,
            category: category.into(),
            object_type: None,
            options: Vec::new(),
        }
    }

    /// Returns the definition with the given option set.
    #[must_use]
    pub fn with_options(mut self, options: Vec<AttributeOption>) -> Self {
        self.options = options;
        self
    }

    /// Returns the definition id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the display name, also used as the configuration key.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the value type.
    #[must_use]
    pub fn attribute_type(&self) -> &AttributeType {
        &self.attribute_type
    }

    /// Returns the attribute category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Returns the Fortify object type the attribute applies to, when reported.
    #[must_use]
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// Returns the option set.
    #[must_use]
    pub fn options(&self) -> &[AttributeOption] {
        self.options.as_slice()
    }

    /// Finds an option whose guid matches `value` ignoring ASCII case.
    #[must_use]
    pub fn find_option(&self, value: &str) -> Option<&AttributeOption> {
        self.options
            .iter()
            .find(|option| option.guid.eq_ignore_ascii_case(value))
    }
}

/// Selected option reference inside an attribute payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    guid: String,
}

impl OptionValue {
    /// Creates an option reference.
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self { guid: guid.into() }
    }

    /// Returns the referenced option guid.
    #[must_use]
    pub fn guid(&self) -> &str {
        self.guid.as_str()
    }
}

/// Typed scalar value of a non-option attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeScalar {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Text value, also used for dates.
    Text(String),
}

/// Attribute value sent to Fortify for one attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValuePayload {
    attribute_definition_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<OptionValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<AttributeScalar>,
}

impl AttributeValuePayload {
    /// Creates an option-based payload.
    #[must_use]
    pub fn options(attribute_definition_id: i64, values: Vec<OptionValue>) -> Self {
        Self {
            attribute_definition_id,
            values: Some(values),
            value: None,
        }
    }

    /// Creates a scalar payload.
    #[must_use]
    pub fn scalar(attribute_definition_id: i64, value: AttributeScalar) -> Self {
        Self {
            attribute_definition_id,
            values: None,
            value: Some(value),
        }
    }

    /// Returns the attribute definition id.
    #[must_use]
    pub fn attribute_definition_id(&self) -> i64 {
        self.attribute_definition_id
    }

    /// Returns the selected options, for option-based payloads.
    #[must_use]
    pub fn values(&self) -> Option<&[OptionValue]> {
        self.values.as_deref()
    }

    /// Returns the scalar value, for scalar payloads.
    #[must_use]
    pub fn value(&self) -> Option<&AttributeScalar> {
        self.value.as_ref()
    }
}
