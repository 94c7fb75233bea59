use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fortify_bridge_application::AttributeValueSource;
use fortify_bridge_core::{SyncError, SyncResult};
use serde_json::Value;

/// Attribute values read from a JSON object keyed by attribute display name.
#[derive(Debug, Clone)]
pub struct JsonAttributeValues {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonAttributeValues {
    /// Reads the attribute values file.
    pub async fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = tokio::fs::read_to_string(&path).await.map_err(|error| {
            SyncError::Configuration(format!(
                "error reading the attribute values file '{}': {error}",
                path.display()
            ))
        })?;

        Self::from_json(path, contents.as_str())
    }

    /// Parses attribute values from JSON text. Numbers and booleans are kept as text.
    pub fn from_json(path: impl Into<PathBuf>, json: &str) -> SyncResult<Self> {
        let path = path.into();
        let object = serde_json::from_str::<serde_json::Map<String, Value>>(json).map_err(
            |error| {
                SyncError::Configuration(format!(
                    "attribute values file '{}' must be a JSON object: {error}",
                    path.display()
                ))
            },
        )?;

        let mut values = HashMap::with_capacity(object.len());
        for (name, value) in object {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null => continue,
                other => {
                    return Err(SyncError::Configuration(format!(
                        "attribute '{name}' in '{}' must be a string, number or boolean, found {other}",
                        path.display()
                    )));
                }
            };
            values.insert(name.trim().to_owned(), text);
        }

        Ok(Self { path, values })
    }
}

impl AttributeValueSource for JsonAttributeValues {
    fn value_for(&self, attribute_name: &str) -> Option<String> {
        self.values.get(attribute_name).cloned()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
