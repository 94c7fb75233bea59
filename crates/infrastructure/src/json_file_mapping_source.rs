use std::path::PathBuf;

use async_trait::async_trait;
use fortify_bridge_application::MappingSource;
use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{MappingEntry, parse_mapping_entries};

/// Mapping definition read from a `mapping.json` file.
#[derive(Debug, Clone)]
pub struct JsonFileMappingSource {
    path: PathBuf,
}

impl JsonFileMappingSource {
    /// Creates a source for a mapping file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MappingSource for JsonFileMappingSource {
    async fn load_entries(&self) -> SyncResult<Vec<MappingEntry>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| {
                SyncError::MappingLoad(format!(
                    "error reading the mapping file '{}': {error}",
                    self.path.display()
                ))
            })?;

        parse_mapping_entries(contents.as_str()).map_err(|error| {
            SyncError::MappingLoad(format!("{}: {error}", self.path.display()))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fortify_bridge_application::MappingSource;
    use fortify_bridge_core::SyncError;

    use super::JsonFileMappingSource;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fortify-bridge-{}-{name}.json",
            std::process::id()
        ));
        if let Err(error) = std::fs::write(&path, contents) {
            panic!("failed to write scratch file: {error}");
        }
        path
    }

    #[tokio::test]
    async fn loads_entries_from_file() {
        let path = scratch_file(
            "mapping-ok",
            r#"[
                {"hubProject":"A","hubProjectVersion":"1.0","fortifyApplication":"App1","fortifyApplicationVersion":"v1"},
                {"hubProject":"B","hubProjectVersion":"2.0","fortifyApplication":"App1","fortifyApplicationVersion":"v1"}
            ]"#,
        );

        let entries = JsonFileMappingSource::new(&path).load_entries().await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(entries.map(|entries| entries.len()), Ok(2));
    }

    #[tokio::test]
    async fn missing_file_is_a_mapping_load_error() {
        let source = JsonFileMappingSource::new("/nonexistent/fortify-bridge/mapping.json");

        let result = source.load_entries().await;

        assert!(matches!(result, Err(SyncError::MappingLoad(message)) if message.contains("mapping.json")));
    }

    #[tokio::test]
    async fn malformed_file_fails_the_whole_load() {
        let path = scratch_file(
            "mapping-bad",
            r#"[{"hubProject":"A","hubProjectVersion":"1.0","fortifyApplication":"App1","fortifyApplicationVersion":"v1"},{"hubProject":"B"}]"#,
        );

        let result = JsonFileMappingSource::new(&path).load_entries().await;
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(SyncError::MappingLoad(_))));
    }
}
