use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use fortify_bridge_core::{NonEmptyString, SyncError, SyncResult};
use serde::{Deserialize, Serialize};

/// One declared link between a Hub project version and a Fortify application version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    #[serde(rename = "hubProject")]
    source_project: NonEmptyString,
    #[serde(rename = "hubProjectVersion")]
    source_project_version: NonEmptyString,
    #[serde(rename = "fortifyApplication")]
    target_application_name: NonEmptyString,
    #[serde(rename = "fortifyApplicationVersion")]
    target_application_version: NonEmptyString,
}

impl MappingEntry {
    /// Creates a validated mapping entry.
    pub fn new(
        source_project: impl Into<String>,
        source_project_version: impl Into<String>,
        target_application_name: impl Into<String>,
        target_application_version: impl Into<String>,
    ) -> SyncResult<Self> {
        Ok(Self {
            source_project: NonEmptyString::new(source_project)?,
            source_project_version: NonEmptyString::new(source_project_version)?,
            target_application_name: NonEmptyString::new(target_application_name)?,
            target_application_version: NonEmptyString::new(target_application_version)?,
        })
    }

    /// Returns the Hub project name.
    #[must_use]
    pub fn source_project(&self) -> &NonEmptyString {
        &self.source_project
    }

    /// Returns the Hub project version name.
    #[must_use]
    pub fn source_project_version(&self) -> &NonEmptyString {
        &self.source_project_version
    }

    /// Returns the Fortify application name.
    #[must_use]
    pub fn target_application_name(&self) -> &NonEmptyString {
        &self.target_application_name
    }

    /// Returns the Fortify application version name.
    #[must_use]
    pub fn target_application_version(&self) -> &NonEmptyString {
        &self.target_application_version
    }

    /// Returns the grouping key of the target application version.
    #[must_use]
    pub fn group_key(&self) -> MappingGroupKey {
        MappingGroupKey::new(
            self.target_application_name.clone(),
            self.target_application_version.clone(),
        )
    }

    fn source(&self) -> SourceProjectVersion {
        SourceProjectVersion {
            project: self.source_project.clone(),
            version: self.source_project_version.clone(),
        }
    }
}

/// Hub project version contributing to a mapping group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceProjectVersion {
    project: NonEmptyString,
    version: NonEmptyString,
}

impl SourceProjectVersion {
    /// Creates a validated source project version.
    pub fn new(project: impl Into<String>, version: impl Into<String>) -> SyncResult<Self> {
        Ok(Self {
            project: NonEmptyString::new(project)?,
            version: NonEmptyString::new(version)?,
        })
    }

    /// Returns the Hub project name.
    #[must_use]
    pub fn project(&self) -> &NonEmptyString {
        &self.project
    }

    /// Returns the Hub project version name.
    #[must_use]
    pub fn version(&self) -> &NonEmptyString {
        &self.version
    }
}

/// Identity of a Fortify application version inside one mapping load.
///
/// Compared structurally on `(application, version)`; the `application_version`
/// string form is only used for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingGroupKey {
    application_name: NonEmptyString,
    application_version: NonEmptyString,
}

impl MappingGroupKey {
    /// Creates a key from an application name and version.
    #[must_use]
    pub fn new(application_name: NonEmptyString, application_version: NonEmptyString) -> Self {
        Self {
            application_name,
            application_version,
        }
    }

    /// Returns the application name part.
    #[must_use]
    pub fn application_name(&self) -> &NonEmptyString {
        &self.application_name
    }

    /// Returns the application version part.
    #[must_use]
    pub fn application_version(&self) -> &NonEmptyString {
        &self.application_version
    }
}

impl Display for MappingGroupKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}_{}",
            self.application_name, self.application_version
        )
    }
}

/// All Hub project versions that feed one Fortify application version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingGroup {
    target_application_name: NonEmptyString,
    target_application_version: NonEmptyString,
    target_application_id: Option<i64>,
    source_project_versions: Vec<SourceProjectVersion>,
}

impl MappingGroup {
    /// Creates an unresolved group seeded with its first source project version.
    #[must_use]
    pub fn new(key: MappingGroupKey, first_source: SourceProjectVersion) -> Self {
        Self {
            target_application_name: key.application_name,
            target_application_version: key.application_version,
            target_application_id: None,
            source_project_versions: vec![first_source],
        }
    }

    /// Returns the Fortify application name.
    #[must_use]
    pub fn target_application_name(&self) -> &NonEmptyString {
        &self.target_application_name
    }

    /// Returns the Fortify application version name.
    #[must_use]
    pub fn target_application_version(&self) -> &NonEmptyString {
        &self.target_application_version
    }

    /// Returns the resolved Fortify application version id, if known.
    #[must_use]
    pub fn target_application_id(&self) -> Option<i64> {
        self.target_application_id
    }

    /// Returns the contributing Hub project versions in mapping order.
    #[must_use]
    pub fn source_project_versions(&self) -> &[SourceProjectVersion] {
        self.source_project_versions.as_slice()
    }

    /// Returns the group key.
    #[must_use]
    pub fn key(&self) -> MappingGroupKey {
        MappingGroupKey::new(
            self.target_application_name.clone(),
            self.target_application_version.clone(),
        )
    }

    /// Returns a copy of the group carrying the resolved application version id.
    #[must_use]
    pub fn with_application_id(mut self, application_id: i64) -> Self {
        self.target_application_id = Some(application_id);
        self
    }

    fn push_source(&mut self, source: SourceProjectVersion) {
        self.source_project_versions.push(source);
    }
}

/// Parses a JSON mapping definition into validated entries.
///
/// Any syntax error or empty field fails the whole load.
pub fn parse_mapping_entries(json: &str) -> SyncResult<Vec<MappingEntry>> {
    serde_json::from_str::<Vec<MappingEntry>>(json)
        .map_err(|error| SyncError::MappingLoad(format!("invalid mapping definition: {error}")))
}

/// Folds mapping entries into groups keyed by target application version.
///
/// Groups keep first-seen key order and each group's sources keep entry order.
#[must_use]
pub fn group_mapping_entries(entries: &[MappingEntry]) -> Vec<MappingGroup> {
    let mut groups: Vec<MappingGroup> = Vec::new();
    let mut positions: HashMap<MappingGroupKey, usize> = HashMap::new();

    for entry in entries {
        let key = entry.group_key();
        match positions.get(&key) {
            Some(position) => groups[*position].push_source(entry.source()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(MappingGroup::new(key, entry.source()));
            }
        }
    }

    groups
}
