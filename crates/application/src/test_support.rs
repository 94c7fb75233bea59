use std::collections::HashMap;

use async_trait::async_trait;
use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{
    ApplicationRef, ApplicationVersionQuery, ApplicationVersionRecord, AttributeDefinition,
    AttributeValuePayload, CommitApplicationRequest, CreateApplicationRequest, MappingEntry,
};
use tokio::sync::Mutex;

use crate::{ApplicationVersionApi, AttributeDefinitionCatalog, AttributeValueSource, MappingSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FortifyCall {
    Lookup(String),
    Create(CreateApplicationRequest),
    UpdateAttributes(i64, Vec<AttributeValuePayload>),
    Commit(i64),
    Delete(i64),
    FetchDefinitions,
}

struct StoredVersion {
    application_name: String,
    version_name: String,
    version_id: i64,
    application_id: i64,
}

struct FakeFortifyState {
    versions: Vec<StoredVersion>,
    definitions: Vec<AttributeDefinition>,
    next_id: i64,
    calls: Vec<FortifyCall>,
    lookup_failure: Option<SyncError>,
    create_failure: Option<SyncError>,
    catalog_failure: Option<SyncError>,
    update_status: u16,
    commit_status: u16,
}

pub(crate) struct FakeFortify {
    state: Mutex<FakeFortifyState>,
}

impl FakeFortify {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeFortifyState {
                versions: Vec::new(),
                definitions: Vec::new(),
                next_id: 1000,
                calls: Vec::new(),
                lookup_failure: None,
                create_failure: None,
                catalog_failure: None,
                update_status: 201,
                commit_status: 201,
            }),
        }
    }

    pub(crate) fn with_version(
        mut self,
        application_name: &str,
        version_name: &str,
        version_id: i64,
        application_id: i64,
    ) -> Self {
        self.state.get_mut().versions.push(StoredVersion {
            application_name: application_name.to_owned(),
            version_name: version_name.to_owned(),
            version_id,
            application_id,
        });
        self
    }

    pub(crate) fn with_definitions(mut self, definitions: Vec<AttributeDefinition>) -> Self {
        self.state.get_mut().definitions = definitions;
        self
    }

    pub(crate) fn with_lookup_failure(mut self, error: SyncError) -> Self {
        self.state.get_mut().lookup_failure = Some(error);
        self
    }

    pub(crate) fn with_create_failure(mut self, error: SyncError) -> Self {
        self.state.get_mut().create_failure = Some(error);
        self
    }

    pub(crate) fn with_catalog_failure(mut self, error: SyncError) -> Self {
        self.state.get_mut().catalog_failure = Some(error);
        self
    }

    pub(crate) fn with_update_status(mut self, status: u16) -> Self {
        self.state.get_mut().update_status = status;
        self
    }

    pub(crate) fn with_commit_status(mut self, status: u16) -> Self {
        self.state.get_mut().commit_status = status;
        self
    }

    pub(crate) async fn calls(&self) -> Vec<FortifyCall> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn creates(&self) -> Vec<CreateApplicationRequest> {
        self.calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                FortifyCall::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub(crate) async fn count(&self, matches: fn(&FortifyCall) -> bool) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| matches(call))
            .count()
    }
}

#[async_trait]
impl ApplicationVersionApi for FakeFortify {
    async fn lookup_application_versions(
        &self,
        query: &ApplicationVersionQuery,
    ) -> SyncResult<Vec<ApplicationVersionRecord>> {
        let mut state = self.state.lock().await;
        state.calls.push(FortifyCall::Lookup(query.expression()));
        if let Some(error) = state.lookup_failure.clone() {
            return Err(error);
        }

        let records = match query {
            ApplicationVersionQuery::ExactVersion {
                application_name,
                version_name,
            } => state
                .versions
                .iter()
                .filter(|stored| {
                    stored.application_name == application_name.as_str()
                        && stored.version_name == version_name.as_str()
                })
                .map(|stored| ApplicationVersionRecord::new(stored.version_id, None))
                .collect(),
            ApplicationVersionQuery::AnyVersionOf { application_name } => state
                .versions
                .iter()
                .filter(|stored| stored.application_name == application_name.as_str())
                .map(|stored| {
                    ApplicationVersionRecord::new(
                        stored.version_id,
                        Some(ApplicationRef::new(
                            stored.application_id,
                            Some(stored.application_name.clone()),
                        )),
                    )
                })
                .collect(),
        };

        Ok(records)
    }

    async fn create_application_version(
        &self,
        request: &CreateApplicationRequest,
    ) -> SyncResult<i64> {
        let mut state = self.state.lock().await;
        state.calls.push(FortifyCall::Create(request.clone()));
        if let Some(error) = state.create_failure.clone() {
            return Err(error);
        }

        state.next_id += 1;
        let version_id = state.next_id;
        let (application_id, application_name) = match request.parent_application_id() {
            Some(parent_id) => {
                let parent_id = parent_id.parse::<i64>().map_err(|error| {
                    SyncError::Provisioning(format!("invalid parent id: {error}"))
                })?;
                let name = state
                    .versions
                    .iter()
                    .find(|stored| stored.application_id == parent_id)
                    .map(|stored| stored.application_name.clone())
                    .ok_or_else(|| {
                        SyncError::Provisioning(format!("unknown application {parent_id}"))
                    })?;
                (parent_id, name)
            }
            None => {
                state.next_id += 1;
                (
                    state.next_id,
                    request.application_name().unwrap_or_default().to_owned(),
                )
            }
        };

        state.versions.push(StoredVersion {
            application_name,
            version_name: request.version_name().to_owned(),
            version_id,
            application_id,
        });

        Ok(version_id)
    }

    async fn update_attributes(
        &self,
        application_id: i64,
        payload: &[AttributeValuePayload],
    ) -> SyncResult<u16> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(FortifyCall::UpdateAttributes(application_id, payload.to_vec()));
        Ok(state.update_status)
    }

    async fn commit_application_version(
        &self,
        application_id: i64,
        _request: &CommitApplicationRequest,
    ) -> SyncResult<u16> {
        let mut state = self.state.lock().await;
        state.calls.push(FortifyCall::Commit(application_id));
        Ok(state.commit_status)
    }

    async fn delete_application_version(&self, application_id: i64) -> SyncResult<u16> {
        let mut state = self.state.lock().await;
        state.calls.push(FortifyCall::Delete(application_id));
        state
            .versions
            .retain(|version| version.version_id != application_id);
        Ok(200)
    }
}

#[async_trait]
impl AttributeDefinitionCatalog for FakeFortify {
    async fn fetch_definitions(&self) -> SyncResult<Vec<AttributeDefinition>> {
        let mut state = self.state.lock().await;
        state.calls.push(FortifyCall::FetchDefinitions);
        if let Some(error) = state.catalog_failure.clone() {
            return Err(error);
        }

        Ok(state.definitions.clone())
    }
}

pub(crate) struct StaticValues(HashMap<String, String>);

impl StaticValues {
    pub(crate) fn new(values: &[(&str, &str)]) -> Self {
        Self(
            values
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
        )
    }
}

impl AttributeValueSource for StaticValues {
    fn value_for(&self, attribute_name: &str) -> Option<String> {
        self.0.get(attribute_name).cloned()
    }

    fn location(&self) -> String {
        "test attribute values".to_owned()
    }
}

pub(crate) struct StaticMappingSource(pub(crate) SyncResult<Vec<MappingEntry>>);

#[async_trait]
impl MappingSource for StaticMappingSource {
    async fn load_entries(&self) -> SyncResult<Vec<MappingEntry>> {
        self.0.clone()
    }

    fn describe(&self) -> String {
        "static mapping".to_owned()
    }
}

pub(crate) fn mapping_entry(
    project: &str,
    version: &str,
    application: &str,
    application_version: &str,
) -> MappingEntry {
    match MappingEntry::new(project, version, application, application_version) {
        Ok(entry) => entry,
        Err(error) => panic!("invalid test entry: {error}"),
    }
}
