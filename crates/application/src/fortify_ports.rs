use async_trait::async_trait;
use fortify_bridge_core::SyncResult;
use fortify_bridge_domain::{
    ApplicationVersionQuery, ApplicationVersionRecord, AttributeDefinition, AttributeValuePayload,
    CommitApplicationRequest, CreateApplicationRequest, MappingEntry,
};

/// Port for Fortify application version lookups and mutations.
#[async_trait]
pub trait ApplicationVersionApi: Send + Sync {
    /// Returns application versions matching the query. Empty means not found.
    async fn lookup_application_versions(
        &self,
        query: &ApplicationVersionQuery,
    ) -> SyncResult<Vec<ApplicationVersionRecord>>;

    /// Creates an application version and returns its id.
    async fn create_application_version(&self, request: &CreateApplicationRequest)
    -> SyncResult<i64>;

    /// Replaces the attribute values of an application version and returns the HTTP status.
    async fn update_attributes(
        &self,
        application_id: i64,
        payload: &[AttributeValuePayload],
    ) -> SyncResult<u16>;

    /// Commits an application version and returns the HTTP status.
    async fn commit_application_version(
        &self,
        application_id: i64,
        request: &CommitApplicationRequest,
    ) -> SyncResult<u16>;

    /// Deletes an application version and returns the HTTP status.
    ///
    /// Provisioning never calls this; it lets callers clean up orphaned versions.
    async fn delete_application_version(&self, application_id: i64) -> SyncResult<u16>;
}

/// Port reading Fortify's application attribute definitions.
#[async_trait]
pub trait AttributeDefinitionCatalog: Send + Sync {
    /// Fetches the current attribute definitions.
    async fn fetch_definitions(&self) -> SyncResult<Vec<AttributeDefinition>>;
}

/// Configured attribute values keyed by attribute display name.
pub trait AttributeValueSource: Send + Sync {
    /// Returns the configured raw value for an attribute.
    fn value_for(&self, attribute_name: &str) -> Option<String>;

    /// Describes where values are configured, for error messages.
    fn location(&self) -> String;
}

/// Source of the Hub → Fortify mapping definition.
#[async_trait]
pub trait MappingSource: Send + Sync {
    /// Loads and validates every mapping entry. Fails as a whole.
    async fn load_entries(&self) -> SyncResult<Vec<MappingEntry>>;

    /// Describes the source for logs.
    fn describe(&self) -> String;
}
