use std::sync::Arc;

use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{
    ApplicationVersionQuery, ApplicationVersionRecord, CreateApplicationRequest, MappingGroupKey,
    ResolutionPath,
};
use tracing::info;

use crate::{ApplicationVersionApi, ProvisioningService};

/// Finds the Fortify application version for a group key, creating it when absent.
#[derive(Clone)]
pub struct ApplicationResolver {
    application_versions: Arc<dyn ApplicationVersionApi>,
    provisioning_service: ProvisioningService,
}

impl ApplicationResolver {
    /// Creates a new resolver.
    #[must_use]
    pub fn new(
        application_versions: Arc<dyn ApplicationVersionApi>,
        provisioning_service: ProvisioningService,
    ) -> Self {
        Self {
            application_versions,
            provisioning_service,
        }
    }

    /// Resolves one key to an application version id.
    ///
    /// Lookup failures are returned as [`SyncError::Lookup`] and never read as "not found".
    pub async fn resolve(&self, key: &MappingGroupKey) -> SyncResult<(i64, ResolutionPath)> {
        let exact = ApplicationVersionQuery::ExactVersion {
            application_name: key.application_name().clone(),
            version_name: key.application_version().clone(),
        };
        if let Some(existing) = self.lookup(&exact).await?.first() {
            info!(
                group = %key,
                application_id = existing.id(),
                "fortify application version found"
            );
            return Ok((existing.id(), ResolutionPath::Existing));
        }

        let any_version = ApplicationVersionQuery::AnyVersionOf {
            application_name: key.application_name().clone(),
        };
        let template = &self.provisioning_service.policy().creation_template;
        let (request, path) = match self.lookup(&any_version).await?.first() {
            Some(sibling) => {
                let parent_application_id = sibling.project().map(|project| project.id()).ok_or_else(
                    || {
                        SyncError::Lookup(format!(
                            "application lookup for '{}' returned no parent application",
                            key.application_name()
                        ))
                    },
                )?;
                info!(
                    group = %key,
                    parent_application_id,
                    "fortify application found, creating version"
                );
                (
                    CreateApplicationRequest::version_only(
                        parent_application_id,
                        key.application_version(),
                        template,
                    ),
                    ResolutionPath::NewVersion {
                        parent_application_id,
                    },
                )
            }
            None => {
                info!(group = %key, "fortify application not found, creating application");
                (
                    CreateApplicationRequest::application_and_version(
                        key.application_name(),
                        key.application_version(),
                        template,
                    ),
                    ResolutionPath::NewApplication,
                )
            }
        };

        let result = self.provisioning_service.provision(&request).await?;
        Ok((result.application_id, path))
    }

    async fn lookup(
        &self,
        query: &ApplicationVersionQuery,
    ) -> SyncResult<Vec<ApplicationVersionRecord>> {
        info!(query = %query, fields = query.fields(), "querying fortify");
        self.application_versions
            .lookup_application_versions(query)
            .await
            .map_err(|error| match error {
                SyncError::Lookup(_) => error,
                other => SyncError::Lookup(format!("query '{query}' failed: {other}")),
            })
    }
}
