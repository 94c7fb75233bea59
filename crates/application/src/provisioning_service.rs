use std::sync::Arc;

use fortify_bridge_core::{ProvisioningStep, SyncError, SyncResult};
use fortify_bridge_domain::{CommitApplicationRequest, CreateApplicationRequest};
use tracing::{info, warn};

use crate::{
    ApplicationVersionApi, AttributeDefinitionCatalog, AttributeValueBuilder, AttributeValueSource,
    ProvisioningPolicy, ResponseCodePolicy,
};

/// Outcome of a completed provisioning transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningResult {
    /// Id of the created and committed application version.
    pub application_id: i64,
}

/// Runs create, attribute update and commit for a new application version.
#[derive(Clone)]
pub struct ProvisioningService {
    application_versions: Arc<dyn ApplicationVersionApi>,
    attribute_catalog: Arc<dyn AttributeDefinitionCatalog>,
    attribute_values: Arc<dyn AttributeValueSource>,
    policy: Arc<ProvisioningPolicy>,
}

impl ProvisioningService {
    /// Creates a new provisioning service.
    #[must_use]
    pub fn new(
        application_versions: Arc<dyn ApplicationVersionApi>,
        attribute_catalog: Arc<dyn AttributeDefinitionCatalog>,
        attribute_values: Arc<dyn AttributeValueSource>,
        policy: Arc<ProvisioningPolicy>,
    ) -> Self {
        Self {
            application_versions,
            attribute_catalog,
            attribute_values,
            policy,
        }
    }

    /// Returns the policy used by this service.
    #[must_use]
    pub fn policy(&self) -> &ProvisioningPolicy {
        self.policy.as_ref()
    }

    /// Creates, configures and commits one application version.
    ///
    /// Attribute values are built before the create call, so configuration defects leave
    /// Fortify untouched. Failures after the create call return
    /// [`SyncError::PartialProvisioning`] carrying the created id; nothing is rolled back.
    pub async fn provision(
        &self,
        request: &CreateApplicationRequest,
    ) -> SyncResult<ProvisioningResult> {
        let definitions = self
            .attribute_catalog
            .fetch_definitions()
            .await
            .map_err(|error| match error {
                SyncError::Lookup(_) => error,
                other => SyncError::Lookup(format!(
                    "failed to read attribute definitions: {other}"
                )),
            })?;
        let attributes = AttributeValueBuilder::new(self.policy.as_ref())
            .build(definitions.as_slice(), self.attribute_values.as_ref())?;

        let application_id = self
            .application_versions
            .create_application_version(request)
            .await
            .map_err(|error| {
                SyncError::Provisioning(format!(
                    "failed to create application version '{}': {error}",
                    request.version_name()
                ))
            })?;
        info!(
            application_id,
            version = %request.version_name(),
            parent_application_id = request.parent_application_id().unwrap_or("-"),
            "created fortify application version"
        );

        let status = self
            .application_versions
            .update_attributes(application_id, attributes.as_slice())
            .await
            .map_err(|error| partial(application_id, ProvisioningStep::AttributeUpdate, error))?;
        self.check_status(application_id, ProvisioningStep::AttributeUpdate, status)?;

        let status = self
            .application_versions
            .commit_application_version(application_id, &CommitApplicationRequest::committed())
            .await
            .map_err(|error| partial(application_id, ProvisioningStep::Commit, error))?;
        self.check_status(application_id, ProvisioningStep::Commit, status)?;

        Ok(ProvisioningResult { application_id })
    }

    fn check_status(
        &self,
        application_id: i64,
        step: ProvisioningStep,
        status: u16,
    ) -> SyncResult<()> {
        if status == self.policy.success_status {
            info!(application_id, step = %step, "fortify provisioning step succeeded");
            return Ok(());
        }

        match self.policy.response_code_policy {
            ResponseCodePolicy::Strict => Err(SyncError::PartialProvisioning {
                application_id,
                step,
                detail: format!(
                    "unexpected status {status}, expected {}",
                    self.policy.success_status
                ),
            }),
            ResponseCodePolicy::LogOnly => {
                warn!(
                    application_id,
                    step = %step,
                    status,
                    "fortify provisioning step returned unexpected status, continuing"
                );
                Ok(())
            }
        }
    }
}

fn partial(application_id: i64, step: ProvisioningStep, error: SyncError) -> SyncError {
    SyncError::PartialProvisioning {
        application_id,
        step,
        detail: error.to_string(),
    }
}
