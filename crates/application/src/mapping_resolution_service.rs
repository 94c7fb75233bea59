use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{MappingGroup, ResolutionPath, ResolutionState, group_mapping_entries};
use tracing::{info, warn};

use crate::{ApplicationResolver, MappingSource};

mod report;

pub use report::{GroupResolution, MappingResolutionReport};

/// Loads the mapping definition and resolves every group to a Fortify application version.
#[derive(Clone)]
pub struct MappingResolutionService {
    resolver: ApplicationResolver,
}

impl MappingResolutionService {
    /// Creates a new mapping resolution service.
    #[must_use]
    pub fn new(resolver: ApplicationResolver) -> Self {
        Self { resolver }
    }

    /// Loads, groups and resolves the mapping.
    ///
    /// Only a mapping load failure is returned as an error; per-group failures are
    /// reported in the returned report and do not stop other groups.
    pub async fn resolve_mappings(
        &self,
        source: &dyn MappingSource,
    ) -> SyncResult<MappingResolutionReport> {
        let entries = source.load_entries().await.map_err(|error| match error {
            SyncError::MappingLoad(_) => error,
            other => SyncError::MappingLoad(format!(
                "failed to load mapping from {}: {other}",
                source.describe()
            )),
        })?;

        let groups = group_mapping_entries(entries.as_slice());
        info!(
            source = %source.describe(),
            entries = entries.len(),
            groups = groups.len(),
            "mapping loaded"
        );

        Ok(self.resolve_groups(groups).await)
    }

    /// Resolves already grouped mappings in order.
    ///
    /// Groups that already carry an application version id are not queried.
    pub async fn resolve_groups(&self, groups: Vec<MappingGroup>) -> MappingResolutionReport {
        let mut outcomes = Vec::with_capacity(groups.len());

        for group in groups {
            let key = group.key();
            let outcome = match group.target_application_id() {
                Some(application_id) => Ok((application_id, ResolutionPath::Preassigned)),
                None => self.resolver.resolve(&key).await,
            };

            // A fresh state always accepts its first outcome.
            let state = match ResolutionState::Unresolved.apply(outcome) {
                Ok(state) => state,
                Err(error) => ResolutionState::Failed(error),
            };

            match &state {
                ResolutionState::Resolved {
                    application_id,
                    path,
                } => info!(
                    group = %key,
                    application_id,
                    path = path.as_str(),
                    sources = group.source_project_versions().len(),
                    "mapping group resolved"
                ),
                ResolutionState::Failed(error) => warn!(
                    group = %key,
                    error_kind = error.kind(),
                    orphaned_application_id = error.orphaned_application_id(),
                    error = %error,
                    "mapping group failed"
                ),
                ResolutionState::Unresolved => {}
            }

            outcomes.push(GroupResolution::new(group, state));
        }

        MappingResolutionReport::new(outcomes)
    }
}

#[cfg(test)]
mod tests;
