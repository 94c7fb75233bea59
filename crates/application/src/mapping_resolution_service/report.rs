use fortify_bridge_core::SyncError;
use fortify_bridge_domain::{MappingGroup, ResolutionState};

/// Resolution outcome of one mapping group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResolution {
    group: MappingGroup,
    state: ResolutionState,
}

impl GroupResolution {
    pub(super) fn new(group: MappingGroup, state: ResolutionState) -> Self {
        let group = match state.application_id() {
            Some(application_id) => group.with_application_id(application_id),
            None => group,
        };
        Self { group, state }
    }

    /// Returns the group, carrying its id when resolved.
    #[must_use]
    pub fn group(&self) -> &MappingGroup {
        &self.group
    }

    /// Returns the terminal resolution state.
    #[must_use]
    pub fn state(&self) -> &ResolutionState {
        &self.state
    }
}

/// Outcomes of one resolution pass in first-seen group order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingResolutionReport {
    outcomes: Vec<GroupResolution>,
}

impl MappingResolutionReport {
    pub(super) fn new(outcomes: Vec<GroupResolution>) -> Self {
        Self { outcomes }
    }

    /// Returns every outcome.
    #[must_use]
    pub fn outcomes(&self) -> &[GroupResolution] {
        self.outcomes.as_slice()
    }

    /// Returns the resolved groups, each carrying its application version id.
    #[must_use]
    pub fn resolved_groups(&self) -> Vec<MappingGroup> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state.application_id().is_some())
            .map(|outcome| outcome.group.clone())
            .collect()
    }

    /// Returns the failed groups with their errors.
    #[must_use]
    pub fn failures(&self) -> Vec<(&MappingGroup, &SyncError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.state.error().map(|error| (&outcome.group, error)))
            .collect()
    }

    /// Returns the number of resolved groups.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state.application_id().is_some())
            .count()
    }

    /// Returns the number of failed groups.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.resolved_count()
    }

    /// Returns application version ids left created but not committed.
    #[must_use]
    pub fn orphaned_application_ids(&self) -> Vec<i64> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.state.error())
            .filter_map(SyncError::orphaned_application_id)
            .collect()
    }
}
