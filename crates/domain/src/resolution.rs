use fortify_bridge_core::{SyncError, SyncResult};

/// How a group's application version id was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// The application version already existed.
    Existing,
    /// A version was added to an existing application.
    NewVersion {
        /// Id of the existing parent application.
        parent_application_id: i64,
    },
    /// Both the application and its version were created.
    NewApplication,
    /// The id was already known before this pass.
    Preassigned,
}

impl ResolutionPath {
    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::NewVersion { .. } => "new_version",
            Self::NewApplication => "new_application",
            Self::Preassigned => "preassigned",
        }
    }

    /// Returns whether the path created anything in Fortify.
    #[must_use]
    pub fn created(&self) -> bool {
        matches!(self, Self::NewVersion { .. } | Self::NewApplication)
    }
}

/// Resolution state of one mapping group key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionState {
    /// No resolution attempted yet.
    #[default]
    Unresolved,
    /// Application version id is known.
    Resolved {
        /// Fortify application version id.
        application_id: i64,
        /// How the id was obtained.
        path: ResolutionPath,
    },
    /// Resolution failed for this run.
    Failed(SyncError),
}

impl ResolutionState {
    /// Applies the outcome of a resolution attempt.
    ///
    /// Only `Unresolved` accepts an outcome; terminal states reject further transitions.
    pub fn apply(self, outcome: SyncResult<(i64, ResolutionPath)>) -> SyncResult<Self> {
        match self {
            Self::Unresolved => Ok(match outcome {
                Ok((application_id, path)) => Self::Resolved {
                    application_id,
                    path,
                },
                Err(error) => Self::Failed(error),
            }),
            Self::Resolved { application_id, .. } => Err(SyncError::Validation(format!(
                "group is already resolved to application version {application_id}"
            ))),
            Self::Failed(_) => Err(SyncError::Validation(
                "group already failed in this run".to_owned(),
            )),
        }
    }

    /// Returns whether the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Returns the resolved application version id.
    #[must_use]
    pub fn application_id(&self) -> Option<i64> {
        match self {
            Self::Resolved { application_id, .. } => Some(*application_id),
            _ => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
