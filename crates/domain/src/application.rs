use std::fmt::{Display, Formatter};

use fortify_bridge_core::NonEmptyString;
use serde::{Deserialize, Serialize};

const VERSION_FIELD: &str = "name:";
const APPLICATION_FIELD: &str = "project.name:";
const QUERY_CONNECTOR: &str = "+and+";

/// Lookup against Fortify application versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationVersionQuery {
    /// Application version matching both the application and version name.
    ExactVersion {
        /// Application name.
        application_name: NonEmptyString,
        /// Version name.
        version_name: NonEmptyString,
    },
    /// Any version of the named application.
    AnyVersionOf {
        /// Application name.
        application_name: NonEmptyString,
    },
}

impl ApplicationVersionQuery {
    /// Returns the response fields requested by the lookup.
    #[must_use]
    pub fn fields(&self) -> &'static str {
        match self {
            Self::ExactVersion { .. } => "id",
            Self::AnyVersionOf { .. } => "id,project",
        }
    }

    /// Returns the Fortify `q` filter expression.
    #[must_use]
    pub fn expression(&self) -> String {
        self.expression_with(str::to_owned)
    }

    /// Returns the `q` expression with each name passed through `encode`.
    ///
    /// Field prefixes and the `+and+` connector are emitted as-is.
    pub fn expression_with<F>(&self, encode: F) -> String
    where
        F: Fn(&str) -> String,
    {
        match self {
            Self::ExactVersion {
                application_name,
                version_name,
            } => format!(
                "{VERSION_FIELD}{}{QUERY_CONNECTOR}{APPLICATION_FIELD}{}",
                encode(version_name.as_str()),
                encode(application_name.as_str())
            ),
            Self::AnyVersionOf { application_name } => {
                format!("{APPLICATION_FIELD}{}", encode(application_name.as_str()))
            }
        }
    }
}

impl Display for ApplicationVersionQuery {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.expression().as_str())
    }
}

/// Parent application reference returned with a version lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRef {
    id: i64,
    #[serde(default)]
    name: Option<String>,
}

impl ApplicationRef {
    /// Creates an application reference.
    #[must_use]
    pub fn new(id: i64, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// Returns the application id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the application name when it was requested.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Application version row returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationVersionRecord {
    id: i64,
    #[serde(default)]
    project: Option<ApplicationRef>,
}

impl ApplicationVersionRecord {
    /// Creates a lookup row.
    #[must_use]
    pub fn new(id: i64, project: Option<ApplicationRef>) -> Self {
        Self { id, project }
    }

    /// Returns the application version id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the parent application when it was requested.
    #[must_use]
    pub fn project(&self) -> Option<&ApplicationRef> {
        self.project.as_ref()
    }
}

/// Literal values stamped onto every creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationTemplate {
    /// Issue template assigned to new versions and applications.
    pub issue_template_id: String,
    /// Description assigned to new versions and applications.
    pub description: String,
}

impl Default for CreationTemplate {
    fn default() -> Self {
        Self {
            issue_template_id: "Prioritized-HighRisk-Project-Template".to_owned(),
            description: "Built using API".to_owned(),
        }
    }
}

/// Application part of a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationProject {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_template_id: Option<String>,
}

/// Request creating an application version, and its application when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    name: String,
    description: String,
    active: bool,
    committed: bool,
    project: CreateApplicationProject,
    issue_template_id: String,
}

impl CreateApplicationRequest {
    /// Builds a request adding a version to an existing application.
    #[must_use]
    pub fn version_only(
        parent_application_id: i64,
        version_name: &NonEmptyString,
        template: &CreationTemplate,
    ) -> Self {
        Self {
            name: version_name.as_str().to_owned(),
            description: template.description.clone(),
            active: true,
            committed: false,
            project: CreateApplicationProject {
                id: parent_application_id.to_string(),
                name: None,
                description: None,
                issue_template_id: None,
            },
            issue_template_id: template.issue_template_id.clone(),
        }
    }

    /// Builds a request creating both the application and its first version.
    #[must_use]
    pub fn application_and_version(
        application_name: &NonEmptyString,
        version_name: &NonEmptyString,
        template: &CreationTemplate,
    ) -> Self {
        Self {
            name: version_name.as_str().to_owned(),
            description: template.description.clone(),
            active: true,
            committed: false,
            project: CreateApplicationProject {
                id: String::new(),
                name: Some(application_name.as_str().to_owned()),
                description: Some(template.description.clone()),
                issue_template_id: Some(template.issue_template_id.clone()),
            },
            issue_template_id: template.issue_template_id.clone(),
        }
    }

    /// Returns the version name.
    #[must_use]
    pub fn version_name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent application id for version-only requests.
    #[must_use]
    pub fn parent_application_id(&self) -> Option<&str> {
        (!self.project.id.is_empty()).then_some(self.project.id.as_str())
    }

    /// Returns the application name for requests that also create the application.
    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.project.name.as_deref()
    }

    /// Returns the issue template id.
    #[must_use]
    pub fn issue_template_id(&self) -> &str {
        self.issue_template_id.as_str()
    }

    /// Returns whether the request is created already committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

/// Request marking an application version as committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitApplicationRequest {
    committed: bool,
}

impl CommitApplicationRequest {
    /// Builds the commit request.
    #[must_use]
    pub fn committed() -> Self {
        Self { committed: true }
    }

    /// Returns the requested committed flag.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}
