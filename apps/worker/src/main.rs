//! Fortify mapping bridge worker runtime.

#![forbid(unsafe_code)]

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use fortify_bridge_application::{
    ApplicationResolver, MappingResolutionService, MultipleValueValidation, ProvisioningPolicy,
    ProvisioningService, ResponseCodePolicy,
};
use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_infrastructure::{
    HttpFortifyClient, JsonAttributeValues, JsonFileMappingSource,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    fortify_server_url: String,
    fortify_username: String,
    fortify_password: String,
    mapping_file_path: String,
    attribute_values_file_path: String,
    http_timeout_seconds: u64,
    response_code_policy: ResponseCodePolicy,
    multiple_value_validation: MultipleValueValidation,
}

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| {
            SyncError::Configuration(format!("failed to build HTTP client: {error}"))
        })?;

    let fortify_client = Arc::new(HttpFortifyClient::new(
        http_client,
        config.fortify_server_url.as_str(),
        config.fortify_username.as_str(),
        config.fortify_password.as_str(),
    )?);
    let attribute_values =
        Arc::new(JsonAttributeValues::load(config.attribute_values_file_path.as_str()).await?);
    let policy = Arc::new(ProvisioningPolicy {
        response_code_policy: config.response_code_policy,
        multiple_value_validation: config.multiple_value_validation,
        ..ProvisioningPolicy::default()
    });

    let provisioning_service = ProvisioningService::new(
        fortify_client.clone(),
        fortify_client.clone(),
        attribute_values,
        policy,
    );
    let resolver = ApplicationResolver::new(fortify_client, provisioning_service);
    let mapping_service = MappingResolutionService::new(resolver);
    let mapping_source = JsonFileMappingSource::new(config.mapping_file_path.as_str());

    info!(
        fortify_server_url = %config.fortify_server_url,
        mapping_file = %config.mapping_file_path,
        attribute_values_file = %config.attribute_values_file_path,
        response_code_policy = config.response_code_policy.as_str(),
        multiple_value_validation = config.multiple_value_validation.as_str(),
        "fortify-bridge-worker started"
    );

    let report = mapping_service.resolve_mappings(&mapping_source).await?;

    for group in report.resolved_groups() {
        let sources = group
            .source_project_versions()
            .iter()
            .map(|source| format!("{}:{}", source.project(), source.version()))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            application = %group.target_application_name(),
            version = %group.target_application_version(),
            application_id = group.target_application_id().unwrap_or_default(),
            sources = %sources,
            "mapping group ready"
        );
    }

    for (group, failure) in report.failures() {
        error!(
            group = %group.key(),
            kind = failure.kind(),
            error = %failure,
            "mapping group unresolved"
        );
    }

    let orphaned = report.orphaned_application_ids();
    if !orphaned.is_empty() {
        warn!(
            application_ids = ?orphaned,
            "application versions were created but not fully provisioned"
        );
    }

    info!(
        resolved = report.resolved_count(),
        failed = report.failed_count(),
        "fortify-bridge-worker finished"
    );

    Ok(())
}

impl WorkerConfig {
    fn load() -> SyncResult<Self> {
        let fortify_server_url = required_env("FORTIFY_SERVER_URL")?.trim().to_owned();
        let fortify_username = required_env("FORTIFY_USERNAME")?.trim().to_owned();
        let fortify_password = required_env("FORTIFY_PASSWORD")?;
        let mapping_file_path = optional_env("MAPPING_FILE_PATH", "mapping.json");
        let attribute_values_file_path =
            optional_env("ATTRIBUTE_VALUES_FILE_PATH", "attributes.json");
        let http_timeout_seconds = parse_env_u64("FORTIFY_HTTP_TIMEOUT_SECONDS", 120)?;
        let response_code_policy = parse_env_or_default::<ResponseCodePolicy>(
            "FORTIFY_RESPONSE_CODE_POLICY",
        )?;
        let multiple_value_validation = parse_env_or_default::<MultipleValueValidation>(
            "FORTIFY_MULTIPLE_VALUE_VALIDATION",
        )?;

        if http_timeout_seconds == 0 {
            return Err(SyncError::Configuration(
                "FORTIFY_HTTP_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            fortify_server_url,
            fortify_username,
            fortify_password,
            mapping_file_path,
            attribute_values_file_path,
            http_timeout_seconds,
            response_code_policy,
            multiple_value_validation,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> SyncResult<String> {
    required_value(name, env::var(name).ok())
}

fn required_value(name: &str, value: Option<String>) -> SyncResult<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| SyncError::Configuration(format!("{name} is required")))
}

fn optional_env(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn parse_env_u64(name: &str, default: u64) -> SyncResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            SyncError::Configuration(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_or_default<T>(name: &str) -> SyncResult<T>
where
    T: FromStr<Err = SyncError> + Default,
{
    match env::var(name) {
        Ok(value) => value.trim().parse::<T>().map_err(|error| {
            SyncError::Configuration(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(T::default()),
    }
}
