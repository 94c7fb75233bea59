use async_trait::async_trait;
use fortify_bridge_application::{ApplicationVersionApi, AttributeDefinitionCatalog};
use fortify_bridge_core::{SyncError, SyncResult};
use fortify_bridge_domain::{
    ApplicationVersionQuery, ApplicationVersionRecord, AttributeDefinition, AttributeValuePayload,
    CommitApplicationRequest, CreateApplicationRequest,
};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use url::form_urlencoded::byte_serialize;

const PROJECT_VERSIONS_PATH: &str = "api/v1/projectVersions";
const ATTRIBUTE_DEFINITIONS_PATH: &str = "api/v1/attributeDefinitions";
const APPLICATION_OBJECT_TYPE: &str = "PROJECT_VERSION";

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
    #[serde(default, rename = "responseCode")]
    response_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct CreatedApplicationVersion {
    id: i64,
}

/// Fortify SSC REST client authenticated with basic credentials.
pub struct HttpFortifyClient {
    http_client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpFortifyClient {
    /// Creates a client for a Fortify server base URL.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> SyncResult<Self> {
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(normalized.as_str()).map_err(|error| {
            SyncError::Configuration(format!("invalid Fortify server url '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
            username: username.into(),
            password: password.into(),
        })
    }

    fn endpoint(&self, path: &str) -> SyncResult<Url> {
        self.base_url.join(path).map_err(|error| {
            SyncError::Configuration(format!("invalid Fortify endpoint '{path}': {error}"))
        })
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .basic_auth(self.username.as_str(), Some(self.password.as_str()))
            .header(header::ACCEPT, "application/json")
    }

    /// Reads a `{data, responseCode}` envelope, rejecting error statuses in either place.
    async fn read_envelope<T>(response: reqwest::Response, operation: &str) -> SyncResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(SyncError::Lookup(format!(
                "{operation} returned status {}: {body}",
                status.as_u16()
            )));
        }

        let envelope = response.json::<DataEnvelope<T>>().await.map_err(|error| {
            SyncError::Lookup(format!("failed to parse {operation} response body: {error}"))
        })?;

        if let Some(response_code) = envelope.response_code
            && !(200..300).contains(&response_code)
        {
            return Err(SyncError::Lookup(format!(
                "{operation} reported response code {response_code}"
            )));
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl ApplicationVersionApi for HttpFortifyClient {
    async fn lookup_application_versions(
        &self,
        query: &ApplicationVersionQuery,
    ) -> SyncResult<Vec<ApplicationVersionRecord>> {
        let mut url = self.endpoint(PROJECT_VERSIONS_PATH)?;
        // Names are form-encoded; the `+and+` connector must reach the server unescaped.
        let expression = query.expression_with(|value| byte_serialize(value.as_bytes()).collect());
        url.set_query(Some(
            format!("fields={}&q={expression}", query.fields()).as_str(),
        ));
        debug!(url = %url, "fortify application version lookup");

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|error| {
                SyncError::Lookup(format!("failed to call application version lookup: {error}"))
            })?;

        Self::read_envelope(response, "application version lookup").await
    }

    async fn create_application_version(
        &self,
        request: &CreateApplicationRequest,
    ) -> SyncResult<i64> {
        let url = self.endpoint(PROJECT_VERSIONS_PATH)?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                SyncError::Provisioning(format!("failed to call application version create: {error}"))
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(SyncError::Provisioning(format!(
                "application version create returned status {}: {body}",
                status.as_u16()
            )));
        }

        let created: CreatedApplicationVersion =
            Self::read_envelope(response, "application version create")
                .await
                .map_err(|error| SyncError::Provisioning(error.to_string()))?;
        Ok(created.id)
    }

    async fn update_attributes(
        &self,
        application_id: i64,
        payload: &[AttributeValuePayload],
    ) -> SyncResult<u16> {
        let url = self.endpoint(format!("{PROJECT_VERSIONS_PATH}/{application_id}/attributes").as_str())?;
        let response = self
            .request(reqwest::Method::PUT, url)
            .json(payload)
            .send()
            .await
            .map_err(|error| {
                SyncError::Provisioning(format!("failed to call attribute update: {error}"))
            })?;

        Ok(response.status().as_u16())
    }

    async fn commit_application_version(
        &self,
        application_id: i64,
        request: &CommitApplicationRequest,
    ) -> SyncResult<u16> {
        let url = self.endpoint(format!("{PROJECT_VERSIONS_PATH}/{application_id}").as_str())?;
        let response = self
            .request(reqwest::Method::PUT, url)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                SyncError::Provisioning(format!("failed to call application version commit: {error}"))
            })?;

        Ok(response.status().as_u16())
    }

    async fn delete_application_version(&self, application_id: i64) -> SyncResult<u16> {
        let url = self.endpoint(format!("{PROJECT_VERSIONS_PATH}/{application_id}").as_str())?;
        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(|error| {
                SyncError::Provisioning(format!("failed to call application version delete: {error}"))
            })?;

        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl AttributeDefinitionCatalog for HttpFortifyClient {
    async fn fetch_definitions(&self) -> SyncResult<Vec<AttributeDefinition>> {
        let url = self.endpoint(ATTRIBUTE_DEFINITIONS_PATH)?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|error| {
                SyncError::Lookup(format!("failed to call attribute definitions: {error}"))
            })?;

        let definitions: Vec<AttributeDefinition> =
            Self::read_envelope(response, "attribute definitions").await?;
        Ok(definitions
            .into_iter()
            .filter(|definition| {
                definition
                    .object_type()
                    .is_none_or(|object_type| object_type == APPLICATION_OBJECT_TYPE)
            })
            .collect())
    }
}
