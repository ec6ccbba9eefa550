//! reqwest implementation of RecordsEditorApi

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::config::Config;
use crate::domain::{DomainError, RecordsEditorApi};
use crate::models::{CreatedJob, JobStatus, Record};

const USER_AGENT: &str = "quickmarc/0.4 (records-editor client)";
const RECORDS_PATH: &str = "records-editor/records";
const STATUS_PATH: &str = "records-editor/records/status";

/// Backend error bodies come either flat or wrapped in an `errors` list
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    code: Option<String>,
}

impl ErrorBody {
    fn into_code(self) -> Option<String> {
        self.code
            .or_else(|| self.errors.into_iter().find_map(|e| e.code))
    }
}

pub struct RecordsEditorClient {
    client: Client,
    base_url: Url,
    tenant: String,
    token: Option<String>,
}

impl RecordsEditorClient {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build client: {}", e)))?;

        let base_url = Url::parse(&format!("{}/", config.api_url.trim_end_matches('/')))?;

        Ok(Self {
            client,
            base_url,
            tenant: config.tenant.clone(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DomainError> {
        Ok(self.base_url.join(path)?)
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/json")
            .header("X-Okapi-Tenant", &self.tenant);
        match &self.token {
            Some(token) => request.header("X-Okapi-Token", token),
            None => request,
        }
    }

    /// Turn a non-success response into a domain error, keeping the backend's code
    async fn rejection(resp: Response) -> DomainError {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return DomainError::NotFound;
        }

        let body = resp.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_code);

        tracing::warn!(
            "records-editor rejected request ({}): code={:?}",
            status,
            code
        );

        DomainError::Rejected {
            status: status.as_u16(),
            code,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DomainError> {
        let resp = self.with_headers(request).send().await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(resp)
    }
}

#[async_trait]
impl RecordsEditorApi for RecordsEditorClient {
    async fn fetch_record(&self, external_id: &str) -> Result<Record, DomainError> {
        let mut url = self.endpoint(RECORDS_PATH)?;
        url.query_pairs_mut().append_pair("externalId", external_id);

        tracing::debug!("GET {}", url);
        let resp = self.send(self.client.get(url)).await?;
        resp.json::<Record>()
            .await
            .map_err(|e| DomainError::External(format!("Parse error for record: {}", e)))
    }

    async fn update_record(&self, record: &Record) -> Result<(), DomainError> {
        let id = record
            .meta
            .parsed_record_id
            .as_deref()
            .or(record.meta.id.as_deref())
            .ok_or_else(|| DomainError::Validation("record has no id to update".to_string()))?;

        let url = self.endpoint(&format!("{}/{}", RECORDS_PATH, id))?;

        tracing::debug!("PUT {}", url);
        self.send(self.client.put(url).json(record)).await?;
        Ok(())
    }

    async fn create_record(&self, record: &Record) -> Result<CreatedJob, DomainError> {
        let url = self.endpoint(RECORDS_PATH)?;

        tracing::debug!("POST {}", url);
        let resp = self.send(self.client.post(url).json(record)).await?;
        resp.json::<CreatedJob>()
            .await
            .map_err(|e| DomainError::External(format!("Parse error for created job: {}", e)))
    }

    async fn record_status(&self, qm_record_id: &str) -> Result<JobStatus, DomainError> {
        let mut url = self.endpoint(STATUS_PATH)?;
        url.query_pairs_mut().append_pair("qmRecordId", qm_record_id);

        tracing::trace!("GET {}", url);
        let resp = self.send(self.client.get(url)).await?;
        resp.json::<JobStatus>()
            .await
            .map_err(|e| DomainError::External(format!("Parse error for job status: {}", e)))
    }
}
