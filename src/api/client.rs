use crate::api::traits::ListingSource;
use crate::api::ApiError;
use crate::config::AppConfig;
use crate::models::{Applicant, ApplicantId, Job, JobId, Property, PropertyId};
use crate::schedule::{RescheduleForm, RescheduleRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Client for the listings REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("property-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn fetch_property(&self, id: PropertyId) -> Result<Property, ApiError> {
        let url = self.url(&format!("properties/{}", id));
        let body = self.send(&url, self.client.get(&url)).await?;
        decode_one(&url, &body)
    }

    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let url = self.url("jobs");
        let body = self.send(&url, self.client.get(&url)).await?;
        decode_list(&url, &body)
    }

    pub async fn fetch_applicants(&self, job_id: JobId) -> Result<Vec<Applicant>, ApiError> {
        let url = self.url(&format!("jobs/{}/applicants", job_id));
        let body = self.send(&url, self.client.get(&url)).await?;
        decode_list(&url, &body)
    }

    pub async fn submit_reschedule(&self, request: &RescheduleRequest) -> Result<(), ApiError> {
        let url = self.url(&format!("applicants/{}/reschedule", request.applicant_id));
        self.send(&url, self.client.post(&url).json(request)).await?;
        info!("Submitted reschedule for applicant {}", request.applicant_id);
        Ok(())
    }

    /// Validate the form, send its request and only then close the form.
    /// A failed POST leaves the form editable so the applicant can retry.
    pub async fn submit_form(&self, form: &mut RescheduleForm) -> Result<RescheduleRequest> {
        let request = form.request()?;
        self.submit_reschedule(&request)
            .await
            .with_context(|| format!("Failed to submit reschedule for applicant {}", request.applicant_id))?;
        form.mark_submitted(&request);
        Ok(request)
    }

    pub async fn find_applicant(&self, job_id: JobId, applicant_id: ApplicantId) -> Result<Applicant> {
        let applicants = self
            .fetch_applicants(job_id)
            .await
            .with_context(|| format!("Failed to load applicants for job {}", job_id))?;

        applicants
            .into_iter()
            .find(|applicant| applicant.id == applicant_id)
            .with_context(|| format!("Applicant {} has not applied to job {}", applicant_id, job_id))
    }

    /// Send a request and return the body text of a successful response
    async fn send(&self, url: &str, request: RequestBuilder) -> Result<String, ApiError> {
        debug!("Fetching URL: {}", url);

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Backend returned status: {}", status);
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        debug!("Downloaded {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl ListingSource for ApiClient {
    async fn fetch_properties(&self) -> Result<Vec<Property>, ApiError> {
        let url = self.url("properties");
        let body = self.send(&url, self.client.get(&url)).await?;
        let properties: Vec<Property> = decode_list(&url, &body)?;
        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "REST API"
    }
}

/// Decode a list endpoint body. Accepts a bare array or `{ "data": [...] }`.
pub fn decode_list<T: DeserializeOwned>(url: &str, body: &str) -> Result<Vec<T>, ApiError> {
    let decode = |source| ApiError::Decode {
        url: url.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(body).map_err(decode)?;
    let items = match value {
        Value::Object(mut envelope) if envelope.contains_key("data") => {
            envelope.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(items).map_err(decode)
}

/// Decode a single-record body. Accepts the bare object or `{ "data": {...} }`.
pub fn decode_one<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    let decode = |source| ApiError::Decode {
        url: url.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(body).map_err(decode)?;
    let record = match value {
        Value::Object(mut envelope) if envelope.len() == 1 && envelope.contains_key("data") => {
            envelope.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(record).map_err(decode)
}
