use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    environment::Environment,
    models::{BillingRequest, BillingRequestFlow, Mandate, NewBillingRequest, NewBillingRequestFlow},
};

pub const API_VERSION: &str = "2015-07-06";

/// Errors returned by the GoCardless REST API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with an error document.
    #[error("GoCardless API error ({status}, {error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
        request_id: Option<String>,
        details: Vec<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    field: Option<String>,
    message: String,
}

#[derive(Deserialize)]
struct BillingRequestEnvelope {
    billing_requests: BillingRequest,
}

#[derive(Deserialize)]
struct BillingRequestFlowEnvelope {
    billing_request_flows: BillingRequestFlow,
}

#[derive(Deserialize)]
struct MandateEnvelope {
    mandates: Mandate,
}

/// The slice of the GoCardless API the billing operations need.
#[async_trait::async_trait]
pub trait BillingApi: Send + Sync {
    async fn create_billing_request(
        &self,
        params: &NewBillingRequest,
    ) -> Result<BillingRequest, ApiError>;

    async fn create_billing_request_flow(
        &self,
        params: &NewBillingRequestFlow,
    ) -> Result<BillingRequestFlow, ApiError>;

    async fn get_billing_request(&self, id: &str) -> Result<BillingRequest, ApiError>;

    async fn get_mandate(&self, id: &str) -> Result<Mandate, ApiError>;
}

/// Bearer-authenticated client for the GoCardless REST API.
pub struct ApiClient {
    access_token: String,
    base_url: String,
    http_client: Client,
}

impl ApiClient {
    pub fn new(access_token: impl Into<String>, environment: Environment) -> Self {
        ApiClient {
            access_token: access_token.into(),
            base_url: environment.api_base_url().to_string(),
            http_client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.access_token)
            .header("GoCardless-Version", API_VERSION)
            .header("Accept", "application/json")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let res = self.request(self.http_client.get(&url)).send().await?;
        decode(res).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let idempotency_key = Uuid::new_v4().to_string();
        debug!(%url, %idempotency_key, "POST");
        let res = self
            .request(self.http_client.post(&url))
            .header("Idempotency-Key", idempotency_key)
            .json(&body)
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    let body = res.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
    }

    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(ErrorEnvelope { error }) => Err(ApiError::Api {
            status: status.as_u16(),
            error_type: error.error_type,
            message: error.message,
            request_id: error.request_id,
            details: error
                .errors
                .into_iter()
                .map(|d| match d.field {
                    Some(field) => format!("{field} {}", d.message),
                    None => d.message,
                })
                .collect(),
        }),
        Err(_) => Err(ApiError::Api {
            status: status.as_u16(),
            error_type: "unknown".to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
            request_id: None,
            details: Vec::new(),
        }),
    }
}

#[async_trait::async_trait]
impl BillingApi for ApiClient {
    async fn create_billing_request(
        &self,
        params: &NewBillingRequest,
    ) -> Result<BillingRequest, ApiError> {
        let envelope: BillingRequestEnvelope = self
            .post("/billing_requests", json!({ "billing_requests": params }))
            .await?;
        Ok(envelope.billing_requests)
    }

    async fn create_billing_request_flow(
        &self,
        params: &NewBillingRequestFlow,
    ) -> Result<BillingRequestFlow, ApiError> {
        let envelope: BillingRequestFlowEnvelope = self
            .post(
                "/billing_request_flows",
                json!({ "billing_request_flows": params }),
            )
            .await?;
        Ok(envelope.billing_request_flows)
    }

    async fn get_billing_request(&self, id: &str) -> Result<BillingRequest, ApiError> {
        let envelope: BillingRequestEnvelope =
            self.get(&format!("/billing_requests/{id}")).await?;
        Ok(envelope.billing_requests)
    }

    async fn get_mandate(&self, id: &str) -> Result<Mandate, ApiError> {
        let envelope: MandateEnvelope = self.get(&format!("/mandates/{id}")).await?;
        Ok(envelope.mandates)
    }
}
