//! Request dispatch for REST and SOAP cases.

use std::time::{Duration, Instant};

use reqwest::Method;
use tracing::{debug, info};

use super::payloads;
use crate::config::HarnessSettings;
use crate::models::{Protocol, TestCase};
use crate::soap::{self, Operation};

/// What came back from the system under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

/// Failures before a verifiable response was obtained.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Unsupported SOAP operation: {0}")]
    UnsupportedOperation(String),

    #[error("Request failed: {0}")]
    Transport(String),

    /// SOAP endpoint answered with a non-2xx status
    #[error("SOAP endpoint returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl DispatchError {
    /// Status to record for the failed case; 0 when nothing was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::HttpStatus { status, .. } => *status,
            _ => 0,
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Transport(err.to_string())
    }
}

/// Map a case method to an HTTP verb, case-insensitively.
pub fn http_method(method: &str) -> Result<Method, DispatchError> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(DispatchError::UnsupportedMethod(method.to_string())),
    }
}

/// SOAP operation named by a case: its endpoint, or failing that its method.
pub fn soap_operation(case: &TestCase) -> Result<Operation, DispatchError> {
    Operation::parse(case.endpoint.trim())
        .or_else(|| Operation::parse(case.method.trim()))
        .ok_or_else(|| DispatchError::UnsupportedOperation(case.endpoint.clone()))
}

/// Sends one request per case. No retries and no timeout beyond the client default.
pub struct Dispatcher {
    http: reqwest::Client,
    rest_base_url: String,
    soap_endpoint: String,
}

impl Dispatcher {
    pub fn new(settings: &HarnessSettings) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            rest_base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
            soap_endpoint: settings.soap_endpoint.clone(),
        })
    }

    /// Send the request a case describes.
    pub async fn dispatch(&self, case: &TestCase) -> Result<RawResponse, DispatchError> {
        match case.protocol() {
            Protocol::Rest => self.dispatch_rest(case).await,
            Protocol::Soap => self.dispatch_soap(case).await,
        }
    }

    async fn dispatch_rest(&self, case: &TestCase) -> Result<RawResponse, DispatchError> {
        let method = http_method(&case.method)?;
        let url = format!("{}{}", self.rest_base_url, case.endpoint);

        let mut request = self.http.request(method.clone(), &url);
        if method == Method::POST || method == Method::PUT {
            if let Some(body) = payloads::rest_payload(&case.test_id) {
                debug!("{} {} body: {}", method, url, body);
                request = request.json(&body);
            }
        }

        info!("Sending {} {}", method, url);
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            body,
            elapsed: started.elapsed(),
        })
    }

    async fn dispatch_soap(&self, case: &TestCase) -> Result<RawResponse, DispatchError> {
        let operation = soap_operation(case)?;
        let envelope = payloads::soap_request(&case.test_id, operation).to_envelope();

        info!("Sending SOAP {} to {}", operation, self.soap_endpoint);
        let started = Instant::now();
        let response = self
            .http
            .post(&self.soap_endpoint)
            .header("Content-Type", soap::CONTENT_TYPE)
            .body(envelope)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DispatchError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
            elapsed: started.elapsed(),
        })
    }
}
