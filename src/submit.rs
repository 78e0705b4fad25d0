use crate::{config::Http, error::SubmitError, request::JobSubmissionRequest, util::sha256_hex};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{debug, info};

const JOBS_ENDPOINT: &str = "/jobs";

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The exchange never produced a response; no status code exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure(pub String);

pub trait Transport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, TransportFailure>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(cfg: &Http) -> Result<Self> {
        let redirect = if cfg.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(cfg.max_redirects)
        };
        // 0 disables a timeout.
        let timeout = (cfg.timeout_seconds > 0).then(|| Duration::from_secs(cfg.timeout_seconds));
        let mut builder = Client::builder()
            .timeout(timeout)
            .redirect(redirect)
            .user_agent(cfg.user_agent.as_str());
        if cfg.connect_timeout_seconds > 0 {
            builder = builder.connect_timeout(Duration::from_secs(cfg.connect_timeout_seconds));
        }
        if !cfg.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, TransportFailure> {
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| TransportFailure(format!("{:#}", anyhow::Error::from(e))))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(|e| {
                TransportFailure(format!("reading response body: {:#}", anyhow::Error::from(e)))
            })?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted { status: u16, body: Vec<u8> },
    Rejected { status: u16, body: Vec<u8> },
    Unreachable { cause: String },
}

impl SubmissionOutcome {
    pub fn classify(result: Result<RawResponse, TransportFailure>) -> Self {
        match result {
            Ok(RawResponse { status, body }) if (200..300).contains(&status) => {
                SubmissionOutcome::Accepted { status, body }
            }
            Ok(RawResponse { status, body }) => SubmissionOutcome::Rejected { status, body },
            Err(TransportFailure(cause)) => SubmissionOutcome::Unreachable { cause },
        }
    }

    /// Success yields the response body untouched.
    pub fn into_result(self) -> Result<Vec<u8>, SubmitError> {
        match self {
            SubmissionOutcome::Accepted { body, .. } => Ok(body),
            SubmissionOutcome::Rejected { status, body } => Err(SubmitError::Service {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            SubmissionOutcome::Unreachable { cause } => Err(SubmitError::Transport(cause)),
        }
    }
}

pub struct JobSubmitter<T: Transport> {
    endpoint: String,
    transport: T,
}

impl<T: Transport> JobSubmitter<T> {
    pub fn new(api_base: &str, transport: T) -> Self {
        Self {
            endpoint: jobs_url(api_base),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST, no retries.
    pub fn submit(&self, req: &JobSubmissionRequest) -> Result<SubmissionOutcome> {
        let body = encode(req)?;
        info!(
            "POST {} bytes={} payload_sha256={}",
            self.endpoint,
            body.len(),
            sha256_hex(&body)
        );

        let result = self.transport.post_json(&self.endpoint, body);
        match &result {
            Ok(resp) => debug!("response status={} bytes={}", resp.status, resp.body.len()),
            Err(TransportFailure(cause)) => debug!("transport failure: {cause}"),
        }
        Ok(SubmissionOutcome::classify(result))
    }
}

/// Serializes the request body exactly as it goes on the wire.
pub fn encode(req: &JobSubmissionRequest) -> Result<Vec<u8>> {
    serde_json::to_vec(req).context("serializing job submission")
}

pub fn jobs_url(api_base: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), JOBS_ENDPOINT)
}
