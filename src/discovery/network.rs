//! Live endpoint discovery: one sequential GET per table entry.

use super::{Unit, UnitKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// What an endpoint is expected to serve, which selects its rule table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointCategory {
    Robots,
    Sitemap,
    /// Search-console ownership files (`google*.html`, `BingSiteAuth.xml`)
    Verification,
    #[default]
    Page,
}

impl std::fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointCategory::Robots => write!(f, "robots"),
            EndpointCategory::Sitemap => write!(f, "sitemap"),
            EndpointCategory::Verification => write!(f, "verification"),
            EndpointCategory::Page => write!(f, "page"),
        }
    }
}

/// One row of the hand-authored endpoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub category: EndpointCategory,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Lowercased header names
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Response(HttpResponse),
    /// Connection error or timeout; the endpoint is unreachable.
    Failed { error: String },
}

/// Seam between the audit and the network, so tests can serve canned responses.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Blocking HTTP fetcher with a bot user agent and a bounded timeout.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn failed(&self, e: reqwest::Error) -> FetchOutcome {
        let error = if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else {
            e.to_string()
        };
        FetchOutcome::Failed { error }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => return self.failed(e),
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        // A stalled or truncated body counts as unreachable, same as a failed send
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                log::debug!("failed to read body of {}: {}", url, e);
                return self.failed(e);
            }
        };

        FetchOutcome::Response(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// An endpoint after its fetch, ready for evaluation.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub endpoint: Endpoint,
    pub unit: Unit,
    pub headers: BTreeMap<String, String>,
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl Fetched {
    pub fn status(&self) -> u16 {
        match self.unit.kind {
            UnitKind::Endpoint { status } => status,
            _ => 0,
        }
    }

    pub fn reachable(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch one endpoint. Failures are captured in the result, never returned as errors.
pub fn fetch_endpoint(fetcher: &dyn Fetcher, endpoint: &Endpoint) -> Fetched {
    let start = Instant::now();
    let outcome = fetcher.fetch(&endpoint.url);
    let elapsed = start.elapsed();

    match outcome {
        FetchOutcome::Response(resp) => {
            log::debug!("GET {} -> {} in {:?}", endpoint.url, resp.status, elapsed);
            Fetched {
                endpoint: endpoint.clone(),
                unit: Unit {
                    identifier: endpoint.url.clone(),
                    kind: UnitKind::Endpoint {
                        status: resp.status,
                    },
                    content: Some(resp.body),
                },
                headers: resp.headers,
                error: None,
                elapsed,
            }
        }
        FetchOutcome::Failed { error } => {
            log::warn!("GET {} failed: {}", endpoint.url, error);
            Fetched {
                endpoint: endpoint.clone(),
                unit: Unit {
                    identifier: endpoint.url.clone(),
                    kind: UnitKind::Endpoint { status: 0 },
                    content: None,
                },
                headers: BTreeMap::new(),
                error: Some(error),
                elapsed,
            }
        }
    }
}
