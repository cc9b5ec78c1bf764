// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Producer identity stamped on every request this stage generates.
pub const BRUTE_FORCE_SOURCE: &str = "brute-force";

/// Producer identity for requests fed in from outside the pipeline.
pub const INPUT_SOURCE: &str = "input";

/// Where a name was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestTag {
    Alt,
    Archive,
    Api,
    Axfr,
    Brute,
    Cert,
    Dns,
    Scrape,
}

impl RequestTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestTag::Alt => "alt",
            RequestTag::Archive => "archive",
            RequestTag::Api => "api",
            RequestTag::Axfr => "axfr",
            RequestTag::Brute => "brute",
            RequestTag::Cert => "cert",
            RequestTag::Dns => "dns",
            RequestTag::Scrape => "scrape",
        }
    }
}

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name to investigate, flowing between pipeline stages.
///
/// Requests are immutable once built. Sending one on a channel moves it, so
/// the sender cannot touch it after the handoff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    name: String,
    domain: String,
    tag: RequestTag,
    source: String,
}

impl Request {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        tag: RequestTag,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            tag,
            source: source.into(),
        }
    }

    /// Kickoff request for a bare root domain (empty name).
    pub fn root(domain: impl Into<String>) -> Self {
        Self::new(String::new(), domain, RequestTag::Dns, INPUT_SOURCE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Master switch for the whole stage.
    pub brute_forcing: bool,
    /// Derive deeper subdomains from discovered names.
    pub recursive: bool,
    /// Prefixes prepended to every admitted subdomain, in order.
    pub wordlist: Vec<String>,
    /// Inbound inactivity after which the stage reports itself idle.
    pub idle_timeout: Duration,
    /// Admission/production units allowed to run at the same time.
    pub max_in_flight: usize,
    /// Produced requests allowed to wait on the outbound channel at once.
    pub max_pending_deliveries: usize,
    /// Queue size used by the driver when it builds the stage channels.
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brute_forcing: true,
            recursive: true,
            wordlist: Vec::new(),
            idle_timeout: Duration::from_secs(5),
            max_in_flight: 1024,
            max_pending_deliveries: 4096,
            channel_capacity: 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubbruteError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Wordlist error: {0}")]
    WordlistError(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Service error in {service_name}: {message}")]
    ServiceError {
        service_name: String,
        message: String,
    },
}
