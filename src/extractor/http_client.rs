//! Shared HTTP client construction policy for extractors.
//!
//! Every site extractor fetches through a [`PageFetcher`] so timeouts,
//! user-agent, compression and the politeness delay stay consistent.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, Proxy};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::user_agent;

use super::ExtractError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy)]
struct ExtractorHttpTimeouts {
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Default for ExtractorHttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

static EXTRACTOR_HTTP_TIMEOUTS: RwLock<ExtractorHttpTimeouts> =
    RwLock::new(ExtractorHttpTimeouts {
        connect_timeout_secs: CONNECT_TIMEOUT_SECS,
        read_timeout_secs: READ_TIMEOUT_SECS,
    });

/// Configures HTTP timeouts used by extractor clients built afterwards.
pub fn configure_extractor_http_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) {
    if let Ok(mut guard) = EXTRACTOR_HTTP_TIMEOUTS.write() {
        *guard = ExtractorHttpTimeouts {
            connect_timeout_secs,
            read_timeout_secs,
        };
    }
}

fn extractor_http_timeouts() -> ExtractorHttpTimeouts {
    EXTRACTOR_HTTP_TIMEOUTS
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Builds an extractor HTTP client using shared project policy.
///
/// `extractor_name` is only used for logging and error messages.
///
/// # Errors
///
/// [`ExtractError::Http`] when client construction fails.
pub fn build_extractor_http_client(extractor_name: &str) -> Result<Client, ExtractError> {
    let user_agent = user_agent::default_extractor_user_agent();
    match try_build_client(&user_agent, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxes panic when querying system proxy settings.
            warn!(
                extractor = extractor_name,
                "Extractor client hit system proxy panic; using env-proxy fallback builder"
            );
            match try_build_client(&user_agent, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ExtractError::http(
                    extractor_name,
                    "HTTP client construction panicked",
                )),
                Err(BuildClientFailure::Build(error)) => Err(ExtractError::http(
                    extractor_name,
                    format!("HTTP client construction failed: {error}"),
                )),
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(ExtractError::http(
            extractor_name,
            format!("HTTP client construction failed: {error}"),
        )),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    user_agent: &str,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(user_agent);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(user_agent: String) -> ClientBuilder {
    let timeouts = extractor_http_timeouts();
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_timeout_secs))
        .timeout(Duration::from_secs(timeouts.read_timeout_secs))
        .user_agent(user_agent)
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = first_env(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = first_env(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// HTTP client plus the delay to wait before every request.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    delay: Duration,
}

impl PageFetcher {
    /// # Errors
    ///
    /// [`ExtractError::Http`] when client construction fails.
    pub fn new(extractor_name: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            client: build_extractor_http_client(extractor_name)?,
            delay: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Http`] on transport failure or non-success status.
    pub async fn text(&self, url: &str) -> Result<String, ExtractError> {
        self.get(url, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .await?
            .text()
            .await
            .map_err(|error| ExtractError::http(url, error))
    }

    /// Fetches `url` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Http`] on transport failure or non-success status,
    /// [`ExtractError::Parse`] when the body does not decode.
    pub async fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ExtractError> {
        let body = self
            .get(url, "application/json")
            .await?
            .text()
            .await
            .map_err(|error| ExtractError::http(url, error))?;
        serde_json::from_str(&body).map_err(|error| ExtractError::parse(url, &error.to_string()))
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, ExtractError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!(url, "Fetching page");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|error| ExtractError::http(url, error))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::http(url, format!("HTTP {}", status.as_u16())));
        }
        Ok(response)
    }
}
