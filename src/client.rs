//! Shared outgoing HTTP client.

use std::time::Duration;

use clap::crate_version;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::prelude::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by all the upstream integrations.
///
/// Transient failures are retried with exponential backoff before they
/// surface as errors anywhere else.
pub fn build_client() -> Result<ClientWithMiddleware> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(concat!(
            "ghumfir / ",
            crate_version!(),
            " (Rust; https://github.com/ghumfir/ghumfir)",
        )),
    );
    let client = reqwest::Client::builder()
        .gzip(true)
        .use_rustls_tls()
        .default_headers(headers)
        .timeout(DEFAULT_TIMEOUT)
        .pool_idle_timeout(Some(Duration::from_secs(600)))
        .build()
        .context("failed to build an HTTP client")?;
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(2);
    Ok(reqwest_middleware::ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
