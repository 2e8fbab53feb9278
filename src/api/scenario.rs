use anyhow::{Context, Result, bail};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::domain::Scenario;

const USER_AGENT: &str = concat!("frontline/", env!("CARGO_PKG_VERSION"));

/// Linear back-off step, retry `n` waits `n` times this
const RETRY_BACKOFF_SECS: u64 = 5;

/// Statuses worth retrying: rate limiting and overloaded gateways
fn is_retriable(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

/// The primary URL followed by configured mirrors, without duplicates
fn candidate_urls<'a>(url: &'a str, config: &'a FetchConfig) -> Vec<&'a str> {
    let mut urls = vec![url];
    for mirror in &config.urls {
        if !urls.contains(&mirror.as_str()) {
            urls.push(mirror.as_str());
        }
    }
    urls
}

/// Fetch a scenario snapshot (fronts and divisions as JSON) over HTTP
///
/// Each URL is tried up to `max_retries` times on retriable statuses
/// before moving on to the next mirror.
///
/// # Arguments
/// * `url` - Endpoint returning a scenario JSON document
/// * `config` - Timeout, retry count and mirror list
pub fn fetch_scenario(url: &str, config: &FetchConfig) -> Result<Scenario> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let max_retries = config.max_retries.max(1);
    let mut last_error = None;

    for endpoint in candidate_urls(url, config) {
        for attempt in 0..max_retries {
            if attempt > 0 {
                let wait_secs = RETRY_BACKOFF_SECS * attempt as u64;
                eprintln!(
                    "Scenario server busy, retrying {} in {} seconds (attempt {}/{})",
                    endpoint,
                    wait_secs,
                    attempt + 1,
                    max_retries
                );
                std::thread::sleep(Duration::from_secs(wait_secs));
            }

            let response = match client.get(endpoint).send() {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(format!("{}: {}", endpoint, e));
                    break;
                }
            };

            match response.status().as_u16() {
                200 => {
                    let body = response
                        .text()
                        .with_context(|| format!("Failed to read response from {}", endpoint))?;
                    return Scenario::from_json_str(&body)
                        .with_context(|| format!("Invalid scenario from {}", endpoint));
                }
                status if is_retriable(status) => {
                    last_error = Some(format!(
                        "{} returned status {} (attempt {})",
                        endpoint,
                        status,
                        attempt + 1
                    ));
                    continue;
                }
                status => {
                    bail!("Scenario server {} returned error status: {}", endpoint, status);
                }
            }
        }
    }

    bail!(
        "Failed to fetch scenario after trying all mirrors: {}",
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    )
}
