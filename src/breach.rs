// src/breach.rs
// =============================================================================
// Optional breach lookup against the Have I Been Pwned v3 API.
//
// The result is always a human-readable status line that goes straight into
// the report. Nothing here returns an error: a failed lookup is itself a
// status ("HIBP check failed: ...").
//
// API docs: https://haveibeenpwned.com/API/v3#BreachesForAccount
// =============================================================================

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const HIBP_BASE: &str = "https://haveibeenpwned.com/api/v3/breachedaccount/";
const HIBP_USER_AGENT: &str = "ig-osint-cli";
const HIBP_TIMEOUT: Duration = Duration::from_secs(12);

pub const NOT_CHECKED: &str = "Not checked (provide HIBP API key in menu to enable)";

// One entry of the breachedaccount response (truncated form only has Name)
#[derive(Debug, Deserialize)]
struct Breach {
    #[serde(rename = "Name")]
    name: String,
}

// Looks up `account` and describes the outcome in one line
pub async fn check_breaches(account: &str, api_key: Option<&str>) -> String {
    let Some(api_key) = api_key else {
        return NOT_CHECKED.to_string();
    };
    lookup(HIBP_BASE, account, api_key).await
}

// Same lookup against any breachedaccount endpoint
async fn lookup(base: &str, account: &str, api_key: &str) -> String {
    match query(base, account, api_key).await {
        Ok((status, body)) => describe_response(status, &body),
        Err(e) => {
            warn!(error = %e, "HIBP request failed");
            format!("HIBP check failed: {}", e)
        }
    }
}

async fn query(base: &str, account: &str, api_key: &str) -> anyhow::Result<(StatusCode, String)> {
    let url = breach_url(base, account)?;
    debug!(%url, "querying HIBP");

    let client = Client::builder().timeout(HIBP_TIMEOUT).build()?;
    let response = client
        .get(url)
        .header("hibp-api-key", api_key)
        .header(reqwest::header::USER_AGENT, HIBP_USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

// The account goes in as a single escaped path segment
fn breach_url(base: &str, account: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("HIBP base URL cannot take path segments"))?
        .pop_if_empty()
        .push(account);
    Ok(url)
}

// 200 lists the breaches, 404 means "clean", anything else is an error
fn describe_response(status: StatusCode, body: &str) -> String {
    match status {
        StatusCode::OK => match serde_json::from_str::<Vec<Breach>>(body) {
            Ok(breaches) => {
                let names: Vec<&str> = breaches.iter().map(|b| b.name.as_str()).collect();
                format!(
                    "Breached in {} breach(es): {}",
                    breaches.len(),
                    names.join(", ")
                )
            }
            Err(e) => format!("HIBP check failed: {}", e),
        },
        StatusCode::NOT_FOUND => "No breach found".to_string(),
        other => format!("HIBP check error: HTTP {}", other.as_u16()),
    }
}
