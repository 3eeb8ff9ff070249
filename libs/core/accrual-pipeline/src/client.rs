use std::time::Duration;
use thiserror::Error;

/// Per-call deadline for the accrual service, independent of whatever
/// deadline the caller itself is operating under.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AccrualClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),
}

/// Status reported by the external accrual service for a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemoteOrderStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

#[derive(Debug, serde::Deserialize)]
struct AccrualBody {
    #[allow(dead_code)]
    order: String,
    status: RemoteOrderStatus,
    accrual: Option<f64>,
}

/// Normalised outcome of one `fetch` call, already stripped of transport and
/// HTTP-status detail the worker doesn't need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccrualResponse {
    Ok {
        status: RemoteOrderStatus,
        /// Integer hundredths, present only when `status == Processed`.
        accrual: Option<i64>,
    },
    NotRegistered,
    RateLimited {
        retry_after_seconds: u64,
    },
    RemoteError,
    TransportError,
}

/// One-per-process client for the external accrual service.
///
/// Stateless and cheap to clone: `reqwest::Client` holds its own connection
/// pool behind an `Arc`, so every worker shares one pool.
#[derive(Clone)]
pub struct AccrualClient {
    http: reqwest::Client,
    base_url: String,
}

impl AccrualClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AccrualClientError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(AccrualClientError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// `GET {base}/api/orders/{order_number}`.
    pub async fn fetch(&self, order_number: &str) -> AccrualResponse {
        let url = format!("{}/api/orders/{}", self.base_url, order_number);

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(order_number, error = %e, "accrual request failed");
                return AccrualResponse::TransportError;
            }
        };

        let status = response.status();

        if status == reqwest::StatusCode::NO_CONTENT {
            return AccrualResponse::NotRegistered;
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return match parse_retry_after(response.headers()) {
                Some(retry_after_seconds) => AccrualResponse::RateLimited { retry_after_seconds },
                None => {
                    tracing::warn!(order_number, "429 with missing or non-numeric Retry-After");
                    AccrualResponse::RemoteError
                }
            };
        }

        if status.is_server_error() {
            return AccrualResponse::RemoteError;
        }

        if !status.is_success() {
            tracing::warn!(order_number, %status, "unexpected accrual response status");
            return AccrualResponse::RemoteError;
        }

        match response.json::<AccrualBody>().await {
            Ok(body) => AccrualResponse::Ok {
                status: body.status,
                accrual: body.accrual.map(|a| (a * 100.0).round() as i64),
            },
            Err(e) => {
                // Malformed body / unrecognised status string: a programmer
                // error on the remote side, not a transport failure.
                tracing::warn!(order_number, error = %e, "failed to decode accrual response body");
                AccrualResponse::RemoteError
            }
        }
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn retry_after_rejects_non_numeric() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn retry_after_rejects_missing_header() {
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn retry_after_parses_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(parse_retry_after(&headers), Some(30));
    }
}
