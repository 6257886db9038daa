// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use ledgerdesk_app::{Endpoint, FetchError, HttpMethod, ScreenKind, ScreenRows};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Blocking client for the practice API's list endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    paths: BTreeMap<ScreenKind, String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url must use http or https, got {:?} -- e.g. http://localhost:8080",
                parsed.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("api.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            paths: BTreeMap::new(),
            http,
        })
    }

    /// Replaces the default path for one screen. The method stays the
    /// screen's default.
    pub fn with_path(mut self, screen: ScreenKind, path: &str) -> Result<Self> {
        if !path.starts_with('/') {
            bail!(
                "api.paths.{} must be an absolute path starting with '/', got {path:?}",
                screen.as_str()
            );
        }
        self.paths.insert(screen, path.to_owned());
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self, screen: ScreenKind) -> Endpoint {
        let default = screen.default_endpoint();
        match self.paths.get(&screen) {
            Some(path) => default.with_path(path),
            None => default,
        }
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path)
    }

    /// One request, no retry. An empty list is a successful result.
    pub fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.url_for(endpoint);
        debug!(method = ?endpoint.method, %url, "fetching list");

        let request = match endpoint.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url).json(&serde_json::json!({})),
        };
        let response = request
            .send()
            .map_err(|error| self.transport_error(&url, error))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|error| self.transport_error(&url, error))?;
        if !status.is_success() {
            return Err(clean_error_response(status, &body));
        }

        let items = decode_list(&body).map_err(|reason| FetchError::Decode {
            url: url.clone(),
            reason,
        })?;
        debug!(%url, rows = items.len(), "list fetched");
        Ok(items)
    }

    pub fn fetch_screen(&self, screen: ScreenKind) -> Result<ScreenRows, FetchError> {
        let endpoint = self.endpoint(screen);
        Ok(match screen {
            ScreenKind::AmlCases => ScreenRows::AmlCases(self.fetch_list(&endpoint)?),
            ScreenKind::Clients => ScreenRows::Clients(self.fetch_list(&endpoint)?),
            ScreenKind::Invoices => ScreenRows::Invoices(self.fetch_list(&endpoint)?),
            ScreenKind::Tasks => ScreenRows::Tasks(self.fetch_list(&endpoint)?),
            ScreenKind::QualityReviews => {
                ScreenRows::QualityReviews(self.fetch_list(&endpoint)?)
            }
            ScreenKind::Templates => ScreenRows::Templates(self.fetch_list(&endpoint)?),
        })
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_owned(),
                after: self.timeout,
            };
        }
        FetchError::Unreachable {
            url: url.to_owned(),
            reason: root_cause(&error),
        }
    }
}

fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &dyn std::error::Error = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}

/// Accepts a bare array or a `{"data": [...]}` envelope.
fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|error| format!("invalid JSON: {error}"))?;
    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut object) => match object.remove("data") {
            Some(data @ serde_json::Value::Array(_)) => data,
            Some(_) => return Err("\"data\" is not an array".to_owned()),
            None => return Err("expected a JSON array or an object with \"data\"".to_owned()),
        },
        _ => return Err("expected a JSON array or an object with \"data\"".to_owned()),
    };
    serde_json::from_value(list).map_err(|error| error.to_string())
}

#[derive(Debug, Deserialize)]
struct NestedErrorEnvelope {
    error: Option<NestedErrorBody>,
}

#[derive(Debug, Deserialize)]
struct NestedErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct FlatErrorEnvelope {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

fn clean_error_response(status: StatusCode, body: &str) -> FetchError {
    let status = status.as_u16();
    let status_error = |message: String| FetchError::Status { status, message };

    if let Ok(parsed) = serde_json::from_str::<NestedErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return status_error(error.message);
    }

    if let Ok(parsed) = serde_json::from_str::<FlatErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return status_error(error);
    }

    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(text) = parsed.message
        && !text.is_empty()
    {
        return status_error(text);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return status_error(trimmed.to_owned());
    }

    status_error("no error details in response".to_owned())
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, decode_list};
    use ledgerdesk_app::{FetchError, HttpMethod, ScreenKind};
    use reqwest::StatusCode;
    use std::time::Duration;

    fn status_message(body: &str) -> String {
        match clean_error_response(StatusCode::BAD_GATEWAY, body) {
            FetchError::Status { status, message } => {
                assert_eq!(status, 502);
                message
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn error_envelopes_are_unwrapped() {
        assert_eq!(
            status_message(r#"{"error":{"message":"upstream down"}}"#),
            "upstream down"
        );
        assert_eq!(status_message(r#"{"error":"bad token"}"#), "bad token");
        assert_eq!(status_message(r#"{"message":"try later"}"#), "try later");
        assert_eq!(status_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(
            status_message(r#"{"detail":"nested"}"#),
            "no error details in response"
        );
        assert_eq!(status_message(""), "no error details in response");
    }

    #[test]
    fn decode_accepts_bare_arrays_and_data_envelopes() {
        let bare: Vec<i64> = decode_list("[1,2,3]").expect("bare array");
        assert_eq!(bare, vec![1, 2, 3]);
        let wrapped: Vec<i64> = decode_list(r#"{"data":[4]}"#).expect("envelope");
        assert_eq!(wrapped, vec![4]);
        let empty: Vec<i64> = decode_list("[]").expect("empty array");
        assert!(empty.is_empty());
    }

    #[test]
    fn decode_rejects_other_shapes() {
        assert!(decode_list::<i64>(r#"{"items":[1]}"#).is_err());
        assert!(decode_list::<i64>(r#"{"data":{"id":1}}"#).is_err());
        assert!(decode_list::<i64>("42").is_err());
        assert!(decode_list::<i64>("not json").is_err());
    }

    #[test]
    fn base_url_must_be_http() {
        let timeout = Duration::from_secs(1);
        assert!(Client::new("", timeout).is_err());
        assert!(Client::new("not a url", timeout).is_err());
        let error = Client::new("ftp://files.example.com", timeout)
            .expect_err("ftp scheme should be rejected");
        assert!(error.to_string().contains("http or https"));
        assert!(Client::new("http://localhost:8080", Duration::ZERO).is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed_and_paths_override() {
        let client = Client::new("http://localhost:8080/", Duration::from_secs(1))
            .expect("client")
            .with_path(ScreenKind::QualityReviews, "/v2/reviews/query")
            .expect("override");
        assert_eq!(client.base_url(), "http://localhost:8080");

        let endpoint = client.endpoint(ScreenKind::QualityReviews);
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(
            client.url_for(&endpoint),
            "http://localhost:8080/v2/reviews/query"
        );
        assert_eq!(
            client.url_for(&client.endpoint(ScreenKind::Clients)),
            "http://localhost:8080/api/crm/clients"
        );
    }

    #[test]
    fn relative_path_override_is_rejected() {
        let client = Client::new("http://localhost:8080", Duration::from_secs(1)).expect("client");
        let error = client
            .with_path(ScreenKind::Tasks, "api/tasks")
            .expect_err("relative path should be rejected");
        assert!(error.to_string().contains("api.paths.tasks"));
    }
}
