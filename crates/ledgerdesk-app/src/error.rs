// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;
use thiserror::Error;

/// Why a list fetch failed. Every variant is the same "fetch failed" case as
/// far as fallback substitution is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("cannot reach {url} ({reason})")]
    Unreachable { url: String, reason: String },
    #[error("request to {url} timed out after {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("{delivered} rows delivered to the {expected} screen")]
    WrongScreen {
        expected: &'static str,
        delivered: &'static str,
    },
    #[error("offline mode: the practice API is not contacted")]
    Offline,
}

#[cfg(test)]
mod tests {
    use super::FetchError;
    use std::time::Duration;

    #[test]
    fn messages_name_the_failing_url() {
        let error = FetchError::Timeout {
            url: "http://127.0.0.1:9/api/aml/cases".to_owned(),
            after: Duration::from_millis(250),
        };
        assert_eq!(
            error.to_string(),
            "request to http://127.0.0.1:9/api/aml/cases timed out after 250ms"
        );

        let status = FetchError::Status {
            status: 503,
            message: "maintenance window".to_owned(),
        };
        assert_eq!(status.to_string(), "server error (503): maintenance window");

        let wrong = FetchError::WrongScreen {
            expected: "clients",
            delivered: "invoices",
        };
        assert_eq!(wrong.to_string(), "invoices rows delivered to the clients screen");
    }
}
