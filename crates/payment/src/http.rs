//! Blocking HTTP implementation of the Payment capability.

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value as JsonValue;

use crate::config::{ConfigError, PaymentConfig};
use crate::payment::{DispatchError, DispatchOutcome, Payment};

// Sent as `MP-Master-Key`, `MP-Private-Key` and `MP-Token`; header names are
// case-insensitive and `HeaderName::from_static` wants lowercase.
pub const MASTER_KEY_HEADER: &str = "mp-master-key";
pub const PRIVATE_KEY_HEADER: &str = "mp-private-key";
pub const TOKEN_HEADER: &str = "mp-token";

/// Sends invoice requests to the hosted checkout API.
///
/// One request per `process` call: POST when a payload is given, GET
/// otherwise. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpPayment {
    client: Client,
    config: PaymentConfig,
}

impl HttpPayment {
    pub fn new(config: PaymentConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .default_headers(auth_headers(&config)?)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(PaymentConfig::from_env()?)
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    fn send(&self, endpoint: &str, payload: Option<&JsonValue>) -> Result<DispatchOutcome, DispatchError> {
        let url = self.config.endpoint_url(endpoint);
        let request = match payload {
            Some(body) => self.client.post(&url).json(body),
            None => self.client.get(&url),
        };

        tracing::debug!(%url, has_body = payload.is_some(), "dispatching checkout request");

        let response = request
            .send()
            .map_err(|e| DispatchError::transport(e.to_string()))?;

        decode(response)
    }
}

impl Payment for HttpPayment {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome {
        match self.send(endpoint, payload) {
            Ok(outcome) => {
                if !outcome.success {
                    tracing::warn!(endpoint, response = %outcome.response, "processor rejected request");
                }
                outcome
            }
            Err(err) => {
                tracing::warn!(endpoint, error = %err, "checkout dispatch failed");
                DispatchOutcome::from(err)
            }
        }
    }
}

fn decode(response: Response) -> Result<DispatchOutcome, DispatchError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| DispatchError::transport(e.to_string()))?;

    let parsed: JsonValue = serde_json::from_str(&body).map_err(|_| DispatchError::Decode {
        status: status.as_u16(),
        body: body.clone(),
    })?;

    Ok(DispatchOutcome {
        success: status.is_success(),
        response: parsed,
    })
}

fn auth_headers(config: &PaymentConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, key, value) in [
        (MASTER_KEY_HEADER, "master_key", &config.master_key),
        (PRIVATE_KEY_HEADER, "private_key", &config.private_key),
        (TOKEN_HEADER, "token", &config.token),
    ] {
        let mut header = HeaderValue::from_str(value).map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })?;
        header.set_sensitive(true);
        headers.insert(HeaderName::from_static(name), header);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_headers_carry_credentials() {
        let config = PaymentConfig::new("master", "private", "token");
        let headers = auth_headers(&config).unwrap();
        assert_eq!(headers[MASTER_KEY_HEADER], "master");
        assert_eq!(headers[PRIVATE_KEY_HEADER], "private");
        assert_eq!(headers[TOKEN_HEADER], "token");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers[TOKEN_HEADER].is_sensitive());
    }

    #[test]
    fn credentials_with_newlines_are_rejected() {
        let config = PaymentConfig::new("master", "private\n", "token");
        let err = auth_headers(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "private_key", .. }));
    }

    #[test]
    fn unreachable_host_yields_failed_outcome() {
        let config = PaymentConfig::new("m", "p", "t")
            .with_base_url("http://127.0.0.1:9/")
            .with_timeout(std::time::Duration::from_secs(2));
        let payment = HttpPayment::new(config).unwrap();

        let (success, response) = payment.process("checkout-invoice/confirm/T123", None).into_parts();

        assert!(!success);
        assert!(response["response_text"]
            .as_str()
            .unwrap()
            .starts_with("transport error"));
    }
}
