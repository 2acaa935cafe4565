//! HTTP clients for the two external validation services.
//!
//! Both validators place the credential in a configurable header and make a
//! single unretried `GET`; there is no timeout beyond `reqwest`'s client
//! default.

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::AuthGateError;

/// Identity validator response body: `{"id": <string or integer>}`.
#[derive(Debug, Deserialize)]
struct IdentityResponse {
    #[serde(deserialize_with = "deserialize_id_as_string")]
    id: String,
}

fn deserialize_id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdField {
        Str(String),
        Num(i64),
    }

    match IdField::deserialize(deserializer)? {
        IdField::Str(s) => Ok(s),
        IdField::Num(n) => Ok(n.to_string()),
    }
}

/// Resolves a credential to a user identity via the identity validation
/// endpoint.
pub struct IdentityValidator {
    client: Client,
    header_name: String,
    url: String,
}

impl IdentityValidator {
    pub fn new(client: Client, header_name: String, url: String) -> Self {
        Self {
            client,
            header_name,
            url,
        }
    }

    /// Returns the resolved `user_id`, or the `AuthGateError` kind matching
    /// the validator's response.
    pub async fn validate(&self, credential: &str) -> Result<String, AuthGateError> {
        let response = self
            .client
            .get(&self.url)
            .header(self.header_name.as_str(), credential)
            .send()
            .await
            .map_err(|err| AuthGateError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(AuthGateError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(AuthGateError::Forbidden),
            StatusCode::INTERNAL_SERVER_ERROR => return Err(AuthGateError::InternalUpstream),
            status if !status.is_success() => {
                return Err(AuthGateError::Transport(format!(
                    "unexpected status {status}"
                )));
            }
            _ => {}
        }

        let body: IdentityResponse = response
            .json()
            .await
            .map_err(|err| AuthGateError::Decode(err.to_string()))?;

        if body.id == "0" {
            return Err(AuthGateError::Unauthorized);
        }

        Ok(body.id)
    }
}

/// Checks whether a credential is authorized to act on a given board.
pub struct BoardAccessValidator {
    client: Client,
    header_name: String,
    base_url: String,
}

impl BoardAccessValidator {
    pub fn new(client: Client, header_name: String, base_url: String) -> Self {
        Self {
            client,
            header_name,
            base_url,
        }
    }

    /// `200 OK` allows; anything else is `Forbidden`.
    pub async fn validate(&self, board_id: &str, credential: &str) -> Result<(), AuthGateError> {
        let url = format!("{}/{board_id}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header(self.header_name.as_str(), credential)
            .send()
            .await
            .map_err(|err| AuthGateError::Transport(err.to_string()))?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(AuthGateError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn identity_validator_resolves_string_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .and(header("X-Jwt", "J1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "U1"})))
            .mount(&server)
            .await;

        let validator = IdentityValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/validate", server.uri()),
        );

        assert_eq!(validator.validate("J1").await.unwrap(), "U1");
    }

    #[tokio::test]
    async fn identity_validator_resolves_numeric_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 42})))
            .mount(&server)
            .await;

        let validator = IdentityValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/validate", server.uri()),
        );

        assert_eq!(validator.validate("J1").await.unwrap(), "42");
    }

    #[tokio::test]
    async fn identity_validator_rejects_sentinel_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "0"})))
            .mount(&server)
            .await;

        let validator = IdentityValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/validate", server.uri()),
        );

        assert_eq!(validator.validate("J1").await.unwrap_err(), AuthGateError::Unauthorized);
    }

    #[tokio::test]
    async fn identity_validator_maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let validator = IdentityValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/validate", server.uri()),
        );

        assert_eq!(validator.validate("J1").await.unwrap_err(), AuthGateError::Forbidden);
    }

    #[tokio::test]
    async fn board_validator_allows_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boards/B"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let validator = BoardAccessValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/boards", server.uri()),
        );

        assert!(validator.validate("B", "J1").await.is_ok());
    }

    #[tokio::test]
    async fn board_validator_denies_on_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boards/B"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let validator = BoardAccessValidator::new(
            Client::new(),
            "X-Jwt".to_string(),
            format!("{}/boards", server.uri()),
        );

        assert_eq!(
            validator.validate("B", "J1").await.unwrap_err(),
            AuthGateError::Forbidden
        );
    }
}
