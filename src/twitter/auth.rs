//! Application-only authentication: trades the consumer key and secret for a
//! bearer token via the OAuth2 client-credentials grant.

use super::error::TwitterError;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Consumer key and secret of the registered Twitter app.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token shared read-only by every request for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}

/// Exchanges `credentials` for a bearer token at `{api_base}/oauth2/token`.
///
/// Called once at startup. There is no retry: any failure here means the
/// server must not start.
pub async fn acquire_bearer_token(
    client: &reqwest::Client,
    api_base: &str,
    credentials: &Credentials,
) -> Result<BearerToken, TwitterError> {
    let url = format!("{}/oauth2/token", api_base.trim_end_matches('/'));

    let response = client
        .post(&url)
        .basic_auth(&credentials.consumer_key, Some(&credentials.consumer_secret))
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded;charset=UTF-8",
        )
        .body("grant_type=client_credentials")
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TwitterError::from_response_body(status, body));
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    if !token.token_type.eq_ignore_ascii_case("bearer") {
        return Err(TwitterError::TokenType(token.token_type));
    }

    info!("obtained application bearer token");
    Ok(BearerToken::new(token.access_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("AAAA-secret");
        assert_eq!(format!("{:?}", token), "BearerToken(<redacted>)");
        assert_eq!(token.as_str(), "AAAA-secret");
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials {
            consumer_key: "key".to_string(),
            consumer_secret: "hunter2".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_token_response_decodes() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"token_type":"bearer","access_token":"AAAA%2FAAA"}"#)
                .unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.access_token, "AAAA%2FAAA");
    }
}
