use serde::Deserialize;
use std::fmt;

/// Tweet does not exist (deleted, or never did).
pub const CODE_NOT_FOUND: u32 = 144;
/// Tweet belongs to a protected account we may not read.
pub const CODE_NOT_AUTHORIZED: u32 = 179;

/// One entry of the `errors` array Twitter returns on failed API calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

/// The full `errors` array, kept exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrors {
    pub errors: Vec<ApiError>,
}

impl ApiErrors {
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.errors.iter().map(|e| e.code)
    }

    /// True when at least one error in the list carries one of `codes`.
    pub fn contains_any(&self, codes: &[u32]) -> bool {
        self.codes().any(|code| codes.contains(&code))
    }
}

impl fmt::Display for ApiErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TwitterError {
    #[error("request to Twitter failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twitter API error: {0}")]
    Api(ApiErrors),

    #[error("Twitter API returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response from Twitter: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected token type {0:?} from Twitter, expected bearer")]
    TokenType(String),
}

impl TwitterError {
    /// Structured API errors, when the failure carried any.
    pub fn api_errors(&self) -> Option<&ApiErrors> {
        match self {
            TwitterError::Api(errors) => Some(errors),
            _ => None,
        }
    }

    /// Builds the error for a non-success response, keeping the `errors`
    /// array when the body has one.
    pub(crate) fn from_response_body(status: reqwest::StatusCode, body: String) -> Self {
        match serde_json::from_str::<ApiErrors>(&body) {
            Ok(errors) if !errors.errors.is_empty() => TwitterError::Api(errors),
            _ => TwitterError::Status { status, body },
        }
    }
}
