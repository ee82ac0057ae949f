use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IPS exception: {message} (code: {code})")]
    Api { code: String, message: String },
    #[error("entity is already loaded")]
    AlreadyLoaded,
    #[error("entity is not loaded")]
    NotLoaded,
    #[error("invalid group: expected a group id or an object carrying one")]
    InvalidGroup,
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid header value: {0}")]
    Header(String),
}

impl ClientError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Code reported by the remote platform, when this is an application error.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_code_and_message() {
        let err = ClientError::api("EX123", "boom");
        let rendered = err.to_string();
        assert!(rendered.contains("EX123"));
        assert!(rendered.contains("boom"));
        assert_eq!(err.api_code(), Some("EX123"));
    }

    #[test]
    fn lifecycle_errors_have_no_api_code() {
        assert_eq!(ClientError::NotLoaded.api_code(), None);
        assert_eq!(ClientError::AlreadyLoaded.api_code(), None);
    }
}
