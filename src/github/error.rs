use serde::Deserialize;

/// Classification of failures returned by the GitHub REST API
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Rate limiting (429, or 403 with a rate limit message)
    RateLimit { status: u16, message: String },
    /// Client errors (4xx)
    Client { status: u16, message: String },
    /// Server errors (5xx)
    Server { status: u16, message: String },
    /// The request never produced a response (connect failure, timeout)
    Transport(String),
    /// The response body did not match the expected shape
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-2xx response using its status code and body text.
    ///
    /// GitHub error bodies are JSON objects with a `message` field; when the
    /// body does not parse, the raw text is kept as the message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.trim().to_string());

        let result = match status {
            429 => Self::RateLimit { status, message },
            403 if message.to_lowercase().contains("rate limit") => {
                Self::RateLimit { status, message }
            }
            400..=499 => Self::Client { status, message },
            500..=599 => Self::Server { status, message },
            _ => Self::Client { status, message },
        };

        match &result {
            Self::RateLimit { status, message } => {
                tracing::warn!("GitHub rate limit hit ({}): {}", status, message)
            }
            Self::Server { .. } => tracing::error!("GitHub server error: {}", result),
            _ => tracing::debug!("GitHub client error: {}", result),
        }
        result
    }

    pub fn from_reqwest_error(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            tracing::error!("HTTP transport error: {}", error);
            Self::Transport(error.to_string())
        }
    }

    /// HTTP status code, when the API produced a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimit { status, .. }
            | Self::Client { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True when a ref creation was rejected because the ref name is taken
    pub fn is_reference_already_exists(&self) -> bool {
        matches!(self, Self::Client { message, .. } if message.contains("Reference already exists"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit { status, message } => write!(
                f,
                "GitHub API rate limit exceeded - Status: {}, Message: {}",
                status, message
            ),
            Self::Client { status, message } | Self::Server { status, message } => {
                write!(f, "GitHub API error - Status: {}, Message: {}", status, message)
            }
            Self::Transport(msg) => write!(f, "HTTP transport error: {}", msg),
            Self::Decode(msg) => write!(f, "Failed to decode GitHub API response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
