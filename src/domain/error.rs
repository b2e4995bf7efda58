use thiserror::Error;

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Configuration { message: String, hint: Option<String> },

    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected upstream response: {0}")]
    Protocol(String),
}

impl RelayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            hint: None,
        }
    }

    pub fn configuration_with_hint(msg: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            hint: Some(hint.into()),
        }
    }

    /// No upstream credential is configured.
    pub fn missing_api_key() -> Self {
        Self::configuration_with_hint(
            "Groq API key is not configured",
            format!("Please set {API_KEY_ENV} in your .env file"),
        )
    }

    /// An upstream failure that never produced an HTTP status (connect error, timeout).
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: msg.into(),
        }
    }

    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: msg.into(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration { .. } => "configuration",
            Self::Upstream { .. } => "upstream",
            Self::Protocol(_) => "protocol",
        }
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Configuration { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}
