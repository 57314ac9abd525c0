use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{server} server communication failure: {message}")]
    Communication { server: String, message: String },

    #[error("{message}")]
    Response { message: String },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status the CLI reports for a failure of this severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl ClientError {
    pub fn response(message: impl Into<String>) -> Self {
        Self::Response {
            message: message.into(),
        }
    }

    pub fn communication(server: &str, err: impl std::fmt::Display) -> Self {
        Self::Communication {
            server: server.to_string(),
            message: err.to_string(),
        }
    }

    /// True for failures raised after the server sent a response.
    pub fn is_response_error(&self) -> bool {
        matches!(self, Self::Response { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Communication { .. } => ErrorCategory::Network,
            Self::Response { .. } => ErrorCategory::Server,
            Self::InvalidUrl(_)
            | Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Server => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Communication { .. } => {
                "Check that the server is running and reachable from this host"
            }
            Self::Response { .. } => "Check the server logs and the stream configuration",
            Self::InvalidUrl(_) => "Use an absolute http:// or https:// server URL",
            Self::TomlError(_) => "Fix the syntax of the configuration file",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => "Review the configuration values",
            Self::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the server: {}", self),
            ErrorCategory::Server => format!("The server rejected the request: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
