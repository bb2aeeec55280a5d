use thiserror::Error;

/// Failures from the remote resource gateway.
///
/// Only `Auth` on the very first account fetch is fatal; everything else is
/// shown inline and the flow returns to the screen that issued the call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl GatewayError {
    /// Short form suitable for the inline status line.
    pub fn summary(&self) -> String {
        match self {
            GatewayError::Auth(msg) => format!("Authentication failed: {}", msg),
            GatewayError::Network(e) => format!("Network error: {}", e),
            GatewayError::Api { status, message } => format!("API error {}: {}", status, message),
        }
    }
}

/// Fatal conditions detected before the first menu is shown.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("missing required environment variable {0}")]
    MissingCredential(&'static str),

    #[error("no accounts are visible to these credentials")]
    NoAccounts,
}

/// Top-level error for the binary. Anything that reaches `main` through this
/// type terminates the process with exit code 1.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
