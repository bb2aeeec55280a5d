use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::error::StartupError;

pub const USER_VAR: &str = "WPCTL_API_USER";
pub const PASSWORD_VAR: &str = "WPCTL_API_PASSWORD";

/// Interactive terminal client for WordPress accounts, sites, and installs.
#[derive(Debug, Parser)]
#[command(name = "wpctl", version, about)]
pub struct Cli {
    /// Base URL of the hosting API.
    #[arg(long, env = "WPCTL_API_URL", default_value = "https://api.wpengineapi.com/v1")]
    pub api_url: String,

    /// Log file path. Defaults to wpctl.log in the system temp directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("wpctl.log"))
    }
}

/// API credentials, sent as HTTP basic auth. Both variables are required;
/// absence is fatal before any terminal mode change.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, StartupError> {
        let user = read_var(USER_VAR)?;
        let password = read_var(PASSWORD_VAR)?;
        Ok(Self { user, password })
    }
}

fn read_var(name: &'static str) -> Result<String, StartupError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StartupError::MissingCredential(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        // Runs with a name no test environment defines.
        let err = read_var("WPCTL_TEST_UNSET_VARIABLE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required environment variable WPCTL_TEST_UNSET_VARIABLE"
        );
    }
}
