use std::fmt;

use serde::{Deserialize, Serialize};

/// Deployment environment of an install. A site can hold at most one
/// install per environment, enforced client-side before offering
/// "+ Add install".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    Development,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Staging,
        Environment::Development,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Top-level tenant in the remote system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// Reference to a parent entity. The API has shipped three shapes over the
/// years: a bare id string, a nested object carrying an id, and a renamed
/// foreign-key field (handled with serde aliases at the use site). All must
/// match identically.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Bare(String),
    Keyed { id: String },
}

impl ParentRef {
    pub fn id(&self) -> &str {
        match self {
            ParentRef::Bare(id) => id,
            ParentRef::Keyed { id } => id,
        }
    }
}

/// A WordPress site belonging to an account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "accountId", alias = "account_id")]
    pub account: Option<ParentRef>,
}

impl Site {
    pub fn belongs_to(&self, account_id: &str) -> bool {
        self.account.as_ref().is_some_and(|r| r.id() == account_id)
    }
}

/// A deployed environment of a site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Install {
    pub id: String,
    pub name: String,
    pub environment: Environment,
    #[serde(default)]
    pub primary_domain: String,
    #[serde(default)]
    pub cname: String,
    #[serde(default)]
    pub php_version: String,
    #[serde(default)]
    pub is_multisite: bool,
    #[serde(default, alias = "siteId", alias = "site_id")]
    pub site: Option<ParentRef>,
}

impl Install {
    pub fn belongs_to(&self, site_id: &str) -> bool {
        self.site.as_ref().is_some_and(|r| r.id() == site_id)
    }
}

/// Environments not yet used by any install in `installs`, in the fixed
/// production, staging, development order.
pub fn available_environments(installs: &[Install]) -> Vec<Environment> {
    Environment::ALL
        .iter()
        .copied()
        .filter(|env| !installs.iter().any(|i| i.environment == *env))
        .collect()
}
