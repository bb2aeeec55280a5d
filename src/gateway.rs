use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::error::GatewayError;
use crate::model::{Account, Environment, Install, Site};

/// The four logical remote operations the flow controller depends on.
/// Kept behind a trait so flows can be exercised against an in-memory mock.
#[async_trait]
pub trait ResourceGateway {
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError>;

    async fn list_sites_for_account(&self, account_id: &str) -> Result<Vec<Site>, GatewayError>;

    async fn list_installs_for_site(&self, site_id: &str) -> Result<Vec<Install>, GatewayError>;

    async fn create_site(&self, account_id: &str, name: &str) -> Result<Site, GatewayError>;

    async fn create_install(
        &self,
        site_id: &str,
        account_id: &str,
        name: &str,
        environment: Environment,
    ) -> Result<Install, GatewayError>;

    async fn delete_install(&self, install_id: &str) -> Result<(), GatewayError>;
}

/// List responses arrive wrapped in a results envelope.
#[derive(Deserialize)]
struct ListEnvelope<T> {
    results: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract a human-readable message from a non-2xx response body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}

/// HTTP implementation of the gateway.
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Map a non-2xx response to the error taxonomy.
    async fn check(&self, response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(status = status.as_u16(), %message, "gateway request failed");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(GatewayError::Auth(message))
        } else {
            Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GatewayError> {
        debug!(path, "GET list");
        let response = self
            .http
            .get(self.url(path))
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await?;
        let envelope: ListEnvelope<T> = self.check(response).await?.json().await?;
        Ok(envelope.results)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, GatewayError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .json(&body)
            .send()
            .await?;
        Ok(self.check(response).await?.json().await?)
    }
}

#[async_trait]
impl ResourceGateway for ApiClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        self.get_list("accounts").await
    }

    // The API has no per-account sites endpoint; list everything and filter
    // client-side. Result sets are small and unpaginated.
    async fn list_sites_for_account(&self, account_id: &str) -> Result<Vec<Site>, GatewayError> {
        let sites: Vec<Site> = self.get_list("sites").await?;
        Ok(sites.into_iter().filter(|s| s.belongs_to(account_id)).collect())
    }

    async fn list_installs_for_site(&self, site_id: &str) -> Result<Vec<Install>, GatewayError> {
        let installs: Vec<Install> = self.get_list("installs").await?;
        Ok(installs.into_iter().filter(|i| i.belongs_to(site_id)).collect())
    }

    async fn create_site(&self, account_id: &str, name: &str) -> Result<Site, GatewayError> {
        self.post_json("sites", json!({ "name": name, "account_id": account_id }))
            .await
    }

    async fn create_install(
        &self,
        site_id: &str,
        account_id: &str,
        name: &str,
        environment: Environment,
    ) -> Result<Install, GatewayError> {
        self.post_json(
            "installs",
            json!({
                "name": name,
                "site_id": site_id,
                "account_id": account_id,
                "environment": environment,
            }),
        )
        .await
    }

    async fn delete_install(&self, install_id: &str) -> Result<(), GatewayError> {
        debug!(install_id, "DELETE install");
        let response = self
            .http
            .delete(self.url(&format!("installs/{}", install_id)))
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }
}
