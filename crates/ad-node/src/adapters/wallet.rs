//! # HTTP Wallet Client
//!
//! `WalletClient` over a JSON wallet endpoint: each call is a `POST` of the
//! argument object to `{base_url}/{method}`.

use am_05_campaign_rewards::{
    CreateActionArgs, CreateActionResult, GetPublicKeyArgs, WalletClient, WalletError,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::container::config::WalletConfig;

pub struct HttpWalletClient {
    client: reqwest::Client,
    base_url: String,
    originator: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyResult {
    public_key: String,
}

impl HttpWalletClient {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            originator: config.originator.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn call<A, R>(&self, method: &str, args: &A) -> Result<R, WalletError>
    where
        A: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!("[am-05] Wallet call {}", method);
        let response = self
            .client
            .post(self.endpoint(method))
            .header("Originator", &self.originator)
            .json(args)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WalletError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WalletClient for HttpWalletClient {
    async fn get_public_key(&self, args: GetPublicKeyArgs) -> Result<String, WalletError> {
        let result: PublicKeyResult = self.call("getPublicKey", &args).await?;
        Ok(result.public_key)
    }

    async fn create_action(&self, args: CreateActionArgs) -> Result<CreateActionResult, WalletError> {
        self.call("createAction", &args).await
    }
}
