//! Public network facts the node needs at launch.

use crate::error::ApiError;
use async_trait::async_trait;
use std::time::Duration;

const PUBLIC_IP_URL: &str = "https://ip.codex.storage";
const TESTNET_SPR_URL: &str = "https://spr.codex.storage/testnet";
const TESTNET_ETH_PROVIDER: &str = "https://rpc.testnet.codex.storage";
const NETWORK_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of the public IP, bootstrap records and chain RPC endpoint.
#[async_trait]
pub trait NetworkInfo: Send + Sync {
    async fn public_ip(&self) -> Result<String, ApiError>;
    async fn bootstrap_nodes(&self) -> Result<Vec<String>, ApiError>;
    fn eth_provider(&self) -> &str;
}

/// `NetworkInfo` backed by the public testnet services.
pub struct TestnetNetworkInfo {
    http: reqwest::Client,
}

impl TestnetNetworkInfo {
    /// Fails only when the HTTP backend (TLS) cannot be initialised.
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(NETWORK_HTTP_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), body));
        }
        Ok(body)
    }
}

#[async_trait]
impl NetworkInfo for TestnetNetworkInfo {
    async fn public_ip(&self) -> Result<String, ApiError> {
        Ok(parse_public_ip(&self.get_text(PUBLIC_IP_URL).await?))
    }

    async fn bootstrap_nodes(&self) -> Result<Vec<String>, ApiError> {
        Ok(parse_bootstrap_nodes(&self.get_text(TESTNET_SPR_URL).await?))
    }

    fn eth_provider(&self) -> &str {
        TESTNET_ETH_PROVIDER
    }
}

fn parse_public_ip(body: &str) -> String {
    body.replace(['\n', '\r'], "")
}

fn parse_bootstrap_nodes(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
