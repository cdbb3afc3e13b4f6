use alloy::primitives::{address, Address};

use fund_me_core::{ControllerConfig, DEFAULT_RPC_URL};

/// First contract address anvil assigns to a fresh deployer.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

#[derive(Debug, Clone)]
pub struct FundMeConfig {
    pub contract_address: Address,
    pub rpc_url: String,
    /// Native builds have no injected wallet; requests go to this JSON-RPC endpoint instead.
    pub eip1193_proxy_url: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for FundMeConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            rpc_url: DEFAULT_RPC_URL.to_owned(),
            eip1193_proxy_url: None,
            request_timeout_ms: 15_000,
        }
    }
}

impl FundMeConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(raw) = std::env::var("FUND_ME_CONTRACT_ADDRESS") {
            match raw.trim().parse() {
                Ok(address) => cfg.contract_address = address,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring FUND_ME_CONTRACT_ADDRESS"),
            }
        }
        if let Some(url) = non_empty_env("FUND_ME_RPC_URL") {
            cfg.rpc_url = url;
        }
        cfg.eip1193_proxy_url = non_empty_env("FUND_ME_EIP1193_PROXY_URL");
        if let Ok(raw) = std::env::var("FUND_ME_REQUEST_TIMEOUT_MS") {
            match raw.trim().parse() {
                Ok(ms) => cfg.request_timeout_ms = ms,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring FUND_ME_REQUEST_TIMEOUT_MS"),
            }
        }

        cfg
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            contract_address: self.contract_address,
            rpc_url: self.rpc_url.clone(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
