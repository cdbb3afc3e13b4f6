use alloy::primitives::{Address, B256};
use serde_json::Value;

use fund_me_core::{ContractCallRequest, PortError, SigningPort, SimulatedRequest};

use crate::eip1193::{
    json_accounts, json_chain_id_to_u64, json_tx_hash, quantity_hex, Eip1193Transport,
};

/// Signing half of a session: account access and transaction submission.
#[derive(Debug, Clone)]
pub struct WalletClient {
    transport: Eip1193Transport,
}

impl WalletClient {
    pub fn new(transport: Eip1193Transport) -> Self {
        Self { transport }
    }
}

impl SigningPort for WalletClient {
    async fn request_addresses(&self) -> Result<Vec<Address>, PortError> {
        let result = self
            .transport
            .request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        json_accounts(&result)
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        let result = self
            .transport
            .request("eth_chainId", serde_json::json!([]))
            .await?;
        json_chain_id_to_u64(&result)
    }

    async fn write_contract(&self, simulated: &SimulatedRequest) -> Result<B256, PortError> {
        let expected = simulated.request.chain.id;
        let current = self.chain_id().await?;
        if current != expected {
            return Err(PortError::Policy(format!(
                "CHAIN_MISMATCH: expected {expected}, got {current}"
            )));
        }

        let tx = transaction_payload(simulated);
        let result = self
            .transport
            .request("eth_sendTransaction", serde_json::json!([tx]))
            .await?;
        json_tx_hash(&result)
    }
}

/// `eth_sendTransaction` object for a simulated call; `value` only when one was attached.
pub fn transaction_payload(simulated: &SimulatedRequest) -> Value {
    let mut tx = call_object(&simulated.request, &simulated.calldata);
    tx["chainId"] = Value::String(format!("0x{:x}", simulated.request.chain.id));
    tx
}

pub(crate) fn call_object(request: &ContractCallRequest, data: &[u8]) -> Value {
    let mut call = serde_json::json!({
        "from": request.account,
        "to": request.address,
        "data": format!("0x{}", alloy::hex::encode(data)),
    });
    if let Some(value) = request.value {
        call["value"] = Value::String(quantity_hex(value));
    }
    call
}
