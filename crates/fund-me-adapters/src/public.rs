use alloy::primitives::{Address, U256};

use fund_me_core::{ContractCallRequest, PortError, ReadPort, SimulatedRequest};

use crate::abi;
use crate::eip1193::{json_bytes, json_chain_id_to_u64, json_quantity, Eip1193Transport};
use crate::wallet::call_object;

/// Read half of a session: `eth_call` simulation and balance queries.
#[derive(Debug, Clone)]
pub struct PublicClient {
    transport: Eip1193Transport,
}

impl PublicClient {
    pub fn new(transport: Eip1193Transport) -> Self {
        Self { transport }
    }
}

impl ReadPort for PublicClient {
    async fn simulate_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<SimulatedRequest, PortError> {
        let calldata = abi::encode_call(request.function, request.value)?;
        let call = call_object(request, &calldata);
        let result = self
            .transport
            .request("eth_call", serde_json::json!([call, "latest"]))
            .await?;
        Ok(SimulatedRequest {
            request: request.clone(),
            calldata,
            result: json_bytes(&result)?,
        })
    }

    async fn get_balance(&self, address: Address) -> Result<U256, PortError> {
        let result = self
            .transport
            .request("eth_getBalance", serde_json::json!([address, "latest"]))
            .await?;
        json_quantity(&result)
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        let result = self
            .transport
            .request("eth_chainId", serde_json::json!([]))
            .await?;
        json_chain_id_to_u64(&result)
    }
}
