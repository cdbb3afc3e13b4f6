use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use fund_me_core::{ContractFunction, PortError};

sol! {
    interface FundMe {
        function fund() external payable;
        function withdraw() external;
    }
}

pub fn selector(function: ContractFunction) -> [u8; 4] {
    match function {
        ContractFunction::Fund => FundMe::fundCall::SELECTOR,
        ContractFunction::Withdraw => FundMe::withdrawCall::SELECTOR,
    }
}

/// Encodes calldata for `function`, refusing to attach value to a non-payable call.
pub fn encode_call(function: ContractFunction, value: Option<U256>) -> Result<Bytes, PortError> {
    if !function.is_payable() && value.is_some_and(|v| !v.is_zero()) {
        return Err(PortError::Validation(format!(
            "{function} is not payable but a value was attached"
        )));
    }
    let data = match function {
        ContractFunction::Fund => FundMe::fundCall {}.abi_encode(),
        ContractFunction::Withdraw => FundMe::withdrawCall {}.abi_encode(),
    };
    Ok(Bytes::from(data))
}

/// `Error(string)` / `Panic(uint256)` payloads to text; custom errors fall back to their hex.
pub fn revert_reason(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    alloy::sol_types::decode_revert_reason(data)
        .or_else(|| Some(format!("0x{}", alloy::hex::encode(data))))
}
