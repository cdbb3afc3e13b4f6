use alloy::primitives::utils::{parse_units, ParseUnits};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONNECT_LABEL: &str = "Connect";
pub const CONNECTED_LABEL: &str = "Connected!";
pub const INSTALL_PROMPT_LABEL: &str = "Please install MetaMask";

pub const CUSTOM_CHAIN_NAME: &str = "Custom Chain";
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;
const ETHER_DECIMALS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractFunction {
    Fund,
    Withdraw,
}

impl ContractFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Fund => "fund",
            Self::Withdraw => "withdraw",
        }
    }

    pub fn is_payable(self) -> bool {
        matches!(self, Self::Fund)
    }
}

impl std::fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "Ether".to_owned(),
            symbol: "ETH".to_owned(),
            decimals: 18,
        }
    }
}

/// Network the wallet reported, paired with the RPC endpoint the app was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
}

impl ChainDescriptor {
    pub fn custom(id: u64, rpc_url: impl Into<String>) -> Self {
        Self {
            id,
            name: CUSTOM_CHAIN_NAME.to_owned(),
            native_currency: NativeCurrency::default(),
            rpc_urls: vec![rpc_url.into()],
        }
    }

    pub fn default_rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallRequest {
    pub function: ContractFunction,
    pub address: Address,
    pub account: Address,
    pub chain: ChainDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// A call the read capability has executed without reverting.
///
/// Submission takes this value as-is; `calldata` is the encoding that was simulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedRequest {
    pub request: ContractCallRequest,
    pub calldata: Bytes,
    pub result: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative: {0}")]
    Negative(String),
    #[error("invalid ether amount {input:?}: {reason}")]
    Invalid { input: String, reason: String },
}

/// Parses a decimal ether quantity ("1.5") into wei.
/// More than 18 fractional digits is an error rather than a silent truncation.
pub fn parse_ether_amount(raw: &str) -> Result<U256, AmountError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if input.starts_with('-') {
        return Err(AmountError::Negative(input.to_owned()));
    }
    if let Some((_, fraction)) = input.split_once('.') {
        if fraction.len() > ETHER_DECIMALS {
            return Err(AmountError::Invalid {
                input: input.to_owned(),
                reason: format!("more than {ETHER_DECIMALS} decimal places"),
            });
        }
    }
    match parse_units(input, "ether") {
        Ok(ParseUnits::U256(wei)) => Ok(wei),
        Ok(ParseUnits::I256(_)) => Err(AmountError::Negative(input.to_owned())),
        Err(e) => Err(AmountError::Invalid {
            input: input.to_owned(),
            reason: e.to_string(),
        }),
    }
}

/// Formats wei as ether without trailing zeros: 2e18 -> "2", 1.5e18 -> "1.5".
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let fraction = wei % unit;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", fraction.to_string(), width = ETHER_DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

