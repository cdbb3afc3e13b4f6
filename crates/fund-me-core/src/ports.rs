//! Capability boundary between the controller and the host wallet.
//!
//! The ports are async because every call may suspend on the wallet
//! (approval popups) or on the node. Futures are not required to be `Send`;
//! the browser runtime is single-threaded.
#![allow(async_fn_in_trait)]

use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

use crate::domain::{ContractCallRequest, SimulatedRequest};

/// EIP-1193 `4001`: the user rejected the request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("wallet capability unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("execution reverted: {0}")]
    Reverted(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
}

impl PortError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code == USER_REJECTED_CODE)
    }
}

/// Wallet side: accounts, active chain, transaction submission.
pub trait SigningPort {
    async fn request_addresses(&self) -> Result<Vec<Address>, PortError>;
    async fn chain_id(&self) -> Result<u64, PortError>;
    async fn write_contract(&self, request: &SimulatedRequest) -> Result<B256, PortError>;
}

/// Node side: simulation and state reads.
pub trait ReadPort {
    async fn simulate_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<SimulatedRequest, PortError>;
    async fn get_balance(&self, address: Address) -> Result<U256, PortError>;
    async fn chain_id(&self) -> Result<u64, PortError>;
}

/// A signing client and a read client bound to the same detected capability.
#[derive(Debug, Clone)]
pub struct Session<S, R> {
    pub signer: S,
    pub reader: R,
}

impl<S, R> Session<S, R> {
    pub fn new(signer: S, reader: R) -> Self {
        Self { signer, reader }
    }
}

#[derive(Debug, Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

/// Detects the injected wallet and opens a fresh session for one handler run.
pub trait CapabilityPort {
    type Signer: SigningPort;
    type Reader: ReadPort;

    fn open_session(&self) -> Capability<Session<Self::Signer, Self::Reader>>;
}

/// UI text the controller is allowed to change.
pub trait AffordancePort {
    fn set_connect_label(&self, text: &str);
}
