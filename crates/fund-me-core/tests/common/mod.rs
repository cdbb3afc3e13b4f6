#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, B256, U256};

use fund_me_core::{
    AffordancePort, Capability, CapabilityPort, ContractCallRequest, ControllerConfig, PortError,
    ReadPort, Session, SigningPort, SimulatedRequest, WalletController, CONNECT_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestAddresses,
    ChainId,
    Simulate(ContractCallRequest),
    Write(SimulatedRequest),
    Balance(Address),
}

#[derive(Debug)]
pub struct WalletScript {
    pub accounts: Vec<Address>,
    pub chain_id: u64,
    pub balance: U256,
    pub reject_accounts: bool,
    pub revert_simulation: Option<String>,
}

impl Default for WalletScript {
    fn default() -> Self {
        Self {
            accounts: vec![account()],
            chain_id: 31337,
            balance: U256::ZERO,
            reject_accounts: false,
            revert_simulation: None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    script: Mutex<WalletScript>,
    calls: Mutex<Vec<Call>>,
    tx_counter: AtomicU64,
}

/// In-memory wallet whose signer and reader halves share one call log.
#[derive(Debug, Clone, Default)]
pub struct FakeWallet {
    state: Arc<FakeState>,
}

impl FakeWallet {
    pub fn with_script(script: WalletScript) -> Self {
        Self {
            state: Arc::new(FakeState {
                script: Mutex::new(script),
                ..FakeState::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: Call) {
        self.state.calls.lock().expect("calls lock").push(call);
    }
}

#[derive(Debug, Clone)]
pub struct FakeSigner(pub FakeWallet);

#[derive(Debug, Clone)]
pub struct FakeReader(pub FakeWallet);

impl SigningPort for FakeSigner {
    async fn request_addresses(&self) -> Result<Vec<Address>, PortError> {
        self.0.record(Call::RequestAddresses);
        tokio::task::yield_now().await;
        let script = self.0.state.script.lock().expect("script lock");
        if script.reject_accounts {
            return Err(PortError::Rejected {
                code: 4001,
                message: "User rejected the request.".to_owned(),
            });
        }
        Ok(script.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        self.0.record(Call::ChainId);
        tokio::task::yield_now().await;
        Ok(self.0.state.script.lock().expect("script lock").chain_id)
    }

    async fn write_contract(&self, request: &SimulatedRequest) -> Result<B256, PortError> {
        self.0.record(Call::Write(request.clone()));
        tokio::task::yield_now().await;
        let n = self.0.state.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(B256::with_last_byte(n as u8))
    }
}

impl ReadPort for FakeReader {
    async fn simulate_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<SimulatedRequest, PortError> {
        self.0.record(Call::Simulate(request.clone()));
        tokio::task::yield_now().await;
        if let Some(reason) = &self.0.state.script.lock().expect("script lock").revert_simulation {
            return Err(PortError::Reverted(reason.clone()));
        }
        Ok(SimulatedRequest {
            request: request.clone(),
            calldata: Bytes::from(request.function.name().as_bytes().to_vec()),
            result: Bytes::new(),
        })
    }

    async fn get_balance(&self, address: Address) -> Result<U256, PortError> {
        self.0.record(Call::Balance(address));
        tokio::task::yield_now().await;
        Ok(self.0.state.script.lock().expect("script lock").balance)
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        self.0.record(Call::ChainId);
        Ok(self.0.state.script.lock().expect("script lock").chain_id)
    }
}

#[derive(Debug, Clone)]
pub struct FakeCapability {
    pub wallet: Option<FakeWallet>,
}

impl CapabilityPort for FakeCapability {
    type Signer = FakeSigner;
    type Reader = FakeReader;

    fn open_session(&self) -> Capability<Session<FakeSigner, FakeReader>> {
        match &self.wallet {
            Some(wallet) => Capability::Available(Session::new(
                FakeSigner(wallet.clone()),
                FakeReader(wallet.clone()),
            )),
            None => Capability::Unavailable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabelRecorder {
    label: Arc<Mutex<String>>,
}

impl Default for LabelRecorder {
    fn default() -> Self {
        Self {
            label: Arc::new(Mutex::new(CONNECT_LABEL.to_owned())),
        }
    }
}

impl LabelRecorder {
    pub fn current(&self) -> String {
        self.label.lock().expect("label lock").clone()
    }
}

impl AffordancePort for LabelRecorder {
    fn set_connect_label(&self, text: &str) {
        *self.label.lock().expect("label lock") = text.to_owned();
    }
}

pub type TestController = WalletController<FakeCapability, LabelRecorder>;

pub fn new_controller(wallet: Option<FakeWallet>) -> TestController {
    WalletController::new(
        FakeCapability { wallet },
        LabelRecorder::default(),
        ControllerConfig::new(contract_address()),
    )
}

pub fn account() -> Address {
    "0x0000000000000000000000000000000000000ABC"
        .parse()
        .expect("valid account")
}

pub fn contract_address() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        .parse()
        .expect("valid contract address")
}

pub fn ether(whole: u64, tenths: u64) -> U256 {
    U256::from(whole) * U256::from(1_000_000_000_000_000_000u64)
        + U256::from(tenths) * U256::from(100_000_000_000_000_000u64)
}
