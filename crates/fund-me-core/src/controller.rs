use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{
    format_ether, parse_ether_amount, AmountError, ChainDescriptor, ContractCallRequest,
    ContractFunction, CONNECTED_LABEL, DEFAULT_RPC_URL, INSTALL_PROMPT_LABEL,
};
use crate::ports::{AffordancePort, Capability, CapabilityPort, PortError, ReadPort, SigningPort};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    pub contract_address: Address,
    /// RPC endpoint attached to every resolved chain.
    pub rpc_url: String,
}

impl ControllerConfig {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            rpc_url: DEFAULT_RPC_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerCommand {
    Connect,
    Fund { amount: String },
    Withdraw,
    GetBalance,
}

impl ControllerCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Fund { .. } => "fund",
            Self::Withdraw => "withdraw",
            Self::GetBalance => "get_balance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// No injected wallet; the connect label now asks the user to install one.
    InstallPrompt,
    Connected {
        accounts: Vec<Address>,
    },
    Submitted {
        function: ContractFunction,
        tx_hash: B256,
    },
    Balance {
        wei: U256,
        ether: String,
    },
    /// No injected wallet and nothing was shown to the user.
    Skipped,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("wallet returned no accounts")]
    NoAccount,
}

pub struct WalletController<C, U>
where
    C: CapabilityPort,
    U: AffordancePort,
{
    pub capability: C,
    pub affordance: U,
    config: ControllerConfig,
    signing_lock: Mutex<()>,
}

impl<C, U> WalletController<C, U>
where
    C: CapabilityPort,
    U: AffordancePort,
{
    pub fn new(capability: C, affordance: U, config: ControllerConfig) -> Self {
        Self {
            capability,
            affordance,
            config,
            signing_lock: Mutex::new(()),
        }
    }

    pub async fn handle(&self, command: ControllerCommand) -> Result<CommandOutcome, ControllerError> {
        let kind = command.kind();
        let result = match command {
            ControllerCommand::Connect => self.connect().await,
            ControllerCommand::Fund { amount } => self.fund(&amount).await,
            ControllerCommand::Withdraw => self.withdraw().await,
            ControllerCommand::GetBalance => self.get_balance().await,
        };
        result.inspect_err(|e| tracing::error!(command = kind, error = %e, "command failed"))
    }

    pub async fn connect(&self) -> Result<CommandOutcome, ControllerError> {
        let session = match self.capability.open_session() {
            Capability::Available(session) => session,
            Capability::Unavailable => return Ok(self.install_prompt()),
        };
        let accounts = session.signer.request_addresses().await?;
        self.affordance.set_connect_label(CONNECTED_LABEL);
        tracing::info!(accounts = accounts.len(), "wallet connected");
        Ok(CommandOutcome::Connected { accounts })
    }

    /// Funds the contract with `amount` ether. The amount is parsed before the wallet is touched.
    pub async fn fund(&self, amount: &str) -> Result<CommandOutcome, ControllerError> {
        tracing::info!("Funding with {amount}...");
        let value = parse_ether_amount(amount)?;
        self.transact(ContractFunction::Fund, Some(value)).await
    }

    pub async fn withdraw(&self) -> Result<CommandOutcome, ControllerError> {
        tracing::info!("withdrawing...");
        self.transact(ContractFunction::Withdraw, None).await
    }

    pub async fn get_balance(&self) -> Result<CommandOutcome, ControllerError> {
        let session = match self.capability.open_session() {
            Capability::Available(session) => session,
            Capability::Unavailable => {
                tracing::debug!("balance requested without an injected wallet");
                return Ok(CommandOutcome::Skipped);
            }
        };
        let wei = session
            .reader
            .get_balance(self.config.contract_address)
            .await?;
        let ether = format_ether(wei);
        tracing::info!(address = %self.config.contract_address, "{ether}");
        Ok(CommandOutcome::Balance { wei, ether })
    }

    pub async fn resolve_chain<S: SigningPort>(
        &self,
        signer: &S,
    ) -> Result<ChainDescriptor, PortError> {
        let chain_id = signer.chain_id().await?;
        Ok(ChainDescriptor::custom(chain_id, self.config.rpc_url.clone()))
    }

    async fn transact(
        &self,
        function: ContractFunction,
        value: Option<U256>,
    ) -> Result<CommandOutcome, ControllerError> {
        let session = match self.capability.open_session() {
            Capability::Available(session) => session,
            Capability::Unavailable => return Ok(self.install_prompt()),
        };

        // Held until submission so simulate/submit pairs never interleave.
        let _signing = self.signing_lock.lock().await;

        let account = session
            .signer
            .request_addresses()
            .await?
            .into_iter()
            .next()
            .ok_or(ControllerError::NoAccount)?;
        let chain = self.resolve_chain(&session.signer).await?;

        let request = ContractCallRequest {
            function,
            address: self.config.contract_address,
            account,
            chain,
            value,
        };
        tracing::debug!(%function, %account, chain_id = request.chain.id, "simulating call");
        let simulated = session.reader.simulate_contract(&request).await?;
        let tx_hash = session.signer.write_contract(&simulated).await?;
        tracing::info!(%function, "{tx_hash}");
        Ok(CommandOutcome::Submitted { function, tx_hash })
    }

    fn install_prompt(&self) -> CommandOutcome {
        self.affordance.set_connect_label(INSTALL_PROMPT_LABEL);
        tracing::warn!("no injected wallet provider found");
        CommandOutcome::InstallPrompt
    }
}
