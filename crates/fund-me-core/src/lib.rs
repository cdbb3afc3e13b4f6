pub mod controller;
pub mod domain;
pub mod ports;

pub use controller::{
    CommandOutcome, ControllerCommand, ControllerConfig, ControllerError, WalletController,
};
pub use domain::{
    format_ether, parse_ether_amount, AmountError, ChainDescriptor, ContractCallRequest,
    ContractFunction, NativeCurrency, SimulatedRequest, CONNECTED_LABEL, CONNECT_LABEL,
    DEFAULT_RPC_URL, INSTALL_PROMPT_LABEL,
};
pub use ports::{
    AffordancePort, Capability, CapabilityPort, PortError, ReadPort, Session, SigningPort,
    USER_REJECTED_CODE,
};
