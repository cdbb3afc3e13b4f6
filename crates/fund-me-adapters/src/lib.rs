pub mod abi;
pub mod config;
pub mod eip1193;
pub mod public;
pub mod wallet;

pub use config::{FundMeConfig, DEFAULT_CONTRACT_ADDRESS};
pub use eip1193::{Eip1193Host, Eip1193Transport};
pub use public::PublicClient;
pub use wallet::{transaction_payload, WalletClient};
