use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes};
use std::future::Future;

use crate::errors::CapabilityError;
use crate::events::TxnEvents;

/// A state-changing contract call handed to the wallet for signing and broadcast.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractCall {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub input: Bytes,
}

/// Host provided wallet: authorizes accounts, validates contracts and broadcasts calls.
pub trait WalletCapability: Send + Sync + 'static {
    /// Asks the user to authorize access. Returns the exposed addresses.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, CapabilityError>> + Send;

    /// Best-effort check that `abi` can be used against `address`.
    fn instantiate_contract(
        &self,
        abi: &JsonAbi,
        address: Address,
    ) -> impl Future<Output = Result<(), CapabilityError>> + Send;

    /// Submits the call and returns the stream of its lifecycle events.
    ///
    /// An `Err` means the call never left the wallet and no event will follow.
    fn send(&self, call: ContractCall) -> Result<TxnEvents, CapabilityError>;
}

/// Wallet capabilities the host environment exposes, probed modern first.
#[derive(Debug)]
pub struct HostEnvironment<C> {
    pub modern: Option<C>,
    pub legacy: Option<C>,
}

impl<C> Default for HostEnvironment<C> {
    fn default() -> Self {
        Self {
            modern: None,
            legacy: None,
        }
    }
}

impl<C> HostEnvironment<C> {
    pub fn with_modern(capability: C) -> Self {
        Self {
            modern: Some(capability),
            legacy: None,
        }
    }

    pub fn with_legacy(capability: C) -> Self {
        Self {
            modern: None,
            legacy: Some(capability),
        }
    }
}
