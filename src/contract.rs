use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes};
use tracing::{info, warn};

use crate::capability::{ContractCall, WalletCapability};
use crate::config::BridgeConfig;
use crate::constants::CONTRACT_BINDING_FAILED_MESSAGE;
use crate::errors::BridgeError;
use crate::events::TxnEvents;
use crate::models::{Account, Connection};
use crate::notification::{NotificationSink, ToastMeta};

/// A deployed contract bound to a wallet connection.
#[derive(Debug)]
pub struct ContractHandle<C> {
    connection: Connection<C>,
    address: Address,
    abi: Arc<JsonAbi>,
}

impl<C> Clone for ContractHandle<C> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            address: self.address,
            abi: self.abi.clone(),
        }
    }
}

impl<C: WalletCapability> ContractHandle<C> {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Encodes the call of the zero-argument overload of `method`.
    ///
    /// # Errors
    /// * `BridgeError::TransactionError` - If the ABI has no such method or it takes arguments
    pub fn calldata(&self, method: &str) -> Result<Bytes, BridgeError> {
        let overloads = self.abi.function(method).ok_or_else(|| {
            BridgeError::TransactionError(format!("method {} not found in contract abi", method))
        })?;

        let function = overloads
            .iter()
            .find(|function| function.inputs.is_empty())
            .ok_or_else(|| {
                BridgeError::TransactionError(format!(
                    "method {} requires arguments, only argument-less calls are supported",
                    method
                ))
            })?;

        Ok(Bytes::copy_from_slice(function.selector().as_slice()))
    }

    /// Sends `method` from `account` and returns its event stream.
    ///
    /// # Errors
    /// * `BridgeError::TransactionError` - If the method can not be encoded or the wallet
    ///                                     refuses to submit the call
    pub fn send(&self, method: &str, account: &Account) -> Result<TxnEvents, BridgeError> {
        let call = ContractCall {
            from: account.address(),
            to: self.address,
            method: method.to_owned(),
            input: self.calldata(method)?,
        };

        self.connection
            .capability
            .send(call)
            .map_err(|err| BridgeError::TransactionError(err.to_string()))
    }
}

/// Produces contract handles, reporting binding failures to the user.
pub struct ContractBinder {
    sink: Arc<dyn NotificationSink>,
    config: BridgeConfig,
}

impl ContractBinder {
    pub fn new(sink: Arc<dyn NotificationSink>, config: BridgeConfig) -> Self {
        Self { sink, config }
    }

    /// Binds the contract at `address` described by the JSON `abi` to `connection`.
    ///
    /// # Errors
    /// * `BridgeError::ContractBindingFailed` - If the connection is unset, the ABI or the
    ///                                          address can not be parsed, or the wallet
    ///                                          rejects the pair
    pub async fn bind_contract<C: WalletCapability>(
        &self,
        connection: Option<&Connection<C>>,
        abi: &str,
        address: &str,
    ) -> Result<ContractHandle<C>, BridgeError> {
        info!("creating contract");

        let result = self._bind(connection, abi, address).await;
        if let Err(err) = &result {
            warn!("Could not create contract. {}", err);
            self.sink.add_message(
                &self.config.wallet_title,
                ToastMeta::failure(CONTRACT_BINDING_FAILED_MESSAGE),
            );
        }
        result
    }

    async fn _bind<C: WalletCapability>(
        &self,
        connection: Option<&Connection<C>>,
        abi: &str,
        address: &str,
    ) -> Result<ContractHandle<C>, BridgeError> {
        let Some(connection) = connection else {
            return Err(BridgeError::ContractBindingFailed(
                "wallet connection not initialized".to_owned(),
            ));
        };

        let abi: JsonAbi = serde_json::from_str(abi)
            .map_err(|err| BridgeError::ContractBindingFailed(format!("malformed abi: {}", err)))?;
        let address: Address = address.parse().map_err(|err| {
            BridgeError::ContractBindingFailed(format!("invalid address {}: {}", address, err))
        })?;

        connection
            .capability
            .instantiate_contract(&abi, address)
            .await
            .map_err(|err| BridgeError::ContractBindingFailed(err.to_string()))?;

        Ok(ContractHandle {
            connection: connection.clone(),
            address,
            abi: Arc::new(abi),
        })
    }
}
