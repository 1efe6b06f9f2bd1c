use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("No wallet capability detected")]
    ProviderUnavailable,
    #[error("Wallet authorization denied. Error: {0}")]
    AuthorizationDenied(String),
    #[error("Contract binding failed. Error: {0}")]
    ContractBindingFailed(String),
    #[error("Not ready to send a transaction. Error: {0}")]
    NotReady(String),
    #[error("Transaction failed. Error: {0}")]
    TransactionError(String),
    #[error("Invalid configuration. Error: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a wallet capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
