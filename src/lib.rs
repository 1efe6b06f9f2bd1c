pub(crate) mod capability;
pub(crate) mod config;
pub(crate) mod constants;
pub(crate) mod contract;
pub(crate) mod errors;
pub(crate) mod events;
pub(crate) mod gateway;
pub mod mock;
pub(crate) mod models;
pub(crate) mod notification;
pub(crate) mod rpc;
pub(crate) mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use capability::{ContractCall, HostEnvironment, WalletCapability};
pub use config::{BridgeConfig, ConfigManager};
pub use constants::CONFIRMATION_THRESHOLD;
pub use contract::{ContractBinder, ContractHandle};
pub use errors::{BridgeError, CapabilityError};
pub use events::{event_channel, TxnEvent, TxnEventEmitter, TxnEvents};
pub use gateway::ProviderGateway;
pub use models::{
    Account, CapabilityKind, Connection, SessionSnapshot, Transaction, TxnReceipt, TxnStatus,
};
pub use notification::{
    transaction_toast, ChannelSink, LoggingSink, NoopSink, Notification, NotificationSink,
    ToastMeta, ToastVariant,
};
pub use rpc::RpcWallet;
pub use transaction::{TxnHandle, TxnLifecycleManager, TxnTracker};
