/// Confirmation count at which a submitted transaction is treated as confirmed.
pub const CONFIRMATION_THRESHOLD: u64 = 3;

pub(crate) const DEFAULT_EXPLORER_URL: &str = "https://rinkeby.etherscan.io";
pub(crate) const DEFAULT_TRANSACTION_TITLE: &str = "Transaction update";
pub(crate) const DEFAULT_WALLET_TITLE: &str = "Wallet";
pub(crate) const CONFIG_ENV_PREFIX: &str = "WALLET_TXN";

pub(crate) const EXPLORER_ACTION_TEXT: &str = "View on Etherscan";
pub(crate) const STARTED_ICON: &str = "InfoOutline";

pub(crate) const STARTED_MESSAGE: &str = "Started a new transaction";
pub(crate) const PENDING_MESSAGE: &str = "Transaction is pending";
pub(crate) const CONFIRMED_MESSAGE: &str = "Transaction is confirmed";
pub(crate) const SUCCESS_MESSAGE: &str = "Transaction completed successfully";
pub(crate) const ERROR_MESSAGE: &str = "Error";

pub(crate) const PROVIDER_UNAVAILABLE_MESSAGE: &str = "No wallet available. Unable to continue.";
pub(crate) const AUTHORIZATION_DENIED_MESSAGE: &str = "User needs to CONNECT wallet";
pub(crate) const CONTRACT_BINDING_FAILED_MESSAGE: &str = "Contract creation failed.";
pub(crate) const NOT_READY_MESSAGE: &str =
    "Connect a wallet and load the contract before sending a transaction.";

// Receipt polling for the rpc backed wallet
pub(crate) const RECEIPT_POLL_INTERVAL_MS: u64 = 1000;
pub(crate) const RPC_RETRY_ATTEMPTS: usize = 5;
