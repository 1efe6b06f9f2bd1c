use std::sync::Arc;
use std::time::SystemTime;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::capability::WalletCapability;
use crate::config::BridgeConfig;
use crate::constants::{CONFIRMATION_THRESHOLD, NOT_READY_MESSAGE};
use crate::contract::ContractHandle;
use crate::errors::BridgeError;
use crate::events::{TxnEvent, TxnEvents};
use crate::models::{Account, Transaction, TxnReceipt, TxnStatus};
use crate::notification::{transaction_toast, NoopSink, NotificationSink, ToastMeta};

/// Folds the event stream of one contract call into its transaction status.
///
/// Status only moves forward. `on_change` is called once for every status the
/// transaction enters, with the transaction as it is in that status.
#[derive(Debug)]
pub struct TxnTracker {
    transaction: Transaction,
}

impl TxnTracker {
    pub fn new(method: &str) -> Self {
        Self {
            transaction: Transaction::new(method),
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn status(&self) -> TxnStatus {
        self.transaction.status
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }

    pub fn apply<F: FnMut(&Transaction)>(&mut self, event: TxnEvent, on_change: &mut F) {
        match event {
            TxnEvent::TransactionHash(hash) => self._submitted(hash, on_change),
            TxnEvent::Confirmation(count, receipt) => self._confirmation(count, receipt, on_change),
            TxnEvent::Receipt(receipt) => {
                debug!("receipt: {:?}", receipt);
            }
            TxnEvent::Error(reason) => self.fail(reason, on_change),
        }
    }

    /// Moves any unsettled transaction to `Error`.
    pub fn fail<F: FnMut(&Transaction)>(&mut self, reason: String, on_change: &mut F) {
        if self.transaction.status.is_terminal() {
            debug!(
                "Transaction {} already {}. Ignoring error: {}",
                self.transaction.id, self.transaction.status, reason
            );
            return;
        }

        error!("Transaction {} failed. Error: {}", self.transaction.id, reason);
        self.transaction.failure = Some(reason);
        self._advance(TxnStatus::Error, on_change);
    }

    fn _submitted<F: FnMut(&Transaction)>(&mut self, hash: String, on_change: &mut F) {
        if self.transaction.hash.is_none() {
            self.transaction.hash = Some(hash);
        }

        if self.transaction.status != TxnStatus::Started {
            debug!("Transaction hash received again while {}", self.transaction.status);
            return;
        }

        info!("Transaction sent to block successfully. Result pending.");
        self._advance(TxnStatus::Pending, on_change);
    }

    fn _confirmation<F: FnMut(&Transaction)>(
        &mut self,
        count: u64,
        receipt: TxnReceipt,
        on_change: &mut F,
    ) {
        self.transaction.confirmation_count = self.transaction.confirmation_count.max(count);

        if count < CONFIRMATION_THRESHOLD {
            debug!("Confirmation {}. Threshold for confidence not met.", count);
            return;
        }
        if self.transaction.status >= TxnStatus::Confirmed {
            debug!("Confirmation {}. Confidence threshold already met.", count);
            return;
        }

        if self.transaction.hash.is_none() {
            self.transaction.hash = receipt.transaction_hash.clone();
        }
        let onchain_status = receipt.status;
        self.transaction.receipt = Some(receipt);

        info!("Transaction confirmed.");
        self._advance(TxnStatus::Confirmed, on_change);

        match onchain_status {
            Some(true) => {
                info!("Transaction completed successfully!");
                self._advance(TxnStatus::Success, on_change);
            }
            Some(false) => {
                info!("Transaction reverted due to error.");
                self.transaction.failure = Some("transaction reverted on chain".to_owned());
                self._advance(TxnStatus::Error, on_change);
            }
            None => {
                warn!("Receipt carries no status flag. Waiting for further events.");
            }
        }
    }

    fn _advance<F: FnMut(&Transaction)>(&mut self, status: TxnStatus, on_change: &mut F) {
        if status <= self.transaction.status {
            return;
        }

        self.transaction.status = status;
        self.transaction.last_updated_at = SystemTime::now();
        on_change(&self.transaction);
    }
}

/// Turns status changes into user notifications.
struct TxnNotifier {
    sink: Arc<dyn NotificationSink>,
    config: Arc<BridgeConfig>,
}

impl TxnNotifier {
    fn notify(&self, transaction: &Transaction) {
        info!("Transaction {} is {}", transaction.id, transaction.status);
        self.sink.add_message(
            &self.config.transaction_title,
            transaction_toast(transaction, &self.config),
        );
    }
}

#[derive(Debug)]
enum TxnTask {
    Running(JoinHandle<Transaction>),
    // failed before a follower was started
    Settled(Transaction),
}

/// Handle on an invocation.
#[derive(Debug)]
pub struct TxnHandle {
    id: String,
    task: TxnTask,
}

impl TxnHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits until the invocation stops listening and returns the final transaction.
    pub async fn wait(self) -> Result<Transaction, BridgeError> {
        match self.task {
            TxnTask::Running(task) => task
                .await
                .map_err(|err| BridgeError::TransactionError(err.to_string())),
            TxnTask::Settled(transaction) => Ok(transaction),
        }
    }
}

/// Drives contract invocations through their lifecycle and reports every status change.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use wallet_txn_lifecycle::{BridgeConfig, LoggingSink, TxnLifecycleManager};
///
/// let manager = TxnLifecycleManager::new(Arc::new(LoggingSink), BridgeConfig::default());
/// // let handle = manager.invoke("increment", Some(&contract), Some(&account))?;
/// ```
pub struct TxnLifecycleManager {
    sink: Arc<dyn NotificationSink>,
    config: Arc<BridgeConfig>,
}

impl Default for TxnLifecycleManager {
    fn default() -> Self {
        Self::new(Arc::new(NoopSink), BridgeConfig::default())
    }
}

impl TxnLifecycleManager {
    pub fn new(sink: Arc<dyn NotificationSink>, config: BridgeConfig) -> Self {
        Self {
            sink,
            config: Arc::new(config),
        }
    }

    /// Sends `method` on `contract` from `account` and follows it in the background.
    ///
    /// Every outcome is reported to the sink. The returned handle only lets the caller
    /// wait for the final state.
    ///
    /// # Errors
    /// * `BridgeError::NotReady` - If the contract or the account is missing. Nothing is
    ///                             sent to the wallet.
    pub fn invoke<C: WalletCapability>(
        &self,
        method: &str,
        contract: Option<&ContractHandle<C>>,
        account: Option<&Account>,
    ) -> Result<TxnHandle, BridgeError> {
        let (contract, account) = match (contract, account) {
            (Some(contract), Some(account)) => (contract, account),
            (None, _) => return Err(self._not_ready("contract not bound")),
            (_, None) => return Err(self._not_ready("no authorized account")),
        };

        let notifier = TxnNotifier {
            sink: self.sink.clone(),
            config: self.config.clone(),
        };

        let mut tracker = TxnTracker::new(method);
        let id = tracker.transaction().id.clone();
        info!("Starting Transaction {} calling {}", id, method);
        notifier.notify(tracker.transaction());

        let task = match contract.send(method, account) {
            Ok(events) => match Handle::try_current() {
                Ok(runtime) => {
                    TxnTask::Running(runtime.spawn(follow_transaction(tracker, events, notifier)))
                }
                Err(err) => {
                    drop(events);
                    _settle(tracker, &notifier, format!("No async runtime: {}", err))
                }
            },
            Err(err) => {
                error!("Error calling method on smart contract.");
                let reason = match err {
                    BridgeError::TransactionError(reason) => reason,
                    err => err.to_string(),
                };
                _settle(tracker, &notifier, reason)
            }
        };

        Ok(TxnHandle { id, task })
    }

    fn _not_ready(&self, reason: &str) -> BridgeError {
        warn!("Transaction not started: {}", reason);
        self.sink.add_message(
            &self.config.wallet_title,
            ToastMeta::failure(NOT_READY_MESSAGE),
        );
        BridgeError::NotReady(reason.to_owned())
    }
}

fn _settle(mut tracker: TxnTracker, notifier: &TxnNotifier, reason: String) -> TxnTask {
    tracker.fail(reason, &mut |transaction| notifier.notify(transaction));
    TxnTask::Settled(tracker.into_transaction())
}

// Consumes events until the transaction settles, then drops the stream to unsubscribe.
async fn follow_transaction(
    mut tracker: TxnTracker,
    mut events: TxnEvents,
    notifier: TxnNotifier,
) -> Transaction {
    while let Some(event) = events.next().await {
        tracker.apply(event, &mut |transaction| notifier.notify(transaction));
        if tracker.status().is_terminal() {
            break;
        }
    }

    if !tracker.status().is_terminal() {
        warn!(
            "Event stream of transaction {} closed while {}",
            tracker.transaction().id,
            tracker.status()
        );
    }

    drop(events);
    tracker.into_transaction()
}
