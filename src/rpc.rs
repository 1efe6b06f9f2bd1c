use std::marker::PhantomData;
use std::time::Duration;

use alloy::json_abi::JsonAbi;
use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::Transport;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::{debug, info, warn};

use crate::capability::{ContractCall, WalletCapability};
use crate::constants::{RECEIPT_POLL_INTERVAL_MS, RPC_RETRY_ATTEMPTS};
use crate::errors::CapabilityError;
use crate::events::{event_channel, TxnEventEmitter, TxnEvents};
use crate::models::TxnReceipt;

/// Wallet capability backed by an alloy provider.
///
/// Accounts come from `eth_accounts`, calls are submitted with `eth_sendTransaction`
/// and then followed by polling the receipt and the chain head. Build the provider with
/// whatever fillers and signer the deployment needs.
///
/// # Example
/// ```no_run
/// use alloy::providers::ProviderBuilder;
/// use wallet_txn_lifecycle::{HostEnvironment, RpcWallet};
///
/// let provider = ProviderBuilder::new()
///     .with_recommended_fillers()
///     .on_http("http://127.0.0.1:8545".parse().unwrap());
/// let host = HostEnvironment::with_modern(RpcWallet::new(provider));
/// ```
#[derive(Debug)]
pub struct RpcWallet<P, T> {
    provider: P,
    _transport: PhantomData<fn() -> T>,
}

impl<P, T> RpcWallet<P, T>
where
    P: Provider<T, Ethereum> + Clone + 'static,
    T: Transport + Clone,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _transport: PhantomData,
        }
    }
}

impl<P, T> WalletCapability for RpcWallet<P, T>
where
    P: Provider<T, Ethereum> + Clone + 'static,
    T: Transport + Clone,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, CapabilityError> {
        self.provider
            .get_accounts()
            .await
            .map_err(|err| CapabilityError::new(format!("Failed to get accounts: {}", err)))
    }

    async fn instantiate_contract(
        &self,
        _abi: &JsonAbi,
        address: Address,
    ) -> Result<(), CapabilityError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|err| CapabilityError::new(format!("Failed to get code: {}", err)))?;

        if code.is_empty() {
            return Err(CapabilityError::new(format!(
                "no contract code at {}",
                address
            )));
        }
        Ok(())
    }

    fn send(&self, call: ContractCall) -> Result<TxnEvents, CapabilityError> {
        let runtime = Handle::try_current()
            .map_err(|err| CapabilityError::new(format!("No async runtime: {}", err)))?;

        let transaction_request = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_input(call.input);

        let (emitter, events) = event_channel();
        let provider = self.provider.clone();
        runtime.spawn(async move {
            follow_submission(provider, transaction_request, emitter).await;
        });

        Ok(events)
    }
}

fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(RPC_RETRY_ATTEMPTS)
}

/// Submits the request and reports hash, receipt and confirmations until the subscriber
/// releases the stream.
async fn follow_submission<P, T>(
    provider: P,
    transaction_request: TransactionRequest,
    emitter: TxnEventEmitter,
) where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let pending_txn = match provider.send_transaction(transaction_request).await {
        Ok(pending_txn) => pending_txn,
        Err(err) => {
            emitter.error(format!("Failed to send transaction: {}", err));
            return;
        }
    };

    let txn_hash: TxHash = *pending_txn.tx_hash();
    info!("Transaction submitted: {}", txn_hash);
    if !emitter.transaction_hash(txn_hash.to_string()) {
        return;
    }

    let mut receipt_reported = false;
    let mut confirmations: u64 = 0;

    while !emitter.is_released() {
        sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;

        let receipt = match Retry::spawn(retry_strategy(), || async {
            provider.get_transaction_receipt(txn_hash).await
        })
        .await
        {
            Ok(Some(receipt)) => receipt,
            Ok(None) => {
                debug!("Receipt for {} not available yet", txn_hash);
                continue;
            }
            Err(err) => {
                warn!("Failed to get transaction receipt. Error: {}", err);
                continue;
            }
        };

        let txn_receipt = TxnReceipt::from_rpc(&receipt);
        if !receipt_reported {
            receipt_reported = true;
            if !emitter.receipt(txn_receipt.clone()) {
                return;
            }
        }

        let Some(mined_in) = receipt.block_number() else {
            continue;
        };
        let latest_block =
            match Retry::spawn(retry_strategy(), || async { provider.get_block_number().await })
                .await
            {
                Ok(latest_block) => latest_block,
                Err(err) => {
                    warn!("Failed to get latest block number. Error: {}", err);
                    continue;
                }
            };

        if !emit_confirmations(
            &emitter,
            &mut confirmations,
            mined_in,
            latest_block,
            &txn_receipt,
        ) {
            return;
        }
    }
}

/// Emits every confirmation count not yet reported for a transaction mined in `mined_in`
/// with the chain head at `latest_block`. The block holding the transaction counts as the
/// first confirmation.
///
/// Returns `false` once the subscriber has released the stream.
fn emit_confirmations(
    emitter: &TxnEventEmitter,
    confirmations: &mut u64,
    mined_in: u64,
    latest_block: u64,
    receipt: &TxnReceipt,
) -> bool {
    if latest_block < mined_in {
        debug!(
            "Chain head {} behind block {} holding the transaction",
            latest_block, mined_in
        );
        return !emitter.is_released();
    }

    let observed = latest_block - mined_in + 1;
    while *confirmations < observed {
        *confirmations += 1;
        if !emitter.confirmation(*confirmations, receipt.clone()) {
            return false;
        }
    }
    true
}
