//! Scripted in-memory wallet for tests and demos.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use tokio::runtime::Handle;
use tokio::time::sleep;

use crate::capability::{ContractCall, WalletCapability};
use crate::errors::CapabilityError;
use crate::events::{event_channel, TxnEvent, TxnEvents};
use crate::models::TxnReceipt;

#[derive(Debug)]
struct MockState {
    accounts: Vec<Address>,
    authorization_error: Option<String>,
    contract_error: Option<String>,
    send_error: Option<String>,
    script: Vec<TxnEvent>,
    event_delay: Duration,
    request_count: usize,
    sent_calls: Vec<ContractCall>,
    emitted_count: usize,
}

/// Wallet that authorizes a fixed account list and replays a fixed event script for
/// every call it is asked to send.
///
/// Clones share state, so a test can keep a clone to reconfigure the wallet or inspect
/// the interactions after handing it to the gateway.
#[derive(Clone, Debug)]
pub struct MockWallet {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                accounts: vec![Address::with_last_byte(1)],
                authorization_error: None,
                contract_error: None,
                send_error: None,
                script: Vec::new(),
                event_delay: Duration::from_millis(1),
                request_count: 0,
                sent_calls: Vec::new(),
                emitted_count: 0,
            })),
        }
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().unwrap().accounts = accounts;
        self
    }

    pub fn with_script(self, script: Vec<TxnEvent>) -> Self {
        self.state.lock().unwrap().script = script;
        self
    }

    pub fn with_event_delay(self, event_delay: Duration) -> Self {
        self.state.lock().unwrap().event_delay = event_delay;
        self
    }

    pub fn deny_authorization(&self, reason: &str) {
        self.state.lock().unwrap().authorization_error = Some(reason.to_owned());
    }

    pub fn reject_contracts(&self, reason: &str) {
        self.state.lock().unwrap().contract_error = Some(reason.to_owned());
    }

    pub fn fail_sends(&self, reason: &str) {
        self.state.lock().unwrap().send_error = Some(reason.to_owned());
    }

    /// Number of wallet calls of any kind made so far.
    pub fn interaction_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.request_count + state.sent_calls.len()
    }

    pub fn send_count(&self) -> usize {
        self.state.lock().unwrap().sent_calls.len()
    }

    pub fn sent_calls(&self) -> Vec<ContractCall> {
        self.state.lock().unwrap().sent_calls.clone()
    }

    /// Number of scripted events delivered before the subscriber released the stream.
    pub fn emitted_count(&self) -> usize {
        self.state.lock().unwrap().emitted_count
    }
}

/// Script of a call that is submitted as `hash` and then confirmed `confirmations` times.
pub fn confirmation_script(hash: &str, confirmations: u64, status: Option<bool>) -> Vec<TxnEvent> {
    let receipt = TxnReceipt {
        transaction_hash: Some(hash.to_owned()),
        block_number: Some(1),
        status,
    };

    let mut script = vec![
        TxnEvent::TransactionHash(hash.to_owned()),
        TxnEvent::Receipt(receipt.clone()),
    ];
    script.extend((1..=confirmations).map(|count| TxnEvent::Confirmation(count, receipt.clone())));
    script
}

impl WalletCapability for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, CapabilityError> {
        let mut state = self.state.lock().unwrap();
        state.request_count += 1;
        match &state.authorization_error {
            Some(reason) => Err(CapabilityError::new(reason.clone())),
            None => Ok(state.accounts.clone()),
        }
    }

    async fn instantiate_contract(
        &self,
        _abi: &JsonAbi,
        _address: Address,
    ) -> Result<(), CapabilityError> {
        match &self.state.lock().unwrap().contract_error {
            Some(reason) => Err(CapabilityError::new(reason.clone())),
            None => Ok(()),
        }
    }

    fn send(&self, call: ContractCall) -> Result<TxnEvents, CapabilityError> {
        let (script, event_delay) = {
            let mut state = self.state.lock().unwrap();
            state.sent_calls.push(call);
            if let Some(reason) = &state.send_error {
                return Err(CapabilityError::new(reason.clone()));
            }
            (state.script.clone(), state.event_delay)
        };

        let runtime = Handle::try_current()
            .map_err(|err| CapabilityError::new(format!("No async runtime: {}", err)))?;

        let (emitter, events) = event_channel();
        let state = self.state.clone();
        runtime.spawn(async move {
            for event in script {
                sleep(event_delay).await;
                if !emitter.emit(event) {
                    break;
                }
                state.lock().unwrap().emitted_count += 1;
            }
        });

        Ok(events)
    }
}
