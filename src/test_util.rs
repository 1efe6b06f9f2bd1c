use std::sync::Mutex;

use alloy::primitives::Address;

use crate::notification::{Notification, NotificationSink, ToastMeta};

pub(crate) const CONTRACT_ADDRESS: &str = "0x0f5ea0a652e851678ebf77b69484bfcd31f9459b";

pub(crate) const COUNTER_ABI: &str = r#"[
    {
        "type": "function",
        "name": "increment",
        "inputs": [],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "decrement",
        "inputs": [],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "setCount",
        "inputs": [{ "name": "count", "type": "uint256", "internalType": "uint256" }],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "getCount",
        "inputs": [],
        "outputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
        "stateMutability": "view"
    }
]"#;

pub(crate) fn account_address(last_byte: u8) -> Address {
    Address::with_last_byte(last_byte)
}

// Sink that keeps every notification for later assertions
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.meta.message)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl NotificationSink for RecordingSink {
    fn add_message(&self, title: &str, meta: ToastMeta) {
        self.notifications.lock().unwrap().push(Notification {
            title: title.to_owned(),
            meta,
        });
    }
}
