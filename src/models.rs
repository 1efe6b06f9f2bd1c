use alloy::network::ReceiptResponse;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Which probe of the host environment produced the connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CapabilityKind {
    Modern,
    Legacy,
}

/// Handle to the wallet capability found in the host environment.
#[derive(Debug)]
pub struct Connection<C> {
    pub(crate) capability: Arc<C>,
    pub(crate) kind: CapabilityKind,
}

impl<C> Clone for Connection<C> {
    fn clone(&self) -> Self {
        Self {
            capability: self.capability.clone(),
            kind: self.kind,
        }
    }
}

impl<C> Connection<C> {
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn capability(&self) -> &Arc<C> {
        &self.capability
    }
}

/// The authorized signer address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Account(pub Address);

impl Account {
    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable view of the gateway state handed out to consumers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionSnapshot {
    pub capability: Option<CapabilityKind>,
    pub account: Option<Account>,
}

/// Lifecycle status of a transaction. Declaration order is lifecycle order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum TxnStatus {
    Started,
    Pending,
    Confirmed,
    Success,
    Error,
}

impl TxnStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TxnStatus::Success | TxnStatus::Error)
    }
}

impl fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            TxnStatus::Started => "started",
            TxnStatus::Pending => "pending",
            TxnStatus::Confirmed => "confirmed",
            TxnStatus::Success => "success",
            TxnStatus::Error => "error",
        };
        f.write_str(status)
    }
}

/// Execution result of a mined transaction.
///
/// `status` is the on-chain success flag. It is `None` for receipts that predate
/// the status field, in which case the outcome cannot be derived from the receipt.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxnReceipt {
    pub transaction_hash: Option<String>,
    pub block_number: Option<u64>,
    pub status: Option<bool>,
}

impl TxnReceipt {
    pub fn with_status(status: bool) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn from_rpc<R: ReceiptResponse>(receipt: &R) -> Self {
        Self {
            transaction_hash: Some(receipt.transaction_hash().to_string()),
            block_number: receipt.block_number(),
            status: Some(receipt.status()),
        }
    }
}

/// State of a single contract invocation.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub id: String,
    pub method: String,
    pub created_at: SystemTime,
    pub last_updated_at: SystemTime,
    pub status: TxnStatus,
    pub hash: Option<String>,
    pub receipt: Option<TxnReceipt>,
    pub confirmation_count: u64,
    pub failure: Option<String>,
}

impl Transaction {
    pub(crate) fn new(method: &str) -> Self {
        let now = SystemTime::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method: method.to_owned(),
            created_at: now,
            last_updated_at: now,
            status: TxnStatus::Started,
            hash: None,
            receipt: None,
            confirmation_count: 0,
            failure: None,
        }
    }
}
