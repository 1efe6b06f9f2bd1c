use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::models::TxnReceipt;

/// Event emitted by a wallet capability while a contract call is in flight.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TxnEvent {
    /// Submission accepted, carries the transaction hash.
    TransactionHash(String),
    /// A block was mined on top of the transaction. Carries the running count.
    Confirmation(u64, TxnReceipt),
    /// Raw receipt observation, independent of the confirmation stream.
    Receipt(TxnReceipt),
    Error(String),
}

/// Creates a connected emitter and event stream for one contract call.
pub fn event_channel() -> (TxnEventEmitter, TxnEvents) {
    let (tx, rx) = unbounded_channel();
    (TxnEventEmitter { tx }, TxnEvents { rx })
}

/// Capability side of an event stream.
///
/// Every emit returns `false` once the subscriber has released the stream, which is
/// the signal for the capability to stop producing events.
#[derive(Clone, Debug)]
pub struct TxnEventEmitter {
    tx: UnboundedSender<TxnEvent>,
}

impl TxnEventEmitter {
    pub fn emit(&self, event: TxnEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn transaction_hash(&self, hash: impl Into<String>) -> bool {
        self.emit(TxnEvent::TransactionHash(hash.into()))
    }

    pub fn confirmation(&self, count: u64, receipt: TxnReceipt) -> bool {
        self.emit(TxnEvent::Confirmation(count, receipt))
    }

    pub fn receipt(&self, receipt: TxnReceipt) -> bool {
        self.emit(TxnEvent::Receipt(receipt))
    }

    pub fn error(&self, reason: impl Into<String>) -> bool {
        self.emit(TxnEvent::Error(reason.into()))
    }

    pub fn is_released(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Subscriber side of an event stream. Dropping it releases the subscription.
#[derive(Debug)]
pub struct TxnEvents {
    rx: UnboundedReceiver<TxnEvent>,
}

impl TxnEvents {
    /// Next event, or `None` once every emitter is gone.
    pub async fn next(&mut self) -> Option<TxnEvent> {
        self.rx.recv().await
    }

    /// Next already queued event, without waiting.
    pub fn try_next(&mut self) -> Option<TxnEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emitter_sees_release() {
        let (emitter, mut events) = event_channel();

        assert!(emitter.transaction_hash("0x01"));
        assert_eq!(
            events.next().await,
            Some(TxnEvent::TransactionHash("0x01".to_owned()))
        );
        assert!(!emitter.is_released());

        drop(events);

        assert!(emitter.is_released());
        assert!(!emitter.error("late"));
    }

    #[tokio::test]
    async fn test_stream_ends_when_emitters_dropped() {
        let (emitter, mut events) = event_channel();
        emitter.receipt(TxnReceipt::with_status(true));
        drop(emitter);

        assert_eq!(
            events.next().await,
            Some(TxnEvent::Receipt(TxnReceipt::with_status(true)))
        );
        assert_eq!(events.next().await, None);
    }
}
