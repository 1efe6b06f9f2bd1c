use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::config::BridgeConfig;
use crate::constants::{
    CONFIRMED_MESSAGE, ERROR_MESSAGE, EXPLORER_ACTION_TEXT, PENDING_MESSAGE, STARTED_ICON,
    STARTED_MESSAGE, SUCCESS_MESSAGE,
};
use crate::models::{Transaction, TxnStatus};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Processing,
    Success,
    Failure,
}

/// Body of a user facing notification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastMeta {
    pub message: String,
    pub action_href: Option<String>,
    pub action_text: Option<String>,
    pub variant: ToastVariant,
    pub icon: Option<String>,
}

impl ToastMeta {
    pub(crate) fn failure(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            action_href: None,
            action_text: None,
            variant: ToastVariant::Failure,
            icon: None,
        }
    }
}

/// Surface that shows notifications to the user.
///
/// Calls are fire-and-forget: implementations must not block and must swallow their
/// own delivery failures.
pub trait NotificationSink: Send + Sync {
    fn add_message(&self, title: &str, meta: ToastMeta);
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn add_message(&self, _title: &str, _meta: ToastMeta) {}
}

/// Writes notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn add_message(&self, title: &str, meta: ToastMeta) {
        info!(
            "[{}] {} ({:?}) {}",
            title,
            meta.message,
            meta.variant,
            meta.action_href.as_deref().unwrap_or_default()
        );
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub title: String,
    pub meta: ToastMeta,
}

/// Forwards notifications over an unbounded channel to whatever renders them.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn add_message(&self, title: &str, meta: ToastMeta) {
        // Renderer gone, nothing left to show it to.
        let _ = self.tx.send(Notification {
            title: title.to_owned(),
            meta,
        });
    }
}

/// Builds the notification body for the current status of `transaction`.
pub fn transaction_toast(transaction: &Transaction, config: &BridgeConfig) -> ToastMeta {
    let explorer_link = || transaction.hash.as_deref().map(|hash| config.explorer_tx_url(hash));

    match transaction.status {
        TxnStatus::Started => ToastMeta {
            message: STARTED_MESSAGE.to_owned(),
            action_href: None,
            action_text: None,
            variant: ToastVariant::Default,
            icon: Some(STARTED_ICON.to_owned()),
        },
        TxnStatus::Pending => ToastMeta {
            message: PENDING_MESSAGE.to_owned(),
            action_href: None,
            action_text: None,
            variant: ToastVariant::Processing,
            icon: None,
        },
        TxnStatus::Confirmed | TxnStatus::Success | TxnStatus::Error => {
            let (message, variant) = match transaction.status {
                TxnStatus::Confirmed => (CONFIRMED_MESSAGE, ToastVariant::Success),
                TxnStatus::Success => (SUCCESS_MESSAGE, ToastVariant::Success),
                _ => (ERROR_MESSAGE, ToastVariant::Failure),
            };
            let action_href = explorer_link();
            ToastMeta {
                message: message.to_owned(),
                action_text: action_href
                    .as_ref()
                    .map(|_| EXPLORER_ACTION_TEXT.to_owned()),
                action_href,
                variant,
                icon: None,
            }
        }
    }
}
