use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::capability::{HostEnvironment, WalletCapability};
use crate::config::BridgeConfig;
use crate::constants::{AUTHORIZATION_DENIED_MESSAGE, PROVIDER_UNAVAILABLE_MESSAGE};
use crate::errors::BridgeError;
use crate::models::{Account, CapabilityKind, Connection, SessionSnapshot};
use crate::notification::{NotificationSink, ToastMeta};

/// Owns the wallet connection and the authorized account for a session.
///
/// Consumers read immutable snapshots through the accessors or follow live changes
/// through [`ProviderGateway::subscribe`].
pub struct ProviderGateway<C> {
    host: HostEnvironment<C>,
    connection: Option<Connection<C>>,
    account: Option<Account>,
    sink: Arc<dyn NotificationSink>,
    config: BridgeConfig,
    session_tx: watch::Sender<SessionSnapshot>,
}

impl<C: WalletCapability> ProviderGateway<C> {
    pub fn new(
        host: HostEnvironment<C>,
        sink: Arc<dyn NotificationSink>,
        config: BridgeConfig,
    ) -> Self {
        let (session_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            host,
            connection: None,
            account: None,
            sink,
            config,
            session_tx,
        }
    }

    /// Probes the host for a wallet capability, modern first then legacy.
    ///
    /// # Errors
    /// * `BridgeError::ProviderUnavailable` - If the host exposes no capability. The
    ///                                        condition is also reported to the sink.
    pub fn init_connection(&mut self) -> Result<Connection<C>, BridgeError> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        let (capability, kind) = if let Some(capability) = self.host.modern.take() {
            info!("Using modern web3 provider.");
            (capability, CapabilityKind::Modern)
        } else if let Some(capability) = self.host.legacy.take() {
            info!("Legacy web3 provider. Try updating.");
            (capability, CapabilityKind::Legacy)
        } else {
            warn!("Non-Ethereum host detected. No wallet capability available.");
            self.report(PROVIDER_UNAVAILABLE_MESSAGE);
            return Err(BridgeError::ProviderUnavailable);
        };

        let connection = Connection {
            capability: Arc::new(capability),
            kind,
        };
        self.connection = Some(connection.clone());
        self.publish();
        Ok(connection)
    }

    /// Asks the connected wallet for authorization and adopts the first address it returns.
    ///
    /// The held account is replaced once the wallet answers. A failed request leaves none.
    ///
    /// # Errors
    /// * `BridgeError::ProviderUnavailable` - If no connection was initialized
    /// * `BridgeError::AuthorizationDenied` - If the user declined, the wallet failed or
    ///                                        returned no address
    pub async fn request_account(&mut self) -> Result<Account, BridgeError> {
        let Some(connection) = self.connection.clone() else {
            self.report(PROVIDER_UNAVAILABLE_MESSAGE);
            return Err(BridgeError::ProviderUnavailable);
        };

        let result = match connection.capability.request_accounts().await {
            // TODO: pick among several returned addresses once multi-account selection exists
            Ok(addresses) => addresses
                .first()
                .copied()
                .map(Account)
                .ok_or_else(|| "wallet returned no accounts".to_owned()),
            Err(err) => Err(err.to_string()),
        };

        match result {
            Ok(account) => {
                info!("wallet address: {}", account);
                self.account = Some(account);
                self.publish();
                Ok(account)
            }
            Err(reason) => {
                warn!("Account authorization failed. Error: {}", reason);
                self.account = None;
                self.publish();
                self.report(AUTHORIZATION_DENIED_MESSAGE);
                Err(BridgeError::AuthorizationDenied(reason))
            }
        }
    }

    pub fn connection(&self) -> Option<Connection<C>> {
        self.connection.clone()
    }

    pub fn account(&self) -> Option<Account> {
        self.account
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session_tx.subscribe()
    }

    fn publish(&self) {
        let snapshot = SessionSnapshot {
            capability: self.connection.as_ref().map(Connection::kind),
            account: self.account,
        };
        self.session_tx.send_replace(snapshot);
    }

    fn report(&self, message: &str) {
        self.sink
            .add_message(&self.config.wallet_title, ToastMeta::failure(message));
    }
}
