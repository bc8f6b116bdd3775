use async_trait::async_trait;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::models::wallet::{Notification, WalletSession};

pub const INSTALL_PHANTOM: &str = "Please install Phantom Wallet to connect!";
pub const CONNECTION_FAILED: &str = "Connection failed. Try again!";
pub const CONNECTED: &str = "Wallet connected!";
pub const DISCONNECTED: &str = "Wallet disconnected";

// Balance is not read from chain; the panel shows 0-100 SOL.
const MOCK_BALANCE_MAX: f64 = 100.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("no Phantom wallet available")]
    Unavailable,

    #[error("connection rejected: {0}")]
    Rejected(String),
}

/// Browser extension wallet, as seen by the dashboard.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn is_phantom(&self) -> bool;

    /// Public key of the approved account.
    async fn connect(&self) -> Result<String, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Provider answer relayed by the browser over HTTP.
#[derive(Debug, Clone)]
pub struct RelayedWallet {
    pub is_phantom: bool,
    pub public_key: Option<String>,
}

#[async_trait]
impl WalletProvider for RelayedWallet {
    fn is_phantom(&self) -> bool {
        self.is_phantom
    }

    async fn connect(&self) -> Result<String, WalletError> {
        self.public_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .ok_or_else(|| WalletError::Rejected("no public key returned".to_string()))
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }
}

/// Connects through `provider`, raising exactly one notification.
/// On failure the session is left untouched.
pub async fn connect<N: Notifier + ?Sized>(
    session: &mut WalletSession,
    provider: Option<&dyn WalletProvider>,
    notifier: &mut N,
) -> Result<(), WalletError> {
    let provider = match provider {
        Some(provider) if provider.is_phantom() => provider,
        _ => {
            notifier.notify(Notification::error(INSTALL_PHANTOM));
            return Err(WalletError::Unavailable);
        }
    };

    match provider.connect().await {
        Ok(public_key) => {
            info!("wallet connected: {}", public_key);

            session.public_key = Some(public_key);
            session.balance_sol = Some(mock_balance(&mut rand::thread_rng()));
            notifier.notify(Notification::success(CONNECTED));

            Ok(())
        }
        Err(e) => {
            warn!("wallet connection failed: {}", e);
            notifier.notify(Notification::error(CONNECTION_FAILED));

            Err(e)
        }
    }
}

pub async fn disconnect<N: Notifier + ?Sized>(
    session: &mut WalletSession,
    provider: Option<&dyn WalletProvider>,
    notifier: &mut N,
) {
    if let Some(provider) = provider {
        if let Err(e) = provider.disconnect().await {
            warn!("wallet disconnect: {}", e);
        }
    }

    if session.is_connected() {
        session.clear();
        notifier.notify(Notification::success(DISCONNECTED));
    }
}

fn mock_balance<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw = rng.gen_range(0.0..MOCK_BALANCE_MAX);

    (raw * 100.0).round() / 100.0
}
