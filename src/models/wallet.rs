use serde::Serialize;

use crate::utils::format::shorten_address;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One user-facing message raised by a wallet action.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: &str) -> Self {
        Notification {
            kind: NotificationKind::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Notification {
            kind: NotificationKind::Error,
            message: message.to_string(),
        }
    }
}

/// Connected wallet, if any. The balance is display-only mock data.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub public_key: Option<String>,
    pub balance_sol: Option<f64>,
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn short_address(&self) -> Option<String> {
        self.public_key.as_deref().map(shorten_address)
    }

    pub fn clear(&mut self) {
        self.public_key = None;
        self.balance_sol = None;
    }
}
