use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::{error_response, json_response, HttpResponse};
use crate::{
    components::{
        presenter::render_wallet,
        wallet::{connect, disconnect, RelayedWallet, WalletProvider},
    },
    models::{state::AppState, wallet::Notification},
};

/// What the page saw of `window.solana` after asking it to connect.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConnectRequest {
    #[serde(default)]
    is_phantom: bool,
    #[serde(default)]
    public_key: Option<String>,
    /// `false` when the page found no extension at all.
    #[serde(default = "present")]
    provider: bool,
}

fn present() -> bool {
    true
}

pub async fn handle_get_wallet(state: &AppState) -> HttpResponse {
    let session = state.wallet.read().await;

    json_response(StatusCode::OK, &render_wallet(&session))
}

pub async fn handle_connect(state: &AppState, body: &[u8]) -> HttpResponse {
    let request: ConnectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ConnectRequest::default()
    } else {
        match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, &format!("invalid body: {}", e))
            }
        }
    };

    let relayed = RelayedWallet {
        is_phantom: request.is_phantom,
        public_key: request.public_key,
    };
    let provider: Option<&dyn WalletProvider> = if request.provider {
        Some(&relayed)
    } else {
        None
    };

    let mut notifications: Vec<Notification> = Vec::new();
    let mut session = state.wallet.write().await;
    let result = connect(&mut session, provider, &mut notifications).await;

    json_response(
        StatusCode::OK,
        &json!({
            "connected": result.is_ok(),
            "error": result.err().map(|e| e.to_string()),
            "wallet": render_wallet(&session),
            "notifications": notifications,
        }),
    )
}

pub async fn handle_disconnect(state: &AppState) -> HttpResponse {
    let mut notifications: Vec<Notification> = Vec::new();
    let mut session = state.wallet.write().await;

    disconnect(&mut session, None, &mut notifications).await;

    json_response(
        StatusCode::OK,
        &json!({
            "wallet": render_wallet(&session),
            "notifications": notifications,
        }),
    )
}
