use log::warn;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("all RPC providers failed: {0}")]
    AllProvidersFailed(String),

    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("missing result for request {0}")]
    MissingResult(u64),

    #[error("unexpected result shape: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct JsonBodyReq {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JsonBodyRes<T> {
    pub id: u64,
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC client over an ordered list of providers; the first one that answers wins.
#[derive(Debug, Clone)]
pub struct Solana {
    providers: Vec<String>,
    client: Client,
}

impl Solana {
    pub fn from(providers: Vec<String>, client: Client) -> Self {
        Solana { providers, client }
    }

    pub fn build_body(&self, id: u64, method: &'static str, params: Value) -> JsonBodyReq {
        JsonBodyReq {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }

    /// Sends a batch and returns responses in request order.
    pub async fn fetch(&self, bodies: &[JsonBodyReq]) -> Result<Vec<JsonBodyRes<Value>>, RpcError> {
        let mut last_error = String::from("no providers configured");

        for url in &self.providers {
            let response = match self.client.post(url).json(bodies).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("rpc {}: {}", url, e);
                    last_error = e.to_string();
                    continue;
                }
            };

            if !response.status().is_success() {
                warn!("rpc {}: status {}", url, response.status());
                last_error = format!("status {}", response.status());
                continue;
            }

            match response.json::<Vec<JsonBodyRes<Value>>>().await {
                Ok(mut responses) => {
                    responses.sort_by_key(|r| r.id);
                    return Ok(responses);
                }
                Err(e) => {
                    warn!("rpc {}: bad body: {}", url, e);
                    last_error = e.to_string();
                }
            }
        }

        Err(RpcError::AllProvidersFailed(last_error))
    }
}

/// Extracts and decodes the result for request `id` from a batch.
pub fn take_result<T: DeserializeOwned>(responses: &[JsonBodyRes<Value>], id: u64) -> Result<T, RpcError> {
    let response = responses
        .iter()
        .find(|r| r.id == id)
        .ok_or(RpcError::MissingResult(id))?;

    if let Some(err) = &response.error {
        return Err(RpcError::Node {
            code: err.code,
            message: err.message.clone(),
        });
    }

    let result = response.result.clone().ok_or(RpcError::MissingResult(id))?;

    Ok(serde_json::from_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_body() {
        let solana = Solana::from(vec!["http://127.0.0.1:1".to_string()], Client::new());
        let body = solana.build_body(3, "getEpochInfo", json!([]));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "getEpochInfo", "params": []})
        );
    }

    #[test]
    fn test_take_result() {
        let responses: Vec<JsonBodyRes<Value>> = serde_json::from_value(json!([
            {"jsonrpc": "2.0", "id": 0, "result": {"epoch": 712}},
            {"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "Method not found"}}
        ]))
        .unwrap();

        let epoch: Value = take_result(&responses, 0).unwrap();
        assert_eq!(epoch["epoch"], 712);

        match take_result::<Value>(&responses, 1) {
            Err(RpcError::Node { code, .. }) => assert_eq!(code, -32601),
            other => panic!("expected node error, got {:?}", other),
        }
        assert!(matches!(
            take_result::<Value>(&responses, 2),
            Err(RpcError::MissingResult(2))
        ));
    }

    #[tokio::test]
    async fn test_fetch_falls_through_to_next_provider() {
        let mut broken = mockito::Server::new_async().await;
        let mut healthy = mockito::Server::new_async().await;

        let broken_mock = broken
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;
        let healthy_mock = healthy
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"jsonrpc":"2.0","id":0,"result":{"epoch":700}}]"#)
            .create_async()
            .await;

        let solana = Solana::from(vec![broken.url(), healthy.url()], Client::new());
        let body = solana.build_body(0, "getEpochInfo", json!([]));
        let responses = solana.fetch(&[body]).await.unwrap();

        broken_mock.assert_async().await;
        healthy_mock.assert_async().await;
        let epoch: Value = take_result(&responses, 0).unwrap();
        assert_eq!(epoch["epoch"], 700);
    }

    #[tokio::test]
    async fn test_fetch_all_providers_down() {
        let solana = Solana::from(vec!["http://127.0.0.1:1".to_string()], Client::new());
        let body = solana.build_body(0, "getEpochInfo", json!([]));

        assert!(matches!(
            solana.fetch(&[body]).await,
            Err(RpcError::AllProvidersFailed(_))
        ));
    }
}
