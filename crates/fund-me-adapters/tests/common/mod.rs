#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use tiny_http::{Response, Server};

use fund_me_adapters::{Eip1193Host, FundMeConfig, DEFAULT_CONTRACT_ADDRESS};
use fund_me_core::{AffordancePort, WalletController, CONNECT_LABEL};

pub const ACCOUNT: &str = "0x0000000000000000000000000000000000000ABC";
pub const TX_HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";

/// JSON-RPC endpoint answering from a closure and recording each request body.
pub struct RpcStub {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl RpcStub {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, Value> + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("start server");
        let url = format!("http://{}", server.server_addr());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for mut req in server.incoming_requests() {
                let mut body = String::new();
                if req.as_reader().read_to_string(&mut body).is_err() {
                    continue;
                }
                let call: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
                let method = call["method"].as_str().unwrap_or_default().to_owned();
                let response = match handler(&method, &call["params"]) {
                    Ok(result) => serde_json::json!({
                        "jsonrpc": "2.0",
                        "id": call["id"],
                        "result": result,
                    }),
                    Err(error) => serde_json::json!({
                        "jsonrpc": "2.0",
                        "id": call["id"],
                        "error": error,
                    }),
                };
                if let Ok(mut g) = recorded.lock() {
                    g.push(call);
                }
                let _ = req.respond(Response::from_string(response.to_string()));
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["method"].as_str().unwrap_or_default().to_owned())
            .collect()
    }

    pub fn params_of(&self, method: &str) -> Value {
        self.requests()
            .into_iter()
            .find(|r| r["method"] == method)
            .map(|r| r["params"].clone())
            .unwrap_or_else(|| panic!("no {method} request recorded"))
    }
}

/// Answers the happy path of a local anvil node with one unlocked account.
pub fn anvil_like(method: &str, _params: &Value) -> Result<Value, Value> {
    match method {
        "eth_requestAccounts" => Ok(serde_json::json!([ACCOUNT])),
        "eth_chainId" => Ok(serde_json::json!("0x7a69")),
        "eth_call" => Ok(serde_json::json!("0x")),
        "eth_sendTransaction" => Ok(serde_json::json!(TX_HASH)),
        "eth_getBalance" => Ok(serde_json::json!("0x1bc16d674ec80000")),
        other => Err(serde_json::json!({
            "code": -32601,
            "message": format!("method {other} not found"),
        })),
    }
}

#[derive(Debug, Clone)]
pub struct LabelSink(Arc<Mutex<String>>);

impl Default for LabelSink {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(CONNECT_LABEL.to_owned())))
    }
}

impl LabelSink {
    pub fn current(&self) -> String {
        self.0.lock().expect("label lock").clone()
    }
}

impl AffordancePort for LabelSink {
    fn set_connect_label(&self, text: &str) {
        *self.0.lock().expect("label lock") = text.to_owned();
    }
}

pub fn proxy_config(url: &str) -> FundMeConfig {
    FundMeConfig {
        eip1193_proxy_url: Some(url.to_owned()),
        request_timeout_ms: 5_000,
        ..FundMeConfig::default()
    }
}

pub fn controller_for(config: FundMeConfig) -> WalletController<Eip1193Host, LabelSink> {
    let controller_config = config.controller_config();
    WalletController::new(
        Eip1193Host::new(config),
        LabelSink::default(),
        controller_config,
    )
}

pub fn contract_hex() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}
