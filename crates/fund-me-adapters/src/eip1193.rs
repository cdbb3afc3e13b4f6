#[cfg(not(target_arch = "wasm32"))]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde_json::Value;

use fund_me_core::{Capability, CapabilityPort, PortError, Session};

use crate::abi;
use crate::public::PublicClient;
use crate::wallet::WalletClient;
use crate::FundMeConfig;

/// JSON-RPC error code geth and anvil use for reverted calls.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Request channel to an EIP-1193 provider.
#[derive(Debug, Clone)]
pub struct Eip1193Transport {
    mode: TransportMode,
}

#[derive(Debug, Clone)]
enum TransportMode {
    Disabled(String),
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
    next_id: Arc<AtomicU64>,
}

impl Eip1193Transport {
    pub fn detect(config: &FundMeConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let detected = {
            let _ = config;
            browser_provider().map(|_| Self {
                mode: TransportMode::Browser,
            })
        };

        #[cfg(not(target_arch = "wasm32"))]
        let detected = match config.eip1193_proxy_url {
            Some(ref base_url) => Self::proxy(base_url, config.request_timeout_ms),
            None => Err(PortError::Unavailable(
                "EIP-1193 proxy URL not configured".to_owned(),
            )),
        };

        detected.unwrap_or_else(|e| Self::disabled(e.to_string()))
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            mode: TransportMode::Disabled(reason.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn proxy(base_url: &str, timeout_ms: u64) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                PortError::Transport(format!("failed to initialize EIP-1193 proxy client: {e}"))
            })?;
        Ok(Self {
            mode: TransportMode::Proxy(ProxyRuntime {
                base_url: base_url.to_owned(),
                client,
                next_id: Arc::new(AtomicU64::new(1)),
            }),
        })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.mode {
            TransportMode::Disabled(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        tracing::debug!(method, "eip1193 request");
        match &self.mode {
            TransportMode::Disabled(reason) => Err(PortError::Unavailable(reason.clone())),
            #[cfg(not(target_arch = "wasm32"))]
            TransportMode::Proxy(proxy) => proxy_call(proxy, method, params).await,
            #[cfg(target_arch = "wasm32")]
            TransportMode::Browser => wasm_request(method, params).await,
        }
    }
}

/// Opens a wallet client and a public client over the injected provider, if there is one.
#[derive(Debug, Clone)]
pub struct Eip1193Host {
    config: FundMeConfig,
}

impl Eip1193Host {
    pub fn new(config: FundMeConfig) -> Self {
        Self { config }
    }
}

impl Default for Eip1193Host {
    fn default() -> Self {
        Self::new(FundMeConfig::from_env())
    }
}

impl CapabilityPort for Eip1193Host {
    type Signer = WalletClient;
    type Reader = PublicClient;

    fn open_session(&self) -> Capability<Session<WalletClient, PublicClient>> {
        // Re-detected on every call: the extension may be installed or removed at any time.
        let transport = Eip1193Transport::detect(&self.config);
        if let Some(reason) = transport.unavailable_reason() {
            tracing::debug!(reason, "wallet capability unavailable");
            return Capability::Unavailable;
        }
        Capability::Available(Session::new(
            WalletClient::new(transport.clone()),
            PublicClient::new(transport),
        ))
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn proxy_call(proxy: &ProxyRuntime, method: &str, params: Value) -> Result<Value, PortError> {
    let payload = serde_json::json!({
        "jsonrpc": "2.0",
        "id": proxy.next_id.fetch_add(1, Ordering::Relaxed),
        "method": method,
        "params": params,
    });
    let response = proxy
        .client
        .post(&proxy.base_url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
    if let Some(err) = body.get("error") {
        return Err(provider_error(err));
    }
    if !status.is_success() {
        return Err(PortError::Transport(format!(
            "eip1193 proxy status {status}: {body}"
        )));
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
}

#[cfg(target_arch = "wasm32")]
async fn wasm_request(method: &str, params: Value) -> Result<Value, PortError> {
    use wasm_bindgen::JsCast;

    let provider = browser_provider()?;
    let request_fn = get_prop(&provider, "request")?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| PortError::Unavailable("window.ethereum.request is unavailable".to_owned()))?;

    let request_js = to_js_plain(&request_args(method, params))?;
    let promise_js = request_fn
        .call1(&provider, &request_js)
        .map_err(|e| PortError::Transport(format!("provider request dispatch failed: {e:?}")))?;
    let promise = promise_js
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| PortError::Transport("provider request did not return Promise".to_owned()))?;
    let result_js = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| js_provider_error(&e))?;
    serde_wasm_bindgen::from_value(result_js)
        .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
}

/// Converts to plain JS objects; the default serializer turns JSON maps into `Map`, which providers ignore.
#[cfg(target_arch = "wasm32")]
fn to_js_plain(value: &Value) -> Result<wasm_bindgen::JsValue, PortError> {
    use serde::Serialize;

    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn js_provider_error(e: &wasm_bindgen::JsValue) -> PortError {
    // Provider errors are `Error` instances; `message` is not enumerable, so read fields directly.
    let Some(code) = get_prop(e, "code").ok().and_then(|v| v.as_f64()) else {
        return PortError::Transport(format!("provider request rejected: {e:?}"));
    };
    let message = get_prop(e, "message")
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    let data = get_prop(e, "data")
        .ok()
        .and_then(|v| serde_wasm_bindgen::from_value::<Value>(v).ok())
        .unwrap_or(Value::Null);
    provider_error(&serde_json::json!({
        "code": code as i64,
        "message": message,
        "data": data,
    }))
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Unavailable("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::Unavailable("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

/// `RequestArguments` for `window.ethereum.request`.
pub(crate) fn request_args(method: &str, params: Value) -> Value {
    serde_json::json!({
        "method": method,
        "params": params,
    })
}

/// Maps an EIP-1193 / JSON-RPC error object onto a port error.
pub(crate) fn provider_error(err: &Value) -> PortError {
    let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown provider error")
        .to_owned();
    let revert_data = err
        .get("data")
        .and_then(|d| d.as_str().or_else(|| d.get("data").and_then(Value::as_str)))
        .and_then(|raw| raw.parse::<Bytes>().ok());

    if code == EXECUTION_REVERTED_CODE || message.contains("revert") {
        let reason = revert_data
            .and_then(|data| abi::revert_reason(&data))
            .unwrap_or(message);
        return PortError::Reverted(reason);
    }
    PortError::Rejected { code, message }
}

pub(crate) fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    match strip_hex_prefix(raw) {
        Some(hex) => u64::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}"))),
        None => raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}"))),
    }
}

pub(crate) fn json_quantity(value: &Value) -> Result<U256, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Validation("quantity must be a string".to_owned()))?;
    match strip_hex_prefix(raw) {
        Some(hex) => U256::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex quantity: {e}"))),
        None => U256::from_str_radix(raw, 10)
            .map_err(|e| PortError::Validation(format!("invalid quantity: {e}"))),
    }
}

pub(crate) fn quantity_hex(value: U256) -> String {
    format!("0x{value:x}")
}

pub(crate) fn json_accounts(value: &Value) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport("eth_requestAccounts: array expected".to_owned()))?;
    let mut accounts = Vec::with_capacity(arr.len());
    for item in arr {
        let raw = item.as_str().ok_or_else(|| {
            PortError::Transport("eth_requestAccounts: string expected".to_owned())
        })?;
        let parsed: Address = raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))?;
        accounts.push(parsed);
    }
    Ok(accounts)
}

pub(crate) fn json_tx_hash(value: &Value) -> Result<B256, PortError> {
    let hash = value
        .as_str()
        .ok_or_else(|| PortError::Transport("eth_sendTransaction must return hash".to_owned()))?;
    hash.parse()
        .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))
}

pub(crate) fn json_bytes(value: &Value) -> Result<Bytes, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Transport("eth_call must return hex data".to_owned()))?;
    raw.parse()
        .map_err(|e| PortError::Validation(format!("invalid call result: {e}")))
}

fn strip_hex_prefix(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_args_carry_method_and_params() {
        let args = request_args("eth_requestAccounts", serde_json::json!([]));
        assert_eq!(args["method"], "eth_requestAccounts");
        assert_eq!(args["params"], serde_json::json!([]));
        assert_eq!(args.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn decimal_strings_parse_as_quantities() {
        assert_eq!(
            json_chain_id_to_u64(&serde_json::json!("31337")).expect("chain id"),
            31337
        );
        assert_eq!(
            json_quantity(&serde_json::json!("1500000000000000000")).expect("quantity"),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert!(json_chain_id_to_u64(&serde_json::json!("0xzz")).is_err());
        assert!(json_quantity(&serde_json::json!(12)).is_err());
    }
}
