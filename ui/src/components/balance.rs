//! On-chain balance reads over JSON-RPC.
//!
//! A single coroutine owns the `Balances` store: it refetches when poked
//! with a [`BalanceAction`] (connect, disconnect, chain switch) and on a
//! slow cadence while a session is connected. Each token's error state is
//! tracked independently so one failing lookup blanks only its own display.

use dioxus::prelude::*;
use futures::{FutureExt, StreamExt};
use serde::Serialize;

use converter_common::amount::{format_units, parse_hex_quantity};
use converter_common::token::{Network, Token};

use super::net::fetch_text;
use super::timer::sleep_ms;
use super::wallet::WalletSession;

const DEFAULT_RPC_URL: &str = "https://ethereum-rpc.publicnode.com";
const BALANCE_OF_SELECTOR: &str = "70a08231";
const BALANCE_REFRESH_MS: u32 = 30_000;

/// Get the JSON-RPC endpoint from compile-time env vars.
fn rpc_url() -> String {
    option_env!("CONVERTER_RPC_URL")
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_RPC_URL)
        .to_string()
}

/// One token's balance as the UI consumes it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenBalance {
    pub formatted: Option<String>,
    pub is_loading: bool,
    pub is_error: bool,
}

/// Balance store shared across components.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Balances {
    pub eth: TokenBalance,
    pub usdc: TokenBalance,
    pub wbtc: TokenBalance,
}

pub fn use_balances() -> Signal<Balances> {
    use_context::<Signal<Balances>>()
}

/// Pokes the balance coroutine into an immediate refetch.
#[derive(Debug, Clone)]
pub enum BalanceAction {
    Refresh,
}

/// Get a handle to poke the balance coroutine.
pub fn use_balance_action() -> Coroutine<BalanceAction> {
    use_coroutine_handle::<BalanceAction>()
}

/// Start the balance coroutine. Call once at the app root.
pub fn use_balance_coroutine(session: Signal<WalletSession>, mut balances: Signal<Balances>) {
    use_coroutine(move |mut rx: UnboundedReceiver<BalanceAction>| async move {
        loop {
            let address = {
                let s = session.peek();
                s.connected.then(|| s.address.clone()).flatten()
            };
            match address {
                Some(addr) => refresh_all(&addr, &mut balances).await,
                None => balances.set(Balances::default()),
            }

            // Wait for a poke or the next cadence tick, whichever first.
            let tick = sleep_ms(BALANCE_REFRESH_MS).fuse();
            futures::pin_mut!(tick);
            futures::select! {
                action = rx.next() => match action {
                    Some(BalanceAction::Refresh) => {}
                    None => return,
                },
                _ = tick => {}
            }
        }
    });
}

async fn refresh_all(address: &str, balances: &mut Signal<Balances>) {
    {
        let mut store = balances.write();
        store.eth.is_loading = true;
        store.usdc.is_loading = true;
        store.wbtc.is_loading = true;
    }

    let client = RpcClient::from_env();
    let eth = client
        .native_balance(address)
        .await
        .map(|raw| format_units(raw, Network::Mainnet.native_decimals()));
    let usdc = client
        .erc20_balance(Token::Usdc.address(), address)
        .await
        .map(|raw| format_units(raw, Token::Usdc.decimals()));
    let wbtc = client
        .erc20_balance(Token::Wbtc.address(), address)
        .await
        .map(|raw| format_units(raw, Token::Wbtc.decimals()));

    let mut store = balances.write();
    store.eth = into_balance(eth, "ETH");
    store.usdc = into_balance(usdc, "USDC");
    store.wbtc = into_balance(wbtc, "wBTC");
}

fn into_balance(result: Result<String, String>, label: &str) -> TokenBalance {
    match result {
        Ok(formatted) => TokenBalance {
            formatted: Some(formatted),
            is_loading: false,
            is_error: false,
        },
        Err(e) => {
            tracing::error!("Failed to fetch {label} balance: {e}");
            TokenBalance {
                formatted: None,
                is_loading: false,
                is_error: true,
            }
        }
    }
}

// ─── JSON-RPC client ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: u32,
    method: &'a str,
    params: serde_json::Value,
}

pub struct RpcClient {
    url: String,
}

impl RpcClient {
    pub fn from_env() -> Self {
        Self { url: rpc_url() }
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<String, String> {
        let body = serde_json::to_string(&RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        })
        .map_err(|e| e.to_string())?;
        let resp = fetch_text(&self.url, "POST", Some(body), None).await?;
        let value: serde_json::Value =
            serde_json::from_str(&resp).map_err(|e| format!("Parse RPC response: {e}"))?;
        if let Some(err) = value.get("error") {
            return Err(format!("RPC error: {err}"));
        }
        value
            .get("result")
            .and_then(|r| r.as_str())
            .map(String::from)
            .ok_or_else(|| "RPC response missing result".to_string())
    }

    /// Native asset balance in wei.
    pub async fn native_balance(&self, address: &str) -> Result<u128, String> {
        let hex = self
            .call("eth_getBalance", serde_json::json!([address, "latest"]))
            .await?;
        parse_hex_quantity(&hex)
    }

    /// ERC-20 balance in base units via `balanceOf(address)`.
    pub async fn erc20_balance(&self, token: &str, holder: &str) -> Result<u128, String> {
        let holder_word = holder.trim_start_matches("0x").to_lowercase();
        let data = format!("0x{BALANCE_OF_SELECTOR}{holder_word:0>64}");
        let hex = self
            .call(
                "eth_call",
                serde_json::json!([{ "to": token, "data": data }, "latest"]),
            )
            .await?;
        parse_hex_quantity(&hex)
    }
}
