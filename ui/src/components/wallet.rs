//! Demo wallet session.
//!
//! Presents the surface a real wallet layer would (connection status, chain
//! id, account address, async chain switch with a pending flag, connect
//! dialog) backed by a built-in demo account. Swap this for an injected-
//! provider implementation in production.

use dioxus::prelude::*;

use converter_common::token::{Network, MAINNET_CHAIN_ID};

use super::balance::{use_balance_action, BalanceAction};
use super::timer::sleep_ms;

const DEMO_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const SWITCH_DELAY_MS: u32 = 600;

/// Get the demo account from compile-time env vars.
fn demo_address() -> String {
    option_env!("CONVERTER_DEMO_ADDRESS")
        .filter(|addr| !addr.is_empty())
        .unwrap_or(DEMO_ADDRESS)
        .to_string()
}

/// Chain the demo session lands on after connecting. Defaults to mainnet;
/// point it elsewhere to exercise the switch-network flow.
fn demo_chain_id() -> u64 {
    option_env!("CONVERTER_DEMO_CHAIN_ID")
        .and_then(|id| id.parse().ok())
        .unwrap_or(MAINNET_CHAIN_ID)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub switch_pending: bool,
    pub connect_open: bool,
}

impl WalletSession {
    pub fn on_mainnet(&self) -> bool {
        self.chain_id == Some(MAINNET_CHAIN_ID)
    }

    /// "0xf39F…2266" style display form.
    pub fn short_address(&self) -> Option<String> {
        self.address.as_ref().map(|addr| {
            if addr.len() > 10 {
                format!("{}…{}", &addr[..6], &addr[addr.len() - 4..])
            } else {
                addr.clone()
            }
        })
    }
}

pub fn use_wallet_session() -> Signal<WalletSession> {
    use_context::<Signal<WalletSession>>()
}

pub fn open_connect(mut session: Signal<WalletSession>) {
    session.write().connect_open = true;
}

pub fn connect(mut session: Signal<WalletSession>, balances: Coroutine<BalanceAction>) {
    {
        let mut s = session.write();
        s.connected = true;
        s.address = Some(demo_address());
        s.chain_id = Some(demo_chain_id());
        s.connect_open = false;
    }
    tracing::info!("Wallet connected (demo session)");
    balances.send(BalanceAction::Refresh);
}

pub fn disconnect(mut session: Signal<WalletSession>, balances: Coroutine<BalanceAction>) {
    session.set(WalletSession::default());
    tracing::info!("Wallet disconnected");
    balances.send(BalanceAction::Refresh);
}

/// Request a switch to mainnet. A real wallet prompts the user here; the
/// demo session settles after a short delay, reporting `switch_pending`
/// in the meantime.
pub fn switch_to_mainnet(mut session: Signal<WalletSession>, balances: Coroutine<BalanceAction>) {
    {
        let s = session.peek();
        if s.switch_pending || s.on_mainnet() {
            return;
        }
    }
    session.write().switch_pending = true;
    spawn(async move {
        sleep_ms(SWITCH_DELAY_MS).await;
        {
            let mut s = session.write();
            s.chain_id = Some(MAINNET_CHAIN_ID);
            s.switch_pending = false;
        }
        tracing::info!("Switched to {}", Network::Mainnet.name());
        balances.send(BalanceAction::Refresh);
    });
}

/// Header control: opens the connect dialog, or disconnects when a session
/// is active.
#[component]
pub fn ConnectButton() -> Element {
    let session = use_wallet_session();
    let balances = use_balance_action();

    let (connected, label) = {
        let s = session.read();
        (
            s.connected,
            s.short_address().unwrap_or_else(|| "Connect Wallet".to_string()),
        )
    };

    if connected {
        rsx! {
            button {
                class: "connect-button connected",
                title: "Disconnect",
                onclick: move |_| disconnect(session, balances),
                "{label}"
            }
        }
    } else {
        rsx! {
            button {
                class: "connect-button",
                onclick: move |_| open_connect(session),
                "Connect Wallet"
            }
        }
    }
}

/// Modal listing the available wallets. The demo build has exactly one.
#[component]
pub fn ConnectDialog() -> Element {
    let mut session = use_wallet_session();
    let balances = use_balance_action();

    if !session.read().connect_open {
        return rsx! {};
    }

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| session.write().connect_open = false,
            div {
                class: "modal-card",
                onclick: move |e: Event<MouseData>| e.stop_propagation(),
                h3 { "Connect a Wallet" }
                button {
                    class: "wallet-option",
                    onclick: move |_| connect(session, balances),
                    "Demo Wallet"
                }
                button {
                    class: "modal-close",
                    onclick: move |_| session.write().connect_open = false,
                    "Cancel"
                }
            }
        }
    }
}
