//! App shell: router, layout, header.

use dioxus::prelude::*;

use converter_common::amount::{parse_amount, round_to_decimals};
use converter_common::token::Network;

use super::balance::{use_balance_coroutine, use_balances, Balances, TokenBalance};
use super::converter::Converter;
use super::wallet::{use_wallet_session, ConnectButton, ConnectDialog, WalletSession};

static MAIN_CSS: Asset = asset!("/assets/main.css");

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
}

#[component]
pub fn App() -> Element {
    let session = use_context_provider(|| Signal::new(WalletSession::default()));
    let balances = use_context_provider(|| Signal::new(Balances::default()));
    use_balance_coroutine(session, balances);

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[component]
fn AppLayout() -> Element {
    rsx! {
        div { class: "converter-app",
            Header {}
            main { class: "app-main",
                Outlet::<Route> {}
            }
            ConnectDialog {}
        }
    }
}

#[component]
fn Header() -> Element {
    let session = use_wallet_session();
    let balances = use_balances();

    let (connected, on_mainnet) = {
        let s = session.read();
        (s.connected, s.on_mainnet())
    };
    let eth = balances.read().eth.clone();

    rsx! {
        header { class: "app-header",
            div { class: "app-logo",
                span { class: "logo-glyph", "₿" }
                h1 { "wBTC Converter" }
            }
            div { class: "header-right",
                div { class: "network-pill",
                    span {
                        class: if on_mainnet { "network-dot online" } else { "network-dot" },
                    }
                    span { "Ethereum" }
                    if connected {
                        span { class: "pill-divider", "|" }
                        span { class: "pill-native", "{Network::Mainnet.native_symbol()}" }
                        span { "{native_display(&eth)}" }
                    }
                }
                ConnectButton {}
            }
        }
    }
}

/// Native balance for the header pill: `...` while first loading, `Error`
/// on failure, four decimals otherwise.
fn native_display(eth: &TokenBalance) -> String {
    if eth.is_error {
        return "Error".to_string();
    }
    match &eth.formatted {
        Some(formatted) => parse_amount(formatted)
            .map(|value| round_to_decimals(value, 4))
            .unwrap_or_else(|| "--".to_string()),
        None if eth.is_loading => "...".to_string(),
        None => "--".to_string(),
    }
}

#[component]
fn Home() -> Element {
    rsx! {
        div { class: "page-home",
            h2 { class: "page-heading", "Convert USD to Wrapped Bitcoin (wBTC)" }
            Converter {}
        }
    }
}
