//! The converter card: two mutually-consistent amount fields against the
//! live (or fallback) BTC price.
//!
//! All sequencing decisions live in `converter_common::convert`; this
//! component only drives the debounce timer, the price lookup, and the
//! render. A keystroke burst collapses to one fetch, and anything stamped
//! with a superseded edit id dies quietly in `debounce_elapsed`/`settle`.

use dioxus::prelude::*;

use converter_common::amount::{format_grouped, parse_amount, truncate_decimals};
use converter_common::convert::{Conversion, Direction, EditOutcome, Side};
use converter_common::policy::{ActionInputs, ConvertAction};
use converter_common::price::DEBOUNCE_MS;
use converter_common::token::Token;

use super::balance::{use_balance_action, use_balances, BalanceAction, TokenBalance};
use super::convert_button::ConvertButton;
use super::currency_input::CurrencyInput;
use super::error_message::ErrorMessages;
use super::price_feed::{use_price, PriceHandle};
use super::timer::sleep_ms;
use super::transaction_modal::TransactionModal;
use super::wallet::{self, WalletSession};

#[component]
pub fn Converter() -> Element {
    let session = wallet::use_wallet_session();
    let balances = use_balances();
    let balance_actions = use_balance_action();
    let mut conversion = use_signal(Conversion::new);
    let price = use_price(Token::Wbtc.coingecko_id());
    let mut modal_open = use_signal(|| false);

    let (usd_amount, token_amount, direction, active, recomputing) = {
        let conv = conversion.read();
        (
            conv.usd_amount().to_string(),
            conv.token_amount().to_string(),
            conv.direction(),
            conv.active_side(),
            conv.is_recomputing(),
        )
    };

    let price_state = price.state.read().clone();
    let price_error = price_state.is_error();
    let rate_loading = price_state.is_initial_loading();

    let (connected, on_mainnet, switch_pending) = {
        let s = session.read();
        (s.connected, s.on_mainnet(), s.switch_pending)
    };

    let (usdc, wbtc) = {
        let b = balances.read();
        (b.usdc.clone(), b.wbtc.clone())
    };

    let action = ConvertAction::evaluate(&ActionInputs {
        connected,
        on_expected_chain: on_mainnet,
        switch_pending,
        rate_loading,
        recompute_pending: recomputing,
        direction,
        usd_amount: &usd_amount,
        token_amount: &token_amount,
        usd_balance: usdc.formatted.as_deref().and_then(parse_amount),
        token_balance: wbtc.formatted.as_deref().and_then(parse_amount),
    });

    let usd_input = rsx! {
        CurrencyInput {
            label: "USD Amount",
            amount: usd_amount.clone(),
            glyph: Token::Usdc.glyph().to_string(),
            placeholder: "Enter USD amount",
            disabled: price_error,
            connected: connected,
            balance_display: balance_caption(&usdc, Token::Usdc),
            skeleton: recomputing && active != Some(Side::Usd),
            oninput: move |value: String| schedule_edit(conversion, price, Side::Usd, &value),
        }
    };
    let token_input = rsx! {
        CurrencyInput {
            label: "wBTC Amount",
            amount: token_amount.clone(),
            glyph: Token::Wbtc.glyph().to_string(),
            placeholder: "Enter wBTC amount",
            disabled: price_error,
            connected: connected,
            balance_display: balance_caption(&wbtc, Token::Wbtc),
            skeleton: recomputing && active != Some(Side::Token),
            oninput: move |value: String| schedule_edit(conversion, price, Side::Token, &value),
        }
    };
    let reverse = rsx! {
        ReverseButton { onclick: move |_| conversion.write().reverse() }
    };

    rsx! {
        div { class: "converter-card",
            match direction {
                Direction::UsdToToken => rsx! {
                    {usd_input}
                    {reverse}
                    {token_input}
                },
                Direction::TokenToUsd => rsx! {
                    {token_input}
                    {reverse}
                    {usd_input}
                },
            }
            ConvertButton {
                label: action.label().to_string(),
                busy: action.is_busy(),
                disabled: !action.is_enabled(),
                onclick: move |_| run_action(action, session, balance_actions, modal_open),
            }
            ErrorMessages {
                price_error: price_error,
                usdc_error: usdc.is_error,
                wbtc_error: wbtc.is_error,
            }
            p { class: "price-caption",
                "Current BTC Price: ${format_grouped(price_state.effective_rate())}"
            }
            TransactionModal {
                open: *modal_open.read(),
                onclose: move |_| modal_open.set(false),
            }
        }
    }
}

/// Swaps which field sits on top. Values stay put; only display roles move.
#[component]
fn ReverseButton(onclick: EventHandler<()>) -> Element {
    rsx! {
        div { class: "reverse-row",
            button {
                class: "reverse-button",
                aria_label: "Reverse currencies",
                onclick: move |_| onclick.call(()),
                "⇅"
            }
        }
    }
}

/// Accept a keystroke and arm the debounce window for it. Only the newest
/// edit survives to fetch and settle; earlier timers find their id stale
/// and bail.
fn schedule_edit(mut conversion: Signal<Conversion>, mut price: PriceHandle, side: Side, raw: &str) {
    match conversion.write().edit(side, raw) {
        EditOutcome::Accepted(edit) => {
            spawn(async move {
                sleep_ms(DEBOUNCE_MS).await;
                if !conversion.write().debounce_elapsed(edit) {
                    return;
                }
                let rate = price.rate_for_conversion().await;
                conversion.write().settle(edit, rate);
            });
        }
        EditOutcome::Cleared | EditOutcome::Rejected => {}
    }
}

fn run_action(
    action: ConvertAction,
    session: Signal<WalletSession>,
    balances: Coroutine<BalanceAction>,
    mut modal_open: Signal<bool>,
) {
    match action {
        ConvertAction::Connect => wallet::open_connect(session),
        ConvertAction::SwitchNetwork { pending: false } => {
            wallet::switch_to_mainnet(session, balances)
        }
        ConvertAction::SwitchNetwork { .. } => {}
        ConvertAction::Convert { enabled: true, .. } => {
            tracing::info!("Conversion acknowledged (no on-chain settlement in this build)");
            modal_open.set(true);
        }
        ConvertAction::Convert { .. } => {}
    }
}

/// "Balance: 1234.56 USDC" caption, suppressed while errored or unknown.
fn balance_caption(balance: &TokenBalance, token: Token) -> Option<String> {
    if balance.is_error {
        return None;
    }
    let formatted = balance.formatted.as_ref()?;
    Some(format!(
        "Balance: {} {}",
        truncate_decimals(formatted, token.display_decimals()),
        token.symbol()
    ))
}
