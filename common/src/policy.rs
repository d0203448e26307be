//! Primary-action gating: what the convert button says and whether it acts.

use crate::amount::parse_amount;
use crate::convert::{Direction, Side};

/// Everything the gate looks at, flattened out of the session, price feed,
/// balance store, and conversion state.
#[derive(Clone, Copy, Debug)]
pub struct ActionInputs<'a> {
    pub connected: bool,
    pub on_expected_chain: bool,
    pub switch_pending: bool,
    pub rate_loading: bool,
    pub recompute_pending: bool,
    pub direction: Direction,
    pub usd_amount: &'a str,
    pub token_amount: &'a str,
    /// Spendable fiat-proxy balance, when known.
    pub usd_balance: Option<f64>,
    /// Spendable wrapped-token balance, when known.
    pub token_balance: Option<f64>,
}

/// Resolved role of the primary action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertAction {
    /// Disconnected: the action opens the connect dialog, always enabled.
    Connect,
    /// Connected on the wrong chain: the action requests a switch, enabled
    /// unless one is already pending.
    SwitchNetwork { pending: bool },
    /// Connected on the expected chain: a real conversion attempt.
    Convert {
        direction: Direction,
        enabled: bool,
        insufficient: bool,
        busy: bool,
    },
}

impl ConvertAction {
    pub fn evaluate(inputs: &ActionInputs) -> Self {
        if !inputs.connected {
            return ConvertAction::Connect;
        }
        if !inputs.on_expected_chain {
            return ConvertAction::SwitchNetwork {
                pending: inputs.switch_pending,
            };
        }

        // The spent currency follows the display direction, not the
        // transient active-input marker, so the gate holds after a
        // recomputation settles.
        let (amount, balance) = match inputs.direction.source_side() {
            Side::Usd => (inputs.usd_amount, inputs.usd_balance),
            Side::Token => (inputs.token_amount, inputs.token_balance),
        };
        let insufficient = match (parse_amount(amount), balance) {
            (Some(spend), Some(held)) => spend > held,
            _ => false,
        };
        let empty = inputs.usd_amount.is_empty() && inputs.token_amount.is_empty();
        let busy = inputs.rate_loading || inputs.recompute_pending;
        ConvertAction::Convert {
            direction: inputs.direction,
            enabled: !busy && !empty && !insufficient,
            insufficient,
            busy,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            ConvertAction::Connect => true,
            ConvertAction::SwitchNetwork { pending } => !pending,
            ConvertAction::Convert { enabled, .. } => *enabled,
        }
    }

    /// Whether the button shows its spinner.
    pub fn is_busy(&self) -> bool {
        match self {
            ConvertAction::Connect => false,
            ConvertAction::SwitchNetwork { pending } => *pending,
            ConvertAction::Convert { busy, .. } => *busy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConvertAction::Connect => "Connect Wallet",
            ConvertAction::SwitchNetwork { .. } => "Switch to Ethereum Mainnet",
            ConvertAction::Convert {
                insufficient: true, ..
            } => "Insufficient Balance",
            ConvertAction::Convert {
                direction: Direction::UsdToToken,
                ..
            } => "Convert to wBTC",
            ConvertAction::Convert {
                direction: Direction::TokenToUsd,
                ..
            } => "Convert to USD",
        }
    }
}
