//! Debounced, abortable USD price feed.
//!
//! Each converter instance owns its own [`RequestContext`] (a generation
//! counter plus the current abort controller), so two mounted converters
//! cannot cancel each other's lookups. Superseding a request aborts the
//! underlying transport call and bumps the generation; whichever of the
//! two fires first, a stale result is never applied.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use converter_common::price::{
    parse_simple_price, PriceError, PriceQuote, PriceState, REFRESH_INTERVAL_MS,
};

const PRICE_API_BASE: &str = "https://api.coingecko.com/api/v3/simple/price";

#[derive(Default)]
struct RequestSlot {
    generation: u64,
    #[cfg(target_family = "wasm")]
    controller: Option<web_sys::AbortController>,
}

/// Per-consumer request state. Cloning shares the same slot.
#[derive(Clone, Default)]
pub struct RequestContext {
    slot: Rc<RefCell<RequestSlot>>,
}

/// Proof of having opened a request; results are applied only while the
/// ticket is still the newest one.
pub struct RequestTicket {
    generation: u64,
    #[cfg(target_family = "wasm")]
    signal: Option<web_sys::AbortSignal>,
}

impl RequestContext {
    /// Supersede any in-flight request and open a new one.
    pub fn begin(&self) -> RequestTicket {
        let mut slot = self.slot.borrow_mut();
        slot.generation += 1;
        #[cfg(target_family = "wasm")]
        {
            if let Some(previous) = slot.controller.take() {
                previous.abort();
            }
            let controller = web_sys::AbortController::new().ok();
            let signal = controller.as_ref().map(|c| c.signal());
            slot.controller = controller;
            return RequestTicket {
                generation: slot.generation,
                signal,
            };
        }
        #[cfg(not(target_family = "wasm"))]
        RequestTicket {
            generation: slot.generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.slot.borrow().generation == ticket.generation
    }
}

/// Fetch the current USD price of `asset_id`. Errors propagate; the display
/// layer decides whether to substitute the fallback constant.
pub async fn fetch_usd_price(asset_id: &str, ticket: &RequestTicket) -> Result<f64, PriceError> {
    #[cfg(target_family = "wasm")]
    {
        let url = format!("{PRICE_API_BASE}?ids={asset_id}&vs_currencies=usd");
        let body = super::net::fetch_text(&url, "GET", None, ticket.signal.as_ref())
            .await
            .map_err(PriceError::Transport)?;
        return parse_simple_price(&body, asset_id);
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = (asset_id, ticket, PRICE_API_BASE, parse_simple_price);
        Err(PriceError::Transport(
            "price fetch only available in WASM".to_string(),
        ))
    }
}

/// Handle shared by the render pass, the debounce tasks, and the refresh
/// coroutine. Copyable into event closures.
#[derive(Clone, Copy)]
pub struct PriceHandle {
    pub state: Signal<PriceState>,
    requests: Signal<RequestContext>,
    asset_id: &'static str,
}

impl PriceHandle {
    /// Fetch now, superseding any in-flight lookup, and record the outcome
    /// unless something newer superseded *us* while we were waiting.
    pub async fn refresh(&mut self) {
        let ticket = self.requests.peek().begin();
        let result = fetch_usd_price(self.asset_id, &ticket).await;
        if !self.requests.peek().is_current(&ticket) {
            // Superseded: this result is inert, even its error.
            return;
        }
        if let Err(ref e) = result {
            tracing::warn!("Price lookup for {} failed: {e}", self.asset_id);
        }
        let quote = result.map(|usd| PriceQuote::new(usd, chrono::Utc::now()));
        self.state.write().record(quote);
    }

    /// Resolve the rate for a debounced edit: serve a still-fresh quote
    /// from cache, otherwise refetch. Always yields a usable rate; the
    /// fallback substitution happens inside `PriceState`.
    pub async fn rate_for_conversion(&mut self) -> f64 {
        let cached = self.state.peek().fresh_quote(chrono::Utc::now());
        if let Some(quote) = cached {
            return quote.usd;
        }
        self.refresh().await;
        self.state.peek().effective_rate()
    }
}

/// Price feed hook: lazy first fetch on mount, then a background refresh
/// every 60 seconds while the consumer stays mounted. Background refreshes
/// keep the previous quote on screen; only the very first lookup counts as
/// loading.
pub fn use_price(asset_id: &'static str) -> PriceHandle {
    let state = use_signal(PriceState::default);
    let requests = use_signal(RequestContext::default);
    let handle = PriceHandle {
        state,
        requests,
        asset_id,
    };

    use_coroutine(move |_rx: UnboundedReceiver<()>| async move {
        let mut handle = handle;
        loop {
            handle.refresh().await;
            super::timer::sleep_ms(REFRESH_INTERVAL_MS).await;
        }
    });

    handle
}
