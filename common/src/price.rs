//! Price quote and result types shared by the fetch layer and the UI.
//!
//! One `Result<_, PriceError>` flows unchanged from the transport up to the
//! display layer; nothing below substitutes the fallback. [`PriceState`]
//! is where the display decides to fall back to [`FALLBACK_USD_PRICE`]
//! while still surfacing the error.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Static price basis used when the live source is unavailable.
pub const FALLBACK_USD_PRICE: f64 = 107_500.0;

/// Quiescence window between a keystroke and the rate lookup it triggers.
pub const DEBOUNCE_MS: u32 = 300;

/// Cadence of the background refresh while a consumer is mounted.
pub const REFRESH_INTERVAL_MS: u32 = 60_000;

/// How long a fetched quote is served without refetching.
pub const PRICE_FRESH_SECS: i64 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PriceError {
    /// The request never produced a readable body (network, abort, HTTP).
    Transport(String),
    /// The body arrived but did not contain a usable positive price.
    MalformedResponse,
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceError::Transport(detail) => write!(f, "price fetch failed: {detail}"),
            PriceError::MalformedResponse => write!(f, "price response was malformed"),
        }
    }
}

/// A fetched USD price for one token unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceQuote {
    pub usd: f64,
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(usd: f64, fetched_at: DateTime<Utc>) -> Self {
        Self { usd, fetched_at }
    }

    /// Fresh quotes are served from cache; stale ones trigger a refetch.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < TimeDelta::seconds(PRICE_FRESH_SECS)
    }
}

/// Extract the USD price for `asset_id` from a `simple/price` response body
/// of the shape `{"<asset_id>":{"usd":<number>}}`.
pub fn parse_simple_price(body: &str, asset_id: &str) -> Result<f64, PriceError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| PriceError::MalformedResponse)?;
    let usd = value
        .get(asset_id)
        .and_then(|entry| entry.get("usd"))
        .and_then(|price| price.as_f64())
        .ok_or(PriceError::MalformedResponse)?;
    if usd > 0.0 {
        Ok(usd)
    } else {
        Err(PriceError::MalformedResponse)
    }
}

/// Latest known outcome of the price feed, as the display consumes it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceState {
    latest: Option<Result<PriceQuote, PriceError>>,
}

impl PriceState {
    /// Record the newest resolved lookup, success or failure.
    pub fn record(&mut self, result: Result<PriceQuote, PriceError>) {
        self.latest = Some(result);
    }

    pub fn quote(&self) -> Option<PriceQuote> {
        match &self.latest {
            Some(Ok(quote)) => Some(*quote),
            _ => None,
        }
    }

    pub fn fresh_quote(&self, now: DateTime<Utc>) -> Option<PriceQuote> {
        self.quote().filter(|quote| quote.is_fresh(now))
    }

    /// The rate conversions are computed with: the live quote, or the
    /// static fallback while the feed is errored or not yet resolved.
    pub fn effective_rate(&self) -> f64 {
        self.quote().map(|quote| quote.usd).unwrap_or(FALLBACK_USD_PRICE)
    }

    /// True when the last lookup failed; drives the inline message and
    /// disables both inputs.
    pub fn is_error(&self) -> bool {
        matches!(self.latest, Some(Err(_)))
    }

    /// True until the first lookup resolves.
    pub fn is_initial_loading(&self) -> bool {
        self.latest.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_price() {
        let body = r#"{"bitcoin":{"usd":65000.5}}"#;
        assert_eq!(parse_simple_price(body, "bitcoin"), Ok(65000.5));
    }

    #[test]
    fn test_parse_simple_price_missing_key() {
        let body = r#"{"ethereum":{"usd":3000}}"#;
        assert_eq!(
            parse_simple_price(body, "bitcoin"),
            Err(PriceError::MalformedResponse)
        );
    }

    #[test]
    fn test_parse_simple_price_malformed() {
        for body in ["not json", "{}", r#"{"bitcoin":{}}"#, r#"{"bitcoin":{"usd":"n/a"}}"#] {
            assert_eq!(
                parse_simple_price(body, "bitcoin"),
                Err(PriceError::MalformedResponse)
            );
        }
    }

    #[test]
    fn test_parse_simple_price_rejects_non_positive() {
        assert_eq!(
            parse_simple_price(r#"{"bitcoin":{"usd":0}}"#, "bitcoin"),
            Err(PriceError::MalformedResponse)
        );
        assert_eq!(
            parse_simple_price(r#"{"bitcoin":{"usd":-1}}"#, "bitcoin"),
            Err(PriceError::MalformedResponse)
        );
    }

    #[test]
    fn test_quote_freshness_window() {
        let fetched = Utc::now();
        let quote = PriceQuote::new(65_000.0, fetched);
        assert!(quote.is_fresh(fetched + TimeDelta::seconds(PRICE_FRESH_SECS - 1)));
        assert!(!quote.is_fresh(fetched + TimeDelta::seconds(PRICE_FRESH_SECS)));
    }

    #[test]
    fn test_state_starts_loading_on_fallback_basis() {
        let state = PriceState::default();
        assert!(state.is_initial_loading());
        assert!(!state.is_error());
        assert_eq!(state.effective_rate(), FALLBACK_USD_PRICE);
    }

    #[test]
    fn test_state_failure_keeps_fallback_basis_and_flags_error() {
        let mut state = PriceState::default();
        state.record(Err(PriceError::Transport("timeout".into())));
        assert!(state.is_error());
        assert!(!state.is_initial_loading());
        assert_eq!(state.effective_rate(), FALLBACK_USD_PRICE);
        assert_eq!(state.quote(), None);
    }

    #[test]
    fn test_state_success_replaces_error() {
        let mut state = PriceState::default();
        state.record(Err(PriceError::MalformedResponse));
        state.record(Ok(PriceQuote::new(64_000.0, Utc::now())));
        assert!(!state.is_error());
        assert_eq!(state.effective_rate(), 64_000.0);
    }

    #[test]
    fn test_conversions_fall_back_after_fetch_failure() {
        use crate::convert::{Conversion, EditOutcome, Side};

        let mut state = PriceState::default();
        state.record(Err(PriceError::Transport("offline".into())));

        let mut conversion = Conversion::new();
        let edit = match conversion.edit(Side::Usd, "215") {
            EditOutcome::Accepted(edit) => edit,
            other => panic!("expected acceptance, got {other:?}"),
        };
        assert!(conversion.debounce_elapsed(edit));
        assert!(conversion.settle(edit, state.effective_rate()));
        // 215 / 107500 with the static fallback basis
        assert_eq!(conversion.token_amount(), "0.00200000");
        assert!(state.is_error());
    }

    #[test]
    fn test_stale_quote_is_not_served_fresh() {
        let fetched = Utc::now();
        let mut state = PriceState::default();
        state.record(Ok(PriceQuote::new(64_000.0, fetched)));
        let later = fetched + TimeDelta::seconds(PRICE_FRESH_SECS + 5);
        assert_eq!(state.fresh_quote(later), None);
        // Still the display basis even when stale.
        assert_eq!(state.effective_rate(), 64_000.0);
    }
}
