//! Inline, non-blocking failure notices for the price feed and the two
//! balance lookups.

use dioxus::prelude::*;

#[component]
pub fn ErrorMessages(price_error: bool, usdc_error: bool, wbtc_error: bool) -> Element {
    if !price_error && !usdc_error && !wbtc_error {
        return rsx! {};
    }

    rsx! {
        div { class: "error-banner",
            if price_error {
                p { "Failed to fetch price data. Please try again later." }
            }
            if usdc_error {
                p { "Failed to fetch USDC balance. Please check your wallet or try again." }
            }
            if wbtc_error {
                p { "Failed to fetch wBTC balance. Please check your wallet or try again." }
            }
        }
    }
}
