//! Single suspension primitive for UI tasks.
//!
//! On WASM this is a real browser timeout. On native builds (used for type
//! checking only) it parks forever, the same trick the rest of the app uses
//! for WASM-only loops.

#[cfg(target_family = "wasm")]
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_family = "wasm"))]
pub async fn sleep_ms(_ms: u32) {
    std::future::pending::<()>().await
}
