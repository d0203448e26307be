//! WASM HTTP helpers shared by the price feed and the balance client.
//!
//! Thin wrapper over the browser fetch API. Errors come back as strings;
//! callers fold them into their own result types. An optional abort signal
//! lets the price feed cancel a superseded request in flight.

#[cfg(target_family = "wasm")]
pub async fn fetch_text(
    url: &str,
    method: &str,
    body: Option<String>,
    signal: Option<&web_sys::AbortSignal>,
) -> Result<String, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let opts = web_sys::RequestInit::new();
    opts.set_method(method);
    opts.set_mode(web_sys::RequestMode::Cors);
    opts.set_signal(signal);

    if let Some(b) = body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(&b));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to create request: {:?}", e))?;

    if method == "POST" {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| format!("Failed to set header: {:?}", e))?;
    }

    let window = web_sys::window().ok_or("No window")?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| "Response is not a Response object".to_string())?;

    let text = JsFuture::from(
        resp.text()
            .map_err(|e| format!("Failed to get text: {:?}", e))?,
    )
    .await
    .map_err(|e| format!("Failed to read body: {:?}", e))?;

    let text_str = text
        .as_string()
        .ok_or("Response body is not a string".to_string())?;

    let status = resp.status();
    if status >= 400 {
        return Err(format!("HTTP {} from {}: {}", status, url, text_str));
    }

    Ok(text_str)
}

// Non-WASM stub for type checking
#[cfg(not(target_family = "wasm"))]
pub async fn fetch_text(
    _url: &str,
    _method: &str,
    _body: Option<String>,
    _signal: Option<&()>,
) -> Result<String, String> {
    Err("HTTP client only available in WASM".to_string())
}
