//! One labeled decimal-amount input with its balance caption.

use dioxus::prelude::*;

/// Shown in place of the derived field while its recomputation is pending.
#[component]
fn InputSkeleton() -> Element {
    rsx! {
        div { class: "input-skeleton",
            div { class: "input-skeleton-bar" }
        }
    }
}

#[component]
pub fn CurrencyInput(
    label: String,
    amount: String,
    glyph: String,
    placeholder: String,
    disabled: bool,
    connected: bool,
    balance_display: Option<String>,
    skeleton: bool,
    oninput: EventHandler<String>,
) -> Element {
    let caption = if connected { balance_display } else { None };

    rsx! {
        div { class: "currency-field",
            label { class: "field-label", "{label}" }
            div { class: "field-row",
                if skeleton {
                    InputSkeleton {}
                } else {
                    input {
                        r#type: "text",
                        inputmode: "decimal",
                        placeholder: "{placeholder}",
                        value: "{amount}",
                        disabled: disabled,
                        oninput: move |e| oninput.call(e.value()),
                    }
                }
                span { class: "field-glyph", "{glyph}" }
            }
            if let Some(text) = caption {
                div { class: "field-balance", "{text}" }
            }
        }
    }
}
