//! Transient acknowledgement shown after the convert action fires. No real
//! settlement happens behind it.

use dioxus::prelude::*;

#[component]
pub fn TransactionModal(open: bool, onclose: EventHandler<()>) -> Element {
    if !open {
        return rsx! {};
    }

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| onclose.call(()),
            div {
                class: "modal-card transaction-modal",
                onclick: move |e: Event<MouseData>| e.stop_propagation(),
                div { class: "modal-check", "✓" }
                h3 { "Transaction Completed" }
                p { "Your conversion has been successfully completed!" }
                button {
                    class: "modal-close",
                    onclick: move |_| onclose.call(()),
                    "Close"
                }
            }
        }
    }
}
