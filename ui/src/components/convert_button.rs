//! The primary action control. Label and enabled state come from the
//! evaluated policy; this component only renders them.

use dioxus::prelude::*;

#[component]
pub fn ConvertButton(
    label: String,
    busy: bool,
    disabled: bool,
    onclick: EventHandler<()>,
) -> Element {
    rsx! {
        button {
            class: "convert-button",
            disabled: disabled || busy,
            onclick: move |_| onclick.call(()),
            if busy {
                span { class: "button-spinner" }
            }
            "{label}"
        }
    }
}
