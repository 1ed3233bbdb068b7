use crate::state::DisplayBoard;
use dioxus::prelude::*;

/// Message of the last failed fetch, cleared once a schedule loads.
#[component]
pub fn ErrorBanner() -> Element {
    let board = use_context::<DisplayBoard>();
    let message = board.state.read().fetch_error().map(str::to_string);

    rsx! {
        if let Some(message) = message {
            div { id: "error-banner", "{message}" }
        }
    }
}
