use crate::components::{ErrorBanner, EventList, Header};
use crate::state::DisplayBoard;
use crate::theme_watcher::use_theme_watcher;
use dioxus::prelude::*;
use tokio_util::sync::CancellationToken;

/// Root application component.
///
/// Shows the active background image with its theme colors as CSS variables
/// on the root element. Clicking anywhere outside the header and events
/// returns to real time.
#[component]
pub fn App() -> Element {
    let cancel_token = use_context::<CancellationToken>();
    let css = use_theme_watcher(cancel_token);
    let mut board = use_context::<DisplayBoard>();

    let (image_url, theme_style, debug_mode) = {
        let state = board.state.read();
        let image = state.active_image();
        let theme_style: String = image
            .map(|image| {
                image
                    .css_variables()
                    .iter()
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(name, value)| format!("{name}: {value}; "))
                    .collect()
            })
            .unwrap_or_default();
        (
            image.map(|image| image.url.clone()),
            theme_style,
            state.is_debug_mode(),
        )
    };

    rsx! {
        style { "{css}" }
        div {
            id: "app",
            class: if debug_mode { "debug" } else { "" },
            style: "{theme_style}",
            onclick: move |_| board.resume_real_time(),

            if let Some(url) = image_url {
                img { id: "main-image", src: "{url}", loading: "lazy" }
            }

            Header {}
            ErrorBanner {}
            EventList {}
        }
    }
}
