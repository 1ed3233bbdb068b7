use crate::state::DisplayBoard;
use dioxus::prelude::*;
use prayer_display_core::datetime::iso_time_string;
use prayer_display_core::event_display_name;

/// One rendered event box
struct EventRow {
    name: String,
    time: String,
    iqama: Option<String>,
    is_next: bool,
}

/// Footer listing every event of the day with its iqama time.
///
/// The upcoming event is highlighted. Clicking an event previews it in
/// simulated time.
#[component]
pub fn EventList() -> Element {
    let mut board = use_context::<DisplayBoard>();

    let rows: Vec<EventRow> = {
        let state = board.state.read();
        state
            .events()
            .iter()
            .enumerate()
            .map(|(idx, event)| EventRow {
                name: event_display_name(&event.name).to_string(),
                time: iso_time_string(Some(&event.time), false),
                iqama: event.iqama.as_ref().map(|t| iso_time_string(Some(t), false)),
                is_next: state.next_event() == Some(idx),
            })
            .collect()
    };

    rsx! {
        div {
            id: "footer",
            div { class: "footer__space" }

            for (idx, row) in rows.into_iter().enumerate() {
                div {
                    key: "{idx}",
                    class: if row.is_next { "event event--target" } else { "event" },
                    onclick: move |evt: MouseEvent| {
                        evt.stop_propagation();
                        board.preview_event(idx);
                    },

                    p { class: "event__name", "{row.name}" }
                    p { class: "event__time", "{row.time}" }
                    if let Some(iqama) = row.iqama {
                        p { class: "event__iqama", "{iqama}" }
                    }
                }
            }

            div { class: "footer__space" }
        }
    }
}
