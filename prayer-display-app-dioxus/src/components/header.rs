use crate::cue::CuePlayer;
use crate::state::DisplayBoard;
use dioxus::prelude::*;

/// Clock, date line in both calendars and the countdown to the next target.
/// Clicking the countdown replays the cue.
#[component]
pub fn Header() -> Element {
    let board = use_context::<DisplayBoard>();
    let cue = use_context::<CuePlayer>();

    let (clock, date, countdown) = {
        let state = board.state.read();
        (state.clock_text(), state.date_line(), state.countdown())
    };

    rsx! {
        div {
            id: "header",
            p { id: "clock", "{clock}" }
            p { id: "date", "{date}" }
            p {
                id: "countdown",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    cue.play();
                },
                "{countdown}"
            }
        }
    }
}
