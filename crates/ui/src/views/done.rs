use dioxus::prelude::*;

use quiz_core::model::AttemptId;

use crate::context::AppContext;

#[component]
pub fn SubmittedView(attempt_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let result_url = ctx
        .services()
        .backend()
        .result_url(AttemptId::new(attempt_id));
    let opener = ctx.link_opener();
    let url_for_click = result_url.clone();

    rsx! {
        div { class: "page done",
            h2 { "Quiz submitted" }
            p { "Your results are ready." }
            p { class: "result-url", "{result_url}" }
            button {
                class: "btn primary",
                onclick: move |_| opener.open_url(&url_for_click),
                "Open results"
            }
        }
    }
}

#[component]
pub fn LeftView() -> Element {
    rsx! {
        div { class: "page done",
            h2 { "You left the quiz" }
            p { "Nothing was submitted. Start the app again to retake the quiz." }
        }
    }
}
