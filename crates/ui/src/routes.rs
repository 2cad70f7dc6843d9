use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::AppContext;
use crate::views::{LeftView, SubmittedView, TakeQuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TakeQuizView)] TakeQuiz {},
        #[route("/submitted/:attempt_id", SubmittedView)] Submitted { attempt_id: u64 },
        #[route("/left", LeftView)] Left {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_id = ctx.quiz_id();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Quiz" }
                span { class: "quiz-id", "Quiz #{quiz_id}" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
