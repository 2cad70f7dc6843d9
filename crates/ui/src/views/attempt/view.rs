use dioxus::prelude::*;
use dioxus_router::use_navigator;
use log::info;

use services::{AttemptCommand, AttemptController, AttemptExit};

use super::SignalView;
use super::components::{ConfirmationDialog, NavigationGrid, NoticeBanner, QuestionCard};
use crate::context::AppContext;
use crate::platform::{WindowCloseGuard, close_window, has_desktop_window};
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{AttemptVm, start_attempt};

#[component]
pub fn TakeQuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut state = use_signal(AttemptVm::default);
    let load_error = use_signal(|| None::<ViewError>);
    let loading = use_signal(|| true);
    let mut confirm_leave = use_signal(|| false);
    let mut closing_window = use_signal(|| false);
    let in_window = use_hook(has_desktop_window);

    let commands = use_coroutine(move |rx: UnboundedReceiver<AttemptCommand>| {
        let ctx = ctx.clone();
        let mut load_error = load_error;
        let mut loading = loading;

        async move {
            let services = ctx.services();
            let started = start_attempt(&services).await;
            loading.set(false);
            let session = match started {
                Ok(session) => session,
                Err(err) => {
                    load_error.set(Some(err));
                    return;
                }
            };

            let view = SignalView::new(state, ctx.link_opener());
            let mut controller = AttemptController::new(session, view, services.backend());
            controller.start();

            match controller.run(rx).await {
                AttemptExit::Submitted(receipt) => {
                    navigator.push(Route::Submitted {
                        attempt_id: receipt.attempt_id.value(),
                    });
                }
                AttemptExit::Left => {
                    navigator.push(Route::Left {});
                }
                AttemptExit::Closed => info!("attempt page closed"),
            }
        }
    });

    let send = use_callback(move |command: AttemptCommand| commands.send(command));
    let on_dismiss = use_callback(move |()| state.write().notice = None);
    let on_leave = use_callback(move |()| {
        if state.read().leave_guard {
            confirm_leave.set(true);
        } else {
            commands.send(AttemptCommand::Leave);
        }
    });
    let on_close_requested = use_callback(move |()| {
        closing_window.set(true);
        confirm_leave.set(true);
    });

    if loading() {
        return rsx! {
            div { class: "page attempt",
                p { "Loading quiz..." }
            }
        };
    }
    if let Some(err) = load_error() {
        return rsx! {
            div { class: "page attempt",
                p { class: "error", "{err.message()}" }
            }
        };
    }

    let vm = state.read().clone();
    let timer_class = match vm.timer.as_ref() {
        Some(timer) if timer.warning => "timer warning",
        _ => "timer",
    };

    rsx! {
        div { class: "page attempt",
            if in_window {
                WindowCloseGuard { guarded: vm.leave_guard, on_close_requested }
            }
            header { class: "attempt-header",
                h2 { "{vm.title}" }
                if let Some(timer) = vm.timer.as_ref() {
                    span { class: "{timer_class}", "{timer.text}" }
                }
            }

            if let Some(notice) = vm.notice.clone() {
                NoticeBanner { notice, on_dismiss }
            }

            div { class: "attempt-body",
                if let Some(screen) = vm.question.clone() {
                    QuestionCard { screen, locked: vm.submitting, on_command: send }
                }
                aside { class: "attempt-sidebar",
                    NavigationGrid { cells: vm.grid.clone(), on_command: send }
                    button {
                        class: "btn primary submit-btn",
                        disabled: vm.submitting,
                        onclick: move |_| send.call(AttemptCommand::OpenConfirmation),
                        if vm.submitting { "Submitting..." } else { "Submit Quiz" }
                    }
                    button {
                        class: "btn leave-btn",
                        disabled: vm.submitting,
                        onclick: move |_| on_leave.call(()),
                        "Leave"
                    }
                }
            }

            if let Some(summary) = vm.confirmation.clone() {
                ConfirmationDialog { summary, submitting: vm.submitting, on_command: send }
            }

            if confirm_leave() {
                div { class: "modal-backdrop",
                    div { class: "modal", role: "dialog",
                        h3 { "Leave the quiz?" }
                        p { "Your answers will be lost." }
                        div { class: "modal-actions",
                            button {
                                class: "btn",
                                onclick: move |_| {
                                    confirm_leave.set(false);
                                    closing_window.set(false);
                                },
                                "Stay"
                            }
                            button {
                                class: "btn danger",
                                onclick: move |_| {
                                    confirm_leave.set(false);
                                    send.call(AttemptCommand::Leave);
                                    if closing_window() {
                                        close_window();
                                    }
                                },
                                "Leave"
                            }
                        }
                    }
                }
            }
        }
    }
}
