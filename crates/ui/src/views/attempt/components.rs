use dioxus::prelude::*;

use services::AttemptCommand;
use services::sessions::{GridCell, QuestionScreen};

use crate::vm::{ConfirmationVm, NoticeTone, NoticeVm};

#[component]
pub(super) fn QuestionCard(
    screen: QuestionScreen,
    locked: bool,
    on_command: EventHandler<AttemptCommand>,
) -> Element {
    let question_id = screen.question_id;
    let progress_style = format!("width: {:.1}%", screen.progress_percent);
    let next_label = screen.next_label.as_str();
    let flag_label = if screen.flagged { "Unflag" } else { "Flag for review" };
    let flag_class = if screen.flagged {
        "flag-btn flagged"
    } else {
        "flag-btn"
    };
    let rows: Vec<_> = screen
        .options
        .iter()
        .map(|row| {
            let class = if row.selected {
                "option selected"
            } else {
                "option"
            };
            let command = AttemptCommand::SelectOption {
                question_id,
                option_id: row.id,
            };
            (row.clone(), class, command)
        })
        .collect();

    rsx! {
        section { class: "question-card",
            div { class: "progress",
                span { class: "progress-label", "{screen.progress_label}" }
                div { class: "progress-track",
                    div { class: "progress-fill", style: "{progress_style}" }
                }
            }
            div { class: "question-meta",
                h3 { "{screen.heading}" }
                span { class: "marks", "{screen.marks_label}" }
                button {
                    class: "{flag_class}",
                    disabled: locked,
                    onclick: move |_| on_command.call(AttemptCommand::ToggleFlag),
                    "{flag_label}"
                }
            }
            p { class: "question-text", "{screen.text}" }
            ul { class: "options",
                if let Some(placeholder) = screen.options_placeholder.as_deref() {
                    li { class: "option-empty", "{placeholder}" }
                }
                for (row, class, command) in rows {
                    li { key: "{row.id}",
                        button {
                            class: "{class}",
                            disabled: locked,
                            onclick: move |_| on_command.call(command),
                            span { class: "option-letter", "{row.letter}" }
                            span { class: "option-text", "{row.text}" }
                        }
                    }
                }
            }
            div { class: "question-nav",
                button {
                    class: "nav-btn",
                    disabled: screen.previous_disabled,
                    onclick: move |_| on_command.call(AttemptCommand::Previous),
                    "Previous"
                }
                button {
                    class: "nav-btn primary",
                    onclick: move |_| on_command.call(AttemptCommand::Next),
                    "{next_label}"
                }
            }
        }
    }
}

#[component]
pub(super) fn NavigationGrid(cells: Vec<GridCell>, on_command: EventHandler<AttemptCommand>) -> Element {
    rsx! {
        nav { class: "question-grid",
            for cell in cells {
                button {
                    key: "{cell.index}",
                    class: grid_class(&cell),
                    onclick: move |_| on_command.call(AttemptCommand::GoTo(cell.index)),
                    "{cell.label}"
                }
            }
        }
    }
}

fn grid_class(cell: &GridCell) -> String {
    let mut class = String::from("grid-cell");
    if cell.current {
        class.push_str(" current");
    }
    if cell.answered {
        class.push_str(" answered");
    }
    if cell.flagged {
        class.push_str(" flagged");
    }
    class
}

#[component]
pub(super) fn ConfirmationDialog(
    summary: ConfirmationVm,
    submitting: bool,
    on_command: EventHandler<AttemptCommand>,
) -> Element {
    let submit_label = if submitting { "Submitting..." } else { "Submit" };
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog",
                h3 { "Submit quiz?" }
                ul { class: "summary",
                    li { "Answered: {summary.answered}" }
                    li { "Unanswered: {summary.unanswered}" }
                    li { "Flagged: {summary.flagged}" }
                }
                if let Some(warning) = summary.warning.as_ref() {
                    p { class: "summary-warning", "{warning}" }
                }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        disabled: submitting,
                        onclick: move |_| on_command.call(AttemptCommand::CancelConfirmation),
                        "Cancel"
                    }
                    button {
                        class: "btn primary",
                        disabled: submitting,
                        onclick: move |_| on_command.call(AttemptCommand::ConfirmSubmit),
                        "{submit_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub(super) fn NoticeBanner(notice: NoticeVm, on_dismiss: EventHandler<()>) -> Element {
    let class = match notice.tone {
        NoticeTone::Info => "notice info",
        NoticeTone::Warning => "notice warning",
        NoticeTone::Success => "notice success",
        NoticeTone::Error => "notice error",
    };
    rsx! {
        div { class: "{class}", role: "alert",
            for line in notice.lines.iter() {
                p { "{line}" }
            }
            button { class: "notice-dismiss", onclick: move |_| on_dismiss.call(()), "OK" }
        }
    }
}
