use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::{DesktopContext, WindowCloseBehaviour, use_window, use_wry_event_handler};
use dioxus::prelude::*;
use log::info;

/// Close behaviour for the attempt window: hidden (and re-shown behind the
/// leave prompt) while leaving needs confirmation, closed otherwise.
#[must_use]
pub fn close_behaviour_for(guarded: bool) -> WindowCloseBehaviour {
    if guarded {
        WindowCloseBehaviour::WindowHides
    } else {
        WindowCloseBehaviour::WindowCloses
    }
}

/// Whether this render runs inside a desktop window.
#[must_use]
pub fn has_desktop_window() -> bool {
    try_consume_context::<DesktopContext>().is_some()
}

/// Close the attempt window for good once the student confirmed leaving.
pub fn close_window() {
    if let Some(window) = try_consume_context::<DesktopContext>() {
        window.set_close_behavior(WindowCloseBehaviour::WindowCloses);
        window.close();
    }
}

/// Routes the window's close button through the leave prompt while
/// `guarded` is set. Render only when `has_desktop_window()` holds.
#[component]
pub fn WindowCloseGuard(guarded: bool, on_close_requested: EventHandler<()>) -> Element {
    let window = use_window();
    let mut latest = use_signal(|| guarded);

    let behaviour_window = window.clone();
    use_effect(use_reactive((&guarded,), move |(guarded,)| {
        latest.set(guarded);
        behaviour_window.set_close_behavior(close_behaviour_for(guarded));
    }));

    use_wry_event_handler(move |event, _| {
        let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            window_id,
            ..
        } = event
        else {
            return;
        };
        if *window_id != window.id() || !*latest.peek() {
            return;
        }
        info!("window close requested during an attempt; asking to confirm");
        let window = window.clone();
        // The close handler hides the window after this callback returns.
        spawn(async move { window.set_visible(true) });
        on_close_requested.call(());
    });

    rsx! {}
}
