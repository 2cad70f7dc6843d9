mod components;
mod signal_view;
mod view;

pub(crate) use signal_view::SignalView;
pub use view::TakeQuizView;
