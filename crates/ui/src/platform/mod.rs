use std::sync::Arc;

mod desktop;
mod window;

/// Opens URLs outside the app window (results page after submission).
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;
pub use window::{WindowCloseGuard, close_window, has_desktop_window};
