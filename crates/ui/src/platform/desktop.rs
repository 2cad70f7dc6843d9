use std::process::Command;

use log::{info, warn};

use super::UiLinkOpener;

/// Hands URLs to the system browser.
pub struct DesktopLinkOpener;

impl DesktopLinkOpener {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut command = Command::new("open");
            command.arg(url);
            command
        }
        #[cfg(target_os = "windows")]
        {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            warn!("refusing to open an empty url");
            return;
        }
        match Self::command(url).spawn() {
            Ok(_) => info!("opened {url} in the system browser"),
            Err(err) => warn!("failed to open {url}: {err}"),
        }
    }
}
