//! Open a URL in the user's default browser.

use super::exec::Cmd;
use anyhow::Result;

/// Platform opener command for a URL.
fn opener(url: &str) -> Cmd {
    if cfg!(target_os = "macos") {
        Cmd::new("open").arg(url)
    } else if cfg!(windows) {
        // `start` treats the first quoted argument as the window title
        Cmd::new("cmd").args(["/C", "start", "\"\"", url])
    } else {
        Cmd::new("xdg-open").arg(url)
    }
}

/// Launch the browser without waiting for it.
pub fn open_url(url: &str) -> Result<()> {
    opener(url).quiet(true).spawn().map(drop)
}
