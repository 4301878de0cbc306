//! `start` command: serve a production build with `next start`.

use crate::{
    config::{DEFAULT_PORT, ProjectConfig},
    core::is_test_env,
    log,
    utils::exec::{Cmd, find_node_bin},
};
use anyhow::Result;

/// `next start <outputRoot> -p <port>`.
pub fn start_project(config: &ProjectConfig, port: Option<u16>) -> Result<()> {
    let paths = config.paths();
    let port = port.unwrap_or(DEFAULT_PORT);

    if is_test_env() {
        crate::debug!("start"; "NODE_ENV=test, not starting next");
        return Ok(());
    }

    if !paths.output.join(".next").is_dir() {
        log!(
            "warning";
            "{} has no production build, run `taro-next build` first",
            config.root_relative(&paths.output).display()
        );
    }

    let next = find_node_bin("next", &paths.app)?;
    log!("start"; "http://127.0.0.1:{}", port);
    Cmd::new(next)
        .arg("start")
        .arg(&paths.output)
        .args(["-p", &port.to_string()])
        .status()
}
