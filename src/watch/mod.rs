//! Watch mode: mirrors source changes into the Next.js project.
//!
//! Architecture:
//! ```text
//! notify callback → std mpsc → Debouncer (pure timing) → apply_changes → mirror / remove
//!                                                              │
//!                                               entry touched ─┴─► relocate_global_styles
//! ```
//!
//! `next dev` picks the mirrored files up with its own file watcher. The
//! loop ends on Ctrl+C or when `next` exits, and never leaves `next` running.

mod debouncer;
mod types;


use std::path::{Path, PathBuf};
use std::process::Child;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use jwalk::WalkDir;
use notify::{RecursiveMode, Watcher};

use crate::config::{ENTRY, ProjectConfig, ProjectPaths};
use crate::core::is_shutdown;
use crate::log;
use crate::logger::{status_error, status_success};
use crate::scaffold::{MirrorContext, mirror_file, relocate_global_styles, remove_output};
use crate::utils::path::split_script_name;
use debouncer::Debouncer;
use types::{ChangeKind, DebouncedEvents};

/// Upper bound of one loop iteration, for Ctrl+C and child exit checks.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watch `<sourceRoot>` until shutdown, then stop `next`.
pub fn watch(config: &ProjectConfig, child: Option<Child>) -> Result<()> {
    let mut paths = config.paths();

    let (notify_tx, notify_rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&paths.source, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", paths.source.display()))?;

    log!(
        "watch";
        "watching {} for changes",
        config.root_relative(&paths.source).display()
    );

    let mut child = child;
    let mut debouncer = Debouncer::new();

    let result = loop {
        if is_shutdown() {
            break Ok(());
        }
        if let Some(next) = child.as_mut()
            && let Some(status) = next.try_wait().context("failed to poll next")?
        {
            child = None;
            if status.success() {
                break Ok(());
            }
            break Err(anyhow!("next exited with {status}"));
        }

        match notify_rx.recv_timeout(debouncer.sleep_duration(POLL_INTERVAL)) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break Ok(()),
        }

        if let Some(changes) = debouncer.take_if_ready() {
            apply_changes(config, &mut paths, DebouncedEvents::from_changes(changes));
        }
    };

    if let Some(mut next) = child {
        crate::debug!("watch"; "stopping next (pid {})", next.id());
        next.kill().ok();
        next.wait().ok();
    }

    result
}

/// Mirror a debounced batch. Failures are reported and do not stop the loop.
fn apply_changes(config: &ProjectConfig, paths: &mut ProjectPaths, events: DebouncedEvents) {
    let entry_touched = events
        .0
        .iter()
        .any(|(path, _)| is_entry_candidate(&paths.source, path));
    if entry_touched {
        // `app.h5.tsx` may have appeared or vanished
        *paths = config.paths();
    }

    let ctx = MirrorContext::new(paths);
    for (path, kind) in events.0 {
        let rel = config.root_relative(&path);
        match apply_change(&ctx, &path, kind) {
            Ok(Some(_)) => {
                status_success(&format!("File was {} {}", kind.label(), rel.display()));
            }
            Ok(None) => crate::debug!("watch"; "skip shadowed {}", rel.display()),
            Err(e) => {
                status_error(&format!("failed to mirror {}", rel.display()), &format!("{e:#}"));
            }
        }
    }

    if entry_touched {
        match relocate_global_styles(paths) {
            Ok(imports) => {
                crate::debug!("watch"; "_app.tsx updated, {} global style(s)", imports.len());
            }
            Err(e) => status_error("failed to update pages/_app.tsx", &format!("{e:#}")),
        }
    }
}

/// Mirror or remove one path. Returns the output touched, `None` when shadowed.
fn apply_change(ctx: &MirrorContext, path: &Path, kind: ChangeKind) -> Result<Option<PathBuf>> {
    match kind {
        // rename sources arrive as modifications of a path that is gone
        ChangeKind::Removed => remove_output(ctx, path),
        _ if !path.exists() => remove_output(ctx, path),
        _ if path.is_dir() => mirror_dir(ctx, path),
        _ => mirror_file(ctx, path),
    }
}

/// Mirror a directory moved into the source tree.
fn mirror_dir(ctx: &MirrorContext, dir: &Path) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() {
            mirror_file(ctx, &entry.path())?;
        }
    }
    Ok(ctx.output_path(dir))
}

/// `<sourceRoot>/app.*`, including `.h5` variants.
fn is_entry_candidate(source: &Path, path: &Path) -> bool {
    path.parent() == Some(source)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(split_script_name)
            .is_some_and(|(stem, _, _)| stem == ENTRY)
}
