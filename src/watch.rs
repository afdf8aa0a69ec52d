// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Watch mode: rebuild every sprite set whenever an SVG source changes.
//!
//! Rebuilds run on the watching thread and block until finished, so events
//! that arrive during a rebuild are handled afterwards in arrival order.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, channel},
    },
    time::Duration,
};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::{
    build::{BuildSummary, run_build},
    config::BuildConfig,
    error::Error,
};

/// How long the loop waits for an event before re-checking the stop flag.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100,);

/// Notification emitted by [`watch`].
#[derive(Debug,)]
pub enum WatchEvent<'a,>
{
    /// Watching started on `directories`.
    Started
    {
        directories: &'a [PathBuf],
    },
    /// An SVG source changed and a rebuild is starting.
    Changed
    {
        path: &'a Path,
    },
    /// A rebuild finished.
    Rebuilt
    {
        summary: &'a BuildSummary,
    },
    /// A rebuild failed; watching continues.
    RebuildFailed
    {
        error: &'a Error,
    },
    /// Watching stopped.
    Stopped,
}

/// Returns the first `.svg` path touched by `event`.
///
/// Access events never count as changes.
pub fn svg_change(event: &Event,) -> Option<&Path,>
{
    if event.kind.is_access() {
        return None;
    }
    event
        .paths
        .iter()
        .map(PathBuf::as_path,)
        .find(|path| path.extension().is_some_and(|extension| extension == "svg",),)
}

/// Drains watcher events from `receiver` until `running` is cleared or the
/// channel closes, calling `on_change` once per event that touches an SVG
/// file.
///
/// Returns the number of triggered rebuilds.
pub fn watch_loop<F,>(receiver: &Receiver<notify::Result<Event,>,>, running: &AtomicBool, mut on_change: F,) -> usize
where
    F: FnMut(&Path,),
{
    let mut triggered = 0;

    while running.load(Ordering::SeqCst,) {
        match receiver.recv_timeout(POLL_INTERVAL,) {
            Ok(Ok(event,),) => {
                if let Some(path,) = svg_change(&event,) {
                    debug!("Change detected: {}", path.display());
                    on_change(path,);
                    triggered += 1;
                }
            }
            Ok(Err(error,),) => warn!("Watcher error: {error}"),
            Err(RecvTimeoutError::Timeout,) => {}
            Err(RecvTimeoutError::Disconnected,) => break,
        }
    }

    triggered
}

/// Watches the input directories of `config` and rebuilds all sets on every
/// SVG change until `running` is cleared.
///
/// Directories that do not exist are not watched. Recursive sets are watched
/// recursively. A failing rebuild is reported through `on_event` and does
/// not stop watching.
///
/// # Errors
///
/// Returns [`Error::Watch`] when the platform watcher cannot be created or a
/// directory cannot be registered.
pub fn watch<F,>(config: &BuildConfig, running: Arc<AtomicBool,>, mut on_event: F,) -> Result<(), Error,>
where
    F: FnMut(WatchEvent<'_,>,),
{
    let (sender, receiver,) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event,>| {
            let _ = sender.send(result,);
        },
        Config::default(),
    )?;

    let mut directories = Vec::new();
    for set in &config.sprite_sets {
        if !set.input_dir.is_dir() {
            debug!("Not watching missing directory {}", set.input_dir.display());
            continue;
        }
        if directories.contains(&set.input_dir,) {
            continue;
        }
        let mode = if set.recursive { RecursiveMode::Recursive } else { RecursiveMode::NonRecursive };
        watcher.watch(&set.input_dir, mode,)?;
        info!("Watching {}", set.input_dir.display());
        directories.push(set.input_dir.clone(),);
    }

    if directories.is_empty() {
        warn!("No icon directories exist; nothing to watch");
        on_event(WatchEvent::Stopped,);
        return Ok((),);
    }

    on_event(WatchEvent::Started {
        directories: &directories,
    },);

    watch_loop(&receiver, &running, |path| {
        on_event(WatchEvent::Changed {
            path,
        },);
        match run_build(config, |_| {},) {
            Ok(summary,) => {
                info!(
                    "Rebuilt {} icons across {} sprites",
                    summary.icon_count(),
                    summary.sprite_count()
                );
                on_event(WatchEvent::Rebuilt {
                    summary: &summary,
                },);
            }
            Err(error,) => {
                warn!("Rebuild failed: {error}");
                on_event(WatchEvent::RebuildFailed {
                    error: &error,
                },);
            }
        }
    },);

    drop(watcher,);
    on_event(WatchEvent::Stopped,);
    Ok((),)
}
